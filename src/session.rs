//! Write session for rewritten and newly created objects.
//!
//! Output is built through a stack of open contexts: an indirect object, then nested
//! dictionaries and arrays inside it. Every `start_*` returns a token that the matching
//! `end_*` consumes, and the session checks that the token closes the innermost open context.
//! Indirect objects never nest; a child object is opened only after its parent is closed,
//! which is why children are referenced by identity before they are written.
//!
//! Nothing reaches the source document until the caller applies [`WriteSession::finish`]'s
//! output. A failed fill simply drops the session.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::BTreeMap;

/// Open indirect object. Consumed by [`WriteSession::end_object`].
#[must_use = "an open indirect object must be closed with end_object"]
#[derive(Debug)]
pub struct IndirectObjectToken {
    id: ObjectRef,
    depth: usize,
}

impl IndirectObjectToken {
    /// Identity of the object being written.
    pub fn id(&self) -> ObjectRef {
        self.id
    }
}

/// Open dictionary context. Consumed by [`WriteSession::end_dictionary`].
#[must_use = "an open dictionary must be closed with end_dictionary"]
#[derive(Debug)]
pub struct DictionaryToken {
    depth: usize,
}

/// Open array context. Consumed by [`WriteSession::end_array`].
#[must_use = "an open array must be closed with end_array"]
#[derive(Debug)]
pub struct ArrayToken {
    depth: usize,
}

#[derive(Debug)]
enum Frame {
    Object {
        id: ObjectRef,
        value: Option<Object>,
    },
    Dictionary {
        dict: Dictionary,
        pending_key: Option<String>,
    },
    Array {
        items: Vec<Object>,
    },
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Frame::Object { .. } => "object",
            Frame::Dictionary { .. } => "dictionary",
            Frame::Array { .. } => "array",
        }
    }
}

/// Stack-disciplined writer for indirect objects.
#[derive(Debug)]
pub struct WriteSession {
    frames: Vec<Frame>,
    written: BTreeMap<ObjectRef, Object>,
    next_id: u32,
}

impl WriteSession {
    /// Create a session whose first allocated identity is `first_free_id`.
    pub fn new(first_free_id: u32) -> Self {
        Self {
            frames: Vec::new(),
            written: BTreeMap::new(),
            next_id: first_free_id.max(1),
        }
    }

    /// Reserve a fresh identity for an object written later in the session.
    pub fn allocate_id(&mut self) -> ObjectRef {
        let r = ObjectRef::new(self.next_id, 0);
        self.next_id += 1;
        r
    }

    /// Open a newly allocated indirect object.
    pub fn start_new_object(&mut self, id: ObjectRef) -> Result<IndirectObjectToken> {
        self.open_object(id)
    }

    /// Re-open an existing indirect object to replace its content.
    pub fn start_modified_object(&mut self, id: ObjectRef) -> Result<IndirectObjectToken> {
        self.open_object(id)
    }

    fn open_object(&mut self, id: ObjectRef) -> Result<IndirectObjectToken> {
        if let Some(open) = self.frames.last() {
            return Err(Error::UnbalancedWrite(format!(
                "cannot open object {} while a {} is open",
                id,
                open.kind()
            )));
        }
        self.frames.push(Frame::Object { id, value: None });
        Ok(IndirectObjectToken { id, depth: 0 })
    }

    /// Close an indirect object; its single value becomes part of the output.
    pub fn end_object(&mut self, token: IndirectObjectToken) -> Result<()> {
        self.check_innermost(token.depth, "object")?;
        match self.frames.pop() {
            Some(Frame::Object { id, value: Some(value) }) if id == token.id => {
                self.written.insert(id, value);
                Ok(())
            },
            Some(Frame::Object { id, value: None }) => Err(Error::UnbalancedWrite(format!(
                "object {} closed without a value",
                id
            ))),
            other => Err(Error::UnbalancedWrite(format!(
                "expected object {}, found {:?}",
                token.id,
                other.map(|f| f.kind())
            ))),
        }
    }

    /// Open a dictionary as the next value in the current context.
    pub fn start_dictionary(&mut self) -> Result<DictionaryToken> {
        self.check_value_slot()?;
        let depth = self.frames.len();
        self.frames.push(Frame::Dictionary {
            dict: Dictionary::new(),
            pending_key: None,
        });
        Ok(DictionaryToken { depth })
    }

    /// Close a dictionary and place it in the enclosing context.
    pub fn end_dictionary(&mut self, token: DictionaryToken) -> Result<()> {
        self.check_innermost(token.depth, "dictionary")?;
        match self.frames.pop() {
            Some(Frame::Dictionary { dict, pending_key: None }) => self.place(Object::Dictionary(dict)),
            Some(Frame::Dictionary { pending_key: Some(key), .. }) => Err(Error::UnbalancedWrite(
                format!("dictionary closed with key /{} awaiting a value", key),
            )),
            _ => Err(Error::UnbalancedWrite("dictionary frame missing".to_string())),
        }
    }

    /// Open an array as the next value in the current context.
    pub fn start_array(&mut self) -> Result<ArrayToken> {
        self.check_value_slot()?;
        let depth = self.frames.len();
        self.frames.push(Frame::Array { items: Vec::new() });
        Ok(ArrayToken { depth })
    }

    /// Close an array and place it in the enclosing context.
    pub fn end_array(&mut self, token: ArrayToken) -> Result<()> {
        self.check_innermost(token.depth, "array")?;
        match self.frames.pop() {
            Some(Frame::Array { items }) => self.place(Object::Array(items)),
            _ => Err(Error::UnbalancedWrite("array frame missing".to_string())),
        }
    }

    /// Write a dictionary key; the next value written belongs to it.
    pub fn write_key(&mut self, key: &str) -> Result<()> {
        match self.frames.last_mut() {
            Some(Frame::Dictionary { pending_key, .. }) => {
                if let Some(previous) = pending_key {
                    return Err(Error::UnbalancedWrite(format!(
                        "key /{} written while /{} awaits a value",
                        key, previous
                    )));
                }
                *pending_key = Some(key.to_string());
                Ok(())
            },
            other => Err(Error::UnbalancedWrite(format!(
                "key /{} written outside a dictionary ({:?})",
                key,
                other.map(|f| f.kind())
            ))),
        }
    }

    /// Write a name value.
    pub fn write_name(&mut self, name: &str) -> Result<()> {
        self.place(Object::name(name))
    }

    /// Write an indirect reference.
    pub fn write_reference(&mut self, r: ObjectRef) -> Result<()> {
        self.place(Object::Reference(r))
    }

    /// Write a literal string value.
    pub fn write_literal_string(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.place(Object::String(bytes.into()))
    }

    /// Deep-copy an object through unchanged. References stay references.
    pub fn copy_object(&mut self, obj: &Object) -> Result<()> {
        self.place(obj.clone())
    }

    /// Write a fully built value.
    pub fn write_value(&mut self, obj: Object) -> Result<()> {
        self.place(obj)
    }

    /// Write a stream as the value of the open indirect object. `/Length` is set from `data`.
    pub fn write_stream(&mut self, mut dict: Dictionary, data: Vec<u8>) -> Result<()> {
        if !matches!(self.frames.last(), Some(Frame::Object { value: None, .. })) {
            return Err(Error::UnbalancedWrite(
                "streams can only be written directly into an indirect object".to_string(),
            ));
        }
        dict.insert("Length".to_string(), Object::Integer(data.len() as i64));
        self.place(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        })
    }

    /// Whether no context is open.
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Close the session and hand back every object written, keyed by identity.
    pub fn finish(self) -> Result<BTreeMap<ObjectRef, Object>> {
        if let Some(open) = self.frames.last() {
            return Err(Error::UnbalancedWrite(format!(
                "session finished with {} open context(s), innermost {}",
                self.frames.len(),
                open.kind()
            )));
        }
        Ok(self.written)
    }

    fn check_innermost(&self, depth: usize, kind: &str) -> Result<()> {
        if self.frames.len() != depth + 1 {
            return Err(Error::UnbalancedWrite(format!(
                "{} closed at depth {} but {} context(s) are open",
                kind,
                depth,
                self.frames.len()
            )));
        }
        Ok(())
    }

    fn check_value_slot(&self) -> Result<()> {
        match self.frames.last() {
            Some(Frame::Object { value: None, .. }) => Ok(()),
            Some(Frame::Dictionary { pending_key: Some(_), .. }) => Ok(()),
            Some(Frame::Array { .. }) => Ok(()),
            Some(Frame::Object { id, .. }) => Err(Error::UnbalancedWrite(format!(
                "object {} already has a value",
                id
            ))),
            Some(Frame::Dictionary { .. }) => Err(Error::UnbalancedWrite(
                "dictionary value written without a key".to_string(),
            )),
            None => Err(Error::UnbalancedWrite(
                "value written outside any object".to_string(),
            )),
        }
    }

    fn place(&mut self, obj: Object) -> Result<()> {
        self.check_value_slot()?;
        match self.frames.last_mut() {
            Some(Frame::Object { value, .. }) => *value = Some(obj),
            Some(Frame::Dictionary { dict, pending_key }) => {
                if let Some(key) = pending_key.take() {
                    dict.insert(key, obj);
                }
            },
            Some(Frame::Array { items }) => items.push(obj),
            None => {},
        }
        Ok(())
    }
}
