//! In-memory document and the read-side access trait.
//!
//! [`ObjectReader`] is everything the form engine needs from a parsed document: look an
//! indirect object up by identity and reach the trailer. The provided methods resolve one
//! level of indirection at a time, matching how field dictionaries reference their parts.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::BTreeMap;

/// Read access to a parsed PDF object graph.
pub trait ObjectReader {
    /// Look up an indirect object.
    fn object(&self, r: ObjectRef) -> Option<&Object>;

    /// The trailer dictionary.
    fn trailer(&self) -> &Dictionary;

    /// Highest object number in use.
    fn max_id(&self) -> u32;

    /// Follow one level of indirection.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(r) => self.object(*r).ok_or(Error::ObjectNotFound(*r)),
            other => Ok(other),
        }
    }

    /// Resolve a dictionary attribute. Absent keys and explicit nulls are `None`.
    fn dict_entry<'a>(&'a self, dict: &'a Dictionary, key: &str) -> Result<Option<&'a Object>> {
        match dict.get(key) {
            Some(obj) => {
                let resolved = self.resolve(obj)?;
                Ok(if resolved.is_null() { None } else { Some(resolved) })
            },
            None => Ok(None),
        }
    }

    /// Resolve an array element. Out-of-range indices are `None`.
    fn array_entry<'a>(&'a self, array: &'a [Object], index: usize) -> Result<Option<&'a Object>> {
        match array.get(index) {
            Some(obj) => self.resolve(obj).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve an object that must be a dictionary (or stream dictionary).
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Result<&'a Dictionary> {
        let resolved = self.resolve(obj)?;
        resolved
            .as_dict()
            .ok_or_else(|| Error::type_mismatch("Dictionary", resolved.type_name()))
    }

    /// Resolve a stream and decode its content.
    fn stream_data(&self, obj: &Object) -> Result<Vec<u8>> {
        self.resolve(obj)?.decode_stream_data()
    }

    /// The document catalog (`/Root` in the trailer).
    fn catalog(&self) -> Result<&Dictionary> {
        let root = self.trailer().get("Root").ok_or(Error::MissingCatalog)?;
        match self.resolve(root) {
            Ok(obj) => obj.as_dict().ok_or(Error::MissingCatalog),
            Err(Error::ObjectNotFound(_)) => Err(Error::MissingCatalog),
            Err(e) => Err(e),
        }
    }
}

/// An object graph held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: BTreeMap<ObjectRef, Object>,
    trailer: Dictionary,
    max_id: u32,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an indirect object.
    pub fn insert(&mut self, r: ObjectRef, obj: Object) {
        self.max_id = self.max_id.max(r.id);
        self.objects.insert(r, obj);
    }

    /// Add an object under the next free identity.
    pub fn add_object(&mut self, obj: impl Into<Object>) -> ObjectRef {
        let r = ObjectRef::new(self.max_id + 1, 0);
        self.insert(r, obj.into());
        r
    }

    /// Look up an indirect object.
    pub fn get(&self, r: ObjectRef) -> Option<&Object> {
        self.objects.get(&r)
    }

    /// Mutable access to the trailer.
    pub fn trailer_mut(&mut self) -> &mut Dictionary {
        &mut self.trailer
    }

    /// Point the trailer's `/Root` at `catalog`.
    pub fn set_root(&mut self, catalog: ObjectRef) {
        self.trailer.insert("Root".to_string(), Object::Reference(catalog));
    }

    /// Number of indirect objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the document holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectRef, &Object)> {
        self.objects.iter()
    }

    /// Replace or add every object produced by a fill.
    pub fn apply(&mut self, written: BTreeMap<ObjectRef, Object>) {
        for (r, obj) in written {
            self.insert(r, obj);
        }
    }
}

impl ObjectReader for Document {
    fn object(&self, r: ObjectRef) -> Option<&Object> {
        self.objects.get(&r)
    }

    fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    fn max_id(&self) -> u32 {
        self.max_id
    }
}
