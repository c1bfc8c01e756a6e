//! Making every child of a field node addressable.
//!
//! `/Kids` and `/Fields` arrays may mix indirect references with dictionaries embedded in
//! place. Child objects cannot be written while the parent object is still open, so inline
//! children are given a fresh identity, referenced from the parent's array, and written as
//! their own objects once the parent is closed.

use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::session::{DictionaryToken, IndirectObjectToken, WriteSession};

/// A child after materialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildReference<'a> {
    /// Already an indirect object; re-opened as a modification
    Existing(ObjectRef),
    /// Was embedded in the parent; written as a new object under `id`
    Inline {
        /// Newly allocated identity
        id: ObjectRef,
        /// The embedded dictionary
        node: &'a Dictionary,
    },
}

impl ChildReference<'_> {
    /// Identity the child is written under.
    pub fn id(&self) -> ObjectRef {
        match self {
            ChildReference::Existing(id) => *id,
            ChildReference::Inline { id, .. } => *id,
        }
    }
}

/// Write `children` as an array of references, then close the array, `parent_dict` and
/// `parent_object`.
///
/// The caller has already written the key (`/Kids` or `/Fields`) the array belongs to. The
/// returned references are in array order; each must be opened exactly once afterwards with
/// [`open_child`].
pub fn write_kids_and_end_object<'a>(
    session: &mut WriteSession,
    parent_dict: DictionaryToken,
    parent_object: IndirectObjectToken,
    children: &'a [Object],
) -> Result<Vec<ChildReference<'a>>> {
    let array = session.start_array()?;
    let mut refs = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Object::Reference(r) => {
                session.write_reference(*r)?;
                refs.push(ChildReference::Existing(*r));
            },
            Object::Dictionary(node) => {
                let id = session.allocate_id();
                session.write_reference(id)?;
                refs.push(ChildReference::Inline { id, node });
            },
            other => return Err(Error::type_mismatch("Dictionary", other.type_name())),
        }
    }
    session.end_array(array)?;
    session.end_dictionary(parent_dict)?;
    session.end_object(parent_object)?;
    Ok(refs)
}

/// Open the object a child is written into and fetch its source dictionary.
pub fn open_child<'a, R: ObjectReader>(
    reader: &'a R,
    session: &mut WriteSession,
    child: ChildReference<'a>,
) -> Result<(IndirectObjectToken, &'a Dictionary)> {
    match child {
        ChildReference::Existing(id) => {
            let obj = reader.object(id).ok_or(Error::ObjectNotFound(id))?;
            let node = obj
                .as_dict()
                .ok_or_else(|| Error::type_mismatch("Dictionary", obj.type_name()))?;
            Ok((session.start_modified_object(id)?, node))
        },
        ChildReference::Inline { id, node } => Ok((session.start_new_object(id)?, node)),
    }
}
