//! Interactive form filling.
//!
//! Filling rewrites the form dictionary and every field reachable from it. Fields named in
//! the value map get new values and, for text and choice fields, a regenerated appearance;
//! every other field is written back unchanged except that children embedded in their
//! parents become indirect objects.
//!
//! # Example
//!
//! ```no_run
//! use pdf_form_fill::config::FillOptions;
//! use pdf_form_fill::document::Document;
//! use pdf_form_fill::form::fill_form;
//! use pdf_form_fill::value::{FieldValues, Value};
//!
//! # fn run(mut doc: Document) -> pdf_form_fill::Result<()> {
//! let mut values = FieldValues::new();
//! values.insert("Address.Line1".to_string(), Value::from("1 Main St"));
//! values.insert("Subscribe".to_string(), Value::Boolean(true));
//!
//! let outcome = fill_form(&doc, &values, &FillOptions::default())?;
//! doc.apply(outcome.objects);
//! # Ok(())
//! # }
//! ```

mod appearance;
mod button;
mod dispatch;
mod inherit;
mod inspect;
mod materialize;
mod rewrite;
mod text;
mod walker;

pub use appearance::{split_editable_region, text_origin};
pub use button::{on_state_name, Selection, OFF_STATE};
pub use dispatch::FieldKind;
pub use inherit::{InheritedEnvironment, INHERITABLE_KEYS};
pub use inspect::{list_fields, FieldInfo};
pub use materialize::{open_child, write_kids_and_end_object, ChildReference};
pub use rewrite::start_modified_dictionary;
pub use walker::qualified_name;

use crate::config::FillOptions;
use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::value::FieldValues;
use std::collections::{BTreeMap, BTreeSet};
use walker::FormFiller;

/// Result of a fill.
#[derive(Debug, Clone, Default)]
pub struct FillOutcome {
    /// Every object rewritten or created, keyed by identity
    pub objects: BTreeMap<ObjectRef, Object>,
    /// Fully-qualified names from the value map that matched a field
    pub matched: BTreeSet<String>,
}

/// Fill the interactive form of `reader`'s document with `values`.
///
/// The document itself is not touched; apply [`FillOutcome::objects`] to it (or write them
/// as an incremental update) to get the filled document.
///
/// # Errors
///
/// Missing catalog or form, structural references that resolve to nothing or to the wrong
/// kind of object, a field tree deeper than [`FillOptions::max_depth`] or containing a cycle.
pub fn fill_form<R: ObjectReader>(
    reader: &R,
    values: &FieldValues,
    options: &FillOptions,
) -> Result<FillOutcome> {
    let (entry, acroform) = interactive_form(reader)?;
    let mut filler = FormFiller::new(reader, values, options, acroform);

    let token = match entry {
        Object::Reference(id) => {
            log::debug!("Rewriting interactive form {}", id);
            filler.session.start_modified_object(*id)?
        },
        _ => {
            // Embedded form: move it into its own object and repoint the catalog.
            let catalog_id = reader
                .trailer()
                .get("Root")
                .and_then(Object::as_reference)
                .ok_or(Error::MissingCatalog)?;
            let catalog = reader.catalog()?;
            let form_id = filler.allocate_id();
            log::debug!("Moving embedded interactive form to {}", form_id);

            let catalog_token = filler.session.start_modified_object(catalog_id)?;
            filler.write_catalog(catalog_token, catalog, form_id)?;
            filler.session.start_new_object(form_id)?
        },
    };

    filler.write_form(token)?;
    filler.finish()
}

/// The catalog's `/AcroForm` entry as written, and the dictionary it resolves to.
pub(crate) fn interactive_form<R: ObjectReader>(reader: &R) -> Result<(&Object, &Dictionary)> {
    let catalog = reader.catalog()?;
    let entry = catalog.get("AcroForm").ok_or(Error::MissingForm)?;
    let form = match reader.resolve(entry) {
        Ok(obj) => obj.as_dict().ok_or(Error::MissingForm)?,
        Err(Error::ObjectNotFound(_)) => return Err(Error::MissingForm),
        Err(e) => return Err(e),
    };
    Ok((entry, form))
}

/// Whether `node` is a widget annotation (`/Subtype /Widget`).
pub(crate) fn is_widget(node: &Dictionary) -> bool {
    node.get("Subtype").and_then(Object::as_name) == Some("Widget")
}

/// Whether `node` has a `/Kids` entry.
pub(crate) fn has_kids<R: ObjectReader>(reader: &R, node: &Dictionary) -> Result<bool> {
    Ok(reader.dict_entry(node, "Kids")?.is_some())
}

/// Whether a field's appearance is stored on the field itself rather than on its first kid.
pub(crate) fn appearance_in_field<R: ObjectReader>(reader: &R, node: &Dictionary) -> Result<bool> {
    if is_widget(node) {
        return Ok(true);
    }
    Ok(match reader.dict_entry(node, "Kids")? {
        Some(kids) => kids.as_array().map_or(true, |k| k.is_empty()),
        None => true,
    })
}
