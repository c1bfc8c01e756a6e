//! Depth-first traversal of the field tree.
//!
//! Each node is looked up in the value map by its fully-qualified name. A hit hands the node
//! to the update dispatcher; a miss rewrites the node without `/Kids`, materializes its
//! children and walks them with the node's attributes added to the inherited environment.

use super::inherit::InheritedEnvironment;
use super::materialize::{open_child, write_kids_and_end_object, ChildReference};
use super::rewrite::start_modified_dictionary;
use super::FillOutcome;
use crate::config::FillOptions;
use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::session::{IndirectObjectToken, WriteSession};
use crate::text_string::decode_text_string;
use crate::value::FieldValues;
use std::collections::{BTreeSet, HashSet};

/// State of one fill.
pub(crate) struct FormFiller<'a, R: ObjectReader> {
    pub(super) reader: &'a R,
    pub(super) values: &'a FieldValues,
    pub(super) options: &'a FillOptions,
    pub(super) acroform: &'a Dictionary,
    pub(super) session: WriteSession,
    matched: BTreeSet<String>,
    ancestors: HashSet<ObjectRef>,
}

impl<'a, R: ObjectReader> FormFiller<'a, R> {
    pub(crate) fn new(
        reader: &'a R,
        values: &'a FieldValues,
        options: &'a FillOptions,
        acroform: &'a Dictionary,
    ) -> Self {
        Self {
            reader,
            values,
            options,
            acroform,
            session: WriteSession::new(reader.max_id() + 1),
            matched: BTreeSet::new(),
            ancestors: HashSet::new(),
        }
    }

    /// Reserve an identity in the output.
    pub(crate) fn allocate_id(&mut self) -> ObjectRef {
        self.session.allocate_id()
    }

    /// Rewrite `catalog` (open as `token`) so that `/AcroForm` points at `acroform_id`.
    pub(crate) fn write_catalog(
        &mut self,
        token: IndirectObjectToken,
        catalog: &Dictionary,
        acroform_id: ObjectRef,
    ) -> Result<()> {
        let dict = start_modified_dictionary(&mut self.session, catalog, &["AcroForm"])?;
        self.session.write_key("AcroForm")?;
        self.session.write_reference(acroform_id)?;
        self.session.end_dictionary(dict)?;
        self.session.end_object(token)
    }

    /// Rewrite the interactive form dictionary (open as `token`) and every field under it.
    pub(crate) fn write_form(&mut self, token: IndirectObjectToken) -> Result<()> {
        let reader = self.reader;
        let acroform = self.acroform;
        let dict = start_modified_dictionary(&mut self.session, acroform, &["Fields"])?;

        match reader.dict_entry(acroform, "Fields")? {
            Some(fields) => {
                let fields = fields
                    .as_array()
                    .ok_or_else(|| Error::type_mismatch("Array", fields.type_name()))?;
                self.session.write_key("Fields")?;
                let children = write_kids_and_end_object(&mut self.session, dict, token, fields)?;
                let env = InheritedEnvironment::new();
                for child in children {
                    self.walk_field(child, &env, "", 1)?;
                }
                Ok(())
            },
            None => {
                log::debug!("Interactive form has no /Fields");
                self.session.end_dictionary(dict)?;
                self.session.end_object(token)
            },
        }
    }

    /// Close the session and report what was written.
    pub(crate) fn finish(self) -> Result<FillOutcome> {
        for name in self.values.keys() {
            if !self.matched.contains(name) {
                log::debug!("No field named {:?}", name);
            }
        }
        Ok(FillOutcome {
            objects: self.session.finish()?,
            matched: self.matched,
        })
    }

    fn walk_field(
        &mut self,
        child: ChildReference<'a>,
        env: &InheritedEnvironment,
        prefix: &str,
        depth: usize,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::RecursionLimitExceeded(self.options.max_depth));
        }
        // Only a field reached again below itself is a cycle; a field listed twice is not.
        let existing = match child {
            ChildReference::Existing(id) => Some(id),
            ChildReference::Inline { .. } => None,
        };
        if let Some(id) = existing {
            if !self.ancestors.insert(id) {
                return Err(Error::CircularReference(id));
            }
        }
        let result = self.visit_field(child, env, prefix, depth);
        if let Some(id) = existing {
            self.ancestors.remove(&id);
        }
        result
    }

    fn visit_field(
        &mut self,
        child: ChildReference<'a>,
        env: &InheritedEnvironment,
        prefix: &str,
        depth: usize,
    ) -> Result<()> {
        let reader = self.reader;
        let (token, node) = open_child(reader, &mut self.session, child)?;
        let full_name = qualified_name(reader, node, prefix)?;

        let values = self.values;
        match values.get(&full_name) {
            Some(value) => {
                log::log!(
                    self.options.field_log_level(),
                    "Field {:?} ({}): updating with {} value",
                    full_name,
                    child.id(),
                    value.kind()
                );
                self.matched.insert(full_name.clone());
                self.update_field(token, node, value, env, &full_name)
            },
            None => self.write_field_and_kids(token, node, env, &full_name, depth),
        }
    }

    fn write_field_and_kids(
        &mut self,
        token: IndirectObjectToken,
        node: &'a Dictionary,
        env: &InheritedEnvironment,
        full_name: &str,
        depth: usize,
    ) -> Result<()> {
        let reader = self.reader;
        let dict = start_modified_dictionary(&mut self.session, node, &["Kids"])?;

        match reader.dict_entry(node, "Kids")? {
            Some(kids) => {
                let kids = kids
                    .as_array()
                    .ok_or_else(|| Error::type_mismatch("Array", kids.type_name()))?;
                let child_env = env.extend(reader, node)?;
                self.session.write_key("Kids")?;
                let children = write_kids_and_end_object(&mut self.session, dict, token, kids)?;
                let prefix = format!("{}.", full_name);
                for child in children {
                    self.walk_field(child, &child_env, &prefix, depth + 1)?;
                }
                Ok(())
            },
            None => {
                self.session.end_dictionary(dict)?;
                self.session.end_object(token)
            },
        }
    }
}

/// `prefix` followed by the node's partial name. A node without `/T` takes `prefix` as is.
pub fn qualified_name<R: ObjectReader>(
    reader: &R,
    node: &Dictionary,
    prefix: &str,
) -> Result<String> {
    let partial = match reader.dict_entry(node, "T")? {
        Some(Object::String(bytes)) => decode_text_string(bytes),
        Some(Object::Name(name)) => name.clone(),
        Some(other) => return Err(Error::type_mismatch("String", other.type_name())),
        None => return Ok(prefix.to_string()),
    };
    Ok(format!("{}{}", prefix, partial))
}
