//! Read-only listing of the fields in a form.
//!
//! Used to discover the fully-qualified names a value map has to use. A node is listed when
//! it is a widget, has no kids, or has only unnamed kids (the widgets of a single field, as
//! with radio button groups).

use super::inherit::InheritedEnvironment;
use super::walker::qualified_name;
use super::{interactive_form, is_widget};
use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::flags::FieldFlags;
use crate::object::{Dictionary, Object, ObjectRef};
use crate::text_string::decode_text_string;
use std::collections::HashSet;

/// One fillable field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Fully-qualified name (the value map key)
    pub name: String,
    /// Effective `/FT`, if any
    pub field_type: Option<String>,
    /// Effective `/Ff`
    pub flags: FieldFlags,
    /// Current `/V`, rendered as text
    pub value: Option<String>,
    /// Identity of the field object; `None` when embedded in its parent
    pub id: Option<ObjectRef>,
    /// Number of widget kids
    pub widgets: usize,
}

/// List every fillable field in document order.
pub fn list_fields<R: ObjectReader>(reader: &R, max_depth: usize) -> Result<Vec<FieldInfo>> {
    let (_, acroform) = interactive_form(reader)?;
    let mut lister = Lister {
        reader,
        max_depth,
        ancestors: HashSet::new(),
        fields: Vec::new(),
    };
    if let Some(fields) = reader.dict_entry(acroform, "Fields")? {
        let fields = fields
            .as_array()
            .ok_or_else(|| Error::type_mismatch("Array", fields.type_name()))?;
        lister.visit_all(fields, &InheritedEnvironment::new(), "", 1)?;
    }
    Ok(lister.fields)
}

struct Lister<'a, R: ObjectReader> {
    reader: &'a R,
    max_depth: usize,
    ancestors: HashSet<ObjectRef>,
    fields: Vec<FieldInfo>,
}

impl<'a, R: ObjectReader> Lister<'a, R> {
    fn visit_all(
        &mut self,
        nodes: &'a [Object],
        env: &InheritedEnvironment,
        prefix: &str,
        depth: usize,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::RecursionLimitExceeded(self.max_depth));
        }
        let reader = self.reader;
        for entry in nodes {
            let id = entry.as_reference();
            if let Some(id) = id {
                if !self.ancestors.insert(id) {
                    return Err(Error::CircularReference(id));
                }
            }
            let node = reader.resolve_dict(entry)?;
            self.visit(node, id, env, prefix, depth)?;
            if let Some(id) = id {
                self.ancestors.remove(&id);
            }
        }
        Ok(())
    }

    fn visit(
        &mut self,
        node: &'a Dictionary,
        id: Option<ObjectRef>,
        env: &InheritedEnvironment,
        prefix: &str,
        depth: usize,
    ) -> Result<()> {
        let reader = self.reader;
        let name = qualified_name(reader, node, prefix)?;
        let kids: &[Object] = match reader.dict_entry(node, "Kids")? {
            Some(kids) => kids
                .as_array()
                .ok_or_else(|| Error::type_mismatch("Array", kids.type_name()))?,
            None => &[],
        };

        let widgets_only = kids.iter().try_fold(true, |all, kid| -> Result<bool> {
            Ok(all && !reader.resolve_dict(kid)?.contains_key("T"))
        })?;

        if is_widget(node) || kids.is_empty() || widgets_only {
            let field_type = env.effective(reader, node, "FT")?;
            let ff = env.effective(reader, node, "Ff")?;
            self.fields.push(FieldInfo {
                name,
                field_type: match field_type.to_text() {
                    t if t.is_empty() => None,
                    t => Some(t),
                },
                flags: FieldFlags::from_ff(ff.to_integer()),
                value: reader.dict_entry(node, "V")?.and_then(render_value),
                id,
                widgets: kids.len(),
            });
            return Ok(());
        }

        let child_env = env.extend(reader, node)?;
        self.visit_all(kids, &child_env, &format!("{}.", name), depth + 1)
    }
}

fn render_value(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(n) => Some(n.clone()),
        Object::String(bytes) => Some(decode_text_string(bytes)),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        Object::Array(items) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}
