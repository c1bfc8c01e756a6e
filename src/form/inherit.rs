//! Inheritable field attributes.
//!
//! ISO 32000-1:2008, Section 12.7.3.1, Table 220: `/FT`, `/Ff` and `/V` are inheritable, and
//! Section 12.7.3.3 adds `/DA` and `/Q` for variable text. `/Opt` is carried too so choice
//! widgets can see their parent's option list. `/V` is not carried: values are supplied by
//! the caller.

use crate::document::ObjectReader;
use crate::error::Result;
use crate::object::Dictionary;
use crate::value::Value;
use indexmap::IndexMap;

/// Attributes passed from a non-terminal node to its descendants.
pub const INHERITABLE_KEYS: [&str; 5] = ["FT", "Ff", "DA", "Q", "Opt"];

/// Attribute values inherited from ancestor nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InheritedEnvironment {
    values: IndexMap<String, Value>,
}

impl InheritedEnvironment {
    /// The root environment (nothing inherited).
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment with one attribute set.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    /// Inherited value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Environment for the children of `node`.
    ///
    /// Attributes declared on `node` replace inherited ones; everything else passes through.
    /// `self` is left as it was, so siblings of `node` keep seeing the parent's environment.
    pub fn extend<R: ObjectReader>(&self, reader: &R, node: &Dictionary) -> Result<Self> {
        let mut next = self.clone();
        for key in INHERITABLE_KEYS {
            let local = local_value(reader, node, key)?;
            if local != Value::None {
                next.values.insert(key.to_string(), local);
            }
        }
        Ok(next)
    }

    /// Value declared on `node`, else the inherited one, else `Value::None`.
    pub fn effective<R: ObjectReader>(
        &self,
        reader: &R,
        node: &Dictionary,
        key: &str,
    ) -> Result<Value> {
        let local = local_value(reader, node, key)?;
        if local != Value::None {
            return Ok(local);
        }
        Ok(self.get(key).cloned().unwrap_or_default())
    }
}

fn local_value<R: ObjectReader>(reader: &R, node: &Dictionary, key: &str) -> Result<Value> {
    Ok(reader
        .dict_entry(node, key)?
        .map(Value::from_object)
        .unwrap_or_default())
}
