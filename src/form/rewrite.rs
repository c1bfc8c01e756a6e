//! Copying a field dictionary into the write session.

use crate::error::Result;
use crate::object::{Dictionary, Object};
use crate::session::{DictionaryToken, IndirectObjectToken, WriteSession};

/// Open a dictionary holding every entry of `original` except `excluded`.
///
/// Entries keep their declaration order and are copied as-is, so references stay references
/// and nested dictionaries are not reinterpreted. The returned dictionary is still open: the
/// caller writes the replacement entries and closes it.
pub fn start_modified_dictionary(
    session: &mut WriteSession,
    original: &Dictionary,
    excluded: &[&str],
) -> Result<DictionaryToken> {
    let token = session.start_dictionary()?;
    for (key, value) in original {
        if excluded.contains(&key.as_str()) {
            continue;
        }
        session.write_key(key)?;
        session.copy_object(value)?;
    }
    Ok(token)
}

/// Write `node` unchanged as the value of the open object and close it.
pub fn write_unchanged(
    session: &mut WriteSession,
    token: IndirectObjectToken,
    node: &Dictionary,
) -> Result<()> {
    session.write_value(Object::Dictionary(node.clone()))?;
    session.end_object(token)
}

/// Write `name` as the value of `key`.
pub fn write_name_entry(session: &mut WriteSession, key: &str, name: &str) -> Result<()> {
    session.write_key(key)?;
    session.write_name(name)
}
