//! PDF file loading and saving through `lopdf`.
//!
//! `lopdf` parses the file (cross-reference tables and streams, object streams), and its
//! object graph is converted into the crate's [`Document`]. After a fill, only the objects the
//! fill produced are converted back and inserted, so every untouched object is saved exactly
//! as it was loaded.

use crate::config::FillOptions;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::form::{fill_form, FillOutcome};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::value::FieldValues;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// A PDF file loaded with `lopdf`.
#[derive(Debug)]
pub struct PdfFile {
    inner: lopdf::Document,
}

impl PdfFile {
    /// Load a PDF file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = lopdf::Document::load(path)
            .map_err(|e| Error::Backend(format!("failed to load {}: {}", path.display(), e)))?;
        log::debug!(
            "Loaded {} ({} objects, max id {})",
            path.display(),
            inner.objects.len(),
            inner.max_id
        );
        Ok(Self { inner })
    }

    /// Load a PDF file from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| Error::Backend(format!("failed to parse PDF: {}", e)))?;
        Ok(Self { inner })
    }

    /// Convert the loaded object graph.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (&(id, gen), obj) in &self.inner.objects {
            doc.insert(ObjectRef::new(id, gen), from_lopdf(obj));
        }
        *doc.trailer_mut() = dictionary_from_lopdf(&self.inner.trailer);
        doc
    }

    /// Insert or replace `objects`.
    pub fn apply(&mut self, objects: &BTreeMap<ObjectRef, Object>) {
        for (r, obj) in objects {
            self.inner.objects.insert((r.id, r.gen), to_lopdf(obj));
            self.inner.max_id = self.inner.max_id.max(r.id);
        }
    }

    /// Save to disk.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.inner
            .save(path)
            .map_err(|e| Error::Backend(format!("failed to save {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Serialize into `target`.
    pub fn save_to<W: Write>(&mut self, target: &mut W) -> Result<()> {
        self.inner
            .save_to(target)
            .map_err(|e| Error::Backend(format!("failed to write PDF: {}", e)))
    }

    /// Fill the form in place.
    pub fn fill(&mut self, values: &FieldValues, options: &FillOptions) -> Result<FillOutcome> {
        let doc = self.to_document();
        let outcome = fill_form(&doc, values, options)?;
        self.apply(&outcome.objects);
        Ok(outcome)
    }
}

/// Load `input`, fill its form with `values` and save the result to `output`.
pub fn fill_pdf_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    values: &FieldValues,
    options: &FillOptions,
) -> Result<FillOutcome> {
    let mut file = PdfFile::open(input)?;
    let outcome = file.fill(values, options)?;
    file.save(output)?;
    Ok(outcome)
}

/// Convert a `lopdf` object.
pub fn from_lopdf(obj: &lopdf::Object) -> Object {
    match obj {
        lopdf::Object::Null => Object::Null,
        lopdf::Object::Boolean(b) => Object::Boolean(*b),
        lopdf::Object::Integer(i) => Object::Integer(*i),
        lopdf::Object::Real(r) => Object::Real(f64::from(*r)),
        lopdf::Object::Name(name) => Object::Name(name_from_bytes(name)),
        lopdf::Object::String(bytes, _) => Object::String(bytes.clone()),
        lopdf::Object::Array(items) => Object::Array(items.iter().map(from_lopdf).collect()),
        lopdf::Object::Dictionary(dict) => Object::Dictionary(dictionary_from_lopdf(dict)),
        lopdf::Object::Stream(stream) => Object::Stream {
            dict: dictionary_from_lopdf(&stream.dict),
            data: bytes::Bytes::from(stream.content.clone()),
        },
        lopdf::Object::Reference((id, gen)) => Object::Reference(ObjectRef::new(*id, *gen)),
    }
}

fn dictionary_from_lopdf(dict: &lopdf::Dictionary) -> Dictionary {
    dict.iter()
        .map(|(key, value)| (name_from_bytes(key), from_lopdf(value)))
        .collect()
}

/// Convert to a `lopdf` object.
pub fn to_lopdf(obj: &Object) -> lopdf::Object {
    match obj {
        Object::Null => lopdf::Object::Null,
        Object::Boolean(b) => lopdf::Object::Boolean(*b),
        Object::Integer(i) => lopdf::Object::Integer(*i),
        Object::Real(r) => lopdf::Object::Real(*r as f32),
        Object::Name(name) => lopdf::Object::Name(name_to_bytes(name)),
        Object::String(bytes) => {
            lopdf::Object::String(bytes.clone(), lopdf::StringFormat::Literal)
        },
        Object::Array(items) => lopdf::Object::Array(items.iter().map(to_lopdf).collect()),
        Object::Dictionary(dict) => lopdf::Object::Dictionary(dictionary_to_lopdf(dict)),
        Object::Stream { dict, data } => {
            lopdf::Object::Stream(lopdf::Stream::new(dictionary_to_lopdf(dict), data.to_vec()))
        },
        Object::Reference(r) => lopdf::Object::Reference((r.id, r.gen)),
    }
}

/// Names are byte strings: each byte becomes the char with the same code point, so bytes
/// outside ASCII come back unchanged when saved.
fn name_from_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`name_from_bytes`]. Names built in memory with characters past U+00FF are
/// written as UTF-8.
fn name_to_bytes(name: &str) -> Vec<u8> {
    let single_byte: Option<Vec<u8>> = name.chars().map(|c| u8::try_from(c).ok()).collect();
    single_byte.unwrap_or_else(|| name.as_bytes().to_vec())
}

fn dictionary_to_lopdf(dict: &Dictionary) -> lopdf::Dictionary {
    let mut out = lopdf::Dictionary::new();
    for (key, value) in dict {
        out.set(name_to_bytes(key), to_lopdf(value));
    }
    out
}
