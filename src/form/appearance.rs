//! Appearance streams for variable text.
//!
//! The existing normal appearance is kept around the marked-content span that holds the
//! field's text (ISO 32000-1:2008, Section 12.7.3.3): everything before `/Tx BMC` and after
//! the matching `EMC` is preserved byte for byte, and only the span itself is regenerated.

use super::inherit::InheritedEnvironment;
use super::walker::FormFiller;
use crate::content::{encode_ops, ContentOp};
use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::flags::Quadding;
use crate::layout::TextExtent;
use crate::object::{Dictionary, Object, ObjectRef};
use crate::text_string::encode_show_text;
use crate::value::Value;

const REGION_START: &[u8] = b"/Tx BMC";
const REGION_END: &[u8] = b"EMC";

/// Split a prior appearance into the bytes before and after its editable region.
///
/// With no `/Tx BMC` the whole content is the prefix. With a start marker but no `EMC` after
/// it, the suffix is empty.
pub fn split_editable_region(content: &[u8]) -> (&[u8], &[u8]) {
    match find(content, REGION_START, 0) {
        Some(start) => {
            let after_marker = start + REGION_START.len();
            let suffix = match find(content, REGION_END, after_marker) {
                Some(end) => &content[end + REGION_END.len()..],
                None => &[][..],
            };
            (&content[..start], suffix)
        },
        None => (content, &[][..]),
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Origin of a single line of text in a `width` x `height` box: vertically centered,
/// horizontally placed by quadding.
pub fn text_origin(quadding: Quadding, width: f64, height: f64, extent: TextExtent) -> (f64, f64) {
    let x = match quadding {
        Quadding::Left => 0.0,
        Quadding::Center => (width - extent.width) / 2.0,
        Quadding::Right => width - extent.width,
    };
    let y = (height - extent.height) / 2.0;
    (x, y)
}

/// Numeric object, as an integer when the value is integral.
fn number(value: f64) -> Object {
    if value == value.trunc() && value.abs() < i64::MAX as f64 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value)
    }
}

impl<'a, R: ObjectReader> FormFiller<'a, R> {
    /// Write the Form XObject `form_id` showing `text` for `field`.
    ///
    /// `holder` is the dictionary that carries the appearance (the field itself or its first
    /// widget); its prior `/AP /N` stream and `/Rect` are used, falling back to the field's
    /// `/Rect`.
    pub(super) fn write_text_appearance(
        &mut self,
        form_id: ObjectRef,
        field: &Dictionary,
        holder: &Dictionary,
        text: &str,
        env: &InheritedEnvironment,
        full_name: &str,
    ) -> Result<()> {
        let da = self.variable_text_attribute(field, "DA", env)?.to_text();
        let q = self.variable_text_attribute(field, "Q", env)?.to_integer();
        let (width, height) = self.box_size(field, holder, full_name)?;
        let prior = self.prior_appearance(holder, full_name)?;

        log::log!(
            self.options.field_log_level(),
            "Field {:?}: appearance {} with DA {:?}, Q {}, box {}x{}",
            full_name,
            form_id,
            da,
            q,
            width,
            height
        );

        let (before, after) = match &prior {
            Some(content) => split_editable_region(content),
            None => (&[][..], &[][..]),
        };

        let layout = self.options.text_layout.clone();
        let mut ops = vec![
            ContentOp::BeginMarkedContent("Tx".to_string()),
            ContentOp::SaveState,
        ];
        match &layout {
            Some(layout) => {
                let extent = layout.measure(text, layout.font_size());
                let (x, y) = text_origin(Quadding::from_q(q), width, height, extent);
                ops.extend(layout.show_text(text, x, y));
            },
            None => {
                ops.push(ContentOp::BeginText);
                ops.push(ContentOp::Raw(da.into_bytes()));
                ops.push(ContentOp::ShowText(encode_show_text(text)));
                ops.push(ContentOp::EndText);
            },
        }
        ops.push(ContentOp::RestoreState);
        ops.push(ContentOp::EndMarkedContent);

        let mut content = Vec::with_capacity(before.len() + after.len() + 64);
        content.extend_from_slice(before);
        content.extend_from_slice(&encode_ops(&ops));
        content.extend_from_slice(after);

        let mut resources = Dictionary::new();
        if let Some(dr) = self.reader.dict_entry(self.acroform, "DR")? {
            let dr = dr
                .as_dict()
                .ok_or_else(|| Error::type_mismatch("Dictionary", dr.type_name()))?;
            for (key, value) in dr {
                if key == "ProcSet" || (layout.is_some() && key == "Font") {
                    continue;
                }
                resources.insert(key.clone(), value.clone());
            }
        }
        if let Some(layout) = &layout {
            let mut fonts = Dictionary::new();
            fonts.insert(
                layout.font_resource_name().to_string(),
                Object::Dictionary(layout.font_dictionary()),
            );
            resources.insert("Font".to_string(), Object::Dictionary(fonts));
        }

        let mut xobject = Dictionary::new();
        xobject.insert("Type".to_string(), Object::name("XObject"));
        xobject.insert("Subtype".to_string(), Object::name("Form"));
        xobject.insert(
            "BBox".to_string(),
            Object::Array(vec![number(0.0), number(0.0), number(width), number(height)]),
        );
        if !resources.is_empty() {
            xobject.insert("Resources".to_string(), Object::Dictionary(resources));
        }

        let token = self.session.start_new_object(form_id)?;
        self.session.write_stream(xobject, content)?;
        self.session.end_object(token)
    }

    /// `/DA` or `/Q`: the field's own, else inherited, else the form-wide default.
    fn variable_text_attribute(
        &self,
        field: &Dictionary,
        key: &str,
        env: &InheritedEnvironment,
    ) -> Result<Value> {
        let value = env.effective(self.reader, field, key)?;
        if value != Value::None {
            return Ok(value);
        }
        Ok(self
            .reader
            .dict_entry(self.acroform, key)?
            .map(Value::from_object)
            .unwrap_or_default())
    }

    /// Width and height of the holder's `/Rect`, else the field's.
    fn box_size(&self, field: &Dictionary, holder: &Dictionary, full_name: &str) -> Result<(f64, f64)> {
        let reader = self.reader;
        let rect = match reader.dict_entry(holder, "Rect")? {
            Some(rect) => rect,
            None => reader
                .dict_entry(field, "Rect")?
                .ok_or_else(|| Error::missing("Rect", format!("field {:?}", full_name)))?,
        };
        let rect = rect
            .as_array()
            .ok_or_else(|| Error::type_mismatch("Array", rect.type_name()))?;

        let mut coords = [0.0; 4];
        for (i, coord) in coords.iter_mut().enumerate() {
            let obj = reader
                .array_entry(rect, i)?
                .ok_or_else(|| Error::missing("Rect", format!("field {:?} (short array)", full_name)))?;
            *coord = obj
                .as_number()
                .ok_or_else(|| Error::type_mismatch("Number", obj.type_name()))?;
        }
        Ok(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
    }

    /// Decoded `/AP /N` stream of `holder`. Anything unreadable counts as no prior appearance.
    fn prior_appearance(&self, holder: &Dictionary, full_name: &str) -> Result<Option<Vec<u8>>> {
        let reader = self.reader;
        let ap = match reader.dict_entry(holder, "AP")? {
            Some(Object::Dictionary(ap)) => ap,
            _ => return Ok(None),
        };
        let normal = match ap.get("N") {
            Some(normal) if matches!(reader.resolve(normal)?, Object::Stream { .. }) => normal,
            _ => return Ok(None),
        };
        match reader.stream_data(normal) {
            Ok(content) => Ok(Some(content)),
            Err(e) => {
                log::warn!(
                    "Field {:?}: prior appearance unreadable ({}), regenerating from scratch",
                    full_name,
                    e
                );
                Ok(None)
            },
        }
    }
}
