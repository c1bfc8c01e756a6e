//! Routing a matched field to its update strategy.

use super::button::Selection;
use super::inherit::InheritedEnvironment;
use super::rewrite::write_unchanged;
use super::walker::FormFiller;
use crate::document::ObjectReader;
use crate::error::Result;
use crate::flags::FieldFlags;
use crate::object::Dictionary;
use crate::session::IndirectObjectToken;
use crate::value::Value;

/// How a field is updated, from its effective `/FT` and `/Ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Btn with the push-button bit: holds no value
    PushButton,
    /// Btn with neither radio nor push-button bit
    CheckBox,
    /// Btn with the radio bit
    Radio,
    /// Tx
    Text {
        /// Rich-text bit set: `/RV` is written alongside `/V`
        rich: bool,
    },
    /// Ch
    Choice,
    /// Sig: copied through
    Signature,
    /// Missing or unrecognized `/FT`
    Unknown,
}

impl FieldKind {
    /// Classify a field.
    pub fn classify(field_type: &str, flags: FieldFlags) -> Self {
        match field_type {
            "Btn" if flags.is_pushbutton() => FieldKind::PushButton,
            "Btn" if flags.is_radio() => FieldKind::Radio,
            "Btn" => FieldKind::CheckBox,
            "Tx" => FieldKind::Text {
                rich: flags.is_rich_text(),
            },
            "Ch" => FieldKind::Choice,
            "Sig" => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }

    /// Classify from effective attribute values.
    pub fn from_values(field_type: &Value, ff: &Value) -> Self {
        Self::classify(&field_type.to_text(), FieldFlags::from_ff(ff.to_integer()))
    }
}

impl<'a, R: ObjectReader> FormFiller<'a, R> {
    /// Write `node` (open as `token`) with `value` applied.
    pub(super) fn update_field(
        &mut self,
        token: IndirectObjectToken,
        node: &'a Dictionary,
        value: &Value,
        env: &InheritedEnvironment,
        full_name: &str,
    ) -> Result<()> {
        let reader = self.reader;
        let field_type = env.effective(reader, node, "FT")?;
        let ff = env.effective(reader, node, "Ff")?;
        let kind = FieldKind::from_values(&field_type, &ff);

        log::log!(
            self.options.field_log_level(),
            "Field {:?}: type {:?}, flags {}, strategy {:?}",
            full_name,
            field_type.to_text(),
            ff.to_integer(),
            kind
        );

        match kind {
            FieldKind::CheckBox => {
                let selection = if value.to_bool() {
                    Selection::On
                } else {
                    Selection::Off
                };
                self.update_button(token, node, selection, full_name)
            },
            FieldKind::Radio => {
                let selection = if value.is_off() {
                    Selection::Off
                } else {
                    Selection::Index(value.to_integer())
                };
                self.update_button(token, node, selection, full_name)
            },
            FieldKind::Text { rich } => self.update_text(token, node, value, rich, env, full_name),
            FieldKind::Choice => self.update_choice(token, node, value, env, full_name),
            FieldKind::PushButton | FieldKind::Signature | FieldKind::Unknown => {
                write_unchanged(&mut self.session, token, node)
            },
        }
    }
}
