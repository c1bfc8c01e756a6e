//! Field flags (`/Ff`) and quadding (`/Q`).
//!
//! ISO 32000-1:2008 Section 12.7.3. Bit N of the spec tables is `1 << (N - 1)`. The engine
//! only branches on a handful of bits, but all type-specific bits are named so `--list`
//! output and traces can print them.

use bitflags::bitflags;

bitflags! {
    /// Field flags as found in an effective `/Ff` value.
    ///
    /// Bits from Tables 221 (common), 226 (button), 228 (text) and 230 (choice). Button and
    /// text tables reuse bit 26, so interpretation depends on the field type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u32 {
        /// Bit 1: Field is read-only
        const READ_ONLY = 1 << 0;
        /// Bit 2: Field is required
        const REQUIRED = 1 << 1;
        /// Bit 3: Field should not be exported
        const NO_EXPORT = 1 << 2;

        /// Bit 13 (Tx): Text may include multiple lines
        const MULTILINE = 1 << 12;
        /// Bit 14 (Tx): Password field
        const PASSWORD = 1 << 13;

        /// Bit 15 (Btn): No toggle to off
        const NO_TOGGLE_TO_OFF = 1 << 14;
        /// Bit 16 (Btn): Radio button; a button without this or PUSHBUTTON is a checkbox
        const RADIO = 1 << 15;
        /// Bit 17 (Btn): Push button, retains no value
        const PUSHBUTTON = 1 << 16;

        /// Bit 18 (Ch): Combo box
        const COMBO = 1 << 17;
        /// Bit 19 (Ch): Editable combo box
        const EDIT = 1 << 18;
        /// Bit 22 (Ch): Multiple selection allowed
        const MULTI_SELECT = 1 << 21;

        /// Bit 26 (Tx): Rich text; (Btn) radios in unison
        const RICH_TEXT = 1 << 25;
    }
}

impl FieldFlags {
    /// Build from an `/Ff` integer, keeping bits that have no name.
    pub fn from_ff(ff: i64) -> Self {
        Self::from_bits_retain(ff as u32)
    }

    /// Button: push-button bit set.
    pub fn is_pushbutton(&self) -> bool {
        self.contains(Self::PUSHBUTTON)
    }

    /// Button: radio bit set.
    pub fn is_radio(&self) -> bool {
        self.contains(Self::RADIO)
    }

    /// Text: rich-text bit set.
    pub fn is_rich_text(&self) -> bool {
        self.contains(Self::RICH_TEXT)
    }
}

/// Text quadding (`/Q`).
///
/// Per PDF spec Section 12.7.3.3 (Variable Text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quadding {
    /// Left-aligned (Q=0)
    #[default]
    Left,
    /// Centered (Q=1)
    Center,
    /// Right-aligned (Q=2)
    Right,
}

impl Quadding {
    /// Interpret a `/Q` value. Anything other than 1 or 2 is left-aligned.
    pub fn from_q(q: i64) -> Self {
        match q {
            1 => Self::Center,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}
