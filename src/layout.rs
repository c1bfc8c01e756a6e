//! Text measurement for generated appearances.
//!
//! A [`TextLayout`] tells the appearance generator how wide and tall a string is, which font
//! resource to select and how to encode the shown bytes. [`StandardFontLayout`] covers the
//! two standard 14 fonts that need no embedding and have WinAnsi-compatible single-byte codes.

use crate::content::ContentOp;
use crate::object::{Dictionary, Object};
use crate::text_string::encode_show_text;

/// Measured extent of a run of text, in user space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    /// Advance width
    pub width: f64,
    /// Ascender-to-descender height
    pub height: f64,
}

/// Text measurement and font selection for appearance streams.
pub trait TextLayout: std::fmt::Debug + Send + Sync {
    /// Font size used when drawing.
    fn font_size(&self) -> f64;

    /// Measure `text` at `font_size`.
    fn measure(&self, text: &str, font_size: f64) -> TextExtent;

    /// Key under `/Resources /Font` that the operators refer to.
    fn font_resource_name(&self) -> &str;

    /// Font dictionary placed under [`TextLayout::font_resource_name`].
    fn font_dictionary(&self) -> Dictionary;

    /// Encode `text` for a `Tj` operand.
    fn encode(&self, text: &str) -> Vec<u8> {
        encode_show_text(text)
    }

    /// Operators drawing `text` with its origin at (`x`, `y`).
    fn show_text(&self, text: &str, x: f64, y: f64) -> Vec<ContentOp> {
        vec![
            ContentOp::BeginText,
            ContentOp::SetFont(self.font_resource_name().to_string(), self.font_size()),
            ContentOp::MoveText(x, y),
            ContentOp::ShowText(self.encode(text)),
            ContentOp::EndText,
        ]
    }
}

/// Standard 14 fonts with built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    /// Helvetica (proportional)
    Helvetica,
    /// Courier (monospace, 600 units per glyph)
    Courier,
}

impl StandardFont {
    /// Parse a font name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Helvetica" | "Helv" => Some(Self::Helvetica),
            "Courier" | "Cour" => Some(Self::Courier),
            _ => None,
        }
    }

    /// PostScript base font name.
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::Courier => "Courier",
        }
    }

    /// Conventional AcroForm resource key.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helv",
            Self::Courier => "Cour",
        }
    }

    /// Glyph width in 1/1000 em.
    pub fn char_width(&self, ch: char) -> f64 {
        match self {
            Self::Courier => 600.0,
            Self::Helvetica => {
                let code = ch as u32;
                if (32..=126).contains(&code) {
                    HELVETICA_WIDTHS[(code - 32) as usize]
                } else {
                    556.0
                }
            },
        }
    }

    /// (ascender, descender) in 1/1000 em.
    pub fn vertical_metrics(&self) -> (f64, f64) {
        match self {
            Self::Helvetica => (718.0, -207.0),
            Self::Courier => (629.0, -157.0),
        }
    }
}

/// Layout with one of the standard fonts at a fixed size.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardFontLayout {
    font: StandardFont,
    size: f64,
}

impl StandardFontLayout {
    /// Create a layout drawing with `font` at `size` points.
    pub fn new(font: StandardFont, size: f64) -> Self {
        Self { font, size }
    }

    /// Helvetica at `size` points.
    pub fn helvetica(size: f64) -> Self {
        Self::new(StandardFont::Helvetica, size)
    }
}

impl TextLayout for StandardFontLayout {
    fn font_size(&self) -> f64 {
        self.size
    }

    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        let units: f64 = text.chars().map(|c| self.font.char_width(c)).sum();
        let (ascender, descender) = self.font.vertical_metrics();
        TextExtent {
            width: units * font_size / 1000.0,
            height: (ascender - descender) * font_size / 1000.0,
        }
    }

    fn font_resource_name(&self) -> &str {
        self.font.resource_name()
    }

    fn font_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Type".to_string(), Object::name("Font"));
        dict.insert("Subtype".to_string(), Object::name("Type1"));
        dict.insert("BaseFont".to_string(), Object::name(self.font.base_font()));
        dict.insert("Encoding".to_string(), Object::name("WinAnsiEncoding"));
        dict
    }
}

/// Helvetica advance widths for codes 32..=126.
const HELVETICA_WIDTHS: [f64; 95] = [
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, 333.0, 333.0, 389.0, 584.0, 278.0,
    333.0, 278.0, 278.0, // space .. /
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, // 0 .. 9
    278.0, 278.0, 584.0, 584.0, 584.0, 556.0, 1015.0, // : .. @
    667.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0, 722.0, 278.0, 500.0, 667.0, 556.0, 833.0,
    722.0, 778.0, 667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, 667.0, 667.0,
    611.0, // A .. Z
    278.0, 278.0, 278.0, 469.0, 556.0, 333.0, // [ .. `
    556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, 556.0, 222.0, 222.0, 500.0, 222.0, 833.0,
    556.0, 556.0, 556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, 500.0, 500.0,
    500.0, // a .. z
    334.0, 260.0, 334.0, 584.0, // { .. ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_widths() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.char_width(' '), 278.0);
        assert_eq!(font.char_width('A'), 667.0);
        assert_eq!(font.char_width('i'), 222.0);
        assert_eq!(font.char_width('~'), 584.0);
        assert_eq!(font.char_width('\u{e9}'), 556.0);
    }

    #[test]
    fn test_courier_is_monospace() {
        let layout = StandardFontLayout::new(StandardFont::Courier, 10.0);
        let extent = layout.measure("abcd", 10.0);
        assert!((extent.width - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_helvetica_extent() {
        let layout = StandardFontLayout::helvetica(12.0);
        let extent = layout.measure("Hi", 12.0);
        assert!((extent.width - (722.0 + 222.0) * 12.0 / 1000.0).abs() < 1e-9);
        assert!((extent.height - 925.0 * 12.0 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_dictionary() {
        let layout = StandardFontLayout::new(StandardFont::Courier, 9.0);
        let dict = layout.font_dictionary();
        assert_eq!(dict.get("BaseFont"), Some(&Object::name("Courier")));
        assert_eq!(layout.font_resource_name(), "Cour");
    }

    #[test]
    fn test_show_text_ops() {
        let layout = StandardFontLayout::helvetica(10.0);
        let ops = layout.show_text("Eric", 2.0, 3.0);
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[1], ContentOp::SetFont("Helv".to_string(), 10.0));
        assert_eq!(ops[3], ContentOp::ShowText(b"Eric".to_vec()));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(StandardFont::from_name("Courier"), Some(StandardFont::Courier));
        assert_eq!(StandardFont::from_name("Times-Roman"), None);
    }
}
