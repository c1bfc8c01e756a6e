//! PDF text string encoding.
//!
//! Field names (`/T`) and values (`/V`) are PDF text strings: either PDFDocEncoding or
//! UTF-16BE prefixed with a byte order mark (ISO 32000-1:2008, Section 7.9.2.2).

/// Decode a PDF text string (UTF-16BE with BOM, else PDFDocEncoding).
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16_pairs: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&utf16_pairs)
    } else {
        bytes.iter().filter_map(|&b| pdfdoc_to_char(b)).collect()
    }
}

/// Encode a text string for a `/V` entry.
///
/// PDFDocEncoding when every character has a single-byte code, UTF-16BE with BOM otherwise.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    let single_byte: Option<Vec<u8>> = text.chars().map(char_to_pdfdoc).collect();
    match single_byte {
        Some(bytes) => bytes,
        None => {
            let mut out = vec![0xFE, 0xFF];
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        },
    }
}

/// Encode text for a `Tj` operand: one byte per character, `?` for anything past Latin-1.
pub fn encode_show_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

/// Write `bytes` as a literal string `( ... )` with delimiters and line breaks escaped.
pub fn write_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'(');
    for &b in bytes {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out.push(b')');
}

const PDFDOC_HIGH: [(u8, char); 31] = [
    (0x80, '\u{2022}'),
    (0x81, '\u{2020}'),
    (0x82, '\u{2021}'),
    (0x83, '\u{2026}'),
    (0x84, '\u{2014}'),
    (0x85, '\u{2013}'),
    (0x86, '\u{0192}'),
    (0x87, '\u{2044}'),
    (0x88, '\u{2039}'),
    (0x89, '\u{203A}'),
    (0x8A, '\u{2212}'),
    (0x8B, '\u{2030}'),
    (0x8C, '\u{201E}'),
    (0x8D, '\u{201C}'),
    (0x8E, '\u{201D}'),
    (0x8F, '\u{2018}'),
    (0x90, '\u{2019}'),
    (0x91, '\u{201A}'),
    (0x92, '\u{2122}'),
    (0x93, '\u{FB01}'),
    (0x94, '\u{FB02}'),
    (0x95, '\u{0141}'),
    (0x96, '\u{0152}'),
    (0x97, '\u{0160}'),
    (0x98, '\u{0178}'),
    (0x99, '\u{017D}'),
    (0x9A, '\u{0131}'),
    (0x9B, '\u{0142}'),
    (0x9C, '\u{0153}'),
    (0x9D, '\u{0161}'),
    (0x9E, '\u{017E}'),
];

fn pdfdoc_to_char(code: u8) -> Option<char> {
    match code {
        0x00..=0x7F | 0xA0..=0xFF => Some(code as char),
        0x9F => None,
        _ => PDFDOC_HIGH
            .iter()
            .find(|(b, _)| *b == code)
            .map(|(_, c)| *c),
    }
}

fn char_to_pdfdoc(c: char) -> Option<u8> {
    match c as u32 {
        0x00..=0x7F | 0xA0..=0xFF => Some(c as u8),
        _ => PDFDOC_HIGH.iter().find(|(_, ch)| *ch == c).map(|(b, _)| *b),
    }
}
