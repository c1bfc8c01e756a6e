//! Content stream operators for generated appearances.
//!
//! Only the operators an appearance stream for variable text needs. See ISO 32000-1:2008,
//! Section 8.2 (graphics state), 9.4 (text objects) and 14.6 (marked content).

use crate::text_string::write_literal;

/// A content stream operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOp {
    /// q
    SaveState,
    /// Q
    RestoreState,
    /// BT
    BeginText,
    /// ET
    EndText,
    /// /Name size Tf
    SetFont(String, f64),
    /// tx ty Td
    MoveText(f64, f64),
    /// (bytes) Tj, with the bytes already in the font's encoding
    ShowText(Vec<u8>),
    /// /Tag BMC
    BeginMarkedContent(String),
    /// EMC
    EndMarkedContent,
    /// Operators copied through verbatim (e.g. a `/DA` string)
    Raw(Vec<u8>),
}

/// Serialize operations, one per line.
pub fn encode_ops(ops: &[ContentOp]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            buf.push(b'\n');
        }
        write_op(&mut buf, op);
    }
    buf
}

fn write_op(w: &mut Vec<u8>, op: &ContentOp) {
    match op {
        ContentOp::SaveState => w.push(b'q'),
        ContentOp::RestoreState => w.push(b'Q'),
        ContentOp::BeginText => w.extend_from_slice(b"BT"),
        ContentOp::EndText => w.extend_from_slice(b"ET"),
        ContentOp::SetFont(name, size) => {
            w.extend_from_slice(format!("/{} {} Tf", name, format_number(*size)).as_bytes())
        },
        ContentOp::MoveText(tx, ty) => w.extend_from_slice(
            format!("{} {} Td", format_number(*tx), format_number(*ty)).as_bytes(),
        ),
        ContentOp::ShowText(text) => {
            write_literal(w, text);
            w.extend_from_slice(b" Tj");
        },
        ContentOp::BeginMarkedContent(tag) => {
            w.extend_from_slice(format!("/{} BMC", tag).as_bytes())
        },
        ContentOp::EndMarkedContent => w.extend_from_slice(b"EMC"),
        ContentOp::Raw(bytes) => w.extend_from_slice(bytes),
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.3}", rounded);
        s.trim_end_matches('0').to_string()
    }
}
