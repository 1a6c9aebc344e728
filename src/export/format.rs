// file: src/export/format.rs
// version: 1.0.0
// guid: a3e7c190-5d2b-4f86-9c41-8b0f6e2d7a15

//! SQL literal formatting for exported values

use super::rules::{FieldRule, SqlVariables};
use crate::database::{ColumnKind, ColumnMeta, SqlValue};

/// True when every byte is printable ASCII (32..=126)
pub fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| (32..=126).contains(b))
}

/// `0x`-prefixed uppercase hex literal
pub fn hex_literal(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode_upper(bytes))
}

/// Single-quoted string literal with MySQL backslash escapes
pub fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Plain decimal rendering of a numeric value
pub fn format_number(value: &SqlValue, column: Option<&ColumnMeta>) -> Option<String> {
    let scale = column
        .filter(|c| c.kind == ColumnKind::Float)
        .and_then(|c| c.scale)
        .map(usize::from);

    let text = match value {
        SqlValue::Int(v) => v.to_string(),
        SqlValue::UInt(v) => v.to_string(),
        SqlValue::Float(v) => match scale {
            Some(scale) => format!("{:.*}", scale, v),
            None => v.to_string(),
        },
        SqlValue::Double(v) => v.to_string(),
        _ => return None,
    };
    Some(text)
}

/// Render one value as it should appear inside `VALUES (...)`
pub fn format_value(
    value: &SqlValue,
    column: Option<&ColumnMeta>,
    rule: Option<FieldRule>,
    variables: &SqlVariables,
) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bytes(bytes) if bytes.is_empty() => "''".to_string(),
        SqlValue::Bytes(bytes) => {
            if rule == Some(FieldRule::NameText) && is_printable_ascii(bytes) {
                let text: String = bytes.iter().map(|&b| char::from(b)).collect();
                quote_text(&text)
            } else {
                hex_literal(bytes)
            }
        }
        SqlValue::Text(text) => quote_text(text),
        SqlValue::Temporal(text) => format!("'{}'", text),
        SqlValue::Decimal(text) => text.clone(),
        number => {
            let plain = format_number(number, column).unwrap_or_default();
            match rule {
                Some(FieldRule::Constant) => variables
                    .name_for(&plain)
                    .map(str::to_string)
                    .unwrap_or(plain),
                Some(FieldRule::Bitmask) => number
                    .as_i64()
                    .and_then(|v| variables.expand_bitmask(v))
                    .unwrap_or(plain),
                _ => plain,
            }
        }
    }
}
