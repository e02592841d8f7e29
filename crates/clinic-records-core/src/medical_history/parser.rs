//! Fail-soft parsing of stored medical-history payloads.
//!
//! Historical rows were written as Python-style dict literals
//! (`{'allergies': ['latex'], 'pregnant': False}`). The rewrite below is a
//! compatibility shim for those rows, not a grammar: anything it cannot turn
//! into a JSON object degrades to an empty record.

use serde_json::{Map, Value};
use thiserror::Error;

use super::MedicalHistory;

/// Why a payload could not be read. Never leaves this module.
#[derive(Error, Debug)]
pub(crate) enum ParseError {
    #[error("payload is empty")]
    Empty,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Parse a raw payload into a medical-history record.
///
/// Objects pass through, text is rewritten and parsed, everything else
/// (including any failure) yields an empty record.
pub fn parse(raw: &Value) -> MedicalHistory {
    match raw {
        Value::Object(map) => MedicalHistory::from_map(map.clone()),
        Value::Null => MedicalHistory::default(),
        Value::String(text) => parse_str(text),
        other => {
            tracing::debug!(kind = value_kind(other), "Ignoring non-object medical history");
            MedicalHistory::default()
        }
    }
}

/// Parse a textual payload, JSON or quasi-JSON.
pub fn parse_str(text: &str) -> MedicalHistory {
    match try_parse_str(text) {
        Ok(map) => MedicalHistory::from_map(map),
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable medical history, using empty record");
            MedicalHistory::default()
        }
    }
}

pub(crate) fn try_parse_str(text: &str) -> Result<Map<String, Value>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let rewritten = rewrite_quasi_json(text)?;
    match serde_json::from_str::<Value>(&rewritten)? {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::NotAnObject(value_kind(&other))),
    }
}

/// Turn single-quoted strings into double-quoted ones and `None`/`True`/`False`
/// into their JSON literals. Tokens inside string literals are left alone.
pub(crate) fn rewrite_quasi_json(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => copy_string_literal(c, &mut chars, &mut out)?,
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(match word.as_str() {
                    "None" => "null",
                    "True" => "true",
                    "False" => "false",
                    other => other,
                });
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Copy a literal opened by `quote`, always emitting double-quote delimiters.
fn copy_string_literal(
    quote: char,
    chars: &mut impl Iterator<Item = char>,
    out: &mut String,
) -> Result<(), ParseError> {
    out.push('"');
    loop {
        let c = chars.next().ok_or(ParseError::UnterminatedString)?;
        match c {
            '\\' => {
                let escaped = chars.next().ok_or(ParseError::UnterminatedString)?;
                // \' is not a JSON escape
                if escaped != '\'' {
                    out.push('\\');
                }
                out.push(escaped);
            }
            c if c == quote => {
                out.push('"');
                return Ok(());
            }
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
