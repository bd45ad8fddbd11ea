use serde_json::Value;

use crate::error::{PollError, Result};

/// A value fetched during one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    Scalar(String),
    /// `(offset, value)` pairs in ascending offset order.
    Bytes(Vec<(usize, u32)>),
}

impl Reading {
    pub fn scalar(body: &str) -> Self {
        Reading::Scalar(unquote(body).to_string())
    }

    /// Parses the body of a memory wildcard fetch.
    pub fn bytes(path: &str, body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body.trim())
            .map_err(|e| PollError::body(path, e.to_string()))?;

        let mut bytes = match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(offset, item)| Ok((offset, byte_value(path, item)?)))
                .collect::<Result<Vec<_>>>()?,
            Value::Object(map) => map
                .iter()
                .map(|(key, item)| {
                    let offset = key
                        .parse::<usize>()
                        .map_err(|_| PollError::body(path, format!("bad offset {:?}", key)))?;
                    Ok((offset, byte_value(path, item)?))
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(PollError::body(
                    path,
                    format!("expected array or object, got {}", other),
                ))
            }
        };

        bytes.sort_by_key(|(offset, _)| *offset);
        Ok(Reading::Bytes(bytes))
    }
}

fn byte_value(path: &str, item: &Value) -> Result<u32> {
    match item {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| PollError::body(path, format!("bad byte value {}", n))),
        Value::String(s) => {
            parse_int(s).ok_or_else(|| PollError::body(path, format!("bad byte value {:?}", s)))
        }
        other => Err(PollError::body(path, format!("bad byte value {}", other))),
    }
}

fn unquote(body: &str) -> &str {
    let trimmed = body.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn parse_int(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        text.parse::<u32>().ok()
    }
}

/// Parses the memory `byte/count` probe body.
pub fn parse_count(path: &str, body: &str) -> Result<usize> {
    let text = unquote(body);
    parse_int(text)
        .map(|count| count as usize)
        .ok_or_else(|| PollError::body(path, format!("bad byte count {:?}", text)))
}
