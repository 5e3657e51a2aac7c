use std::str::FromStr;

use crate::error::WireError;
use crate::escape::unescape;

/// One decoded record: an ordered list of `key=value` fields.
///
/// Field order matches the wire; lookups scan the list, which is fine for
/// the handful of fields a record carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Raw value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse a field value into `T`, failing on absent or malformed values.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, WireError> {
        let value = self
            .get(key)
            .ok_or_else(|| WireError::MissingField(key.to_string()))?;
        value.parse().map_err(|_| WireError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decode one `|`-free record part into ordered fields. Bare tokens (no
/// `=`) become fields with an empty value.
pub(crate) fn parse_pairs(part: &str) -> Record {
    let mut fields = Vec::new();
    for token in part.split_whitespace() {
        match token.split_once('=') {
            Some((key, value)) => fields.push((unescape(key), unescape(value))),
            None => fields.push((unescape(token), String::new())),
        }
    }
    Record { fields }
}

/// Decode response-body lines into records. Each line may carry several
/// records separated by `|`.
pub fn decode_records(lines: &[String]) -> Vec<Record> {
    let mut records = Vec::new();
    for line in lines {
        for part in line.split('|') {
            if part.trim().is_empty() {
                continue;
            }
            records.push(parse_pairs(part));
        }
    }
    records
}

/// Structured view over the raw response lines of a command.
pub trait DecodeResponse: Sized {
    fn decode(lines: &[String]) -> Result<Self, WireError>;
}

impl DecodeResponse for Vec<Record> {
    fn decode(lines: &[String]) -> Result<Self, WireError> {
        Ok(decode_records(lines))
    }
}

/// Convenience for single-record responses: the first record wins.
impl DecodeResponse for Record {
    fn decode(lines: &[String]) -> Result<Self, WireError> {
        decode_records(lines)
            .into_iter()
            .next()
            .ok_or(WireError::EmptyResponse)
    }
}
