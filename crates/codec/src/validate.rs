//! Strict validation of raw query values.
//!
//! Parsing never fails, so a hand-edited URL silently loses fields. Callers
//! that want to reject such input instead can check it here first.

use query_state_util::decode_uri_component;
use thiserror::Error;

use crate::schema::{
    Encoding, FieldKind, Layout, Schema, FIELD_DELIMITER, MAX_RECORD_INDEX, RECORD_DELIMITER,
    SENTINEL,
};

/// Maximum allowed raw value length in bytes.
pub const MAX_VALUE_LENGTH: usize = 8192;

/// Maximum number of records in one value.
pub const MAX_RECORDS: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query value is longer than {} bytes", MAX_VALUE_LENGTH)]
    ValueTooLong,
    #[error("query value holds more than {} records", MAX_RECORDS)]
    TooManyRecords,
    #[error("query value is not a valid URI component")]
    InvalidEncoding,
    #[error("record {record}: expected {expected} fields, found {found}")]
    FieldCount {
        record: usize,
        expected: usize,
        found: usize,
    },
    #[error("record {record}: invalid index")]
    InvalidIndex { record: usize },
    #[error("record {record}: field `{field}` is not a number")]
    InvalidNumber { record: usize, field: &'static str },
}

/// Check whether a slot number is a plain non-negative integer without
/// leading zeros.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(u8::is_ascii_digit)
        && index
            .parse::<usize>()
            .is_ok_and(|index| index <= MAX_RECORD_INDEX)
}

fn is_strict_number(kind: FieldKind, raw: &str) -> bool {
    match kind {
        FieldKind::Str => true,
        FieldKind::Int => raw.parse::<i64>().is_ok(),
        FieldKind::Float => raw.parse::<f64>().is_ok_and(f64::is_finite),
    }
}

/// Validate a raw query value against a schema.
///
/// # Errors
///
/// Returns the first problem found, scanning records in order.
///
/// # Example
///
/// ```
/// use query_state_codec::{validate_query_value, Encoding, FieldSpec, Layout, Schema, ValidationError};
///
/// const OWNERS: Schema = Schema {
///     key: "owners",
///     fields: &[
///         FieldSpec::string("address"),
///         FieldSpec::string("addressOrEns"),
///         FieldSpec::int("weight", "1"),
///     ],
///     layout: Layout::Indexed,
///     encoding: Encoding::Plain,
/// };
///
/// validate_query_value(&OWNERS, "0:0xabc:_:1;1:_:_:2").unwrap();
/// assert_eq!(
///     validate_query_value(&OWNERS, "0:0xabc:_:heavy"),
///     Err(ValidationError::InvalidNumber { record: 0, field: "weight" }),
/// );
/// ```
pub fn validate_query_value(schema: &Schema, raw: &str) -> Result<(), ValidationError> {
    if raw.len() > MAX_VALUE_LENGTH {
        return Err(ValidationError::ValueTooLong);
    }
    let decoded = match schema.encoding {
        Encoding::Plain => raw.to_string(),
        Encoding::UriComponent => {
            decode_uri_component(raw).ok_or(ValidationError::InvalidEncoding)?
        }
    };

    let records: Vec<&str> = decoded
        .split(RECORD_DELIMITER)
        .filter(|token| !token.is_empty())
        .collect();
    if records.len() > MAX_RECORDS {
        return Err(ValidationError::TooManyRecords);
    }

    for (record, token) in records.into_iter().enumerate() {
        let parts: Vec<&str> = token.split(FIELD_DELIMITER).collect();
        if parts.len() != schema.width() {
            return Err(ValidationError::FieldCount {
                record,
                expected: schema.width(),
                found: parts.len(),
            });
        }
        let values = match schema.layout {
            Layout::Indexed => {
                if !is_valid_index(parts[0]) {
                    return Err(ValidationError::InvalidIndex { record });
                }
                &parts[1..]
            }
            Layout::Appended { .. } => &parts[..],
        };
        for (spec, raw) in schema.fields.iter().zip(values) {
            if *raw != SENTINEL && !is_strict_number(spec.kind, raw) {
                return Err(ValidationError::InvalidNumber {
                    record,
                    field: spec.name,
                });
            }
        }
    }
    Ok(())
}
