//! Decoded field values.

use query_state_util::{format_number, parse_float, parse_int};

use crate::schema::{FieldKind, SENTINEL};

/// A present field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
}

/// A record's fields in schema order. `None` means absent.
pub type Fields = Vec<Option<FieldValue>>;

impl FieldValue {
    /// Decode one raw token.
    ///
    /// The sentinel and unparsable numbers both decode to `None`. An empty
    /// string field stays `Some("")`, so "explicitly empty" and "not
    /// provided" remain distinct.
    pub fn decode(kind: FieldKind, raw: &str) -> Option<Self> {
        if raw == SENTINEL {
            return None;
        }
        match kind {
            FieldKind::Str => Some(FieldValue::Str(raw.to_string())),
            FieldKind::Int => parse_int(raw).map(FieldValue::Int),
            FieldKind::Float => parse_float(raw)
                .filter(|value| !value.is_nan())
                .map(FieldValue::Float),
        }
    }

    /// Render the value as a wire token.
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Str(s) => s.clone(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(f) => format_number(*f),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Str(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// Positional reader over decoded [`Fields`].
///
/// Typed records pull their fields in schema order. Reads past the end, and
/// values of the wrong kind, yield `None`.
#[derive(Debug)]
pub struct FieldCursor {
    fields: std::vec::IntoIter<Option<FieldValue>>,
}

impl FieldCursor {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields: fields.into_iter(),
        }
    }

    fn next_value(&mut self) -> Option<FieldValue> {
        self.fields.next().flatten()
    }

    pub fn string(&mut self) -> Option<String> {
        match self.next_value()? {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn int(&mut self) -> Option<i64> {
        self.next_value()?.as_int()
    }

    pub fn float(&mut self) -> Option<f64> {
        self.next_value()?.as_float()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sentinel() {
        assert_eq!(FieldValue::decode(FieldKind::Str, "_"), None);
        assert_eq!(FieldValue::decode(FieldKind::Int, "_"), None);
        assert_eq!(FieldValue::decode(FieldKind::Float, "_"), None);
    }

    #[test]
    fn test_decode_empty_string_is_present() {
        assert_eq!(
            FieldValue::decode(FieldKind::Str, ""),
            Some(FieldValue::Str(String::new()))
        );
        assert_eq!(FieldValue::decode(FieldKind::Int, ""), None);
    }

    #[test]
    fn test_decode_numbers() {
        assert_eq!(FieldValue::decode(FieldKind::Int, "3"), Some(FieldValue::Int(3)));
        assert_eq!(FieldValue::decode(FieldKind::Int, "abc"), None);
        assert_eq!(
            FieldValue::decode(FieldKind::Float, "0.5"),
            Some(FieldValue::Float(0.5))
        );
        assert_eq!(FieldValue::decode(FieldKind::Float, "x"), None);
    }

    #[test]
    fn test_encode() {
        assert_eq!(FieldValue::from("0xabc").encode(), "0xabc");
        assert_eq!(FieldValue::from(7_i64).encode(), "7");
        assert_eq!(FieldValue::from(2.0_f64).encode(), "2");
        assert_eq!(FieldValue::from(1.25_f64).encode(), "1.25");
    }

    #[test]
    fn test_cursor() {
        let mut cursor = FieldCursor::new(vec![
            Some(FieldValue::from("a")),
            None,
            Some(FieldValue::from(4_i64)),
            Some(FieldValue::from(4_i64)),
        ]);
        assert_eq!(cursor.string(), Some("a".to_string()));
        assert_eq!(cursor.string(), None);
        assert_eq!(cursor.int(), Some(4));
        // Kind mismatch reads as absent.
        assert_eq!(cursor.string(), None);
        // Past the end.
        assert_eq!(cursor.int(), None);
    }
}
