//! Scalar parameter parsers.

use query_state_util::parse_int;

use crate::parser::Parser;

/// Integer parameter, read with `parseInt` semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerParser;

impl Parser for IntegerParser {
    type Value = i64;

    fn parse(&self, raw: &str) -> Option<i64> {
        parse_int(raw)
    }

    fn serialize(&self, value: &i64) -> String {
        value.to_string()
    }
}

/// Free-form string parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl Parser for StringParser {
    type Value = String;

    fn parse(&self, raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    fn serialize(&self, value: &String) -> String {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(IntegerParser.parse("2"), Some(2));
        assert_eq!(IntegerParser.parse("2.7"), Some(2));
        assert_eq!(IntegerParser.parse("two"), None);
        assert_eq!(IntegerParser.serialize(&-4), "-4");
    }

    #[test]
    fn test_string() {
        assert_eq!(StringParser.parse("").as_deref(), Some(""));
        assert_eq!(StringParser.serialize(&"0xabc".to_string()), "0xabc");
    }
}
