//! The parser contract shared by list codecs and scalar parsers.

use query_state_codec::{ListCodec, QueryRecord, RecordList};

/// Converts between a query parameter's raw value and a typed value.
pub trait Parser {
    type Value: Clone + PartialEq;

    /// Decode a raw value. `None` means "no usable value".
    fn parse(&self, raw: &str) -> Option<Self::Value>;

    fn serialize(&self, value: &Self::Value) -> String;

    /// Decode a value read during server-side request handling.
    fn parse_server_side(&self, raw: Option<&str>) -> Option<Self::Value> {
        raw.and_then(|raw| self.parse(raw))
    }

    /// Attach a fallback so reads always produce a value.
    fn with_default(self, default: Self::Value) -> WithDefault<Self>
    where
        Self: Sized,
    {
        WithDefault {
            parser: self,
            default,
        }
    }
}

impl<R> Parser for ListCodec<R>
where
    R: QueryRecord + Clone + PartialEq,
{
    type Value = RecordList<R>;

    fn parse(&self, raw: &str) -> Option<RecordList<R>> {
        Some(ListCodec::parse(self, raw))
    }

    fn serialize(&self, value: &RecordList<R>) -> String {
        ListCodec::serialize(self, value)
    }
}

/// A parser with a fallback value for absent or unusable parameters.
#[derive(Debug, Clone)]
pub struct WithDefault<P: Parser> {
    parser: P,
    default: P::Value,
}

impl<P: Parser> WithDefault<P> {
    pub fn default_value(&self) -> &P::Value {
        &self.default
    }

    pub fn inner(&self) -> &P {
        &self.parser
    }

    pub fn parse(&self, raw: &str) -> P::Value {
        self.parser
            .parse(raw)
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn serialize(&self, value: &P::Value) -> String {
        self.parser.serialize(value)
    }

    /// Decode a server-side value, falling back to the default.
    pub fn parse_server_side(&self, raw: Option<&str>) -> P::Value {
        self.parser
            .parse_server_side(raw)
            .unwrap_or_else(|| self.default.clone())
    }
}
