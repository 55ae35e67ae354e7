//! Generic list codec driven by a record's [`Schema`].

use std::borrow::Cow;
use std::marker::PhantomData;

use query_state_util::{decode_uri_component, encode_uri_component};
use tracing::debug;

use crate::record::{QueryRecord, RecordList};
use crate::schema::{Encoding, Layout, Schema, FIELD_DELIMITER, RECORD_DELIMITER};
use crate::value::{FieldValue, Fields};

/// Parses and serializes a [`RecordList`] for one record type.
///
/// Parsing is total: malformed input degrades to absent fields, dropped
/// records or an empty list, and never panics.
pub struct ListCodec<R> {
    schema: &'static Schema,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for ListCodec<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ListCodec<R> {}

impl<R> std::fmt::Debug for ListCodec<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListCodec")
            .field("key", &self.schema.key)
            .finish()
    }
}

impl<R: QueryRecord> Default for ListCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: QueryRecord> ListCodec<R> {
    pub fn new() -> Self {
        Self {
            schema: R::SCHEMA,
            _record: PhantomData,
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Decode a raw query value.
    ///
    /// The empty string decodes to an empty list.
    pub fn parse(&self, raw: &str) -> RecordList<R> {
        if raw.is_empty() {
            return RecordList::new();
        }

        let decoded: Cow<'_, str> = match self.schema.encoding {
            Encoding::Plain => Cow::Borrowed(raw),
            Encoding::UriComponent => match decode_uri_component(raw) {
                Some(decoded) => Cow::Owned(decoded),
                None => {
                    debug!(key = self.schema.key, "query value is not a valid URI component");
                    return RecordList::new();
                }
            },
        };

        let mut list = RecordList::new();
        for (position, token) in decoded.split(RECORD_DELIMITER).enumerate() {
            if token.is_empty() {
                continue;
            }
            let parts: Vec<&str> = token.split(FIELD_DELIMITER).collect();
            if parts.len() != self.schema.width() {
                debug!(
                    key = self.schema.key,
                    record = position,
                    expected = self.schema.width(),
                    found = parts.len(),
                    "record has unexpected field count"
                );
            }

            match self.schema.layout {
                Layout::Indexed => {
                    let (raw_index, rest) = match parts.split_first() {
                        Some((first, rest)) => (*first, rest),
                        None => ("", &[][..]),
                    };
                    let record = R::from_fields(self.decode_fields(rest));
                    if !list.place(raw_index, record) {
                        debug!(
                            key = self.schema.key,
                            record = position,
                            index = raw_index,
                            "dropping record with out-of-range index"
                        );
                    }
                }
                Layout::Appended { required } => {
                    let fields = self.decode_fields(&parts);
                    let missing_required = self
                        .schema
                        .field_index(required)
                        .is_some_and(|i| fields.get(i).map_or(true, Option::is_none));
                    if missing_required {
                        debug!(
                            key = self.schema.key,
                            record = position,
                            field = required,
                            "dropping record without required field"
                        );
                        continue;
                    }
                    list.push(R::from_fields(fields));
                }
            }
        }
        list
    }

    /// Decode an optional raw value, as read from a server-side request.
    ///
    /// An absent parameter decodes to an empty list.
    pub fn parse_server_side(&self, raw: Option<&str>) -> RecordList<R> {
        raw.map(|raw| self.parse(raw)).unwrap_or_default()
    }

    /// Encode a list into a query value.
    ///
    /// Holes are skipped. Indexed schemas keep each record's slot number as
    /// its leading field, so holes survive a round trip.
    pub fn serialize(&self, list: &RecordList<R>) -> String {
        let joined = list
            .entries()
            .map(|(index, record)| self.serialize_record(index, &record.to_fields()))
            .collect::<Vec<_>>()
            .join(&RECORD_DELIMITER.to_string());

        match self.schema.encoding {
            Encoding::Plain => joined,
            Encoding::UriComponent => encode_uri_component(&joined),
        }
    }

    fn decode_fields(&self, parts: &[&str]) -> Fields {
        self.schema
            .fields
            .iter()
            .enumerate()
            .map(|(i, spec)| parts.get(i).and_then(|raw| FieldValue::decode(spec.kind, raw)))
            .collect()
    }

    fn serialize_record(&self, index: usize, fields: &Fields) -> String {
        let mut tokens = Vec::with_capacity(self.schema.width());
        if self.schema.is_indexed() {
            tokens.push(index.to_string());
        }
        for (i, spec) in self.schema.fields.iter().enumerate() {
            let token = match fields.get(i).and_then(Option::as_ref) {
                Some(value) => value.encode(),
                None => spec.absent.to_string(),
            };
            tokens.push(token);
        }
        tokens.join(&FIELD_DELIMITER.to_string())
    }
}
