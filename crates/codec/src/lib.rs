//! Delimited record-list codec for URL query strings.
//!
//! Form rows (owners, assets, user operations) are kept in a single query
//! parameter. Records are separated by `;`, fields by `:`, and `_` marks an
//! absent field. Each record type declares a [`Schema`] that fixes field
//! order, per-field defaults, the index-vs-append layout and whether the whole
//! value is percent-encoded. [`ListCodec`] does the rest.
//!
//! # Example
//!
//! ```
//! use query_state_codec::{
//!     Encoding, FieldCursor, FieldSpec, FieldValue, Fields, Layout, ListCodec, QueryRecord, Schema,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Signer {
//!     address: Option<String>,
//!     weight: Option<i64>,
//! }
//!
//! const SIGNERS: Schema = Schema {
//!     key: "signers",
//!     fields: &[FieldSpec::string("address"), FieldSpec::int("weight", "1")],
//!     layout: Layout::Indexed,
//!     encoding: Encoding::Plain,
//! };
//!
//! impl QueryRecord for Signer {
//!     const SCHEMA: &'static Schema = &SIGNERS;
//!
//!     fn from_fields(fields: Fields) -> Self {
//!         let mut cursor = FieldCursor::new(fields);
//!         Signer { address: cursor.string(), weight: cursor.int() }
//!     }
//!
//!     fn to_fields(&self) -> Fields {
//!         vec![
//!             self.address.clone().map(FieldValue::Str),
//!             self.weight.map(FieldValue::Int),
//!         ]
//!     }
//! }
//!
//! let codec = ListCodec::<Signer>::new();
//! let list = codec.parse("1:0xabc:2");
//! assert_eq!(list.get(0), None);
//! assert_eq!(list.get(1), Some(&Signer { address: Some("0xabc".into()), weight: Some(2) }));
//! assert_eq!(codec.serialize(&list), "1:0xabc:2");
//! ```

pub mod codec;
pub mod record;
pub mod schema;
pub mod validate;
pub mod value;

pub use codec::ListCodec;
pub use record::{QueryRecord, RecordList};
pub use schema::{
    Encoding, FieldKind, FieldSpec, Layout, Schema, FIELD_DELIMITER, MAX_RECORD_INDEX,
    RECORD_DELIMITER, SENTINEL,
};
pub use validate::{is_valid_index, validate_query_value, ValidationError, MAX_RECORDS, MAX_VALUE_LENGTH};
pub use value::{FieldCursor, FieldValue, Fields};
