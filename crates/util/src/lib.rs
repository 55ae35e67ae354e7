//! query-state-util - helpers shared by the query-state codecs
//!
//! The wallet front end writes its form state with JavaScript primitives
//! (`encodeURIComponent`, `parseInt`, `parseFloat`, `String(number)`), so the
//! Rust side needs byte-compatible equivalents to read and write the same URLs.

pub mod address;
pub mod number;
pub mod uri_component;

pub use address::{checksum_address, is_address};
pub use number::{format_number, parse_float, parse_int};
pub use uri_component::{decode_uri_component, encode_uri_component};
