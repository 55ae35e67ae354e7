//! Wallet form state kept in URL query parameters.
//!
//! Each form parameter (`owners`, `assets`, `userOperations`, `transfers`,
//! `transfer`, `threshold`, `address`) has a [`Parser`] that turns the raw
//! query value into a typed value and back. Server-side handlers read them
//! with [`WithDefault::parse_server_side`]. Client code binds them with
//! [`QueryState`], which throttles URL writes against a [`UrlContext`].
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use query_state::{owners_query_state, Owner, RecordList, UrlContext};
//!
//! let mut context = UrlContext::from_href("/create?owners=0:0xabc:_:1");
//! let mut owners = owners_query_state().unwrap();
//! owners.sync(&context);
//! assert_eq!(owners.value().count(), 1);
//!
//! let mut next = owners.value().clone();
//! next.push(Owner { weight: Some(2), ..Owner::default() });
//! owners.set(next, &mut context, Instant::now());
//! assert_eq!(context.params().get("owners"), Some("0:0xabc:_:1;1:_:_:2"));
//! # let _: &RecordList<Owner> = owners.value();
//! ```

pub mod binding;
pub mod error;
pub mod location;
pub mod options;
pub mod parser;
pub mod parsers;
pub mod schemas;
pub mod states;
pub mod transfer;

pub use binding::QueryState;
pub use error::QueryStateError;
pub use location::{SearchParams, UrlContext};
pub use options::{HistoryMode, QueryStateOptions, MIN_THROTTLE_MS};
pub use parser::{Parser, WithDefault};
pub use parsers::{IntegerParser, StringParser};
pub use query_state_codec::{ListCodec, QueryRecord, RecordList};
pub use schemas::{
    assets_parser, owners_parser, user_operations_parser, Asset, Owner, UserOperationPartial,
    ASSETS, OWNERS, USER_OPERATIONS,
};
pub use states::{
    address_query_state, assets_query_state, owners_query_state, read_strict,
    threshold_query_state, transfer_query_state, transfers_query_state,
    user_operations_query_state, ADDRESS_KEY, SLOW_THROTTLE_MS, THRESHOLD_KEY,
};
pub use transfer::{
    transfer_parser, transfers_parser, TokenTransfer, TransferAsset, TransferParser,
    TransfersParser, TRANSFERS_KEY, TRANSFER_KEY,
};
