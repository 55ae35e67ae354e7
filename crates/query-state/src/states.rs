//! Ready-made bindings for the wallet form parameters.

use query_state_codec::{validate_query_value, ListCodec, QueryRecord, RecordList};

use crate::binding::QueryState;
use crate::error::QueryStateError;
use crate::location::SearchParams;
use crate::options::QueryStateOptions;
use crate::parser::Parser;
use crate::parsers::{IntegerParser, StringParser};
use crate::schemas::{
    assets_parser, owners_parser, user_operations_parser, Asset, Owner, UserOperationPartial,
};
use crate::transfer::{
    transfer_parser, transfers_parser, TokenTransfer, TransferParser, TransfersParser,
    TRANSFERS_KEY, TRANSFER_KEY,
};

/// Throttle for parameters that change while the user types.
pub const SLOW_THROTTLE_MS: u64 = 3000;

pub const THRESHOLD_KEY: &str = "threshold";
pub const ADDRESS_KEY: &str = "address";

fn slow() -> QueryStateOptions {
    QueryStateOptions::default().with_throttle_ms(SLOW_THROTTLE_MS)
}

pub fn owners_query_state() -> Result<QueryState<ListCodec<Owner>>, QueryStateError> {
    QueryState::new(Owner::SCHEMA.key, owners_parser())
}

pub fn assets_query_state() -> Result<QueryState<ListCodec<Asset>>, QueryStateError> {
    QueryState::new(Asset::SCHEMA.key, assets_parser())
}

pub fn user_operations_query_state(
) -> Result<QueryState<ListCodec<UserOperationPartial>>, QueryStateError> {
    let state = QueryState::new(UserOperationPartial::SCHEMA.key, user_operations_parser())?;
    Ok(state.with_options(slow()))
}

pub fn transfers_query_state() -> Result<QueryState<TransfersParser>, QueryStateError> {
    Ok(QueryState::new(TRANSFERS_KEY, transfers_parser())?.with_options(slow()))
}

pub fn transfer_query_state(
    initial: Option<TokenTransfer>,
) -> Result<QueryState<TransferParser>, QueryStateError> {
    Ok(QueryState::new(TRANSFER_KEY, transfer_parser(initial))?.with_options(slow()))
}

pub fn threshold_query_state() -> Result<QueryState<IntegerParser>, QueryStateError> {
    QueryState::new(THRESHOLD_KEY, IntegerParser.with_default(1))
}

pub fn address_query_state() -> Result<QueryState<StringParser>, QueryStateError> {
    QueryState::new(ADDRESS_KEY, StringParser.with_default(String::new()))
}

/// Read a list parameter, rejecting values the lenient parser would repair.
///
/// An absent parameter is an empty list.
pub fn read_strict<R>(params: &SearchParams) -> Result<RecordList<R>, QueryStateError>
where
    R: QueryRecord,
{
    let schema = R::SCHEMA;
    let Some(raw) = params.get(schema.key) else {
        return Ok(RecordList::new());
    };
    validate_query_value(schema, raw).map_err(|source| QueryStateError::Invalid {
        key: schema.key,
        source,
    })?;
    Ok(ListCodec::<R>::new().parse(raw))
}
