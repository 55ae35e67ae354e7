use query_state_codec::ValidationError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryStateError {
    #[error("query parameter key must not be empty")]
    EmptyKey,
    #[error("unknown history mode `{0}`")]
    UnknownHistoryMode(String),
    #[error("invalid `{key}` parameter: {source}")]
    Invalid {
        key: &'static str,
        #[source]
        source: ValidationError,
    },
}
