use std::fmt;
use std::io;

use dashboard_core::ResultsPayload;

/// Completion reported by the engine thread, tagged with the sequence number
/// the core attached to the request.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    DatasetFetched {
        seq: u64,
        result: Result<ResultsPayload, FetchError>,
    },
    GraphFetched {
        seq: u64,
        item_key: String,
        result: Result<serde_json::Value, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("cannot build http client: {0}")]
    Client(#[source] FetchError),
}
