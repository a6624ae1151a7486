//! Dashboard engine: HTTP retrieval of result sets and graph data, plus
//! atomic state-file persistence for the application.
mod engine;
mod fetch;
mod persist;
mod types;

pub use engine::EngineHandle;
pub use fetch::{dataset_url, graph_url, FetchSettings, ReqwestResultsSource, ResultsSource};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError};
