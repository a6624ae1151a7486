use crate::{DatasetRequest, GraphRequest, NavigationMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDataset { seq: u64, request: DatasetRequest },
    FetchGraph { seq: u64, request: GraphRequest },
    /// Write the query string to the address bar.
    UpdateLocation { query: String, mode: NavigationMode },
    /// Raise a transient user notification.
    Notify { level: NotifyLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}
