//! Dashboard core: faceted result browsing as a pure state machine.
//!
//! `update` folds a `Msg` into a `DomainState` and returns the `Effect`s the
//! application must carry out (fetches, location writes, notifications).
mod domain;
mod effect;
mod facet;
mod fetch;
mod filter;
mod item;
mod msg;
mod pagination;
mod request;
mod sort;
mod state;
mod summary;
mod update;
pub mod url_state;
mod view_model;

pub use domain::{
    ColumnKind, ColumnSpec, Domain, DomainConfig, FilterMode, PagingMode, UnknownDomain,
};
pub use effect::{Effect, NotifyLevel};
pub use facet::{Facet, Facets};
pub use fetch::{FetchTracker, GraphSlot, GraphSlots, LoadState};
pub use filter::{AppliedFilters, FilterEngine, SelectMode, SelectedFilter, SelectedFilters};
pub use item::{FieldValue, ResultItem};
pub use msg::Msg;
pub use pagination::{
    offset_for, slice, IncrementalLoader, LoadDecision, PaginationError, PaginationWindow,
    PendingAppend,
};
pub use request::{DatasetRequest, GraphRequest, ResultsPayload};
pub use sort::{sort, status_label, SortDirection, SortSpec};
pub use state::{DateRange, DomainState};
pub use summary::{
    other_statuses, summarize, ServerSummary, Summary, SummaryShortcut, FAILURE, SUCCESS,
};
pub use update::update;
pub use url_state::{format_date, DateError, NavigationMode, UrlError, UrlState};
pub use view_model::{DomainViewModel, FilterChip, FilterOption, GraphRowView};
