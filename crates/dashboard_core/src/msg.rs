use crate::{ResultsPayload, SelectMode, SortDirection, SummaryShortcut};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Domain view opened with the given query string (deep link).
    Mounted { query: String },
    /// Back/forward navigation landed on a different query string.
    LocationChanged { query: String },
    /// User picked which facet's options to show.
    CategoryActivated(String),
    /// User ticked or unticked a facet option (not yet applied).
    OptionToggled {
        category: String,
        value: String,
        mode: SelectMode,
    },
    /// User applied the pending selections.
    FiltersCommitted,
    /// User dismissed one filter chip.
    FilterRemoved { category: String, value: String },
    /// User cleared every filter.
    FiltersCleared,
    /// User clicked one of the summary counters.
    ShortcutClicked(SummaryShortcut),
    SortChanged {
        column: String,
        direction: SortDirection,
    },
    SortCleared,
    PageChanged(usize),
    PageSizeChanged(usize),
    /// User picked a new date range (raw input, validated on receipt).
    DateRangeChanged { start: String, end: String },
    RefreshRequested,
    /// Engine delivered a dataset response.
    DatasetLoaded { seq: u64, payload: ResultsPayload },
    /// Engine failed to retrieve a dataset.
    DatasetFailed { seq: u64, error: String },
    /// User expanded a row and wants its graph data.
    GraphRequested { item_key: String },
    GraphLoaded {
        item_key: String,
        seq: u64,
        data: serde_json::Value,
    },
    GraphFailed {
        item_key: String,
        seq: u64,
        error: String,
    },
}
