use crate::{ColumnSpec, Domain, Facet, LoadState, PaginationWindow, ResultItem, SortSpec, Summary};

/// Read-only snapshot handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainViewModel {
    pub domain: Domain,
    pub columns: Vec<ColumnSpec>,
    /// Rows of the current page, in display order.
    pub rows: Vec<ResultItem>,
    pub facets: Vec<Facet>,
    pub active_category: Option<String>,
    pub active_options: Vec<FilterOption>,
    /// One removable chip per applied value.
    pub chips: Vec<FilterChip>,
    pub summary: Summary,
    pub pagination: PaginationWindow,
    pub sort: Option<SortSpec>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub loading: LoadState,
    pub graphs: Vec<GraphRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub category: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphRowView {
    pub item_key: String,
    pub state: LoadState,
    pub data: Option<serde_json::Value>,
}
