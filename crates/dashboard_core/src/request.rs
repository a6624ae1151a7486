use serde::Deserialize;

use crate::{Domain, Facet, ResultItem, ServerSummary};

/// Parameters for one dataset retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    pub domain: Domain,
    pub endpoint: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub offset: usize,
    /// Batch size for server-paged domains; `None` fetches the whole range.
    pub size: Option<usize>,
    /// Backend filter expression, see `AppliedFilters::encode_for_backend`.
    pub filter: Option<String>,
    /// Whether the results extend the loaded dataset instead of replacing it.
    pub append: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub domain: Domain,
    pub endpoint: String,
    pub item_key: String,
}

/// Body of a dataset response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPayload {
    #[serde(default)]
    pub results: Vec<ResultItem>,
    /// Number of results the server holds for the query, across all batches.
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub offset: usize,
    /// Default range chosen by the server when none was requested.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, rename = "filterData")]
    pub facets: Option<Vec<Facet>>,
    #[serde(default)]
    pub summary: Option<ServerSummary>,
}
