use dashboard_logging::{dash_debug, dash_warn};

use crate::pagination::{IncrementalLoader, LoadDecision, PaginationWindow};
use crate::sort::sort_indices;
use crate::url_state::{self, UrlError};
use crate::view_model::{DomainViewModel, FilterChip, FilterOption, GraphRowView};
use crate::{
    summarize, DatasetRequest, DomainConfig, Facet, Facets, FetchTracker, FilterEngine,
    FilterMode, GraphRequest, GraphSlots, LoadState, PagingMode, ResultItem, ResultsPayload,
    SortSpec, Summary,
};

/// Requested date range, normalized to `YYYY-MM-DD`. `None` lets the backend
/// pick its default window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Everything one mounted domain view owns.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainState {
    config: DomainConfig,
    dataset: Vec<ResultItem>,
    server_total: usize,
    facets: Facets,
    server_summary: Option<Summary>,
    date_range: DateRange,
    filters: FilterEngine,
    sort: Option<SortSpec>,
    window: PaginationWindow,
    loader: IncrementalLoader,
    fetch: FetchTracker,
    graphs: GraphSlots,
    /// Dataset indices of the filtered view, in display order.
    ordered: Vec<usize>,
    dirty: bool,
}

impl DomainState {
    pub fn new(config: DomainConfig) -> Self {
        let filters = FilterEngine::new(&config.categories);
        let window = PaginationWindow::new(config.default_per_page);
        Self {
            config,
            dataset: Vec::new(),
            server_total: 0,
            facets: Facets::default(),
            server_summary: None,
            date_range: DateRange::default(),
            filters,
            sort: None,
            window,
            loader: IncrementalLoader::default(),
            fetch: FetchTracker::default(),
            graphs: GraphSlots::default(),
            ordered: Vec::new(),
            dirty: false,
        }
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    pub fn dataset(&self) -> &[ResultItem] {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn window(&self) -> &PaginationWindow {
        &self.window
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn load_state(&self) -> LoadState {
        self.fetch.state()
    }

    pub fn graphs(&self) -> &GraphSlots {
        &self.graphs
    }

    /// The filtered (and sorted, if a sort is set) view.
    pub fn filtered_view(&self) -> Vec<&ResultItem> {
        self.ordered.iter().map(|&i| &self.dataset[i]).collect()
    }

    /// Rows of the current page.
    pub fn table_page(&self) -> Vec<&ResultItem> {
        let range = self.page_range();
        self.ordered[range].iter().map(|&i| &self.dataset[i]).collect()
    }

    pub fn summary(&self) -> Summary {
        match (self.config.filter_mode, self.server_summary) {
            (FilterMode::Backend, Some(summary)) => summary,
            _ => summarize(self.filtered_view(), &self.config.status_field),
        }
    }

    pub fn location_query(&self) -> Result<String, UrlError> {
        url_state::serialize(
            self.filters.applied(),
            self.date_range.start.as_deref(),
            self.date_range.end.as_deref(),
        )
    }

    pub fn view(&self) -> DomainViewModel {
        let active_category = self.filters.active_category().map(ToOwned::to_owned);
        let active_options: Vec<FilterOption> = active_category
            .as_deref()
            .map(|category| {
                let selected = self.filters.selected().get(category);
                self.facets
                    .options(category)
                    .iter()
                    .map(|value| FilterOption {
                        value: value.clone(),
                        selected: selected.iter().any(|s| s == value),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let chips: Vec<FilterChip> = self
            .filters
            .applied()
            .iter()
            .flat_map(|(category, values)| {
                values.iter().map(move |value| FilterChip {
                    category: category.to_string(),
                    value: value.clone(),
                })
            })
            .collect();
        let graphs: Vec<GraphRowView> = self
            .graphs
            .iter()
            .map(|(key, slot)| GraphRowView {
                item_key: key.to_string(),
                state: slot.state,
                data: slot.data.clone(),
            })
            .collect();

        DomainViewModel {
            domain: self.config.domain,
            columns: self.config.columns.clone(),
            rows: self.table_page().into_iter().cloned().collect(),
            facets: self.facets.as_slice().to_vec(),
            active_category,
            active_options,
            chips,
            summary: self.summary(),
            pagination: self.window,
            sort: self.sort.clone(),
            start_date: self.date_range.start.clone(),
            end_date: self.date_range.end.clone(),
            loading: self.fetch.state(),
            graphs,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn filters_mut(&mut self) -> &mut FilterEngine {
        &mut self.filters
    }

    pub(crate) fn window_mut(&mut self) -> &mut PaginationWindow {
        &mut self.window
    }

    pub(crate) fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub(crate) fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.recompute();
    }

    /// Re-derives the ordered view and the window's item count.
    pub(crate) fn recompute(&mut self) {
        let mut ordered: Vec<usize> = match self.config.filter_mode {
            // The backend already filtered what it returned.
            FilterMode::Backend => (0..self.dataset.len()).collect(),
            FilterMode::InMemory => self.filters.applied().matching_indices(&self.dataset),
        };
        if let Some(spec) = &self.sort {
            let kind = self.config.column_kind(&spec.column);
            sort_indices(&self.dataset, &mut ordered, &spec.column, kind, spec.direction);
        }
        self.ordered = ordered;
        let total = match self.config.paging {
            PagingMode::Client => self.ordered.len(),
            PagingMode::ServerIncremental => self.server_total.max(self.ordered.len()),
        };
        self.window.set_total(total);
        self.dirty = true;
    }

    /// Starts a full fetch, making every earlier reply stale.
    pub(crate) fn begin_full_fetch(&mut self) -> (u64, DatasetRequest) {
        let seq = self.fetch.begin_full();
        self.loader.reset();
        self.graphs.clear();
        self.dirty = true;
        let size = match self.config.paging {
            PagingMode::Client => None,
            PagingMode::ServerIncremental => Some(self.window.per_page),
        };
        (seq, self.dataset_request(0, size, false))
    }

    /// For server-paged domains, requests the batch the current page needs.
    pub(crate) fn begin_append_if_needed(&mut self) -> Option<(u64, DatasetRequest)> {
        if self.config.paging != PagingMode::ServerIncremental
            || self.fetch.state().is_loading()
        {
            return None;
        }
        let decision = self.loader.ensure_loaded(
            &self.window,
            self.window.page,
            self.dataset.len(),
            self.server_total,
        );
        match decision {
            LoadDecision::Satisfied | LoadDecision::InFlight => None,
            LoadDecision::Fetch { offset, size } => {
                let seq = self.fetch.next_seq();
                self.loader.mark_pending(seq, offset);
                Some((seq, self.dataset_request(offset, Some(size), true)))
            }
        }
    }

    fn dataset_request(&self, offset: usize, size: Option<usize>, append: bool) -> DatasetRequest {
        let applied = self.filters.applied();
        let filter = (self.config.filter_mode == FilterMode::Backend && !applied.is_empty())
            .then(|| applied.encode_for_backend());
        DatasetRequest {
            domain: self.config.domain,
            endpoint: self.config.endpoint.clone(),
            start_date: self.date_range.start.clone(),
            end_date: self.date_range.end.clone(),
            offset,
            size,
            filter,
            append,
        }
    }

    pub(crate) fn is_current_full(&self, seq: u64) -> bool {
        self.fetch.is_current_full(seq)
    }

    pub(crate) fn finish_full(&mut self, seq: u64, ok: bool) -> bool {
        let applied = self.fetch.finish_full(seq, ok);
        if applied {
            self.dirty = true;
        }
        applied
    }

    /// Replaces the dataset with a full response.
    pub(crate) fn apply_payload(&mut self, payload: ResultsPayload) {
        let ResultsPayload {
            results,
            total,
            start_date,
            end_date,
            facets,
            summary,
            ..
        } = payload;

        self.server_total = total.unwrap_or(results.len()).max(results.len());
        self.dataset = results;
        self.refresh_facets(facets);
        self.server_summary = summary.map(Summary::from);
        if self.date_range.start.is_none() {
            self.date_range.start = adopt_server_date(start_date);
        }
        if self.date_range.end.is_none() {
            self.date_range.end = adopt_server_date(end_date);
        }
        dash_debug!(
            "{} dataset replaced len={} server_total={}",
            self.config.domain,
            self.dataset.len(),
            self.server_total
        );
        self.recompute();
    }

    /// Extends the dataset with an append response. Returns `false` when the
    /// reply is stale or would not line up with what is loaded.
    pub(crate) fn apply_append(&mut self, seq: u64, payload: ResultsPayload) -> bool {
        let Some(pending) = self.loader.complete(seq) else {
            return false;
        };
        if pending.offset != self.dataset.len() {
            dash_warn!(
                "discarding append at offset {} with {} results loaded",
                pending.offset,
                self.dataset.len()
            );
            return false;
        }
        let ResultsPayload {
            results,
            total,
            facets,
            ..
        } = payload;
        if let Some(total) = total {
            self.server_total = total;
        }
        self.dataset.extend(results);
        self.server_total = self.server_total.max(self.dataset.len());
        self.refresh_facets(facets);
        self.recompute();
        true
    }

    fn refresh_facets(&mut self, server: Option<Vec<Facet>>) {
        self.facets = match server {
            Some(server) => Facets::from_server(server, &self.config.categories),
            None => {
                let derived = Facets::derive(&self.dataset, &self.config.categories);
                match self.config.filter_mode {
                    FilterMode::Backend => {
                        derived.keep_constrained(&self.facets, self.filters.applied())
                    }
                    FilterMode::InMemory => derived,
                }
            }
        };
    }

    /// Releases the pending append after a failed fetch.
    pub(crate) fn fail_append(&mut self, seq: u64) -> bool {
        self.loader.complete(seq).is_some()
    }

    /// The loaded result whose id field equals `key`.
    pub fn find_item(&self, key: &str) -> Option<&ResultItem> {
        let id_field = &self.config.id_field;
        self.dataset
            .iter()
            .find(|item| item.get(id_field).is_some_and(|id| id.to_string() == key))
    }

    /// Starts a graph fetch for a loaded result. `None` when a fetch for the
    /// same key is already in flight.
    pub(crate) fn begin_graph(&mut self, item_key: &str) -> Option<(u64, GraphRequest)> {
        if self
            .graphs
            .get(item_key)
            .is_some_and(|slot| slot.state.is_loading())
        {
            return None;
        }
        let seq = self.fetch.next_seq();
        self.graphs.begin(item_key, seq);
        self.dirty = true;
        Some((
            seq,
            GraphRequest {
                domain: self.config.domain,
                endpoint: self.config.graph_endpoint.clone(),
                item_key: item_key.to_string(),
            },
        ))
    }

    pub(crate) fn graphs_mut(&mut self) -> &mut GraphSlots {
        &mut self.graphs
    }

    fn page_range(&self) -> std::ops::Range<usize> {
        let range = self.window.range();
        let end = range.end.min(self.ordered.len());
        range.start.min(end)..end
    }
}

fn adopt_server_date(date: Option<String>) -> Option<String> {
    let date = date?;
    match url_state::format_date(&date) {
        Ok(formatted) => Some(formatted),
        Err(err) => {
            dash_warn!("ignoring server date: {err}");
            None
        }
    }
}
