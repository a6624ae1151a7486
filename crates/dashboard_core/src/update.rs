use dashboard_logging::{dash_debug, dash_warn};

use crate::url_state::{self, NavigationMode};
use crate::{
    format_date, other_statuses, DateRange, DomainState, Effect, FilterMode, Msg, NotifyLevel,
    SelectMode, SortSpec, SummaryShortcut, FAILURE, SUCCESS,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DomainState, msg: Msg) -> (DomainState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted { query } => {
            let mut effects = seed_from_location(&mut state, &query);
            state.window_mut().set_page(1);
            effects.push(full_fetch(&mut state));
            effects.push(location_effect(&state, NavigationMode::Replace));
            effects
        }
        Msg::LocationChanged { query } => {
            let previous_dates = state.date_range().clone();
            let previous_filters = state.filters().applied().clone();
            let mut effects = seed_from_location(&mut state, &query);
            if *state.date_range() == previous_dates
                && *state.filters().applied() == previous_filters
            {
                return (state, effects);
            }
            state.window_mut().set_page(1);
            let refetch = *state.date_range() != previous_dates
                || state.config().filter_mode == FilterMode::Backend;
            if refetch {
                effects.push(full_fetch(&mut state));
            } else {
                state.recompute();
            }
            effects
        }
        Msg::CategoryActivated(category) => {
            state.filters_mut().set_active_category(&category);
            state.mark_dirty();
            Vec::new()
        }
        Msg::OptionToggled {
            category,
            value,
            mode,
        } => {
            state.filters_mut().toggle_option(&category, &value, mode);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FiltersCommitted => {
            if state.filters_mut().commit() {
                filters_changed(&mut state, NavigationMode::Replace)
            } else {
                Vec::new()
            }
        }
        Msg::FilterRemoved { category, value } => {
            if state.filters_mut().remove(&category, &value) {
                filters_changed(&mut state, NavigationMode::Replace)
            } else {
                Vec::new()
            }
        }
        Msg::FiltersCleared => {
            if state.filters_mut().clear_all() {
                filters_changed(&mut state, NavigationMode::Replace)
            } else {
                Vec::new()
            }
        }
        Msg::ShortcutClicked(shortcut) => apply_shortcut(&mut state, shortcut),
        Msg::SortChanged { column, direction } => {
            state.set_sort(Some(SortSpec { column, direction }));
            Vec::new()
        }
        Msg::SortCleared => {
            state.set_sort(None);
            Vec::new()
        }
        Msg::PageChanged(page) => {
            state.window_mut().set_page(page);
            state.mark_dirty();
            append_effect(&mut state).into_iter().collect()
        }
        Msg::PageSizeChanged(per_page) => {
            let page = state.window().page_keeping_first_item(per_page);
            if let Err(err) = state.window_mut().set_page_size(page, per_page) {
                return (state, vec![notify(NotifyLevel::Warning, err.to_string())]);
            }
            state.mark_dirty();
            append_effect(&mut state).into_iter().collect()
        }
        Msg::DateRangeChanged { start, end } => {
            let range = match (format_date(&start), format_date(&end)) {
                (Ok(start), Ok(end)) => DateRange {
                    start: Some(start),
                    end: Some(end),
                },
                (Err(err), _) | (_, Err(err)) => {
                    return (state, vec![notify(NotifyLevel::Error, err.to_string())]);
                }
            };
            // Both are zero-padded YYYY-MM-DD, so string order is date order.
            if range.start > range.end {
                let message = format!(
                    "start date {} is after end date {}",
                    range.start.as_deref().unwrap_or_default(),
                    range.end.as_deref().unwrap_or_default()
                );
                return (state, vec![notify(NotifyLevel::Error, message)]);
            }
            state.set_date_range(range);
            state.window_mut().set_page(1);
            let mut effects = vec![full_fetch(&mut state)];
            effects.push(location_effect(&state, NavigationMode::Replace));
            effects
        }
        Msg::RefreshRequested => vec![full_fetch(&mut state)],
        Msg::DatasetLoaded { seq, payload } => {
            if state.is_current_full(seq) {
                state.finish_full(seq, true);
                state.apply_payload(payload);
                append_effect(&mut state).into_iter().collect()
            } else if state.apply_append(seq, payload) {
                append_effect(&mut state).into_iter().collect()
            } else {
                dash_debug!("ignored dataset response seq={seq}");
                Vec::new()
            }
        }
        Msg::DatasetFailed { seq, error } => {
            let domain = state.config().domain;
            if state.is_current_full(seq) {
                state.finish_full(seq, false);
                dash_warn!("{domain} dataset fetch failed: {error}");
                vec![notify(
                    NotifyLevel::Error,
                    format!("Failed to load {domain} results: {error}"),
                )]
            } else if state.fail_append(seq) {
                state.mark_dirty();
                dash_warn!("{domain} append fetch failed: {error}");
                vec![notify(
                    NotifyLevel::Error,
                    format!("Failed to load more {domain} results: {error}"),
                )]
            } else {
                Vec::new()
            }
        }
        Msg::GraphRequested { item_key } => {
            if state.find_item(&item_key).is_none() {
                let id_field = &state.config().id_field;
                dash_warn!("no loaded result with {id_field} {item_key:?}, graph not fetched");
                let message = format!("No loaded result with {id_field} {item_key}");
                return (state, vec![notify(NotifyLevel::Warning, message)]);
            }
            match state.begin_graph(&item_key) {
                Some((seq, request)) => vec![Effect::FetchGraph { seq, request }],
                None => Vec::new(),
            }
        }
        Msg::GraphLoaded {
            item_key,
            seq,
            data,
        } => {
            if state.graphs_mut().complete(&item_key, seq, data) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GraphFailed {
            item_key,
            seq,
            error,
        } => {
            if state.graphs_mut().fail(&item_key, seq) {
                state.mark_dirty();
                vec![notify(
                    NotifyLevel::Error,
                    format!("Failed to load graph for {item_key}: {error}"),
                )]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

/// Seeds filters and dates from a query string. A malformed date is reported
/// and ignored; the filters still apply.
fn seed_from_location(state: &mut DomainState, query: &str) -> Vec<Effect> {
    let mut effects = Vec::new();
    let (applied, range) = match url_state::parse(query) {
        Ok(parsed) => (
            parsed.applied,
            DateRange {
                start: parsed.start_date,
                end: parsed.end_date,
            },
        ),
        Err(err) => {
            dash_warn!("location {query:?} rejected: {err}");
            effects.push(notify(NotifyLevel::Warning, err.to_string()));
            (url_state::parse_filters(query), DateRange::default())
        }
    };
    state.filters_mut().seed(applied);
    state.set_date_range(range);
    state.mark_dirty();
    effects
}

fn filters_changed(state: &mut DomainState, mode: NavigationMode) -> Vec<Effect> {
    state.window_mut().set_page(1);
    let mut effects = Vec::new();
    match state.config().filter_mode {
        FilterMode::Backend => effects.push(full_fetch(state)),
        FilterMode::InMemory => state.recompute(),
    }
    effects.push(location_effect(state, mode));
    effects
}

fn apply_shortcut(state: &mut DomainState, shortcut: SummaryShortcut) -> Vec<Effect> {
    let status = state.config().status_field.clone();
    let changed = match shortcut {
        SummaryShortcut::Successes | SummaryShortcut::Failures => {
            let value = if shortcut == SummaryShortcut::Successes {
                SUCCESS
            } else {
                FAILURE
            };
            let filters = state.filters_mut();
            filters.toggle_option(&status, value, SelectMode::Single);
            filters.commit_category(&status)
        }
        SummaryShortcut::Others => {
            let others = other_statuses(state.facets().options(&status));
            if others.is_empty() {
                return vec![notify(
                    NotifyLevel::Info,
                    "No results with other statuses".to_string(),
                )];
            }
            let filters = state.filters_mut();
            filters.select_values(&status, &others);
            filters.commit_category(&status)
        }
        SummaryShortcut::All => state.filters_mut().clear_category(&status),
    };
    if changed {
        filters_changed(state, NavigationMode::Push)
    } else {
        Vec::new()
    }
}

fn full_fetch(state: &mut DomainState) -> Effect {
    let (seq, request) = state.begin_full_fetch();
    dash_debug!("{} full fetch seq={seq}", request.domain);
    Effect::FetchDataset { seq, request }
}

fn append_effect(state: &mut DomainState) -> Option<Effect> {
    state
        .begin_append_if_needed()
        .map(|(seq, request)| Effect::FetchDataset { seq, request })
}

fn location_effect(state: &DomainState, mode: NavigationMode) -> Effect {
    match state.location_query() {
        Ok(query) => Effect::UpdateLocation { query, mode },
        Err(err) => {
            dash_warn!("cannot write location: {err}");
            notify(NotifyLevel::Error, err.to_string())
        }
    }
}

fn notify(level: NotifyLevel, message: String) -> Effect {
    Effect::Notify { level, message }
}
