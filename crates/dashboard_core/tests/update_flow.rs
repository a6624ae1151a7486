use std::sync::Once;

use dashboard_core::{
    update, DomainConfig, DomainState, Effect, LoadState, Msg, NavigationMode, NotifyLevel,
    ResultItem, ResultsPayload, SelectMode, SortDirection, SummaryShortcut,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

/// Client-filtered domain with a platform facet.
fn in_memory_config() -> DomainConfig {
    DomainConfig {
        categories: vec!["platform".to_string(), "jobStatus".to_string()],
        ..DomainConfig::telco()
    }
}

fn run(uuid: &str, platform: &str, status: &str) -> ResultItem {
    ResultItem::new()
        .with("uuid", uuid)
        .with("platform", platform)
        .with("jobStatus", status)
}

fn runs() -> Vec<ResultItem> {
    vec![
        run("1", "AWS", "success"),
        run("2", "gcp", "failure"),
        run("3", "GCP", "upstream_failed"),
        run("4", "azure", "success"),
    ]
}

fn payload(results: Vec<ResultItem>, total: usize) -> ResultsPayload {
    ResultsPayload {
        results,
        total: Some(total),
        ..ResultsPayload::default()
    }
}

fn fetch_seq(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchDataset { seq, .. } => Some(*seq),
            _ => None,
        })
        .expect("fetch effect")
}

fn mounted(config: DomainConfig, query: &str) -> (DomainState, u64) {
    let (state, effects) = update(
        DomainState::new(config),
        Msg::Mounted {
            query: query.to_string(),
        },
    );
    let seq = fetch_seq(&effects);
    (state, seq)
}

fn loaded(config: DomainConfig, results: Vec<ResultItem>) -> DomainState {
    let (state, seq) = mounted(config, "");
    let total = results.len();
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq,
            payload: payload(results, total),
        },
    );
    state
}

fn uuids(state: &DomainState) -> Vec<String> {
    state
        .filtered_view()
        .iter()
        .map(|item| item.text("uuid"))
        .collect()
}

fn toggle(state: DomainState, category: &str, value: &str) -> DomainState {
    update(
        state,
        Msg::OptionToggled {
            category: category.to_string(),
            value: value.to_string(),
            mode: SelectMode::Multi,
        },
    )
    .0
}

#[test]
fn mount_seeds_filters_and_dates_from_the_location() {
    init_logging();
    let (state, effects) = update(
        DomainState::new(in_memory_config()),
        Msg::Mounted {
            query: "platform=aws&start_date=2024-1-1&end_date=2024-01-31".to_string(),
        },
    );

    let Effect::FetchDataset { request, .. } = &effects[0] else {
        panic!("expected fetch first, got {effects:?}");
    };
    assert_eq!(request.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(request.end_date.as_deref(), Some("2024-01-31"));
    assert_eq!(request.filter, None);
    assert_eq!(
        effects[1],
        Effect::UpdateLocation {
            query: "platform=aws&start_date=2024-01-01&end_date=2024-01-31".to_string(),
            mode: NavigationMode::Replace,
        }
    );
    assert_eq!(
        state.filters().applied().get("platform"),
        Some(&["aws".to_string()][..])
    );
    assert_eq!(state.filters().selected().get("platform"), ["aws"]);
    assert_eq!(state.load_state(), LoadState::Loading);
}

#[test]
fn mount_with_bad_date_keeps_filters_and_warns() {
    init_logging();
    let (state, effects) = update(
        DomainState::new(in_memory_config()),
        Msg::Mounted {
            query: "platform=aws&start_date=someday".to_string(),
        },
    );

    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::Notify { level: NotifyLevel::Warning, message } if message.contains("someday")
    )));
    assert_eq!(state.date_range().start, None);
    assert!(state.filters().applied().get("platform").is_some());
}

#[test]
fn committed_filters_then_remove_leave_only_gcp() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let state = toggle(state, "platform", "aws");
    let state = toggle(state, "platform", "gcp");

    let (state, effects) = update(state, Msg::FiltersCommitted);
    assert_eq!(
        effects,
        vec![Effect::UpdateLocation {
            query: "platform=aws%2Cgcp".to_string(),
            mode: NavigationMode::Replace,
        }]
    );
    assert_eq!(uuids(&state), vec!["1", "2", "3"]);

    let (state, effects) = update(
        state,
        Msg::FilterRemoved {
            category: "platform".to_string(),
            value: "aws".to_string(),
        },
    );
    assert_eq!(
        state.filters().applied().get("platform"),
        Some(&["gcp".to_string()][..])
    );
    assert_eq!(uuids(&state), vec!["2", "3"]);
    assert_eq!(
        effects,
        vec![Effect::UpdateLocation {
            query: "platform=gcp".to_string(),
            mode: NavigationMode::Replace,
        }]
    );
}

#[test]
fn committing_unchanged_filters_does_nothing() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let (_state, effects) = update(state, Msg::FiltersCommitted);

    assert!(effects.is_empty());
}

#[test]
fn backend_domains_refetch_with_encoded_filter() {
    init_logging();
    let state = loaded(DomainConfig::platform(), runs());
    let state = toggle(state, "platform", "aws");
    let (state, effects) = update(state, Msg::FiltersCommitted);

    let Effect::FetchDataset { request, .. } = &effects[0] else {
        panic!("expected fetch, got {effects:?}");
    };
    assert_eq!(request.filter.as_deref(), Some("platform='aws'"));
    assert!(!request.append);
    assert!(matches!(effects[1], Effect::UpdateLocation { .. }));
    // The dataset stays visible until the filtered one arrives.
    assert_eq!(state.filtered_view().len(), 4);
    assert_eq!(state.load_state(), LoadState::Loading);
}

#[test]
fn late_response_for_an_older_request_is_dropped() {
    init_logging();
    let (state, first) = mounted(in_memory_config(), "");
    let (state, effects) = update(
        state,
        Msg::DateRangeChanged {
            start: "2024-02-01".to_string(),
            end: "2024-02-29".to_string(),
        },
    );
    let second = fetch_seq(&effects);
    assert!(second > first);

    let (state, effects) = update(
        state,
        Msg::DatasetLoaded {
            seq: first,
            payload: payload(runs(), 4),
        },
    );
    assert!(effects.is_empty());
    assert!(state.dataset().is_empty());
    assert_eq!(state.load_state(), LoadState::Loading);

    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq: second,
            payload: payload(vec![run("9", "aws", "success")], 1),
        },
    );
    assert_eq!(uuids(&state), vec!["9"]);
    assert_eq!(state.load_state(), LoadState::Completed);

    // A failure for the stale request must not disturb the current state.
    let (state, effects) = update(
        state,
        Msg::DatasetFailed {
            seq: first,
            error: "timeout".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.load_state(), LoadState::Completed);
}

#[test]
fn failed_refresh_keeps_the_stale_dataset() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let (state, effects) = update(state, Msg::RefreshRequested);
    let seq = fetch_seq(&effects);

    let (state, effects) = update(
        state,
        Msg::DatasetFailed {
            seq,
            error: "network error".to_string(),
        },
    );

    assert_eq!(state.load_state(), LoadState::Errored);
    assert_eq!(state.dataset().len(), 4);
    assert!(matches!(
        &effects[..],
        [Effect::Notify { level: NotifyLevel::Error, message }] if message.contains("network error")
    ));
}

#[test]
fn invalid_date_range_is_rejected_without_fetching() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let before = state.date_range().clone();

    let (state, effects) = update(
        state,
        Msg::DateRangeChanged {
            start: "2024-13-01".to_string(),
            end: "2024-12-31".to_string(),
        },
    );
    assert!(matches!(
        &effects[..],
        [Effect::Notify { level: NotifyLevel::Error, message }] if message.contains("2024-13-01")
    ));
    assert_eq!(state.date_range(), &before);

    let (_state, effects) = update(
        state,
        Msg::DateRangeChanged {
            start: "2024-03-01".to_string(),
            end: "2024-02-01".to_string(),
        },
    );
    assert!(matches!(&effects[..], [Effect::Notify { .. }]));
}

#[test]
fn summary_shortcuts_apply_status_filters() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let state = toggle(state, "platform", "gcp");
    let (state, _) = update(state, Msg::FiltersCommitted);

    let (state, effects) = update(state, Msg::ShortcutClicked(SummaryShortcut::Failures));
    assert_eq!(uuids(&state), vec!["2"]);
    assert!(matches!(
        effects[0],
        Effect::UpdateLocation {
            mode: NavigationMode::Push,
            ..
        }
    ));

    let (state, _) = update(state, Msg::ShortcutClicked(SummaryShortcut::Others));
    assert_eq!(
        state.filters().applied().get("jobStatus"),
        Some(&["upstream_failed".to_string()][..])
    );
    assert_eq!(uuids(&state), vec!["3"]);

    let (state, _) = update(state, Msg::ShortcutClicked(SummaryShortcut::All));
    assert_eq!(state.filters().applied().get("jobStatus"), None);
    assert_eq!(uuids(&state), vec!["2", "3"]);
    assert_eq!(state.summary().total, 2);
}

#[test]
fn status_shortcuts_leave_pending_selections_uncommitted() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let state = toggle(state, "platform", "aws");

    let (state, _) = update(state, Msg::ShortcutClicked(SummaryShortcut::Failures));
    assert_eq!(state.filters().applied().get("platform"), None);
    assert_eq!(state.filters().selected().get("platform"), ["aws".to_string()]);
    assert_eq!(uuids(&state), vec!["2"]);

    let (state, _) = update(state, Msg::FiltersCommitted);
    assert_eq!(
        state.filters().applied().get("platform"),
        Some(&["aws".to_string()][..])
    );
}

#[test]
fn backend_failures_then_others_reaches_the_remaining_statuses() {
    init_logging();
    let state = loaded(DomainConfig::jobs(), runs());

    let (state, effects) = update(state, Msg::ShortcutClicked(SummaryShortcut::Failures));
    let seq = fetch_seq(&effects);
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq,
            payload: payload(vec![run("2", "gcp", "failure")], 1),
        },
    );
    assert_eq!(
        state.facets().options("jobStatus"),
        ["failure", "success", "upstream_failed"]
    );

    let (state, effects) = update(state, Msg::ShortcutClicked(SummaryShortcut::Others));
    assert_eq!(
        state.filters().applied().get("jobStatus"),
        Some(&["upstream_failed".to_string()][..])
    );
    let Effect::FetchDataset { request, .. } = &effects[0] else {
        panic!("expected fetch, got {effects:?}");
    };
    assert_eq!(request.filter.as_deref(), Some("jobStatus='upstream_failed'"));
}

#[test]
fn others_shortcut_without_other_statuses_changes_nothing() {
    init_logging();
    let state = loaded(
        in_memory_config(),
        vec![run("1", "aws", "success"), run("2", "aws", "failure")],
    );

    let (state, effects) = update(state, Msg::ShortcutClicked(SummaryShortcut::Others));
    assert!(matches!(
        &effects[..],
        [Effect::Notify {
            level: NotifyLevel::Info,
            ..
        }]
    ));
    assert!(state.filters().applied().is_empty());
}

#[test]
fn summary_tracks_the_filtered_view() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let summary = state.summary();
    assert_eq!(
        (
            summary.total,
            summary.success_count,
            summary.failure_count,
            summary.others_count
        ),
        (4, 2, 1, 1)
    );

    let state = toggle(state, "platform", "azure");
    let (state, _) = update(state, Msg::FiltersCommitted);
    assert_eq!(state.view().summary.total, 1);
}

#[test]
fn sort_and_paging_shape_the_table_page() {
    init_logging();
    let results: Vec<ResultItem> = (0..25)
        .map(|i| run(&format!("{i:02}"), "aws", "success"))
        .collect();
    let (state, _) = update(loaded(in_memory_config(), results), Msg::PageSizeChanged(10));
    let (state, _) = update(
        state,
        Msg::SortChanged {
            column: "uuid".to_string(),
            direction: SortDirection::Desc,
        },
    );
    let (state, _) = update(state, Msg::PageChanged(3));

    let view = state.view();
    let rows: Vec<String> = view.rows.iter().map(|item| item.text("uuid")).collect();
    assert_eq!(rows, vec!["04", "03", "02", "01", "00"]);
    assert_eq!(view.pagination.offset, 20);

    let (state, _) = update(state, Msg::PageChanged(0));
    assert_eq!(state.window().page, 1);
    assert_eq!(state.table_page()[0].text("uuid"), "24");
}

#[test]
fn page_size_change_keeps_the_first_visible_row() {
    init_logging();
    let results: Vec<ResultItem> = (0..60)
        .map(|i| run(&i.to_string(), "aws", "success"))
        .collect();
    let (state, _) = update(loaded(in_memory_config(), results), Msg::PageSizeChanged(10));
    let (state, _) = update(state, Msg::PageChanged(4));
    let first = state.table_page()[0].text("uuid");

    let (state, _) = update(state, Msg::PageSizeChanged(20));
    assert!(state.table_page().iter().any(|item| item.text("uuid") == first));

    let (state, effects) = update(state, Msg::PageSizeChanged(0));
    assert!(matches!(&effects[..], [Effect::Notify { .. }]));
    assert_eq!(state.window().per_page, 20);
}

#[test]
fn server_paged_domain_appends_batches_as_pages_advance() {
    init_logging();
    let batch = |from: usize, to: usize| -> Vec<ResultItem> {
        (from..to)
            .map(|i| ResultItem::new().with("id", i.to_string()).with("status", "success"))
            .collect()
    };

    let (state, effects) = update(
        DomainState::new(DomainConfig::lab_run()),
        Msg::Mounted {
            query: String::new(),
        },
    );
    let Effect::FetchDataset { seq, request } = &effects[0] else {
        panic!("expected fetch");
    };
    assert_eq!((request.offset, request.size), (0, Some(10)));
    let (state, effects) = update(
        state,
        Msg::DatasetLoaded {
            seq: *seq,
            payload: payload(batch(0, 10), 35),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.window().total_items, 35);

    let (state, effects) = update(state, Msg::PageChanged(3));
    let Effect::FetchDataset { seq, request } = &effects[0] else {
        panic!("expected append, got {effects:?}");
    };
    let append_seq = *seq;
    assert!(request.append);
    assert_eq!((request.offset, request.size), (10, Some(20)));

    // Re-entering for the same range while in flight is a no-op.
    let (state, effects) = update(state, Msg::PageChanged(3));
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::DatasetLoaded {
            seq: append_seq,
            payload: payload(batch(10, 30), 35),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.dataset().len(), 30);
    let rows: Vec<String> = state.table_page().iter().map(|i| i.text("id")).collect();
    assert_eq!(rows.first().map(String::as_str), Some("20"));
    assert_eq!(rows.len(), 10);

    // A duplicate delivery of the same append is ignored.
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq: append_seq,
            payload: payload(batch(10, 30), 35),
        },
    );
    assert_eq!(state.dataset().len(), 30);

    let (state, effects) = update(state, Msg::PageChanged(4));
    let Effect::FetchDataset { request, .. } = &effects[0] else {
        panic!("expected append");
    };
    assert_eq!((request.offset, request.size), (30, Some(10)));
    assert_eq!(state.table_page().len(), 0);
}

#[test]
fn refresh_discards_an_in_flight_append() {
    init_logging();
    let batch: Vec<ResultItem> = (0..10)
        .map(|i| ResultItem::new().with("id", i.to_string()))
        .collect();
    let (state, seq) = mounted(DomainConfig::lab_run(), "");
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq,
            payload: payload(batch.clone(), 50),
        },
    );
    let (state, effects) = update(state, Msg::PageChanged(2));
    let append_seq = fetch_seq(&effects);

    let (state, effects) = update(state, Msg::RefreshRequested);
    let refresh_seq = fetch_seq(&effects);
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq: append_seq,
            payload: payload(batch.clone(), 50),
        },
    );
    assert_eq!(state.dataset().len(), 10);

    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            seq: refresh_seq,
            payload: payload(batch, 50),
        },
    );
    assert_eq!(state.dataset().len(), 10);
    assert_eq!(state.load_state(), LoadState::Completed);
}

#[test]
fn graph_fetches_are_keyed_per_item() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let (state, effects) = update(
        state,
        Msg::GraphRequested {
            item_key: "1".to_string(),
        },
    );
    let Effect::FetchGraph { seq: first, request } = &effects[0] else {
        panic!("expected graph fetch");
    };
    let first = *first;
    assert_eq!(request.item_key, "1");

    let (state, effects) = update(
        state,
        Msg::GraphRequested {
            item_key: "1".to_string(),
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::GraphRequested {
            item_key: "2".to_string(),
        },
    );
    let Effect::FetchGraph { seq: second, .. } = effects[0].clone() else {
        panic!("expected graph fetch");
    };

    let (state, _) = update(
        state,
        Msg::GraphLoaded {
            item_key: "2".to_string(),
            seq: second,
            data: serde_json::json!({"latency": [1, 2, 3]}),
        },
    );
    let (state, effects) = update(
        state,
        Msg::GraphFailed {
            item_key: "1".to_string(),
            seq: first,
            error: "boom".to_string(),
        },
    );
    assert!(matches!(&effects[..], [Effect::Notify { .. }]));
    assert_eq!(
        state.graphs().get("2").map(|slot| slot.state),
        Some(LoadState::Completed)
    );
    assert_eq!(
        state.graphs().get("1").map(|slot| slot.state),
        Some(LoadState::Errored)
    );
    assert_eq!(state.load_state(), LoadState::Completed);
}

#[test]
fn graph_request_for_an_unloaded_result_only_warns() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let (state, effects) = update(
        state,
        Msg::GraphRequested {
            item_key: "no-such-run".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Notify {
            level: NotifyLevel::Warning,
            message: "No loaded result with uuid no-such-run".to_string(),
        }]
    );
    assert!(state.graphs().get("no-such-run").is_none());
}

#[test]
fn graph_keys_resolve_through_the_domain_id_field() {
    init_logging();
    let row = ResultItem::new()
        .with("id", 7_i64)
        .with("uuid", "abc")
        .with("status", "success");
    let state = loaded(DomainConfig::lab_run(), vec![row]);

    let (state, effects) = update(
        state,
        Msg::GraphRequested {
            item_key: "abc".to_string(),
        },
    );
    assert!(matches!(&effects[..], [Effect::Notify { .. }]));

    let (_, effects) = update(
        state,
        Msg::GraphRequested {
            item_key: "7".to_string(),
        },
    );
    let [Effect::FetchGraph { request, .. }] = &effects[..] else {
        panic!("expected graph fetch, got {effects:?}");
    };
    assert_eq!(request.item_key, "7");
    assert_eq!(request.endpoint, "api/v1/ilab/runs/graph");
}

#[test]
fn back_navigation_reseeds_without_refetching_client_domains() {
    init_logging();
    let state = loaded(in_memory_config(), runs());

    let (state, effects) = update(
        state,
        Msg::LocationChanged {
            query: "jobStatus=success".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(uuids(&state), vec!["1", "4"]);
    assert_eq!(state.filters().selected().get("jobStatus"), ["success"]);

    let (_state, effects) = update(
        state,
        Msg::LocationChanged {
            query: "jobStatus=success&start_date=2023-12-01".to_string(),
        },
    );
    assert!(matches!(effects[0], Effect::FetchDataset { .. }));
}

#[test]
fn clear_all_restores_the_full_view() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let state = toggle(state, "jobStatus", "success");
    let (state, _) = update(state, Msg::FiltersCommitted);
    assert_eq!(uuids(&state), vec!["1", "4"]);

    let (mut state, effects) = update(state, Msg::FiltersCleared);
    assert_eq!(uuids(&state), vec!["1", "2", "3", "4"]);
    assert_eq!(
        effects,
        vec![Effect::UpdateLocation {
            query: String::new(),
            mode: NavigationMode::Replace,
        }]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn view_exposes_options_for_the_active_category() {
    init_logging();
    let state = loaded(in_memory_config(), runs());
    let state = toggle(state, "platform", "gcp");
    let view = state.view();

    assert_eq!(view.active_category.as_deref(), Some("platform"));
    let options: Vec<(String, bool)> = view
        .active_options
        .iter()
        .map(|o| (o.value.clone(), o.selected))
        .collect();
    assert_eq!(
        options,
        vec![
            ("AWS".to_string(), false),
            ("azure".to_string(), false),
            ("gcp".to_string(), true),
        ]
    );
    assert!(view.chips.is_empty());

    let (state, _) = update(state, Msg::CategoryActivated("missing".to_string()));
    assert!(state.view().active_options.is_empty());
}
