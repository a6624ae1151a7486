use dashboard_core::{other_statuses, summarize, ResultItem, ServerSummary, Summary};
use pretty_assertions::assert_eq;

fn with_status(status: &str) -> ResultItem {
    ResultItem::new().with("jobStatus", status)
}

#[test]
fn counts_success_failure_and_others() {
    let view = [
        with_status("success"),
        with_status("failure"),
        with_status("upstream_failed"),
    ];

    assert_eq!(
        summarize(&view, "jobStatus"),
        Summary {
            total: 3,
            success_count: 1,
            failure_count: 1,
            others_count: 1,
        }
    );
}

#[test]
fn status_matching_is_case_insensitive_and_missing_counts_as_other() {
    let view = [with_status("SUCCESS"), with_status("Failure"), ResultItem::new()];
    let summary = summarize(&view, "jobStatus");

    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.others_count, 1);
    assert_eq!(
        summary.success_count + summary.failure_count + summary.others_count,
        summary.total
    );
}

#[test]
fn others_are_clamped_at_zero_for_inconsistent_counts() {
    let summary = Summary::from(ServerSummary {
        total: 3,
        success: 2,
        failure: 4,
    });

    assert_eq!(summary.others_count, 0);
}

#[test]
fn empty_view_summarizes_to_zero() {
    let empty: Vec<ResultItem> = Vec::new();
    assert_eq!(summarize(&empty, "jobStatus"), Summary::default());
}

#[test]
fn other_statuses_exclude_success_and_failure() {
    let observed = vec![
        "Failure".to_string(),
        "success".to_string(),
        "upstream_failed".to_string(),
        "aborted".to_string(),
    ];

    assert_eq!(other_statuses(&observed), vec!["upstream_failed", "aborted"]);
}
