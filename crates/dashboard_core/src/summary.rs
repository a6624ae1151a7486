use serde::Deserialize;

use crate::ResultItem;

pub const SUCCESS: &str = "success";
pub const FAILURE: &str = "failure";

/// Success/failure/other counts over a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub others_count: usize,
}

impl Summary {
    /// Builds a summary whose `others_count` never goes negative.
    pub fn from_counts(total: usize, success_count: usize, failure_count: usize) -> Self {
        Self {
            total,
            success_count,
            failure_count,
            others_count: total.saturating_sub(success_count + failure_count),
        }
    }
}

/// Counts reported by a backend that filters server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ServerSummary {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub success: usize,
    #[serde(default)]
    pub failure: usize,
}

impl From<ServerSummary> for Summary {
    fn from(server: ServerSummary) -> Self {
        Summary::from_counts(server.total, server.success, server.failure)
    }
}

pub fn summarize<'a>(
    view: impl IntoIterator<Item = &'a ResultItem>,
    status_field: &str,
) -> Summary {
    let mut total = 0;
    let mut success = 0;
    let mut failure = 0;
    for item in view {
        total += 1;
        match item.get(status_field).map(|v| v.filter_key()).as_deref() {
            Some(SUCCESS) => success += 1,
            Some(FAILURE) => failure += 1,
            _ => {}
        }
    }
    Summary::from_counts(total, success, failure)
}

/// One-click status filters offered next to the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryShortcut {
    Successes,
    Failures,
    Others,
    All,
}

impl SummaryShortcut {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" | "successes" => Some(SummaryShortcut::Successes),
            "failure" | "failures" => Some(SummaryShortcut::Failures),
            "other" | "others" => Some(SummaryShortcut::Others),
            "all" => Some(SummaryShortcut::All),
            _ => None,
        }
    }
}

/// Observed status values that are neither success nor failure.
pub fn other_statuses(observed: &[String]) -> Vec<String> {
    observed
        .iter()
        .filter(|status| {
            let folded = status.to_lowercase();
            folded != SUCCESS && folded != FAILURE
        })
        .cloned()
        .collect()
}
