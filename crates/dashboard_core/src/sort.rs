use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{ColumnKind, FieldValue, ResultItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Returns `view` ordered by `column`; ties keep their input order.
pub fn sort<'a>(
    view: &[&'a ResultItem],
    column: &str,
    kind: ColumnKind,
    direction: SortDirection,
) -> Vec<&'a ResultItem> {
    let mut sorted = view.to_vec();
    // `sort_by` is a stable merge sort.
    sorted.sort_by(|a, b| compare_items(a, b, column, kind, direction));
    sorted
}

/// Stable in-place ordering of dataset indices.
pub(crate) fn sort_indices(
    dataset: &[ResultItem],
    indices: &mut [usize],
    column: &str,
    kind: ColumnKind,
    direction: SortDirection,
) {
    indices.sort_by(|&a, &b| compare_items(&dataset[a], &dataset[b], column, kind, direction));
}

fn compare_items(
    a: &ResultItem,
    b: &ResultItem,
    column: &str,
    kind: ColumnKind,
    direction: SortDirection,
) -> Ordering {
    let ordering = compare_values(a.get(column), b.get(column), kind);
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Number => compare_present(
            a.and_then(FieldValue::as_number),
            b.and_then(FieldValue::as_number),
            f64::total_cmp,
        ),
        ColumnKind::Date => compare_present(
            a.and_then(parse_instant),
            b.and_then(parse_instant),
            |x, y| x.cmp(y),
        ),
        ColumnKind::Text => compare_present(
            a.map(ToString::to_string),
            b.map(ToString::to_string),
            |x, y| compare_text(x, y),
        ),
        ColumnKind::Status => compare_present(
            a.map(|v| status_label(&v.to_string())),
            b.map(|v| status_label(&v.to_string())),
            |x, y| compare_text(x, y),
        ),
    }
}

/// Readable values first, then unreadable ones.
fn compare_present<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn parse_instant(value: &FieldValue) -> Option<NaiveDateTime> {
    let raw = value.as_text()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Human-readable label for a raw status value, e.g. `upstream_failed` ->
/// `Upstream Failed`.
pub fn status_label(raw: &str) -> String {
    raw.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
