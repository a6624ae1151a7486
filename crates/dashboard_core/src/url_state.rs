//! Query-string projection of applied filters and the date range.
//!
//! Each filter category is one parameter whose values are comma-joined; the
//! date range uses `start_date` and `end_date`. Commas and `%` inside a value
//! are escaped before joining so any non-empty value survives a round trip.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use url::form_urlencoded;

use crate::AppliedFilters;

pub const START_DATE_PARAM: &str = "start_date";
pub const END_DATE_PARAM: &str = "end_date";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    Invalid { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("invalid {param}: {source}")]
    Date {
        param: &'static str,
        #[source]
        source: DateError,
    },
}

/// Normalizes a date to `YYYY-MM-DD`.
///
/// Accepts unpadded `Y-M-D` (optionally followed by a time part) and RFC 3339
/// timestamps. Anything else is rejected with the offending input.
pub fn format_date(input: &str) -> Result<String, DateError> {
    let invalid = || DateError::Invalid {
        input: input.to_string(),
    };
    let trimmed = input.trim();

    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        dt.date_naive()
    } else {
        let day_part = trimmed
            .split(['T', ' '])
            .next()
            .filter(|part| !part.is_empty())
            .ok_or_else(invalid)?;
        parse_ymd(day_part).ok_or_else(invalid)?
    };

    Ok(date.format("%Y-%m-%d").to_string())
}

fn parse_ymd(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(year) && all_digits(month) && all_digits(day)) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// How a location write affects browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Replace the current entry; no new history item.
    Replace,
    /// Add a history entry, as when following a link.
    Push,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlState {
    pub applied: AppliedFilters,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub fn serialize(
    applied: &AppliedFilters,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<String, UrlError> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (category, values) in applied.iter() {
        let joined = values
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| escape_value(v))
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            serializer.append_pair(category, &joined);
        }
    }
    for (param, date) in [(START_DATE_PARAM, start_date), (END_DATE_PARAM, end_date)] {
        if let Some(date) = date.filter(|d| !d.trim().is_empty()) {
            let formatted =
                format_date(date).map_err(|source| UrlError::Date { param, source })?;
            serializer.append_pair(param, &formatted);
        }
    }
    Ok(serializer.finish())
}

pub fn parse(query: &str) -> Result<UrlState, UrlError> {
    let query = query.trim().trim_start_matches('?');
    let mut state = UrlState {
        applied: parse_filters(query),
        ..UrlState::default()
    };

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        let (param, slot) = match &*key {
            START_DATE_PARAM => (START_DATE_PARAM, &mut state.start_date),
            END_DATE_PARAM => (END_DATE_PARAM, &mut state.end_date),
            _ => continue,
        };
        *slot = Some(format_date(&value).map_err(|source| UrlError::Date { param, source })?);
    }

    Ok(state)
}

/// Filter categories of a query string, ignoring the date parameters.
pub fn parse_filters(query: &str) -> AppliedFilters {
    let query = query.trim().trim_start_matches('?');
    let mut filters: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() || key == START_DATE_PARAM || key == END_DATE_PARAM {
            continue;
        }
        filters
            .entry(key.into_owned())
            .or_default()
            .extend(value.split(',').map(unescape_value));
    }
    AppliedFilters::from(filters)
}

fn escape_value(value: &str) -> String {
    value.replace('%', "%25").replace(',', "%2C")
}

fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("%2C") || tail.starts_with("%2c") {
            out.push(',');
            rest = &tail[3..];
        } else if tail.starts_with("%25") {
            out.push('%');
            rest = &tail[3..];
        } else {
            out.push('%');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
