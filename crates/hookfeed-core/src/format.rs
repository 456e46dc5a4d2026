//! Validation and human-readable rendering of notification records.
//!
//! Everything here is pure: the same record always yields the same text or
//! the same [`Rejection`].

use std::borrow::Cow;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

use crate::events::{Action, DisplayEvent, RawEvent};

/// Rendered in place of the time when a timestamp cannot be parsed.
pub const INVALID_DATE: &str = "Invalid date";

/// Why a record was left out of the feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("missing author")]
    MissingAuthor,
    #[error("missing timestamp")]
    MissingTimestamp,
    #[error("missing action")]
    MissingAction,
    #[error("unsupported action {0:?}")]
    UnsupportedAction(String),
    #[error("missing from_branch")]
    MissingFromBranch,
    #[error("missing to_branch")]
    MissingToBranch,
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Result of formatting one fetched batch.
#[derive(Debug, Default)]
pub struct FormattedBatch {
    /// Accepted events, in source order.
    pub accepted: Vec<DisplayEvent>,
    /// Source index and reason for every rejected record.
    pub rejected: Vec<(usize, Rejection)>,
}

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day) {
        (1, d) if d != 11 => "st",
        (2, d) if d != 12 => "nd",
        (3, d) if d != 13 => "rd",
        _ => "th",
    }
}

/// Parse a notification timestamp as a UTC instant.
///
/// Strings with neither a trailing `Z` nor a `+` offset are read as UTC.
/// Accepted after that: RFC 3339 (`T`, `t` or space separator, optional
/// fractional seconds, `+HH:MM` offset) and `YYYY-MM-DDTHH:MM`. Negative
/// offsets and bare dates do not parse.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let normalized: Cow<'_, str> = if !input.ends_with('Z') && !input.contains('+') {
        Cow::Owned(format!("{input}Z"))
    } else {
        Cow::Borrowed(input)
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Render an instant as `5th March 2024 - 10:00 AM UTC`.
pub fn render_instant(instant: &DateTime<Utc>) -> String {
    let day = instant.day();
    let hour = instant.hour();
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!(
        "{day}{} {} {} - {hour12}:{:02} {meridiem} UTC",
        ordinal_suffix(day),
        instant.format("%B"),
        instant.year(),
        instant.minute(),
    )
}

/// Render a raw timestamp string, or [`INVALID_DATE`] when it does not parse.
pub fn format_timestamp(input: &str) -> String {
    match parse_timestamp(input) {
        Some(instant) => render_instant(&instant),
        None => INVALID_DATE.to_string(),
    }
}

/// Validate a record and build its display text.
pub fn validate(event: &RawEvent) -> Result<String, Rejection> {
    let author = present(&event.author).ok_or(Rejection::MissingAuthor)?;
    let timestamp = present(&event.timestamp).ok_or(Rejection::MissingTimestamp)?;
    let time = format_timestamp(timestamp);

    match &event.action {
        Some(Action::Push) => {
            let to = present(&event.to_branch).ok_or(Rejection::MissingToBranch)?;
            Ok(format!("\"{author}\" pushed to \"{to}\" on {time}"))
        },
        Some(Action::PullRequest) => {
            let (from, to) = branches(event)?;
            Ok(format!(
                "\"{author}\" submitted a pull request from \"{from}\" to \"{to}\" on {time}"
            ))
        },
        Some(Action::Merge) => {
            let (from, to) = branches(event)?;
            Ok(format!(
                "\"{author}\" merged branch \"{from}\" to \"{to}\" on {time}"
            ))
        },
        Some(Action::Unknown(other)) => Err(Rejection::UnsupportedAction(other.clone())),
        None => Err(Rejection::MissingAction),
    }
}

/// Display text for a record, or `None` when it is rejected.
pub fn format_notification(event: &RawEvent) -> Option<String> {
    validate(event).ok()
}

/// Split a fetched batch into accepted display events and rejections.
pub fn format_batch(events: Vec<RawEvent>) -> FormattedBatch {
    collect(events.into_iter().map(DisplayEvent::try_from))
}

/// Like [`format_batch`], for records still in their JSON form. A record
/// that does not decode is rejected as [`Rejection::Malformed`] without
/// affecting the rest of the batch.
pub fn format_records(records: Vec<serde_json::Value>) -> FormattedBatch {
    collect(
        records
            .into_iter()
            .map(|record| RawEvent::try_from(record).and_then(DisplayEvent::try_from)),
    )
}

fn collect(results: impl Iterator<Item = Result<DisplayEvent, Rejection>>) -> FormattedBatch {
    let mut batch = FormattedBatch::default();
    for (index, result) in results.enumerate() {
        match result {
            Ok(event) => batch.accepted.push(event),
            Err(reason) => batch.rejected.push((index, reason)),
        }
    }
    batch
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn branches(event: &RawEvent) -> Result<(&str, &str), Rejection> {
    let from = present(&event.from_branch).ok_or(Rejection::MissingFromBranch)?;
    let to = present(&event.to_branch).ok_or(Rejection::MissingToBranch)?;
    Ok((from, to))
}
