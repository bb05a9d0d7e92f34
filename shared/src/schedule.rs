//! Normalization of externally parsed calendar events into the weekly
//! recurrence shape stored with a user's schedule.
//!
//! Raw events arrive from the calendar parser with concrete first-occurrence
//! timestamps, two-letter recurrence day tokens, and an optional recurrence
//! end bound. Normalization reduces them to a time-of-day interval, a day
//! set, and a validity date range.

use crate::week::{DaySet, day_from_token};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

/// One event as produced by the external calendar parser.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScheduleEvent {
    pub name: String,
    /// Free-text room location, e.g. "Winston Chung Hall Room: 1010".
    pub location: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    /// Recurrence day tokens ("MO".."SU"); unrecognized tokens are ignored.
    #[serde(default)]
    pub days: Vec<String>,
    /// Recurrence end bound, if the event recurs until a date.
    pub until: Option<NaiveDateTime>,
}

/// The canonical weekly-recurrence form of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedScheduleEvent {
    pub name: String,
    pub location: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// `None` when the raw event carried no recognized day tokens. That is
    /// "no explicit days", not "all days": such an event is interpreted by
    /// its validity dates alone, and consumers must not conflate this with
    /// an access rule's unrestricted day filter.
    pub days: Option<DaySet>,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
}

pub fn normalize_event(event: RawScheduleEvent) -> NormalizedScheduleEvent {
    let days = DaySet::from_days(event.days.iter().filter_map(|token| day_from_token(token)));
    NormalizedScheduleEvent {
        name: event.name,
        location: event.location,
        start_time: event.starts_at.time(),
        end_time: event.ends_at.time(),
        days: (!days.is_empty()).then_some(days),
        valid_from: event.starts_at.date(),
        valid_until: event.until.map(|until| until.date()),
    }
}

pub fn normalize_events(events: Vec<RawScheduleEvent>) -> Vec<NormalizedScheduleEvent> {
    events.into_iter().map(normalize_event).collect()
}

/// Extracts the building name from a `"{Building Name} Room: {number}"`
/// location string. Returns `None` when the string does not follow the
/// convention; callers keep the event and leave the building unresolved.
pub fn extract_building_name(location: &str) -> Option<&str> {
    location
        .split_once(" Room: ")
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
}
