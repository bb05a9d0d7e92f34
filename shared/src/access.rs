//! Permit access evaluation over per-lot rule rows.

use crate::week::{DayFilter, weekday_index};
use chrono::{NaiveDateTime, NaiveTime};
use std::collections::HashSet;
use uuid::Uuid;

/// Time-of-day window with inclusive bounds. A `None` bound is unrestricted
/// on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl TimeWindow {
    /// A window whose start is after its end matches nothing; windows do not
    /// wrap past midnight.
    pub fn contains(self, clock: NaiveTime) -> bool {
        self.start.is_none_or(|start| clock >= start) && self.end.is_none_or(|end| clock <= end)
    }
}

/// One access rule for a (lot, permit) pair. Several rules per pair express
/// disjoint windows, e.g. weekday evenings plus weekends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    pub days: DayFilter,
    pub window: TimeWindow,
}

impl AccessRule {
    /// True if the rule grants access at the given instant.
    pub fn matches(&self, at: NaiveDateTime) -> bool {
        self.days.permits(weekday_index(at)) && self.window.contains(at.time())
    }
}

/// Lots accessible at `at`, given every rule stored for one permit.
///
/// A lot is included if any of its rules matches. A lot with no rules for
/// the permit is absent from the result: default deny.
pub fn accessible_lot_ids(rules: &[(Uuid, AccessRule)], at: NaiveDateTime) -> HashSet<Uuid> {
    rules
        .iter()
        .filter(|(_, rule)| rule.matches(at))
        .map(|(lot_id, _)| *lot_id)
        .collect()
}
