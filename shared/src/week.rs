//! Day-of-week primitives shared by access rules and schedule events.
//!
//! Weekdays are numbered Monday = 0 through Sunday = 6 everywhere in this
//! workspace: in the stored integer arrays, in recurrence tokens, and in the
//! access matcher.

use chrono::{Datelike, NaiveDateTime};

/// Weekday index of an instant under the Monday = 0 convention.
pub fn weekday_index(at: NaiveDateTime) -> u8 {
    at.weekday().num_days_from_monday() as u8
}

/// Maps a two-letter recurrence token ("MO".."SU") to a weekday index.
pub fn day_from_token(token: &str) -> Option<u8> {
    match token {
        "MO" => Some(0),
        "TU" => Some(1),
        "WE" => Some(2),
        "TH" => Some(3),
        "FR" => Some(4),
        "SA" => Some(5),
        "SU" => Some(6),
        _ => None,
    }
}

/// A set of weekdays stored as a 7-bit mask. Out-of-range day numbers are
/// ignored on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub fn from_days(days: impl IntoIterator<Item = u8>) -> Self {
        let mut mask = 0u8;
        for day in days {
            if day <= 6 {
                mask |= 1 << day;
            }
        }
        Self(mask)
    }

    pub fn contains(self, day: u8) -> bool {
        day <= 6 && self.0 & (1 << day) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Member days in ascending order, for storage as an integer array.
    pub fn days(self) -> Vec<u8> {
        (0..7).filter(|day| self.contains(*day)).collect()
    }
}

/// Day constraint on an access rule. `Unrestricted` is the stored NULL and
/// permits every day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    Unrestricted,
    Days(DaySet),
}

impl DayFilter {
    pub fn permits(self, day: u8) -> bool {
        match self {
            DayFilter::Unrestricted => true,
            DayFilter::Days(set) => set.contains(day),
        }
    }

    /// Builds a filter from a stored `days_of_week` array, where NULL means
    /// unrestricted.
    pub fn from_stored(days: Option<&[i32]>) -> Self {
        match days {
            None => DayFilter::Unrestricted,
            Some(days) => DayFilter::Days(DaySet::from_days(
                days.iter()
                    .filter(|day| (0..=6).contains(*day))
                    .map(|day| *day as u8),
            )),
        }
    }
}
