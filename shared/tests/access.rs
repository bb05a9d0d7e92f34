use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::access::{AccessRule, TimeWindow, accessible_lot_ids};
use shared::week::{DayFilter, DaySet};
use uuid::Uuid;

// 2024-01-01 was a Monday; offsets from it give every weekday.
fn instant(day_offset: u64, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(chrono::Days::new(day_offset))
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn rule(days: DayFilter, start: Option<NaiveTime>, end: Option<NaiveTime>) -> AccessRule {
    AccessRule {
        days,
        window: TimeWindow { start, end },
    }
}

#[test]
fn fully_unrestricted_rule_matches_every_instant() {
    let rule = rule(DayFilter::Unrestricted, None, None);
    for day in 0..7 {
        assert!(rule.matches(instant(day, 0, 0)));
        assert!(rule.matches(instant(day, 12, 30)));
        assert!(rule.matches(instant(day, 23, 59)));
    }
}

#[test]
fn weekend_rule_matches_saturday_and_rejects_tuesday() {
    let weekend = rule(DayFilter::Days(DaySet::from_days([5, 6])), None, None);
    assert!(weekend.matches(instant(5, 12, 0)), "Saturday noon");
    assert!(!weekend.matches(instant(1, 12, 0)), "Tuesday noon");
}

#[test]
fn evening_rule_is_inclusive_at_both_bounds() {
    let weekday_evenings = rule(
        DayFilter::Days(DaySet::from_days([0, 1, 2, 3, 4])),
        Some(time(18, 0)),
        Some(time(23, 59)),
    );
    assert!(!weekday_evenings.matches(instant(0, 17, 59)), "Monday 17:59");
    assert!(weekday_evenings.matches(instant(0, 18, 0)), "Monday 18:00");
    assert!(weekday_evenings.matches(instant(0, 23, 59)), "Monday 23:59");
    assert!(!weekday_evenings.matches(instant(5, 19, 0)), "Saturday");
}

#[test]
fn open_ended_bounds_are_unrestricted_on_that_side() {
    let after_six = rule(DayFilter::Unrestricted, Some(time(18, 0)), None);
    assert!(after_six.matches(instant(2, 23, 59)));
    assert!(!after_six.matches(instant(2, 17, 0)));

    let until_nine = rule(DayFilter::Unrestricted, None, Some(time(9, 0)));
    assert!(until_nine.matches(instant(2, 0, 0)));
    assert!(!until_nine.matches(instant(2, 9, 1)));
}

#[test]
fn inverted_window_matches_nothing() {
    // 22:00-02:00 does not wrap past midnight; no clock value satisfies it.
    let overnight = rule(DayFilter::Unrestricted, Some(time(22, 0)), Some(time(2, 0)));
    for hour in 0..24 {
        assert!(!overnight.matches(instant(3, hour, 0)));
    }
}

#[test]
fn any_matching_rule_grants_access() {
    let lot = Uuid::now_v7();
    let rules = vec![
        (
            lot,
            rule(
                DayFilter::Days(DaySet::from_days([0, 1, 2, 3, 4])),
                Some(time(18, 0)),
                Some(time(23, 59)),
            ),
        ),
        (lot, rule(DayFilter::Days(DaySet::from_days([5, 6])), None, None)),
    ];

    // Saturday morning: only the weekend rule matches, which is enough.
    assert!(accessible_lot_ids(&rules, instant(5, 9, 0)).contains(&lot));
    // Wednesday noon: neither window matches.
    assert!(!accessible_lot_ids(&rules, instant(2, 12, 0)).contains(&lot));
}

#[test]
fn lots_without_rules_are_denied_by_default() {
    let ruled = Uuid::now_v7();
    let unruled = Uuid::now_v7();
    let rules = vec![(ruled, rule(DayFilter::Unrestricted, None, None))];

    let accessible = accessible_lot_ids(&rules, instant(0, 12, 0));
    assert!(accessible.contains(&ruled));
    assert!(!accessible.contains(&unruled));
}
