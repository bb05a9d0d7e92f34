use chrono::NaiveDate;
use shared::week::{DayFilter, DaySet, day_from_token, weekday_index};

fn noon(year: i32, month: u32, day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn weekdays_are_numbered_from_monday() {
    // 2024-01-01 was a Monday.
    assert_eq!(weekday_index(noon(2024, 1, 1)), 0);
    assert_eq!(weekday_index(noon(2024, 1, 2)), 1);
    assert_eq!(weekday_index(noon(2024, 1, 6)), 5);
    assert_eq!(weekday_index(noon(2024, 1, 7)), 6);
}

#[test]
fn recurrence_tokens_map_to_day_indices() {
    assert_eq!(day_from_token("MO"), Some(0));
    assert_eq!(day_from_token("TH"), Some(3));
    assert_eq!(day_from_token("SU"), Some(6));
    assert_eq!(day_from_token("XX"), None);
    assert_eq!(day_from_token("mo"), None);
}

#[test]
fn day_sets_track_membership() {
    let weekend = DaySet::from_days([5, 6]);
    assert!(weekend.contains(5));
    assert!(weekend.contains(6));
    assert!(!weekend.contains(0));
    assert_eq!(weekend.days(), vec![5, 6]);
}

#[test]
fn day_sets_ignore_out_of_range_days() {
    let set = DaySet::from_days([2, 9, 200]);
    assert_eq!(set.days(), vec![2]);
}

#[test]
fn empty_day_set_is_empty() {
    assert!(DaySet::from_days([]).is_empty());
    assert!(!DaySet::from_days([0]).is_empty());
}

#[test]
fn unrestricted_filter_permits_every_day() {
    for day in 0..7 {
        assert!(DayFilter::Unrestricted.permits(day));
    }
}

#[test]
fn day_filter_from_stored_null_is_unrestricted() {
    assert_eq!(DayFilter::from_stored(None), DayFilter::Unrestricted);
    assert_eq!(
        DayFilter::from_stored(Some(&[0, 1, 2])),
        DayFilter::Days(DaySet::from_days([0, 1, 2]))
    );
}
