use chrono::NaiveTime;
use faresheet::core::calculator::hours::{calculate_hours_worked, round_worked_minutes};
use faresheet::core::calculator::suggest::suggest_tap_out_times;
use faresheet::core::period::PayPeriod;
use faresheet::utils::time::{UNKNOWN_TIME, format_12h, parse_12h, parse_clock, to_24_hour};

mod common;
use common::day;

#[test]
fn test_hours_rounding_grid() {
    let d = day("2025-10-26");
    let h = |i: &str, o: &str| calculate_hours_worked(Some(i), Some(o), d);

    assert_eq!(h("9:00 AM", "12:00 PM"), 3.0);
    assert_eq!(h("9:00 AM", "12:15 PM"), 3.0);
    assert_eq!(h("9:00 AM", "12:16 PM"), 3.5);
    assert_eq!(h("9:00 AM", "12:20 PM"), 3.5);
    assert_eq!(h("9:00 AM", "12:45 PM"), 3.5);
    assert_eq!(h("9:00 AM", "12:46 PM"), 4.0);
    assert_eq!(h("9:00 AM", "12:50 PM"), 4.0);
}

#[test]
fn test_overnight_shift_rolls_to_next_day() {
    let d = day("2025-10-26");
    assert_eq!(calculate_hours_worked(Some("10:00 PM"), Some("2:00 AM"), d), 4.0);
    assert_eq!(calculate_hours_worked(Some("22:00"), Some("02:00"), d), 4.0);
}

#[test]
fn test_missing_or_bad_taps_give_zero() {
    let d = day("2025-10-26");
    assert_eq!(calculate_hours_worked(None, Some("5:00 PM"), d), 0.0);
    assert_eq!(calculate_hours_worked(Some("9:00 AM"), None, d), 0.0);
    assert_eq!(calculate_hours_worked(Some("nine"), Some("5:00 PM"), d), 0.0);
    assert_eq!(round_worked_minutes(0), 0.0);
    assert_eq!(round_worked_minutes(-30), 0.0);
}

#[test]
fn test_suggestions_morning_tap_in() {
    let t = day("2025-10-26").and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    let s = suggest_tap_out_times(t);

    let hours: Vec<f64> = s.iter().map(|x| x.hours_worked).collect();
    assert_eq!(hours, vec![11.0, 11.5, 12.0, 12.5, 13.0]);

    // 9:00 + 11h - 14 min
    assert_eq!(format_12h(s[0].time.time()), "7:46 PM");
    for x in &s {
        let worked = (x.time - t).num_minutes();
        assert_eq!(round_worked_minutes(worked), x.hours_worked);
    }
}

#[test]
fn test_suggestions_afternoon_tap_in_stop_before_midnight() {
    let t = day("2025-10-26").and_time(NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    let hours: Vec<f64> = suggest_tap_out_times(t)
        .iter()
        .map(|x| x.hours_worked)
        .collect();
    assert_eq!(hours, vec![8.0, 8.5, 9.0, 9.5, 10.0]);
}

#[test]
fn test_12h_clock_helpers() {
    assert_eq!(to_24_hour("9:05 PM"), "21:05:00");
    assert_eq!(to_24_hour("12:10 AM"), "00:10:00");
    assert_eq!(to_24_hour("12:10 pm"), "12:10:00");
    assert_eq!(to_24_hour("25:00 XM"), UNKNOWN_TIME);

    assert_eq!(parse_12h("13:00 PM"), None);
    assert_eq!(
        parse_clock("17:30"),
        NaiveTime::from_hms_opt(17, 30, 0)
    );
    assert_eq!(format_12h(NaiveTime::from_hms_opt(0, 30, 0).unwrap()), "12:30 AM");
    assert_eq!(format_12h(NaiveTime::from_hms_opt(12, 5, 0).unwrap()), "12:05 PM");
}

#[test]
fn test_pay_period_boundaries() {
    let p = PayPeriod::containing(day("2025-10-25"));
    assert_eq!((p.start, p.end), (day("2025-10-25"), day("2025-11-24")));

    let p = PayPeriod::containing(day("2025-10-24"));
    assert_eq!((p.start, p.end), (day("2025-09-25"), day("2025-10-24")));

    let p = PayPeriod::containing(day("2025-01-05"));
    assert_eq!((p.start, p.end), (day("2024-12-25"), day("2025-01-24")));

    let p = PayPeriod::containing(day("2025-03-01"));
    assert_eq!((p.start, p.end), (day("2025-02-25"), day("2025-03-24")));
    assert!(p.contains(day("2025-02-25")));
    assert!(p.contains(day("2025-03-24")));
    assert!(!p.contains(day("2025-03-25")));
}

#[test]
fn test_pay_period_navigation() {
    let p = PayPeriod::containing(day("2025-11-10"));
    assert_eq!(p.previous().start, day("2025-09-25"));
    assert_eq!(p.next().start, day("2025-11-25"));
    assert_eq!(p.offset(-2).start, day("2025-08-25"));
    assert_eq!(p.offset(0), p);
    assert_eq!(p.offset(3).end, day("2026-02-24"));

    assert_eq!(p.title_month(), "NOVEMBER");
    assert_eq!(p.title_year(), 2025);
}
