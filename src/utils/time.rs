//! Time utilities: 12-hour display strings, parsing of user input and the
//! 24-hour converter used when a stored tap time has to be compared.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

/// Returned by [`to_24_hour`] when the input cannot be parsed.
/// Callers treat it as "unknown", never as midnight.
pub const UNKNOWN_TIME: &str = "00:00:00";

/// Format a clock time the way sessions store it: `9:05 AM`, `12:40 PM`.
pub fn format_12h(t: NaiveTime) -> String {
    let hours = t.hour();
    let meridiem = if hours >= 12 { "PM" } else { "AM" };
    let display = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, t.minute(), meridiem)
}

/// Parse `h:mm AM/PM` (meridiem is case-insensitive).
pub fn parse_12h(s: &str) -> Option<NaiveTime> {
    let (clock, meridiem) = s.trim().split_once(char::is_whitespace)?;
    let (h, m) = clock.split_once(':')?;

    let mut hours: u32 = h.trim().parse().ok()?;
    let minutes: u32 = m.trim().parse().ok()?;
    if !(1..=12).contains(&hours) {
        return None;
    }

    match meridiem.trim().to_ascii_uppercase().as_str() {
        "PM" if hours < 12 => hours += 12,
        "PM" => {}
        "AM" if hours == 12 => hours = 0,
        "AM" => {}
        _ => return None,
    }

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Parse any clock time accepted on the command line:
/// `h:mm AM/PM`, `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    parse_12h(s)
        .or_else(|| NaiveTime::parse_from_str(s.trim(), "%H:%M").ok())
        .or_else(|| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").ok())
}

/// Convert a stored `h:mm AM/PM` string into `HH:MM:SS`.
/// Malformed input yields [`UNKNOWN_TIME`] instead of an error.
pub fn to_24_hour(time12h: &str) -> String {
    match parse_12h(time12h) {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Normalize optional CLI input into the stored 12-hour form.
pub fn parse_optional_clock(input: Option<&String>) -> AppResult<Option<String>> {
    match input {
        Some(s) => {
            let t = parse_clock(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
            Ok(Some(format_12h(t)))
        }
        None => Ok(None),
    }
}
