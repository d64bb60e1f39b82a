//! File names of exported reports. The trailing two digits are the
//! verification code the user has to pick afterwards.

use crate::core::period::PayPeriod;
use crate::export::ReportKind;
use crate::utils::date::month_abbrev_upper;
use crate::utils::formatting::slug;

/// `aslam-anas-fare-OCT-2025_42.xlsx`
pub fn fare_file_name(names: &[String], period: &PayPeriod, code: u8) -> String {
    let mut unique: Vec<String> = Vec::new();
    for n in names {
        let s = slug(n);
        if !s.is_empty() && !unique.contains(&s) {
            unique.push(s);
        }
    }
    let who = if unique.is_empty() {
        "unknown".to_string()
    } else {
        unique.join("-")
    };

    format!(
        "{}-{}-{}-{}_{:02}.xlsx",
        who,
        ReportKind::Fare.as_str(),
        month_abbrev_upper(period.end),
        period.title_year(),
        code
    )
}

/// `mohd-aslam-timesheet-farwaniya-november-2025_17.xlsx`
pub fn timesheet_file_name(username: &str, group: &str, period: &PayPeriod, code: u8) -> String {
    format!(
        "{}-{}-{}-{}-{}_{:02}.xlsx",
        slug(username),
        ReportKind::Timesheet.as_str(),
        slug(group),
        period.title_month().to_lowercase(),
        period.title_year(),
        code
    )
}

/// Two-digit code embedded at the end of a generated file name.
pub fn code_from_file_name(file_name: &str) -> Option<u8> {
    let stem = file_name.strip_suffix(".xlsx")?;
    let (_, code) = stem.rsplit_once('_')?;
    if code.len() != 2 {
        return None;
    }
    code.parse().ok()
}
