use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `2025-10-04` → `04-Oct-25`, the header format of report date columns.
pub fn report_column_label(d: NaiveDate) -> String {
    d.format("%d-%b-%y").to_string()
}

/// Three-letter upper-case month (`OCT`).
pub fn month_abbrev_upper(d: NaiveDate) -> String {
    d.format("%b").to_string().to_uppercase()
}
