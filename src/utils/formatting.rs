//! Formatting utilities used for CLI and report outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Hours as shown on cards and dashboards (`7.50 hrs`).
pub fn hours(h: f64) -> String {
    format!("{:.2} hrs", h)
}

/// Money with the three decimals used by KWD (`1.050`).
pub fn kwd(amount: f64) -> String {
    format!("{:.3} KWD", amount)
}

/// Round to two decimals, the precision of report totals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Turn a display name into a file-name fragment (`Mohd Aslam` → `mohd-aslam`).
pub fn slug(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
