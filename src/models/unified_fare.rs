use chrono::NaiveDate;
use serde::Serialize;

/// Where a fare entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FareSource {
    /// Logged by the current employee (work_sessions).
    Own,
    /// Received from another employee (bus_fare_details).
    Shared,
}

impl FareSource {
    pub fn badge(&self) -> &'static str {
        match self {
            FareSource::Own => "",
            FareSource::Shared => "🔁 Shared",
        }
    }
}

/// One fare line, regardless of the table it lives in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedFare {
    pub session_id: String,
    pub source: FareSource,
    /// Row id in bus_fare_details for shared entries.
    pub shared_row_id: Option<i64>,
    pub emp_id: String,
    pub date: NaiveDate,
    pub outbound_cost: f64,
    pub return_cost: f64,
    pub location_code: Option<String>,
    pub location_name: Option<String>,
    pub shared_from_emp: Option<String>,
    pub shared_from_emp_id: Option<String>,
    pub shared_to_emp: Option<String>,
    pub ticket_fare_claimed: bool,
    pub claimed_by: Option<String>,
}

impl UnifiedFare {
    pub fn is_shared(&self) -> bool {
        self.source == FareSource::Shared
    }

    pub fn total_fare(&self) -> f64 {
        self.outbound_cost + self.return_cost
    }

    /// Month bucket used by the fare list ("YYYY-MM").
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
