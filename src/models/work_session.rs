use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSession {
    pub session_id: String,           // ⇔ work_sessions.session_id (client generated)
    pub emp_id: String,               // ⇔ work_sessions.emp_id
    pub location_id: i64,             // ⇔ work_sessions.location_id
    pub date: NaiveDate,              // ⇔ work_sessions.date (TEXT "YYYY-MM-DD")
    pub tap_in: Option<String>,       // ⇔ work_sessions.tap_in ("h:mm AM")
    pub tap_out: Option<String>,      // ⇔ work_sessions.tap_out ("h:mm PM")
    pub hours_worked: Option<f64>,    // derived, NULL until tap_out is known
    pub outbound_cost: f64,
    pub return_cost: f64,
    pub ticket_fare: f64,             // outbound_cost + return_cost
    pub claimed_by: Option<String>,   // emp_id of whoever claimed the fare
    pub timesheet_submitted: bool,
    pub ticket_fare_claimed: bool,
}

impl WorkSession {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn travel_cost(&self) -> f64 {
        self.outbound_cost + self.return_cost
    }
}

/// A session joined with the location it was worked at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedSession {
    pub session: WorkSession,
    pub location_code: String,
    pub location_name: String,
    pub hourly_rate: Option<f64>,
}

impl LocatedSession {
    pub fn effective_rate(&self) -> f64 {
        self.hourly_rate
            .unwrap_or_else(|| super::location::legacy_rate_for(&self.location_name))
    }
}
