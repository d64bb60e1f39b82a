use chrono::NaiveDate;
use serde::Serialize;

/// Fare record received from another employee through the QR hand-off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusFareDetail {
    pub id: i64,
    pub session_id: String,         // sender's original session id
    pub emp_id: String,             // owner on this device (the receiver)
    pub date: NaiveDate,
    pub outbound_cost: f64,
    pub return_cost: f64,
    pub shared_from_emp: String,    // sender display name (resolved through users)
    pub shared_to_emp: String,      // receiver display name / emp_id
    pub shared_from_emp_id: String, // sender identity
    pub location_code: String,      // denormalized, resolved locally
    pub location_name: Option<String>,
    pub ticket_fare_claimed: bool,
}
