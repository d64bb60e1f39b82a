use serde::Serialize;

/// Hourly rate (KWD) of stores whose name mentions Fahaheel.
pub const FAHAHEEL_RATE: f64 = 0.75;
/// Hourly rate (KWD) of every other store.
pub const STANDARD_RATE: f64 = 0.65;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub location_id: i64,
    pub location_code: String, // ⇔ locations.location_code (cross-device key)
    pub location_name: String,
    pub hourly_rate: Option<f64>, // ⇔ locations.hourly_rate (NULL → legacy rule)
}

impl Location {
    /// Rate actually applied to hours worked at this location.
    pub fn effective_rate(&self) -> f64 {
        self.hourly_rate
            .unwrap_or_else(|| legacy_rate_for(&self.location_name))
    }
}

/// Two-tier rate keyed on the store name, kept as the default for rows
/// created before locations carried their own rate.
pub fn legacy_rate_for(location_name: &str) -> f64 {
    if location_name.to_lowercase().contains("fahaheel") {
        FAHAHEEL_RATE
    } else {
        STANDARD_RATE
    }
}
