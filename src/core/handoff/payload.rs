//! Wire format of the QR payloads (UTF-8 JSON).

use crate::errors::AppResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadUser {
    pub emp_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedSession {
    pub session_id: String,
    pub date: String,
    pub outbound_cost: f64,
    pub return_cost: f64,
    pub total_fare: f64,
    pub location_code: String,
    #[serde(default)]
    pub location_name: String,
}

/// Sender → receiver: the fares being handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareShare {
    pub from_user: PayloadUser,
    pub sessions: Vec<SharedSession>,
}

/// Receiver → sender: proof that the fares were stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareConfirmation {
    pub received_sessions: Vec<String>,
    pub from_user: PayloadUser,
    pub to_user: PayloadUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QrPayload {
    FareShare(FareShare),
    FareConfirmation(FareConfirmation),
    /// Any other `type`; ignored by the receiver.
    #[serde(other)]
    Unknown,
}

impl QrPayload {
    pub fn parse(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw.trim())?)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
