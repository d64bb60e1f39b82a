//! Two-phase QR hand-off of fares between two devices.
//!
//! ```text
//! Idle ──share──▶ Sending ──close──▶ Receiving
//! Idle ──scan───▶ Receiving
//! Receiving ──fare_share──────────▶ Confirming ──close──▶ Idle
//! Receiving ──fare_confirmation───▶ Idle
//! Receiving ──missing locations───▶ Idle
//! Receiving ──foreign confirmation─▶ Idle
//! any ──cancel──▶ Idle
//! ```

pub mod payload;
pub mod receive;
pub mod share;

use crate::core::context::UserContext;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use payload::{FareConfirmation, QrPayload};
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffState {
    Idle,
    /// A `fare_share` is on screen, waiting for the receiver to scan it.
    Sending { payload: String },
    /// Camera open, waiting for a payload.
    Receiving,
    /// A `fare_confirmation` is on screen for the original sender.
    Confirming { payload: String },
}

impl HandoffState {
    fn name(&self) -> &'static str {
        match self {
            HandoffState::Idle => "idle",
            HandoffState::Sending { .. } => "sending",
            HandoffState::Receiving => "receiving",
            HandoffState::Confirming { .. } => "confirming",
        }
    }
}

/// One-shot guard against handling frames of the same burst twice.
#[derive(Debug, Default)]
pub struct ScanDebounce {
    busy: bool,
}

impl ScanDebounce {
    /// Take the flag. `false` when a payload is already being handled.
    pub fn try_acquire(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn release(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// A `fare_share` was stored; the confirmation must be shown to the sender.
    Received {
        confirmation: FareConfirmation,
        confirmation_json: String,
        inserted: usize,
        already_present: usize,
    },
    /// A `fare_confirmation` marked our sessions as claimed.
    Confirmed { updated: usize, by: String },
    /// The frame was not acted upon.
    Ignored(String),
}

#[derive(Debug)]
pub struct Handoff {
    state: HandoffState,
    debounce: ScanDebounce,
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Handoff {
    pub fn new() -> Self {
        Self {
            state: HandoffState::Idle,
            debounce: ScanDebounce::default(),
        }
    }

    pub fn state(&self) -> &HandoffState {
        &self.state
    }

    pub fn debounce_mut(&mut self) -> &mut ScanDebounce {
        &mut self.debounce
    }

    fn invalid(&self, action: &str) -> AppError {
        AppError::Handoff(format!("cannot {action} while {}", self.state.name()))
    }

    /// Show a `fare_share` payload.
    pub fn start_share(&mut self, payload: String) -> AppResult<()> {
        match self.state {
            HandoffState::Idle => {
                self.state = HandoffState::Sending { payload };
                Ok(())
            }
            _ => Err(self.invalid("share")),
        }
    }

    /// Open the scanner without sharing first.
    pub fn start_receive(&mut self) -> AppResult<()> {
        match self.state {
            HandoffState::Idle | HandoffState::Receiving => {
                self.state = HandoffState::Receiving;
                self.debounce.release();
                Ok(())
            }
            _ => Err(self.invalid("start scanning")),
        }
    }

    /// Dismiss the displayed QR. A sender then waits for the confirmation.
    pub fn close(&mut self) {
        self.state = match self.state {
            HandoffState::Sending { .. } => HandoffState::Receiving,
            _ => HandoffState::Idle,
        };
        self.debounce.release();
    }

    pub fn cancel(&mut self) {
        self.state = HandoffState::Idle;
        self.debounce.release();
    }

    /// Handle one scanned frame.
    ///
    /// The debounce flag is released once the frame is handled, whatever
    /// the result. Malformed payloads are logged and keep the scanner open.
    pub fn on_frame(
        &mut self,
        conn: &mut Connection,
        me: &UserContext,
        raw: &str,
    ) -> AppResult<ScanOutcome> {
        if self.state != HandoffState::Receiving {
            return Ok(ScanOutcome::Ignored(format!(
                "not scanning ({})",
                self.state.name()
            )));
        }
        if !self.debounce.try_acquire() {
            return Ok(ScanOutcome::Ignored("frame already being handled".into()));
        }

        let result = self.dispatch(conn, me, raw);
        self.debounce.release();

        if let Err(e) = &result {
            ttlog_quiet(conn, "scan_error", &me.emp_id, &e.to_string());
        }
        result
    }

    fn dispatch(
        &mut self,
        conn: &mut Connection,
        me: &UserContext,
        raw: &str,
    ) -> AppResult<ScanOutcome> {
        let payload = QrPayload::parse(raw)?;

        match payload {
            QrPayload::FareShare(share) => match receive::ingest_share(conn, me, &share) {
                Ok(ingested) => {
                    let json = QrPayload::FareConfirmation(ingested.confirmation.clone())
                        .to_json()?;
                    self.state = HandoffState::Confirming {
                        payload: json.clone(),
                    };
                    Ok(ScanOutcome::Received {
                        confirmation: ingested.confirmation,
                        confirmation_json: json,
                        inserted: ingested.inserted,
                        already_present: ingested.already_present,
                    })
                }
                Err(e @ AppError::MissingLocations(_)) => {
                    self.state = HandoffState::Idle;
                    Err(e)
                }
                Err(e) => Err(e),
            },
            QrPayload::FareConfirmation(confirmation) => {
                let updated = match receive::apply_confirmation(conn, me, &confirmation) {
                    Ok(n) => n,
                    Err(e @ AppError::Handoff(_)) => {
                        self.state = HandoffState::Idle;
                        return Err(e);
                    }
                    Err(e) => return Err(e),
                };
                self.state = HandoffState::Idle;
                Ok(ScanOutcome::Confirmed {
                    updated,
                    by: confirmation.to_user.username,
                })
            }
            QrPayload::Unknown => Ok(ScanOutcome::Ignored("unknown payload type".into())),
        }
    }
}
