//! Two-digit confirmation gate in front of the "claimed"/"submitted" flags.
//!
//! The correct code is embedded in the exported file name; the user has to
//! pick it among two decoys. This is a manual cross-check that stands in for
//! a second signer. It offers no cryptographic protection.

use crate::db::bus_fares::mark_shared_fare_claimed;
use crate::db::log::{ttlog, ttlog_quiet};
use crate::db::sessions::{mark_fare_claimed, mark_timesheet_submitted};
use crate::errors::{AppError, AppResult};
use rand::Rng;
use rand::seq::SliceRandom;
use rusqlite::Connection;

const CODE_MIN: u8 = 10;
const CODE_MAX: u8 = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    code: u8,
    options: [u8; 3],
}

impl Challenge {
    /// One correct code and two distinct decoys, shuffled.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = rng.gen_range(CODE_MIN..=CODE_MAX);

        let mut options = vec![code];
        while options.len() < 3 {
            let candidate = rng.gen_range(CODE_MIN..=CODE_MAX);
            if !options.contains(&candidate) {
                options.push(candidate);
            }
        }
        options.shuffle(rng);

        Self {
            code,
            options: [options[0], options[1], options[2]],
        }
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// Choices in display order.
    pub fn options(&self) -> [u8; 3] {
        self.options
    }

    pub fn is_correct(&self, choice: u8) -> bool {
        choice == self.code
    }

    /// Map a 1-based menu position onto the code shown at that position.
    pub fn option_at(&self, position: usize) -> Option<u8> {
        position
            .checked_sub(1)
            .and_then(|i| self.options.get(i).copied())
    }
}

/// Flag update guarded by the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GatedMutation {
    MarkFareClaimed {
        own_sessions: Vec<String>,
        /// `(session_id, receiver emp_id)` of received fares.
        shared_sessions: Vec<(String, String)>,
        claimed_by: String,
    },
    MarkTimesheetSubmitted {
        sessions: Vec<String>,
    },
}

impl GatedMutation {
    pub fn len(&self) -> usize {
        match self {
            GatedMutation::MarkFareClaimed {
                own_sessions,
                shared_sessions,
                ..
            } => own_sessions.len() + shared_sessions.len(),
            GatedMutation::MarkTimesheetSubmitted { sessions } => sessions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn operation(&self) -> &'static str {
        match self {
            GatedMutation::MarkFareClaimed { .. } => "fare_claimed",
            GatedMutation::MarkTimesheetSubmitted { .. } => "timesheet_submitted",
        }
    }

    fn apply_all(&self, conn: &Connection) -> AppResult<()> {
        match self {
            GatedMutation::MarkFareClaimed {
                own_sessions,
                shared_sessions,
                claimed_by,
            } => {
                for id in own_sessions {
                    mark_fare_claimed(conn, id, claimed_by)?;
                }
                for (id, receiver) in shared_sessions {
                    mark_shared_fare_claimed(conn, id, receiver)?;
                }
            }
            GatedMutation::MarkTimesheetSubmitted { sessions } => {
                for id in sessions {
                    mark_timesheet_submitted(conn, id)?;
                }
            }
        }
        Ok(())
    }
}

/// Apply `mutation` if `choice` is the challenge code.
///
/// All rows are updated in one transaction. A wrong choice changes nothing
/// and yields [`AppError::VerificationMismatch`]. A store failure rolls the
/// whole batch back, is logged with its cause, and surfaces as one generic
/// error.
pub fn apply_gated(
    conn: &mut Connection,
    challenge: &Challenge,
    choice: u8,
    mutation: &GatedMutation,
) -> AppResult<usize> {
    if !challenge.is_correct(choice) {
        ttlog_quiet(
            conn,
            "gate_cancel",
            mutation.operation(),
            &format!("Wrong code {choice}, {} rows untouched", mutation.len()),
        );
        return Err(AppError::VerificationMismatch);
    }

    let result = (|| -> AppResult<()> {
        let tx = conn.transaction()?;
        mutation.apply_all(&tx)?;
        tx.commit()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            ttlog(
                conn,
                "gate_apply",
                mutation.operation(),
                &format!("{} rows updated", mutation.len()),
            )?;
            Ok(mutation.len())
        }
        Err(e) => {
            ttlog_quiet(
                conn,
                "gate_failed",
                mutation.operation(),
                &format!("Batch rolled back: {e}"),
            );
            Err(AppError::Other(
                "Could not update the selected records. Nothing was changed.".into(),
            ))
        }
    }
}
