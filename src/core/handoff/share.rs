use super::payload::{FareShare, PayloadUser, SharedSession};
use crate::core::context::UserContext;
use crate::errors::{AppError, AppResult};
use crate::models::unified_fare::UnifiedFare;

/// A `fare_share` ready to be rendered, plus how many selected entries
/// were left out because they were themselves received from someone else.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltShare {
    pub payload: FareShare,
    pub skipped: usize,
}

/// Build the sender side payload from the selected fares.
pub fn build_share(user: &UserContext, selected: &[UnifiedFare]) -> AppResult<BuiltShare> {
    let (shared, own): (Vec<&UnifiedFare>, Vec<&UnifiedFare>) =
        selected.iter().partition(|f| f.is_shared());

    if own.is_empty() {
        return Err(AppError::EmptySelection(
            "no selectable fares to share (selected items are shared receipts)".into(),
        ));
    }

    let sessions = own
        .into_iter()
        .map(|f| SharedSession {
            session_id: f.session_id.clone(),
            date: f.date.format("%Y-%m-%d").to_string(),
            outbound_cost: f.outbound_cost,
            return_cost: f.return_cost,
            total_fare: f.total_fare(),
            location_code: f.location_code.clone().unwrap_or_default(),
            location_name: f.location_name.clone().unwrap_or_default(),
        })
        .collect();

    Ok(BuiltShare {
        payload: FareShare {
            from_user: PayloadUser {
                emp_id: user.emp_id.clone(),
                username: user.username.clone(),
            },
            sessions,
        },
        skipped: shared.len(),
    })
}
