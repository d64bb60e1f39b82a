use crate::core::context::UserContext;
use crate::db::bus_fares::{delete_shared_fare, find_shared_fare};
use crate::db::log::ttlog;
use crate::db::sessions::{delete_session, load_session};
use crate::errors::{AppError, AppResult};
use crate::models::bus_fare::BusFareDetail;
use crate::models::work_session::WorkSession;
use rusqlite::Connection;

pub struct DeleteLogic;

impl DeleteLogic {
    /// Received fare owned by `user`, for the confirmation prompt.
    pub fn find_shared(
        conn: &Connection,
        user: &UserContext,
        id: i64,
    ) -> AppResult<BusFareDetail> {
        find_shared_fare(conn, id)?
            .filter(|f| f.emp_id == user.emp_id)
            .ok_or_else(|| AppError::UnknownSession(format!("shared fare #{id}")))
    }

    pub fn find_session(
        conn: &Connection,
        user: &UserContext,
        session_id: &str,
    ) -> AppResult<WorkSession> {
        load_session(conn, session_id)?
            .filter(|s| s.emp_id == user.emp_id)
            .ok_or_else(|| AppError::UnknownSession(session_id.to_string()))
    }

    /// Remove a received fare. The sender's own record is not touched.
    pub fn delete_shared(conn: &Connection, fare: &BusFareDetail) -> AppResult<()> {
        delete_shared_fare(conn, fare.id)?;
        ttlog(
            conn,
            "del",
            &fare.session_id,
            &format!("Deleted fare received from {}", fare.shared_from_emp),
        )?;
        Ok(())
    }

    pub fn delete_session(conn: &Connection, session: &WorkSession) -> AppResult<()> {
        delete_session(conn, &session.session_id)?;
        ttlog(
            conn,
            "del",
            &session.session_id,
            &format!("Deleted session of {}", session.date_str()),
        )?;
        Ok(())
    }
}
