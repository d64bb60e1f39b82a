//! The logged-in employee, passed explicitly to every workflow.

use crate::db::log::ttlog;
use crate::db::prefs::{CURRENT_USER_KEY, conversion_rate_key, get_pref, remove_pref, set_pref};
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use crate::ui::messages::warning;
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: i64,
    pub emp_id: String,
    pub username: String,
}

impl From<User> for UserContext {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            emp_id: u.emp_id,
            username: u.username,
        }
    }
}

impl UserContext {
    /// Resolve the `currentUser` marker. `None` when nobody is logged in.
    pub fn current(conn: &Connection) -> AppResult<Option<Self>> {
        let Some(emp_id) = get_pref(conn, CURRENT_USER_KEY)? else {
            return Ok(None);
        };

        match users::find_by_emp_id(conn, &emp_id)? {
            Some(u) => Ok(Some(u.into())),
            None => {
                warning(format!(
                    "Logged-in employee {} no longer exists, clearing the marker.",
                    emp_id
                ));
                remove_pref(conn, CURRENT_USER_KEY)?;
                Ok(None)
            }
        }
    }

    /// Like [`UserContext::current`] but a missing login is an error.
    pub fn require(conn: &Connection) -> AppResult<Self> {
        Self::current(conn)?.ok_or(AppError::NotLoggedIn)
    }

    pub fn register(conn: &Connection, emp_id: &str, username: &str) -> AppResult<Self> {
        let emp_id = emp_id.trim();
        let username = username.trim();
        if emp_id.is_empty() || username.is_empty() {
            return Err(AppError::Other(
                "Employee id and name must not be empty.".into(),
            ));
        }

        let user_id = users::insert_user(conn, emp_id, username)?;
        set_pref(conn, CURRENT_USER_KEY, emp_id)?;
        ttlog(conn, "user", emp_id, &format!("Registered {username}"))?;

        Ok(Self {
            user_id,
            emp_id: emp_id.to_string(),
            username: username.to_string(),
        })
    }

    pub fn login(conn: &Connection, emp_id: &str) -> AppResult<Self> {
        let user = users::find_by_emp_id(conn, emp_id.trim())?
            .ok_or_else(|| AppError::UnknownUser(emp_id.to_string()))?;

        set_pref(conn, CURRENT_USER_KEY, &user.emp_id)?;
        ttlog(conn, "login", &user.emp_id, "Logged in")?;
        Ok(user.into())
    }

    pub fn logout(conn: &Connection) -> AppResult<Option<String>> {
        let previous = get_pref(conn, CURRENT_USER_KEY)?;
        remove_pref(conn, CURRENT_USER_KEY)?;
        if let Some(emp_id) = &previous {
            ttlog(conn, "logout", emp_id, "Logged out")?;
        }
        Ok(previous)
    }

    /// Conversion rate saved for this employee, or `default` when unset.
    pub fn conversion_rate(&self, conn: &Connection, default: f64) -> AppResult<f64> {
        let key = conversion_rate_key(self.user_id);
        match get_pref(conn, &key)? {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => Ok(v),
                _ => {
                    warning(format!("Ignoring invalid stored conversion rate '{raw}'."));
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    pub fn set_conversion_rate(&self, conn: &Connection, raw: &str) -> AppResult<f64> {
        let rate: f64 = raw
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidAmount(raw.to_string()))?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AppError::InvalidAmount(raw.to_string()));
        }

        set_pref(conn, &conversion_rate_key(self.user_id), &rate.to_string())?;
        ttlog(
            conn,
            "settings",
            &self.emp_id,
            &format!("Conversion rate set to {rate}"),
        )?;
        Ok(rate)
    }
}
