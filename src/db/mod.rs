pub mod bus_fares;
pub mod initialize;
pub mod locations;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod prefs;
pub mod sessions;
pub mod stats;
pub mod users;

use crate::errors::AppError;
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` column, reporting failures the way rusqlite expects
/// from row mappers.
pub(crate) fn date_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.to_string())),
        )
    })
}
