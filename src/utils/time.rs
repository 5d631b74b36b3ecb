//! Date key helpers
//!
//! A date key is the `YYYY-MM-DD` calendar date in the configured time zone.
//! The APOD API rolls over on US Eastern time, so computing the key in the
//! local zone would ask for a day that does not exist yet.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::errors::{AppError, AppResult};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Date key for `instant` as seen in `tz`
pub fn date_key_at(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(DATE_KEY_FORMAT).to_string()
}

/// Date key for the current moment in `tz`
pub fn today_key(tz: Tz) -> String {
    date_key_at(Utc::now(), tz)
}

/// Validate a user supplied date key and return it normalized
pub fn parse_date_key(value: &str) -> AppResult<String> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).map_err(|e| {
        AppError::configuration(format!("Invalid date '{value}', expected YYYY-MM-DD: {e}"))
    })?;
    Ok(date.format(DATE_KEY_FORMAT).to_string())
}
