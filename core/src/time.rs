//! Time related utils.

use std::time::Duration;

use chrono::Utc;

use crate::Error;
use crate::Result;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse http date like `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT")
        .map_err(|e| Error::unexpected("parse http date failed").with_source(e))?;
    Ok(t.and_utc())
}

/// Add a std duration to the given time.
pub fn add_duration(t: DateTime, d: Duration) -> Result<DateTime> {
    let delta = chrono::TimeDelta::from_std(d)
        .map_err(|e| Error::request_invalid(format!("invalid duration: {d:?}")).with_source(e))?;
    t.checked_add_signed(delta)
        .ok_or_else(|| Error::request_invalid(format!("time overflow while adding {d:?}")))
}
