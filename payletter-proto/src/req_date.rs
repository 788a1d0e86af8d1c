//! Request timestamps for signed gateway requests.
//!
//! Signed easy-pay requests include a `req_date` in `yyyyMMddHHmmss` form.
//! The gateway validates it against Korean Standard Time, so [`ReqDate::now`]
//! renders the current instant at UTC+9 regardless of the host time zone.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// `strftime` pattern of the gateway's request timestamp.
pub const REQ_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// A `yyyyMMddHHmmss` request timestamp.
///
/// Serialized as a plain string. Values supplied by the caller are passed
/// through verbatim; the gateway is the authority on whether they are valid.
///
/// ```json
/// "20240101120000"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReqDate(String);

impl ReqDate {
    /// Returns the current time in KST as a [`ReqDate`].
    #[must_use]
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Renders a UTC instant in KST.
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let kst = FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        Self(instant.with_timezone(&kst).format(REQ_DATE_FORMAT).to_string())
    }

    /// Returns the timestamp string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReqDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReqDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ReqDate {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
