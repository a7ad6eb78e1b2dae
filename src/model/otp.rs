use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

///
/// The persisted state of one pending verification, keyed by the normalized
/// email address.
///
/// At most one of these exists per address at any time - a new request
/// overwrites any previous record, so only the most recently issued code is
/// ever valid.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OtpRecord {
    pub email: String,

    /// The bcrypt PHC string for the code. The plaintext code is never stored.
    pub code_phc: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,

    /// Wrong guesses so far. The record is removed once this reaches the limit.
    pub attempts: u32,

    /// Only observable between a successful match and the record's removal.
    pub verified: bool,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_sent_at: DateTime<Utc>,
}
