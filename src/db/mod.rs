pub mod memory;
pub mod mongo;
pub mod otp;
pub mod user;

use async_trait::async_trait;
use crate::model::otp::OtpRecord;
use crate::model::user::User;
use crate::utils::errors::DoormanError;

pub mod prelude {
    // Collection names.
    pub const OTP_CODES: &str = "OtpCodes";
    pub const USERS:     &str = "Users";

    // Field names.
    pub const ATTEMPTS:       &str = "attempts";
    pub const CODE_PHC:       &str = "code_phc";
    pub const EMAIL:          &str = "email";
    pub const EMAIL_VERIFIED: &str = "email_verified";
    pub const EXPIRES_AT:     &str = "expires_at";
    pub const LAST_SENT_AT:   &str = "last_sent_at";
    pub const USER_ID:        &str = "user_id";
    pub const VERIFIED:       &str = "verified";
}

///
/// Where pending codes live, keyed uniquely by the normalized email address.
///
/// Implementations must make upsert, increment and delete atomic - two
/// concurrent verifies for the same address must not double-count an attempt,
/// and an increment must never resurrect a deleted record. Concurrent upserts
/// race to last-write-wins, which is fine: only the most recent code is valid.
///
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn find(&self, email: &str) -> Result<Option<OtpRecord>, DoormanError>;

    /// Create or overwrite the record for `record.email`.
    async fn upsert(&self, record: &OtpRecord) -> Result<(), DoormanError>;

    /// Atomically bump the attempt counter and return the new count.
    /// Fails with `NotFound` if the record no longer exists.
    async fn increment_attempts(&self, email: &str) -> Result<u32, DoormanError>;

    /// Fails with `NotFound` if the record no longer exists.
    async fn mark_verified(&self, email: &str) -> Result<(), DoormanError>;

    /// Deleting an absent record is not an error.
    async fn delete(&self, email: &str) -> Result<(), DoormanError>;
}

///
/// The slice of the user store this service needs: look a user up by address
/// and flip their verified flag. Registration happens elsewhere, before any
/// code is ever requested.
///
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DoormanError>;

    /// Set the user's email_verified flag and return the updated record.
    /// Fails with `UserNotFound` if the user no longer exists.
    async fn mark_email_verified(&self, user_id: &str) -> Result<User, DoormanError>;
}
