use std::collections::HashMap;
use async_trait::async_trait;
use parking_lot::Mutex;
use crate::db::{OtpStore, UserStore};
use crate::model::otp::OtpRecord;
use crate::model::user::User;
use crate::utils;
use crate::utils::errors::DoormanError;

///
/// An OtpStore backed by an in-process map - used by the integration tests
/// and handy for local development without a MongoDB.
///
/// Each operation takes the lock once and works on the map under it, which
/// gives the same single-record atomicity the MongoDB store gets from
/// single-document updates.
///
#[derive(Default)]
pub struct InMemoryOtpStore {
    records: Mutex<HashMap<String, OtpRecord>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn find(&self, email: &str) -> Result<Option<OtpRecord>, DoormanError> {
        Ok(self.records.lock().get(email).cloned())
    }

    async fn upsert(&self, record: &OtpRecord) -> Result<(), DoormanError> {
        self.records.lock().insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn increment_attempts(&self, email: &str) -> Result<u32, DoormanError> {
        match self.records.lock().get_mut(email) {
            Some(record) => {
                record.attempts += 1;
                Ok(record.attempts)
            },
            None => Err(DoormanError::NotFound),
        }
    }

    async fn mark_verified(&self, email: &str) -> Result<(), DoormanError> {
        match self.records.lock().get_mut(email) {
            Some(record) => {
                record.verified = true;
                Ok(())
            },
            None => Err(DoormanError::NotFound),
        }
    }

    async fn delete(&self, email: &str) -> Result<(), DoormanError> {
        self.records.lock().remove(email);
        Ok(())
    }
}

///
/// A UserStore over an in-process map. Tests seed it with add_user before
/// driving a verification through.
///
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Register a user with the given (already normalized) address.
    ///
    pub fn add_user(&self, email: &str) -> User {
        let user = User {
            user_id: utils::generate_id(),
            email: email.to_string(),
            email_verified: false,
        };

        self.users.lock().insert(user.user_id.clone(), user.clone());
        user
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DoormanError> {
        Ok(self.users.lock().values().find(|user| user.email == email).cloned())
    }

    async fn mark_email_verified(&self, user_id: &str) -> Result<User, DoormanError> {
        match self.users.lock().get_mut(user_id) {
            Some(user) => {
                user.email_verified = true;
                Ok(user.clone())
            },
            None => Err(DoormanError::UserNotFound),
        }
    }
}
