use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use crate::db::{OtpStore, UserStore};
use crate::email::EmailSender;
use crate::utils::config::Configuration;
use crate::utils::time_provider::TimeProvider;

///
/// The context is passed to every operation and gives it access to the
/// collaborators - the OTP record store, the user store, the email sender -
/// plus the config and the clock.
///
/// Collaborators are injected rather than reached for as globals, so the
/// operations can be driven against in-memory fakes in tests.
///
pub struct ServiceContext {
    config: Configuration,
    otp_store: Arc<dyn OtpStore>,
    user_store: Arc<dyn UserStore>,
    mailer: Arc<dyn EmailSender>,
    time_provider: RwLock<TimeProvider>,
}

impl ServiceContext {
    pub fn new(
        config: Configuration,
        otp_store: Arc<dyn OtpStore>,
        user_store: Arc<dyn UserStore>,
        mailer: Arc<dyn EmailSender>) -> Self {

        ServiceContext {
            config,
            otp_store,
            user_store,
            mailer,
            time_provider: RwLock::new(TimeProvider::default()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time_provider.read().now()
    }

    ///
    /// Set or clear the fixed time.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        self.time_provider.write().fix(now);
    }

    pub fn otp_store(&self) -> &dyn OtpStore {
        &*self.otp_store
    }

    pub fn user_store(&self) -> &dyn UserStore {
        &*self.user_store
    }

    pub fn mailer(&self) -> &dyn EmailSender {
        &*self.mailer
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}
