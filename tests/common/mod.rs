use std::sync::Arc;
use chrono::{DateTime, Utc};
use doorman::db::memory::{InMemoryOtpStore, InMemoryUserStore};
use doorman::email::senders::mock::{FailingSender, MockSender};
use doorman::model::user::User;
use doorman::utils::config::Configuration;
use doorman::utils::context::ServiceContext;

///
/// Everything a test needs to drive the service: a context wired to in-memory
/// stores and a capturing sender, plus handles to those fakes so the test can
/// seed and inspect them.
///
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub otp_store: Arc<InMemoryOtpStore>,
    pub user_store: Arc<InMemoryUserStore>,
    pub mailer: Arc<MockSender>,
}

impl TestHarness {
    ///
    /// Register a user so a verification can complete against them.
    ///
    pub fn seed_user(&self, email: &str) -> User {
        self.user_store.add_user(email)
    }

    ///
    /// The code most recently emailed to the given (normalized) address.
    ///
    pub fn sent_code(&self, email: &str) -> String {
        self.mailer.last_code_for(email).expect("no code was emailed to that address")
    }
}

pub fn start_doorman() -> TestHarness {
    doorman::init_tracing();

    let otp_store = Arc::new(InMemoryOtpStore::new());
    let user_store = Arc::new(InMemoryUserStore::new());
    let mailer = Arc::new(MockSender::new());

    let ctx = Arc::new(ServiceContext::new(
        test_config(),
        otp_store.clone(),
        user_store.clone(),
        mailer.clone()));

    TestHarness { ctx, otp_store, user_store, mailer }
}

///
/// A harness whose mailer refuses every send - for the rollback tests.
///
pub fn start_doorman_with_failing_mailer(reason: &str) -> (Arc<ServiceContext>, Arc<InMemoryOtpStore>) {
    doorman::init_tracing();

    let otp_store = Arc::new(InMemoryOtpStore::new());
    let user_store = Arc::new(InMemoryUserStore::new());
    let mailer = Arc::new(FailingSender::new(reason));

    let ctx = Arc::new(ServiceContext::new(
        test_config(),
        otp_store.clone(),
        user_store,
        mailer));

    (ctx, otp_store)
}

pub fn test_config() -> Configuration {
    Configuration::from_env().expect("the default configuration should load")
}

pub fn fixed_time(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("test timestamps must be RFC3339")
}
