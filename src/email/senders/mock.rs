use async_trait::async_trait;
use parking_lot::Mutex;
use crate::email::{EmailError, EmailSender};

///
/// Captures outbound codes instead of sending them - used by the integration
/// tests and handy for local development without a relay.
///
#[derive(Default)]
pub struct MockSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// The (address, code) pairs captured so far, oldest first.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    /// The most recent code captured for the given address.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent.lock().iter().rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl EmailSender for MockSender {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        self.sent.lock().push((to.to_string(), code.to_string()));
        Ok(())
    }
}

///
/// Fails every send - lets tests exercise the rollback path.
///
pub struct FailingSender {
    reason: String,
}

impl FailingSender {
    pub fn new(reason: &str) -> Self {
        FailingSender { reason: reason.to_string() }
    }
}

#[async_trait]
impl EmailSender for FailingSender {
    async fn send_code(&self, _to: &str, _code: &str) -> Result<(), EmailError> {
        Err(EmailError::FailedToSend(self.reason.clone()))
    }
}
