pub mod senders;

use std::fmt;
use async_trait::async_trait;

///
/// Outbound delivery of plaintext codes.
///
/// The service treats any error from here as a delivery failure and rolls the
/// pending record back, so implementations should fail rather than swallow a
/// transport problem.
///
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), EmailError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum EmailError {
    InvalidAddress(String),
    BuildFailed(String),
    FailedToSend(String),
}

impl std::error::Error for EmailError {}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailError::InvalidAddress(address) => write!(f, "{} is not a deliverable address", address),
            EmailError::BuildFailed(e) => write!(f, "Unable to build the message: {}", e),
            EmailError::FailedToSend(e) => write!(f, "Failed to send: {}", e),
        }
    }
}
