use std::fmt;
use bcrypt::BcryptError;
use config::ConfigError;
use tokio::task::JoinError;

///
/// Every operation reports failure with one of these.
///
/// Variants carry whatever a caller needs to build a useful response - the
/// remaining attempts, the cooldown - so nothing has to be scraped back out of
/// the message text. The caller layer maps variants to transport status codes.
///
#[derive(Clone, Debug, PartialEq)]
pub enum DoormanError {
    /// The email address or code failed shape validation.
    InvalidInput(String),

    /// A code was sent to this address less than the cooldown period ago.
    RateLimited { cooldown_seconds: i64 },

    /// The transport could not deliver the code. The pending record has been
    /// rolled back so the address is not locked behind the cooldown.
    DeliveryFailed(String),

    /// No pending code exists for the address.
    NotFound,

    /// The pending code had expired and has been removed.
    Expired,

    /// The allowed number of wrong guesses was used up; the pending code has
    /// been removed.
    AttemptsExhausted,

    /// The submitted code did not match the pending one.
    InvalidCode { remaining_attempts: u32 },

    /// No registered user exists for the address - registration must happen
    /// before verification.
    UserNotFound,

    /// A store or transport fault. The detail is logged where the fault is
    /// mapped, never shown to the end user.
    Internal(String),
}

impl std::error::Error for DoormanError {}

impl fmt::Display for DoormanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoormanError::InvalidInput(reason) => write!(f, "{}", reason),
            DoormanError::RateLimited { cooldown_seconds } => {
                write!(f, "A code was sent recently, please wait {} seconds before requesting another", cooldown_seconds)
            },
            DoormanError::DeliveryFailed(reason) => {
                write!(f, "The code could not be delivered: {}", reason)
            },
            DoormanError::NotFound => {
                write!(f, "There is no pending code for this address, please request a new one")
            },
            DoormanError::Expired => {
                write!(f, "The code has expired, please request a new one")
            },
            DoormanError::AttemptsExhausted => {
                write!(f, "Too many incorrect codes, please request a new one")
            },
            DoormanError::InvalidCode { remaining_attempts } => {
                write!(f, "That code is not correct, {} attempts remaining", remaining_attempts)
            },
            DoormanError::UserNotFound => {
                write!(f, "No account exists for this address")
            },
            DoormanError::Internal(_) => {
                write!(f, "An internal error has occurred, please try again later")
            },
        }
    }
}

impl From<mongodb::error::Error> for DoormanError {
    fn from(error: mongodb::error::Error) -> Self {
        tracing::error!("MongoDB error: {}", error);
        DoormanError::Internal(format!("MongoDB error: {}", error))
    }
}

impl From<BcryptError> for DoormanError {
    fn from(error: BcryptError) -> Self {
        tracing::error!("Unable to hash or verify a code: {}", error);
        DoormanError::Internal(format!("Hashing error: {}", error))
    }
}

impl From<JoinError> for DoormanError {
    fn from(error: JoinError) -> Self {
        tracing::error!("Blocking task failed: {}", error);
        DoormanError::Internal(format!("Unable to hash: {}", error))
    }
}

impl From<ConfigError> for DoormanError {
    fn from(error: ConfigError) -> Self {
        DoormanError::Internal(format!("The service configuration is not correct: {}", error))
    }
}

impl From<serde_json::Error> for DoormanError {
    fn from(error: serde_json::Error) -> Self {
        DoormanError::Internal(format!("Unable to convert to json: {}", error))
    }
}
