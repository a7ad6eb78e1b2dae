use std::fs;
use async_trait::async_trait;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use crate::email::{EmailError, EmailSender};
use crate::utils::config::Configuration;
use crate::utils::errors::DoormanError;

const SUBJECT: &str = "Your verification code";

///
/// Delivers codes through an authenticated SMTP relay.
///
/// The relay host, account and From address come from the configuration; the
/// account password is read from secrets/smtp_password like the MongoDB
/// credentials are.
///
pub struct SmtpSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpSender {
    pub fn from_config(config: &Configuration) -> Result<Self, DoormanError> {
        let password = fs::read_to_string("secrets/smtp_password")
            .map_err(|err| DoormanError::Internal(format!("Unable to read credentials from secrets/smtp_password: {}", err)))?;

        let creds = Credentials::new(config.smtp_username.clone(), password.trim().to_string());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)
            .map_err(|err| DoormanError::Internal(format!("Unable to configure the SMTP relay: {}", err)))?
            .credentials(creds)
            .build();

        Ok(SmtpSender { mailer, from_address: config.smtp_from.clone() })
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from_address.parse().map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?)
            .to(to.parse().map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(format!("Your verification code is {}. It expires in 5 minutes.\n\nIf you did not request this, you can ignore this email.", code))
            .map_err(|err| EmailError::BuildFailed(err.to_string()))?;

        self.mailer.send(message)
            .await
            .map(|_| ())
            .map_err(|err| EmailError::FailedToSend(err.to_string()))
    }
}
