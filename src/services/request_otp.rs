use chrono::Duration;
use tracing::instrument;
use crate::model::{code, otp::OtpRecord};
use crate::services::{self, CODE_LIFETIME_MINUTES, RESEND_COOLDOWN_MILLIS};
use crate::utils::context::ServiceContext;
use crate::utils::errors::DoormanError;

///
/// Issue a fresh code for the given address and email it out.
///
/// Any previous pending code for the address is overwritten - only the most
/// recently issued code is ever valid. If the email cannot be delivered the
/// freshly written record is removed again, so the caller is never told a
/// code is on its way when it isn't.
///
#[instrument(skip(ctx))]
pub async fn request_otp(ctx: &ServiceContext, email: &str) -> Result<(), DoormanError> {

    let email = services::validate_email(email)?;

    // Enforce the resend cooldown against the previous record, if any.
    if let Some(existing) = ctx.otp_store().find(&email).await? {
        let elapsed_millis = (ctx.now() - existing.last_sent_at).num_milliseconds();

        if elapsed_millis < RESEND_COOLDOWN_MILLIS {
            let cooldown_seconds = (RESEND_COOLDOWN_MILLIS - elapsed_millis + 999) / 1000;
            return Err(DoormanError::RateLimited { cooldown_seconds })
        }
    }

    let plain_text_code = code::generate();

    // Hashing is CPU-bound - keep it off the async event loop.
    let code_for_hashing = plain_text_code.clone();
    let phc = tokio::task::spawn_blocking(move || { code::hash_into_phc(&code_for_hashing) })
        .await
        .map_err(|e| DoormanError::from(e))?
        ?;

    let now = ctx.now();
    let record = OtpRecord {
        email: email.clone(),
        code_phc: phc,
        expires_at: now + Duration::minutes(CODE_LIFETIME_MINUTES),
        attempts: 0,
        verified: false,
        last_sent_at: now,
    };

    ctx.otp_store().upsert(&record).await?;

    // If delivery fails the record is rolled back - otherwise the address
    // would sit behind the cooldown waiting for a code that never arrived.
    if let Err(err) = ctx.mailer().send_code(&email, &plain_text_code).await {
        tracing::warn!("Delivery to {} failed, rolling back the pending code: {}", email, err);
        ctx.otp_store().delete(&email).await?;
        return Err(DoormanError::DeliveryFailed(err.to_string()))
    }

    tracing::info!("Verification code sent to {}", email);
    Ok(())
}
