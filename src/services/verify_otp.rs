use tracing::instrument;
use crate::model::user::User;
use crate::services::{self, MAX_ATTEMPTS};
use crate::utils::context::ServiceContext;
use crate::utils::errors::DoormanError;

///
/// Check a submitted code against the pending record for the address.
///
/// Wrong guesses are counted on the record and the pending code is revoked
/// after the third. A correct guess flips the user's verified flag and
/// removes the record, so a code can only ever be redeemed once.
///
#[instrument(skip(ctx, code))]
pub async fn verify_otp(ctx: &ServiceContext, email: &str, code: &str) -> Result<User, DoormanError> {

    let email = services::validate_email(email)?;
    services::validate_code(code)?;

    let record = match ctx.otp_store().find(&email).await? {
        Some(record) => record,
        None => return Err(DoormanError::NotFound),
    };

    // A stale record is useless whatever the code says - remove it so the
    // next request starts the cycle from scratch.
    if ctx.now() > record.expires_at {
        ctx.otp_store().delete(&email).await?;
        return Err(DoormanError::Expired)
    }

    // Attempts can already be exhausted here if a previous revocation didn't
    // land - treat the record as spent either way.
    if record.attempts >= MAX_ATTEMPTS {
        ctx.otp_store().delete(&email).await?;
        return Err(DoormanError::AttemptsExhausted)
    }

    // bcrypt verification is CPU-bound - run it on the blocking pool.
    let phc = record.code_phc.clone();
    let submitted = code.to_string();
    let valid = tokio::task::spawn_blocking(move || { crate::model::code::validate(&phc, &submitted) })
        .await
        .map_err(|e| DoormanError::from(e))?
        ?;

    if !valid {
        let attempts = ctx.otp_store().increment_attempts(&email).await?;
        let remaining_attempts = MAX_ATTEMPTS.saturating_sub(attempts);

        if attempts >= MAX_ATTEMPTS {
            tracing::warn!("Pending code for {} revoked after {} failed attempts", email, attempts);
            ctx.otp_store().delete(&email).await?;
        }

        return Err(DoormanError::InvalidCode { remaining_attempts })
    }

    // The flag is only observable between here and the delete below - the
    // record is removed as soon as the user is updated.
    ctx.otp_store().mark_verified(&email).await?;

    let user = match ctx.user_store().find_by_email(&email).await? {
        Some(user) => user,
        None => return Err(DoormanError::UserNotFound),
    };

    let user = ctx.user_store().mark_email_verified(&user.user_id).await?;
    ctx.otp_store().delete(&email).await?;

    tracing::info!("{} is now verified", email);
    Ok(user)
}
