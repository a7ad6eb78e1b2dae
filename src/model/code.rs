use rand::Rng;
use crate::utils::errors::DoormanError;

/// bcrypt cost used for codes at rest. Codes only live for a few minutes so a
/// moderate cost is enough to make offline guessing pointless.
pub const HASH_COST: u32 = 10;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

///
/// Generate a uniformly random 6-digit code.
///
/// The range starts at 100000, so codes never carry a leading zero - the
/// issuing behaviour the portal's clients already expect.
///
pub fn generate() -> String {
    let code = rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX);
    code.to_string()
}

///
/// Hash a plaintext code into a salted PHC string for storage.
///
pub fn hash_into_phc(plain_text_code: &str) -> Result<String, DoormanError> {
    Ok(bcrypt::hash(plain_text_code, HASH_COST)?)
}

///
/// Check a submitted code against a stored PHC string.
///
pub fn validate(phc: &str, plain_text_code: &str) -> Result<bool, DoormanError> {
    Ok(bcrypt::verify(plain_text_code, phc)?)
}
