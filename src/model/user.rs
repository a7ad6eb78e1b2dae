use serde::{Deserialize, Serialize};

///
/// The slice of the user record this service reads and writes. Registration
/// and the rest of the user's profile are owned elsewhere.
///
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub email_verified: bool,
}
