use serde::{Deserialize, Serialize};

/// One registered account, stored in order under the `users` key.
///
/// The password is kept as entered, matching the existing stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}
