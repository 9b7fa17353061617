/**
 * Authentication Handler Types
 *
 * Request and response bodies for the auth and account endpoints, plus the
 * field rules signup and profile updates share.
 *
 * Request fields are optional or defaulted so a missing field reaches the
 * handler and gets the documented 400 message instead of a generic
 * extractor rejection.
 */
use serde::{Deserialize, Serialize};

use crate::shared::{SharedError, UserProfile};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_FULLNAME_LEN: usize = 40;
pub const MAX_USERNAME_LEN: usize = 25;
pub const MAX_BIO_LEN: usize = 160;

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct SignupRequest {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// One of `male`, `female`, `prefer not to say`
    #[serde(default)]
    pub gender: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Re-enable request; same shape as login
pub type EnableAccountRequest = LoginRequest;

/// Body of delete-profile and disable-account
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct PasswordConfirmation {
    #[serde(default)]
    pub password: String,
}

/// Profile update; absent fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Base64 data URI or URL, uploaded before saving
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Returned by signup and login
///
/// The token is also set as the `jwt` cookie; it is included in the body
/// for clients that send it as a bearer header instead.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
    pub token: String,
}

/// Returned by disable-account and enable-account
#[derive(Serialize, Deserialize, Debug)]
pub struct AccountResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Lower-case every word, then capitalize its first letter
pub fn title_case(value: &str) -> String {
    value
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default avatar for a new account
pub fn default_profile_pic(fullname: &str) -> String {
    format!("https://avatar.iran.liara.run/username?username={}", fullname.replace(' ', "+"))
}

pub fn check_max_len(field: &str, label: &str, value: &str, max: usize) -> Result<(), SharedError> {
    if value.chars().count() > max {
        return Err(SharedError::validation(
            field,
            format!("{} must be at most {} characters", label, max),
        ));
    }
    Ok(())
}
