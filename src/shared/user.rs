//! User Profile Types
//!
//! Public projection of a user account. This is what every endpoint returns
//! when it hands a user back to a client; the password hash never leaves the
//! backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Gender values accepted at signup and profile update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[serde(rename = "prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::PreferNotToSay => "prefer not to say",
        }
    }

    /// Parse the storage representation
    pub fn parse(value: &str) -> Result<Self, SharedError> {
        match value {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "prefer not to say" => Ok(Gender::PreferNotToSay),
            _ => Err(SharedError::validation("gender", "Invalid gender value")),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Gender::parse(&value)
    }
}

/// User information that is safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User's unique ID (UUID v4)
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name, title-cased
    pub fullname: String,
    /// Login name, lower-cased and unique
    pub username: String,
    /// Free-form bio (max 160 chars)
    pub bio: String,
    pub gender: Gender,
    /// Hosted avatar URL
    pub profile_pic: String,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male").unwrap(), Gender::Male);
        assert_eq!(Gender::parse("prefer not to say").unwrap(), Gender::PreferNotToSay);
        assert!(Gender::parse("other").is_err());
    }

    #[test]
    fn test_gender_serde_matches_storage() {
        for gender in [Gender::Male, Gender::Female, Gender::PreferNotToSay] {
            let json = serde_json::to_string(&gender).unwrap();
            assert_eq!(json, format!("\"{}\"", gender.as_str()));
        }
    }
}
