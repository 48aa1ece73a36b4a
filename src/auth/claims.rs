use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::domain::User;

/// Claims carried by the backend's access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(deserialize_with = "deserialize_user_id")]
    pub user_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    pub exp: i64, // Expiration time (as UTC timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl AccessClaims {
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericOrString {
    Numeric(i64),
    Text(String),
}

// Some token issuers stringify the primary key.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumericOrString::deserialize(deserializer)? {
        NumericOrString::Numeric(id) => Ok(id),
        NumericOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
