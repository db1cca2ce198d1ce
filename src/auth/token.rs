use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;
use crate::database::User;

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: issued_at,
            exp: issued_at + ttl_secs,
        }
    }
}

/// Signs and verifies HS256 access tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: settings.token_ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, user: &User) -> Result<(String, Claims)> {
        let claims = Claims::for_user(user, chrono::Utc::now().timestamp(), self.ttl_secs);
        let token = self.encode(&claims)?;
        Ok((token, claims))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding)
            .context("Failed to sign token")
    }

    /// Verify signature and expiry. Accepts the token with or without the
    /// `Bearer ` prefix.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let raw = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();
        jsonwebtoken::decode::<Claims>(raw, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .context("Invalid token")
    }
}
