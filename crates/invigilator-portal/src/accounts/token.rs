use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::applications::domain::{ApplicationRecord, ApplicationStatus, RecordId, Role};
use crate::config::AuthConfig;

/// Session claims carried by the `token` cookie and bearer header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(rename = "sub")]
    pub user_id: RecordId,
    pub email: String,
    pub role: Role,
    pub status: Option<ApplicationStatus>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(jsonwebtoken::errors::Error),
    #[error("invalid or expired token: {0}")]
    Decode(jsonwebtoken::errors::Error),
}

/// HS256 signer and verifier for session tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_days)
    }

    pub fn issue(&self, record: &ApplicationRecord) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: record.id.clone(),
            email: record.profile.email.clone(),
            role: record.role,
            status: record.status,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(TokenError::Decode)
    }
}
