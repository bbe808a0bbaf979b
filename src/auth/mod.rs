use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Signed token payload. `id` is the acting identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Claims for `user_id`, expiring after `expiry_hours` (never, when `None`).
    pub fn new(user_id: Uuid, expiry_hours: Option<u64>) -> Self {
        let now = Utc::now();
        let exp = expiry_hours.map(|hours| (now + Duration::hours(hours as i64)).timestamp());

        Self {
            id: user_id,
            exp,
            iat: Some(now.timestamp()),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, &encoding_key).map_err(JwtError::TokenGeneration)
}

/// Verify signature and expiry, returning the claims.
///
/// `exp` is enforced when present but not required: sign-in tokens carry
/// only the `id` claim.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = true;

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(JwtError::InvalidToken)?;

    Ok(token_data.claims)
}
