use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Bearer token claims. `sub` is the user id that becomes a project's owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Longest token lifetime; larger configured values are clamped to it
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365;

impl Claims {
    pub fn new(user_id: Uuid, name: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        // Lossless after the clamp
        let lifetime = Duration::hours(expiry_hours.min(MAX_EXPIRY_HOURS) as i64);
        let exp = (now + lifetime).timestamp();

        Self {
            sub: user_id,
            name: name.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "JWT secret not configured"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign a token for `user_id` valid for the configured number of hours
pub fn issue_token(security: &SecurityConfig, user_id: Uuid, name: &str) -> Result<String, JwtError> {
    generate_jwt(security, &Claims::new(user_id, name, security.jwt_expiry_hours))
}

pub fn generate_jwt(security: &SecurityConfig, claims: &Claims) -> Result<String, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Check signature and expiry and return the claims
pub fn validate_jwt(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn oversized_expiry_is_clamped() {
        let claims = Claims::new(Uuid::new_v4(), "tester", u64::MAX);
        assert_eq!(claims.exp - claims.iat, MAX_EXPIRY_HOURS as i64 * 3600);
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let security = AppConfig::development().security;
        let user_id = Uuid::new_v4();

        let token = issue_token(&security, user_id, "timmy").unwrap();
        let claims = validate_jwt(&security, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.name, "timmy");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.jwt_secret = "someone-else".to_string();

        let token = issue_token(&other, Uuid::new_v4(), "mallory").unwrap();
        assert!(matches!(validate_jwt(&security, &token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let security = AppConfig::development().security;
        let mut claims = Claims::new(Uuid::new_v4(), "old", 1);
        claims.iat -= 10 * 3600;
        claims.exp = claims.iat + 3600;

        let token = generate_jwt(&security, &claims).unwrap();
        assert!(validate_jwt(&security, &token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let security = AppConfig::production().security;
        assert!(matches!(
            issue_token(&security, Uuid::new_v4(), "x"),
            Err(JwtError::InvalidSecret)
        ));
    }
}
