use crate::{
    error::{AppError, Result},
    user::UserRole,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    /// Unique per token so two refresh tokens issued in the same second differ.
    pub jti: String,
}

fn create_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    secret: &str,
    lifetime: Duration,
) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or(AppError::InternalError)?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: expiration,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::InternalError)
}

/// Create access token (short-lived, 15 minutes)
pub fn create_access_token(user_id: Uuid, email: &str, role: UserRole, secret: &str) -> Result<String> {
    create_token(user_id, email, role, secret, Duration::minutes(15))
}

/// Create refresh token (long-lived, 7 days)
pub fn create_refresh_token(user_id: Uuid, email: &str, role: UserRole, secret: &str) -> Result<String> {
    create_token(user_id, email, role, secret, Duration::days(7))
}

/// Verify JWT token and extract claims
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip_keeps_role() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "staff@example.com", UserRole::Staff, "secret").unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "staff@example.com");
        assert_eq!(claims.role, UserRole::Staff);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = create_access_token(Uuid::new_v4(), "a@example.com", UserRole::Student, "secret").unwrap();
        assert!(matches!(verify_jwt(&token, "other"), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let user_id = Uuid::new_v4();
        let first = create_refresh_token(user_id, "a@example.com", UserRole::Admin, "secret").unwrap();
        let second = create_refresh_token(user_id, "a@example.com", UserRole::Admin, "secret").unwrap();
        assert_ne!(first, second);
    }
}
