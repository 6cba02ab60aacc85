//! Authentication module: JWT token management and password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims.
///
/// Tokens carry only the username and are issued without an expiry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username (subject).
    pub sub: String,
}

/// Authenticated user extracted from JWT.
///
/// Handlers take this as an argument to gate a route; the username is
/// not otherwise consumed by the item endpoints.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Username from the token's subject claim.
    pub username: String,
}

/// Create a JWT token for a user.
pub fn create_token(username: &str, secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: username.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
}

/// Validate a JWT token and return claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    // Tokens are issued without an expiry claim, so expiry checking is off.
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized("Invalid Jwt Token".to_string()))?;

    Ok(token_data.claims)
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(password_hash.to_string())
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The header is split on spaces and the second segment is the
        // token, so a bare "Bearer" and a missing header reject alike.
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.split(' ').nth(1))
            .ok_or_else(|| ApiError::Unauthorized("Invalid access token".to_string()))?;

        let claims = validate_token(token, &state.config().jwt_secret)?;

        Ok(AuthenticatedUser {
            username: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = "same_password";
        let first = hash_password(password).unwrap();
        let second = hash_password(password).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_create_and_validate_token() {
        let secret = "test_secret_key_12345";

        let token = create_token("alice", secret).unwrap();
        let claims = validate_token(&token, secret).unwrap();

        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_validate_token_wrong_secret() {
        let token = create_token("alice", "secret1").unwrap();
        let result = validate_token(&token, "secret2");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_token_garbage() {
        let result = validate_token("not.a.jwt", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_token_without_expiry_validates() {
        // Tokens are minted without an exp claim and must still verify.
        let secret = "no_expiry_secret";
        let token = create_token("bob", secret).unwrap();
        assert!(validate_token(&token, secret).is_ok());
    }
}
