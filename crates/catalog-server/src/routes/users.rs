//! User routes: registration and login.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use catalog_store::{Gender, NewUser};

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub password: String,
    pub location: String,
    pub gender: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "jwtToken")]
    pub jwt_token: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /new_users/ - Register a new user.
///
/// Registration is not request-logged; its only side effect is the
/// store write.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<&'static str> {
    let gender: Gender = request.gender.parse().map_err(|_| {
        ApiError::BadRequest("Invalid gender. Allowed values: Male, Female, Other.".to_string())
    })?;

    let password_hash = auth::hash_password(&request.password)?;

    // Check-then-insert: two concurrent registrations of the same
    // username can both pass this check; the primary key decides.
    let store = state.store();
    if store
        .get_user_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    store
        .insert_user(&NewUser {
            username: request.username.clone(),
            name: request.name,
            password_hash,
            location: request.location,
            gender,
        })
        .await?;

    tracing::info!(username = %request.username, "User registered");

    Ok("User Created Successfully!")
}

/// POST /login - Verify credentials and issue a token.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let store = state.store();

    let user = store
        .get_user_by_username(&request.username)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid User".to_string()))?;

    let valid = auth::verify_password(&request.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::BadRequest("Invalid Password".to_string()));
    }

    let token = auth::create_token(&user.username, &state.config().jwt_secret)?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse { jwt_token: token }))
}

/// Build user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/new_users/", post(register))
        .route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialize() {
        let json = r#"{
            "username": "alice",
            "name": "Alice",
            "password": "secret",
            "location": "Zurich",
            "gender": "Female"
        }"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.gender, "Female");
    }

    #[test]
    fn test_login_request_deserialize() {
        let json = r#"{"username": "alice", "password": "secret"}"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "secret");
    }

    #[test]
    fn test_login_response_uses_jwt_token_key() {
        let response = LoginResponse {
            jwt_token: "jwt.token.here".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("jwtToken"));
        assert!(!json.contains("jwt_token"));
    }
}
