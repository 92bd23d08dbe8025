use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::database::models::Role;
use crate::database::{users, Database};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Identity claim; extra payload fields are accepted and ignored
    pub email: String,
}

/// POST /jwt - issue a bearer token for the posted identity.
///
/// Issuance is decoupled from registration: the email is not checked against
/// the user store.
pub async fn issue_token(Json(request): Json<TokenRequest>) -> ApiResult<Value> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }

    let token = auth::issue_token(email).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    tracing::debug!("Issued token for '{}'", request.email);
    Ok(ApiResponse::success(json!({ "token": token })))
}

fn default_role() -> Role {
    Role::User
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

/// POST /users - register a user on first sight of an email.
///
/// Idempotent: a repeated registration reports "user already exists" instead
/// of erroring or duplicating.
pub async fn register(Json(request): Json<RegisterRequest>) -> ApiResult<Value> {
    if request.email.trim().is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }

    let pool = Database::pool()?;

    let new_user = users::NewUser {
        email: request.email,
        name: request.name,
        photo_url: request.photo_url,
        role: request.role,
    };

    match users::register(pool, new_user).await? {
        Some(user) => Ok(ApiResponse::created(json!({
            "message": "user created",
            "user": user
        }))),
        None => Ok(ApiResponse::success(json!({
            "message": "user already exists"
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_email_is_rejected_before_signing() {
        let request = TokenRequest {
            email: "   ".to_string(),
        };

        let err = issue_token(Json(request)).await.err().unwrap();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn blank_email_cannot_register() {
        let request = RegisterRequest {
            email: String::new(),
            name: None,
            photo_url: None,
            role: default_role(),
        };

        let err = register(Json(request)).await.err().unwrap();
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }
}
