use axum::extract::{Extension, Path, Query};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::guard;
use crate::database::models::{Role, User};
use crate::database::{users, Database};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<Role>,
}

/// GET /api/users?role= - list users, admin only
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<User>> {
    let pool = Database::pool()?;
    guard::require_role(pool, &auth, &[Role::Admin]).await?;

    Ok(ApiResponse::success(users::list(pool, query.role).await?))
}

/// GET /api/users/:email - fetch a single user
pub async fn get_by_email(
    Extension(_auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<User> {
    let pool = Database::pool()?;

    users::find_by_email(pool, &email)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", email)))
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

/// PATCH /api/users/:email - set a user's role directly.
///
/// Administrative override that bypasses the escalation state machine; any
/// enumerated role can be assigned in any order.
pub async fn set_role(
    Extension(_auth): Extension<AuthUser>,
    Path(email): Path<String>,
    Json(request): Json<SetRoleRequest>,
) -> ApiResult<User> {
    let pool = Database::pool()?;
    let user = users::set_role(pool, &email, request.role).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:email - delete a user, admin only. Immediate and
/// unconditional; no cascade to authored surveys.
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Value> {
    let pool = Database::pool()?;
    guard::require_role(pool, &auth, &[Role::Admin]).await?;

    let deleted = users::delete_by_email(pool, &email).await?;
    Ok(ApiResponse::success(json!({ "deleted_count": deleted })))
}

/// PATCH /api/users/:email/escalate - advance the role state machine one
/// step, admin only. 404 when the user is absent, 400 when the current role
/// has no forward transition.
pub async fn escalate(
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<User> {
    let pool = Database::pool()?;
    guard::require_role(pool, &auth, &[Role::Admin]).await?;

    let user = users::escalate(pool, &email).await?;
    tracing::info!("Escalated user {} to '{}'", user.email, user.role);
    Ok(ApiResponse::success(user))
}

/// GET /api/users/admin/:email - identity-bound admin predicate
pub async fn is_admin(
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Value> {
    role_flag(&auth, &email, Role::Admin, "admin").await
}

/// GET /api/users/surveyor/:email - identity-bound surveyor predicate
pub async fn is_surveyor(
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Value> {
    role_flag(&auth, &email, Role::Surveyor, "surveyor").await
}

/// GET /api/users/pro-user/:email - identity-bound pro-user predicate
pub async fn is_pro_user(
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Value> {
    role_flag(&auth, &email, Role::ProUser, "proUser").await
}

/// Shared body of the role predicates: identity binding first, then a fresh
/// role lookup. Only the caller's own role may be queried.
async fn role_flag(
    auth: &AuthUser,
    email: &str,
    role: Role,
    flag_name: &str,
) -> ApiResult<Value> {
    guard::bind_identity(auth, email)?;

    let pool = Database::pool()?;
    let flag = guard::role_predicate(pool, email, role).await?;
    Ok(ApiResponse::success(json!({ flag_name: flag })))
}
