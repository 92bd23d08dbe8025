use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{Role, User};

const USER_COLUMNS: &str = "id, email, name, photo_url, role, created_at";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
}

/// Insert a user on first sight of the email. Returns `None` when the email
/// is already registered; re-registration is a no-op, never an error or a
/// duplicate.
pub async fn register(pool: &PgPool, new_user: NewUser) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, email, name, photo_url, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING
         RETURNING {USER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new_user.email)
    .bind(&new_user.name)
    .bind(&new_user.photo_url)
    .bind(new_user.role)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// List users, optionally filtered by role.
pub async fn list(pool: &PgPool, role: Option<Role>) -> Result<Vec<User>, StoreError> {
    let users = match role {
        Some(role) => {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at"
            ))
            .bind(role)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(users)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Whether the user stored under `email` holds exactly `role`. A missing
/// user is "predicate false", not an error.
pub async fn role_is(pool: &PgPool, email: &str, role: Role) -> Result<bool, StoreError> {
    Ok(find_by_email(pool, email)
        .await?
        .map(|user| user.role == role)
        .unwrap_or(false))
}

/// Set a user's role directly by email.
///
/// Administrative override: this bypasses the escalation state machine
/// entirely and can move a role in any direction, including to `pro-user`.
pub async fn set_role(pool: &PgPool, email: &str, role: Role) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = $2 WHERE email = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(role)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("User not found: {}", email)))
}

/// Delete a user by email. Immediate and unconditional; authored surveys are
/// left in place.
pub async fn delete_by_email(pool: &PgPool, email: &str) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Advance a user one step along `user -> surveyor -> admin`.
///
/// The next state comes from the `Role::escalated` table; the write is a
/// compare-and-set on the role the caller observed, so a concurrent
/// transition can never be overwritten or double-applied.
pub async fn escalate(pool: &PgPool, email: &str) -> Result<User, StoreError> {
    let current: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    let current =
        current.ok_or_else(|| StoreError::NotFound(format!("User not found: {}", email)))?;

    let next = current
        .parse::<Role>()
        .ok()
        .and_then(|role| role.escalated())
        .ok_or_else(|| StoreError::InvalidState(format!("Role cannot be updated from '{}'", current)))?;

    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = $2 WHERE email = $1 AND role = $3 RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(next)
    .bind(&current)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        StoreError::InvalidState(format!("Role changed concurrently from '{}'", current))
    })
}
