//! Stage two of the authorization guard: binding the verified token identity
//! to the stored role. Every protected handler goes through these helpers
//! instead of doing its own inline checks.
//!
//! The token carries no role, so each check loads the user row fresh; a role
//! revoked or changed in the store takes effect on the very next request.

use sqlx::PgPool;

use crate::database::models::{Role, User};
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Require the token identity to exactly equal the path-supplied identity.
///
/// Keeps a valid token for user A from querying role information about
/// user B; the mismatch answer never mentions B's role.
pub fn bind_identity(auth: &AuthUser, email: &str) -> Result<(), ApiError> {
    if auth.email != email {
        tracing::warn!(
            "Identity binding refused: token for '{}' queried '{}'",
            auth.email,
            email
        );
        return Err(ApiError::forbidden("forbidden access"));
    }
    Ok(())
}

/// Evaluate a role predicate for an identity. A missing user record is
/// "predicate false", not an error.
pub async fn role_predicate(pool: &PgPool, email: &str, role: Role) -> Result<bool, ApiError> {
    Ok(users::role_is(pool, email, role).await?)
}

/// Load the caller's stored user and require its role to be in `allowed`.
///
/// An unregistered caller is refused the same way as an insufficient role.
pub async fn require_role(
    pool: &PgPool,
    auth: &AuthUser,
    allowed: &[Role],
) -> Result<User, ApiError> {
    let user = users::find_by_email(pool, &auth.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Role check refused: '{}' has no user record", auth.email);
            ApiError::forbidden("forbidden access")
        })?;

    if !allowed.contains(&user.role) {
        tracing::warn!(
            "Role check refused: '{}' is '{}', needs one of {:?}",
            auth.email,
            user.role,
            allowed
        );
        return Err(ApiError::forbidden("forbidden access"));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_binding_accepts_exact_match() {
        let auth = AuthUser { email: "a@x.com".to_string() };
        assert!(bind_identity(&auth, "a@x.com").is_ok());
    }

    #[test]
    fn identity_binding_rejects_other_identities() {
        let auth = AuthUser { email: "a@x.com".to_string() };
        let err = bind_identity(&auth, "b@x.com").unwrap_err();
        assert_eq!(err.status_code(), 403);
        // The refusal must not leak anything about the target identity
        assert!(!err.message().contains("b@x.com"));
    }

    #[test]
    fn identity_binding_is_case_sensitive() {
        let auth = AuthUser { email: "a@x.com".to_string() };
        assert!(bind_identity(&auth, "A@x.com").is_err());
    }
}
