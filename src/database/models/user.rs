use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Permission tier stored on a user document.
///
/// `user -> surveyor -> admin` is the escalation path; `pro-user` is an
/// orthogonal paid tier that never participates in escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    Surveyor,
    Admin,
    ProUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Surveyor => "surveyor",
            Role::Admin => "admin",
            Role::ProUser => "pro-user",
        }
    }

    /// Transition table for the role lifecycle. One step per call, forward
    /// only; `None` means the transition is refused and nothing may change.
    pub fn escalated(&self) -> Option<Role> {
        match self {
            Role::User => Some(Role::Surveyor),
            Role::Surveyor => Some(Role::Admin),
            Role::Admin | Role::ProUser => None,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "surveyor" => Ok(Role::Surveyor),
            "admin" => Ok(Role::Admin),
            "pro-user" => Ok(Role::ProUser),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Roles live in a TEXT column; encode/decode by name rather than as a
// Postgres enum type.
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse::<Role>().map_err(Into::into)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_is_monotonic_and_bounded() {
        // user -> surveyor -> admin, then refuse
        let mut role = Role::User;
        role = role.escalated().unwrap();
        assert_eq!(role, Role::Surveyor);
        role = role.escalated().unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(role.escalated(), None);
    }

    #[test]
    fn pro_user_never_escalates() {
        assert_eq!(Role::ProUser.escalated(), None);
    }

    #[test]
    fn no_transition_targets_user() {
        // Forward-only machine: nothing ever demotes back to the entry state
        for role in [Role::User, Role::Surveyor, Role::Admin, Role::ProUser] {
            assert_ne!(role.escalated(), Some(Role::User));
        }
    }

    #[test]
    fn role_names_round_trip() {
        for role in [Role::User, Role::Surveyor, Role::Admin, Role::ProUser] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn pro_user_serializes_with_hyphen() {
        assert_eq!(
            serde_json::to_value(Role::ProUser).unwrap(),
            serde_json::json!("pro-user")
        );
    }
}
