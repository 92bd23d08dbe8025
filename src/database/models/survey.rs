use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Visibility status of a survey. Unlike the role lifecycle this is a binary
/// toggle: each transition is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    Publish,
    Unpublish,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::Publish => "publish",
            SurveyStatus::Unpublish => "unpublish",
        }
    }

    /// Transition table for the status lifecycle. Total over the two valid
    /// states; stored values outside them refuse at parse time.
    pub fn toggled(&self) -> SurveyStatus {
        match self {
            SurveyStatus::Publish => SurveyStatus::Unpublish,
            SurveyStatus::Unpublish => SurveyStatus::Publish,
        }
    }
}

impl std::str::FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(SurveyStatus::Publish),
            "unpublish" => Ok(SurveyStatus::Unpublish),
            other => Err(format!("unknown survey status: {}", other)),
        }
    }
}

impl std::fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl sqlx::Type<sqlx::Postgres> for SurveyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SurveyStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse::<SurveyStatus>().map_err(Into::into)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for SurveyStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Survey {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Opaque option payload; the server never inspects option contents
    pub options: serde_json::Value,
    pub deadline: NaiveDate,
    pub category: Option<String>,
    pub status: SurveyStatus,
    pub total_votes: i64,
    /// Server-assigned at creation, never mutated
    pub creation_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        for status in [SurveyStatus::Publish, SurveyStatus::Unpublish] {
            assert_ne!(status.toggled(), status);
            assert_eq!(status.toggled().toggled(), status);
        }
    }

    #[test]
    fn odd_number_of_toggles_flips() {
        let mut status = SurveyStatus::Publish;
        for _ in 0..3 {
            status = status.toggled();
        }
        assert_eq!(status, SurveyStatus::Unpublish);
    }

    #[test]
    fn unknown_stored_status_refuses_to_parse() {
        assert!("draft".parse::<SurveyStatus>().is_err());
    }
}
