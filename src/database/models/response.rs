use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One submitted survey response. The survey id is a reference only, not an
/// ownership edge; responses are immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub answer: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

/// Free-form document stored in one of the engagement collections
/// (feedbacks, comments, reports, payments).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredDocument {
    pub id: Uuid,
    pub doc: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
