use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{StoredDocument, SurveyResponse};

/// Engagement collections that hold free-form documents. The enum doubles as
/// table-name validation: only these four tables are ever interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Feedbacks,
    Comments,
    Reports,
    Payments,
}

impl Collection {
    fn table(&self) -> &'static str {
        match self {
            Collection::Feedbacks => "feedbacks",
            Collection::Comments => "comments",
            Collection::Reports => "reports",
            Collection::Payments => "payments",
        }
    }
}

/// Insert a free-form document into an engagement collection.
pub async fn insert(
    pool: &PgPool,
    collection: Collection,
    doc: Value,
) -> Result<StoredDocument, StoreError> {
    let stored = sqlx::query_as::<_, StoredDocument>(&format!(
        "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING id, doc, created_at",
        collection.table()
    ))
    .bind(Uuid::new_v4())
    .bind(doc)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

pub async fn list(pool: &PgPool, collection: Collection) -> Result<Vec<StoredDocument>, StoreError> {
    let docs = sqlx::query_as::<_, StoredDocument>(&format!(
        "SELECT id, doc, created_at FROM {} ORDER BY created_at",
        collection.table()
    ))
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// Record a submitted response. Responses are insert-only and immutable.
pub async fn insert_response(
    pool: &PgPool,
    survey_id: Uuid,
    answer: Value,
) -> Result<SurveyResponse, StoreError> {
    let response = sqlx::query_as::<_, SurveyResponse>(
        "INSERT INTO responses (id, survey_id, answer)
         VALUES ($1, $2, $3)
         RETURNING id, survey_id, answer, submitted_at",
    )
    .bind(Uuid::new_v4())
    .bind(survey_id)
    .bind(answer)
    .fetch_one(pool)
    .await?;

    Ok(response)
}

pub async fn list_responses(pool: &PgPool) -> Result<Vec<SurveyResponse>, StoreError> {
    let responses = sqlx::query_as::<_, SurveyResponse>(
        "SELECT id, survey_id, answer, submitted_at FROM responses ORDER BY submitted_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(responses)
}

pub async fn find_response(pool: &PgPool, id: Uuid) -> Result<Option<SurveyResponse>, StoreError> {
    let response = sqlx::query_as::<_, SurveyResponse>(
        "SELECT id, survey_id, answer, submitted_at FROM responses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(response)
}
