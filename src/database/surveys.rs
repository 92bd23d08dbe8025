use chrono::NaiveDate;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{Survey, SurveyStatus};

const SURVEY_COLUMNS: &str =
    "id, title, description, options, deadline, category, status, total_votes, creation_time";

/// Fixed page size for the ranking queries
const RANKING_PAGE_SIZE: i64 = 6;

#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
    pub description: Option<String>,
    pub options: Value,
    pub deadline: NaiveDate,
    pub category: Option<String>,
    /// Defaults to `publish` when the caller leaves it out
    pub status: Option<SurveyStatus>,
}

#[derive(Debug, Clone)]
pub struct SurveyUpdate {
    pub title: String,
    pub description: Option<String>,
    pub options: Value,
    pub deadline: NaiveDate,
    pub category: Option<String>,
}

/// Create a survey. The creation timestamp is server-assigned and the vote
/// counter starts at zero; neither is ever accepted from the caller.
pub async fn create(pool: &PgPool, new_survey: NewSurvey) -> Result<Survey, StoreError> {
    let survey = sqlx::query_as::<_, Survey>(&format!(
        "INSERT INTO surveys (id, title, description, options, deadline, category, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {SURVEY_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new_survey.title)
    .bind(&new_survey.description)
    .bind(&new_survey.options)
    .bind(new_survey.deadline)
    .bind(&new_survey.category)
    .bind(new_survey.status.unwrap_or(SurveyStatus::Publish))
    .fetch_one(pool)
    .await?;

    Ok(survey)
}

/// Upsert the editable fields of a survey by id. When the id does not exist
/// a new survey is created instead of failing; status, vote counter and
/// creation time fall back to their column defaults on that path.
pub async fn upsert(pool: &PgPool, id: Uuid, update: SurveyUpdate) -> Result<Survey, StoreError> {
    let survey = sqlx::query_as::<_, Survey>(&format!(
        "INSERT INTO surveys (id, title, description, options, deadline, category)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE SET
             title = EXCLUDED.title,
             description = EXCLUDED.description,
             options = EXCLUDED.options,
             deadline = EXCLUDED.deadline,
             category = EXCLUDED.category
         RETURNING {SURVEY_COLUMNS}"
    ))
    .bind(id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(&update.options)
    .bind(update.deadline)
    .bind(&update.category)
    .fetch_one(pool)
    .await?;

    Ok(survey)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Survey>, StoreError> {
    let surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM surveys ORDER BY creation_time DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(surveys)
}

/// Surveys whose deadline is on or after `as_of`, independent of status.
pub async fn list_available(pool: &PgPool, as_of: NaiveDate) -> Result<Vec<Survey>, StoreError> {
    let surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM surveys WHERE deadline >= $1 ORDER BY deadline"
    ))
    .bind(as_of)
    .fetch_all(pool)
    .await?;

    Ok(surveys)
}

pub async fn list_published(pool: &PgPool) -> Result<Vec<Survey>, StoreError> {
    let surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM surveys WHERE status = $1 ORDER BY creation_time DESC"
    ))
    .bind(SurveyStatus::Publish)
    .fetch_all(pool)
    .await?;

    Ok(surveys)
}

/// Most recently created surveys, fixed page of six.
pub async fn latest(pool: &PgPool) -> Result<Vec<Survey>, StoreError> {
    let surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM surveys ORDER BY creation_time DESC LIMIT $1"
    ))
    .bind(RANKING_PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    Ok(surveys)
}

/// Highest vote counts first, fixed page of six.
pub async fn most_voted(pool: &PgPool) -> Result<Vec<Survey>, StoreError> {
    let surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {SURVEY_COLUMNS} FROM surveys ORDER BY total_votes DESC LIMIT $1"
    ))
    .bind(RANKING_PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    Ok(surveys)
}

/// Add exactly one vote. A single in-place increment, so concurrent votes
/// against the same survey are never lost.
pub async fn increment_vote(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE surveys SET total_votes = total_votes + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(format!("Survey not found: {}", id)));
    }

    Ok(())
}

/// Flip a survey between `publish` and `unpublish`.
///
/// The next state comes from the `SurveyStatus::toggled` table; the write is
/// a compare-and-set on the observed status, matching the escalation path.
pub async fn toggle_status(pool: &PgPool, id: Uuid) -> Result<Survey, StoreError> {
    let current: Option<String> = sqlx::query_scalar("SELECT status FROM surveys WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let current =
        current.ok_or_else(|| StoreError::NotFound(format!("Survey not found: {}", id)))?;

    let next = current
        .parse::<SurveyStatus>()
        .map(|status| status.toggled())
        .map_err(|_| {
            StoreError::InvalidState(format!("Status cannot be updated from '{}'", current))
        })?;

    sqlx::query_as::<_, Survey>(&format!(
        "UPDATE surveys SET status = $2 WHERE id = $1 AND status = $3 RETURNING {SURVEY_COLUMNS}"
    ))
    .bind(id)
    .bind(next)
    .bind(&current)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        StoreError::InvalidState(format!("Status changed concurrently from '{}'", current))
    })
}
