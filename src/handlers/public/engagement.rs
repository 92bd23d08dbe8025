use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::documents::{self, Collection};
use crate::database::models::{StoredDocument, SurveyResponse};
use crate::database::Database;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ResponseSubmission {
    pub survey_id: Uuid,
    /// Free-form answer payload, stored as-is
    pub answer: Value,
}

/// POST /responses - submit a response. Immutable once inserted.
pub async fn submit_response(Json(submission): Json<ResponseSubmission>) -> ApiResult<SurveyResponse> {
    let pool = Database::pool()?;
    let response =
        documents::insert_response(pool, submission.survey_id, submission.answer).await?;
    Ok(ApiResponse::created(response))
}

/// GET /feedbacks
pub async fn list_feedbacks() -> ApiResult<Vec<StoredDocument>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(
        documents::list(pool, Collection::Feedbacks).await?,
    ))
}

/// POST /feedbacks
pub async fn submit_feedback(Json(doc): Json<Value>) -> ApiResult<StoredDocument> {
    let pool = Database::pool()?;
    Ok(ApiResponse::created(
        documents::insert(pool, Collection::Feedbacks, doc).await?,
    ))
}

/// GET /comments
pub async fn list_comments() -> ApiResult<Vec<StoredDocument>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(
        documents::list(pool, Collection::Comments).await?,
    ))
}

/// POST /comments
pub async fn submit_comment(Json(doc): Json<Value>) -> ApiResult<StoredDocument> {
    let pool = Database::pool()?;
    Ok(ApiResponse::created(
        documents::insert(pool, Collection::Comments, doc).await?,
    ))
}

/// GET /reports
pub async fn list_reports() -> ApiResult<Vec<StoredDocument>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(
        documents::list(pool, Collection::Reports).await?,
    ))
}

/// POST /reports
pub async fn submit_report(Json(doc): Json<Value>) -> ApiResult<StoredDocument> {
    let pool = Database::pool()?;
    Ok(ApiResponse::created(
        documents::insert(pool, Collection::Reports, doc).await?,
    ))
}
