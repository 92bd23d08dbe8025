use axum::extract::{Path, Query};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Survey;
use crate::database::{surveys, Database};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /surveys/latest - six most recently created surveys
pub async fn latest() -> ApiResult<Vec<Survey>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(surveys::latest(pool).await?))
}

/// GET /surveys/most-voted - six highest vote counts
pub async fn most_voted() -> ApiResult<Vec<Survey>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(surveys::most_voted(pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    /// ISO date; defaults to today (UTC)
    pub as_of: Option<NaiveDate>,
}

/// GET /available-surveys - deadline on or after the given date, any status
pub async fn available(Query(query): Query<AvailableQuery>) -> ApiResult<Vec<Survey>> {
    let pool = Database::pool()?;
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    Ok(ApiResponse::success(
        surveys::list_available(pool, as_of).await?,
    ))
}

/// GET /publish-surveys - published surveys only
pub async fn published() -> ApiResult<Vec<Survey>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(surveys::list_published(pool).await?))
}

/// PATCH /surveys/vote/:id - count one vote.
///
/// No token required; the counter only ever moves up by one per request.
pub async fn vote(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let pool = Database::pool()?;
    surveys::increment_vote(pool, id).await?;
    Ok(ApiResponse::success(json!({
        "message": "Vote counted successfully."
    })))
}
