use axum::extract::{Extension, Path};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::guard;
use crate::database::models::{Role, Survey, SurveyStatus};
use crate::database::{surveys, Database};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

fn default_options() -> Value {
    Value::Array(vec![])
}

#[derive(Debug, Deserialize)]
pub struct CreateSurveyRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_options")]
    pub options: Value,
    pub deadline: NaiveDate,
    pub category: Option<String>,
    /// Defaults to publish when omitted
    pub status: Option<SurveyStatus>,
}

/// POST /api/surveys - create a survey, surveyor or admin
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateSurveyRequest>,
) -> ApiResult<Survey> {
    let pool = Database::pool()?;
    guard::require_role(pool, &auth, &[Role::Surveyor, Role::Admin]).await?;

    let survey = surveys::create(
        pool,
        surveys::NewSurvey {
            title: request.title,
            description: request.description,
            options: request.options,
            deadline: request.deadline,
            category: request.category,
            status: request.status,
        },
    )
    .await?;

    Ok(ApiResponse::created(survey))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSurveyRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_options")]
    pub options: Value,
    pub deadline: NaiveDate,
    pub category: Option<String>,
}

/// PUT /api/surveys/:id - upsert the editable fields of a survey, surveyor
/// or admin. A missing id creates the survey instead of failing.
pub async fn upsert(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSurveyRequest>,
) -> ApiResult<Survey> {
    let pool = Database::pool()?;
    guard::require_role(pool, &auth, &[Role::Surveyor, Role::Admin]).await?;

    let survey = surveys::upsert(
        pool,
        id,
        surveys::SurveyUpdate {
            title: request.title,
            description: request.description,
            options: request.options,
            deadline: request.deadline,
            category: request.category,
        },
    )
    .await?;

    Ok(ApiResponse::success(survey))
}

/// GET /api/surveys - full listing for authenticated callers
pub async fn list(Extension(_auth): Extension<AuthUser>) -> ApiResult<Vec<Survey>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(surveys::list_all(pool).await?))
}

/// PATCH /api/surveys/:id/status - toggle publish/unpublish, admin only.
/// 404 when the survey is absent, 400 when the stored status is outside the
/// two lifecycle states.
pub async fn toggle_status(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Survey> {
    let pool = Database::pool()?;
    guard::require_role(pool, &auth, &[Role::Admin]).await?;

    let survey = surveys::toggle_status(pool, id).await?;
    tracing::info!("Survey {} is now '{}'", survey.id, survey.status);
    Ok(ApiResponse::success(survey))
}
