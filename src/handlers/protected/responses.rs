use axum::extract::{Extension, Path};
use uuid::Uuid;

use crate::database::models::SurveyResponse;
use crate::database::{documents, Database};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/responses - surveyor view of submitted responses
pub async fn list(Extension(_auth): Extension<AuthUser>) -> ApiResult<Vec<SurveyResponse>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(documents::list_responses(pool).await?))
}

/// GET /api/responses/:id
pub async fn get_by_id(
    Extension(_auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<SurveyResponse> {
    let pool = Database::pool()?;

    documents::find_response(pool, id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Response not found: {}", id)))
}
