use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::documents::{self, Collection};
use crate::database::models::StoredDocument;
use crate::database::Database;
use crate::middleware::{ApiResponse, ApiResult};
use crate::payments;

/// GET /payments - stored payment records
pub async fn list_payments() -> ApiResult<Vec<StoredDocument>> {
    let pool = Database::pool()?;
    Ok(ApiResponse::success(
        documents::list(pool, Collection::Payments).await?,
    ))
}

/// POST /payments - store an opaque payment record
pub async fn record_payment(Json(doc): Json<Value>) -> ApiResult<StoredDocument> {
    let pool = Database::pool()?;
    Ok(ApiResponse::created(
        documents::insert(pool, Collection::Payments, doc).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in the smallest currency unit
    pub amount: i64,
}

/// POST /payments/intent - create a payment intent with the processor and
/// hand the opaque client secret back to the caller.
pub async fn create_payment_intent(
    Json(request): Json<PaymentIntentRequest>,
) -> ApiResult<Value> {
    let client_secret = payments::create_payment_intent(request.amount).await?;
    Ok(ApiResponse::success(
        json!({ "clientSecret": client_secret }),
    ))
}
