use once_cell::sync::Lazy;
use serde_json::Value;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Stripe secret key is not configured")]
    MissingSecretKey,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("payment processor error: {0}")]
    Upstream(String),
}

static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Create a payment intent for `amount` (in the smallest currency unit) and
/// return the opaque client secret.
///
/// The processor response is never interpreted beyond extracting the secret;
/// failures carry the upstream message through for diagnostics.
pub async fn create_payment_intent(amount: i64) -> Result<String, PaymentError> {
    let payment_config = &config::config().payments;

    if payment_config.stripe_secret_key.is_empty() {
        return Err(PaymentError::MissingSecretKey);
    }

    let params = [
        ("amount", amount.to_string()),
        ("currency", payment_config.currency.clone()),
        ("payment_method_types[]", "card".to_string()),
    ];

    let response = HTTP
        .post(PAYMENT_INTENTS_URL)
        .bearer_auth(&payment_config.stripe_secret_key)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PaymentError::Upstream(body));
    }

    let body: Value = response.json().await?;
    body["client_secret"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PaymentError::Upstream("response missing client_secret".to_string()))
}
