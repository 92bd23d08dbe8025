use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use survey_shark_api::config;
use survey_shark_api::database::Database;
use survey_shark_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ACCESS_TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Survey Shark API in {:?} mode", config.environment);

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Survey Shark server is running on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API behind the bearer-token guard
        .merge(protected_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use axum::routing::{patch, post};
    use survey_shark_api::handlers::public::{auth, engagement, payments, surveys};

    Router::new()
        // Token issuance and idempotent registration
        .route("/jwt", post(auth::issue_token))
        .route("/users", post(auth::register))
        // Survey listings and rankings
        .route("/surveys/latest", get(surveys::latest))
        .route("/surveys/most-voted", get(surveys::most_voted))
        .route("/available-surveys", get(surveys::available))
        .route("/publish-surveys", get(surveys::published))
        // Voting
        .route("/surveys/vote/:id", patch(surveys::vote))
        // Engagement collections
        .route("/responses", post(engagement::submit_response))
        .route(
            "/feedbacks",
            get(engagement::list_feedbacks).post(engagement::submit_feedback),
        )
        .route(
            "/comments",
            get(engagement::list_comments).post(engagement::submit_comment),
        )
        .route(
            "/reports",
            get(engagement::list_reports).post(engagement::submit_report),
        )
        // Payments
        .route(
            "/payments",
            get(payments::list_payments).post(payments::record_payment),
        )
        .route("/payments/intent", post(payments::create_payment_intent))
}

fn protected_routes() -> Router {
    use axum::routing::{patch, put};
    use survey_shark_api::handlers::protected::{responses, surveys, users};

    Router::new()
        // User management
        .route("/api/users", get(users::list))
        .route("/api/users/admin/:email", get(users::is_admin))
        .route("/api/users/surveyor/:email", get(users::is_surveyor))
        .route("/api/users/pro-user/:email", get(users::is_pro_user))
        .route(
            "/api/users/:email",
            get(users::get_by_email)
                .patch(users::set_role)
                .delete(users::delete),
        )
        .route("/api/users/:email/escalate", patch(users::escalate))
        // Survey management
        .route("/api/surveys", get(surveys::list).post(surveys::create))
        .route("/api/surveys/:id", put(surveys::upsert))
        .route("/api/surveys/:id/status", patch(surveys::toggle_status))
        // Response views
        .route("/api/responses", get(responses::list))
        .route("/api/responses/:id", get(responses::get_by_id))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;

    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<axum::http::HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Survey Shark API",
            "version": version,
            "description": "Survey platform backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "token": "/jwt (public - token acquisition)",
                "register": "/users (public)",
                "surveys": "/surveys/latest, /surveys/most-voted, /available-surveys, /publish-surveys (public)",
                "vote": "/surveys/vote/:id (public)",
                "engagement": "/responses, /feedbacks, /comments, /reports (public)",
                "payments": "/payments, /payments/intent (public)",
                "users_admin": "/api/users[/:email] (protected)",
                "role_predicates": "/api/users/{admin,surveyor,pro-user}/:email (protected, identity-bound)",
                "survey_admin": "/api/surveys[/:id], /api/surveys/:id/status (protected)",
                "responses_admin": "/api/responses[/:id] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match Database::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
