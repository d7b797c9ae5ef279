//! HTTP transport for TaskMaster.
//!
//! # Responsibility
//! - Serve the GraphQL endpoint and a health probe over axum.
//! - Own cookie sessions, CORS and request timeouts.
//! - Resolve the caller once per request and hand it to the schema.

pub mod config;
pub mod schema;
pub mod session;
pub mod state;

pub use config::{Config, ConfigError, Overrides};
pub use schema::{build_schema, TaskMasterSchema};
pub use state::AppState;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::Duration as CookieDuration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

#[derive(Clone)]
struct RouterState {
    schema: TaskMasterSchema,
}

/// Builds the application router with its middleware stack.
///
/// # Errors
/// - Returns an error when the configured CORS origin is not a valid header value.
pub fn build_router(config: &Config, state: AppState) -> Result<Router, ConfigError> {
    let origin = HeaderValue::from_str(config.server.cors_origin.trim()).map_err(|err| {
        ConfigError::Invalid(format!(
            "server.cors_origin `{}`: {err}",
            config.server.cors_origin
        ))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.session.cookie_name.clone())
        .with_secure(config.session.secure_cookie)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(CookieDuration::seconds(
            config.session.inactivity_secs,
        )));

    let router_state = RouterState {
        schema: build_schema(state),
    };

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/graphql", post(handle_graphql))
        .with_state(router_state)
        .layer(sessions)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        )))
}

/// GET /health
async fn handle_health() -> &'static str {
    "ok"
}

/// POST /graphql
async fn handle_graphql(
    State(state): State<RouterState>,
    session: Session,
    Json(request): Json<async_graphql::Request>,
) -> Response {
    let started_at = Instant::now();

    let request_session = match session::load(&session).await {
        Ok(loaded) => Arc::new(loaded),
        Err(err) => {
            error!("event=graphql_request module=server status=error error_code=session_load_failed error={err}");
            return session_failure();
        }
    };
    let authenticated = request_session.current().is_authenticated();

    let response = state
        .schema
        .execute(request.data(Arc::clone(&request_session)))
        .await;

    if let Err(err) = session::commit(&session, &request_session).await {
        error!("event=graphql_request module=server status=error error_code=session_commit_failed error={err}");
        return session_failure();
    }

    info!(
        "event=graphql_request module=server status={} authenticated={} errors={} duration_ms={}",
        if response.is_ok() { "ok" } else { "error" },
        authenticated,
        response.errors.len(),
        started_at.elapsed().as_millis()
    );
    Json(response).into_response()
}

fn session_failure() -> Response {
    let body = serde_json::json!({
        "data": null,
        "errors": [{
            "message": "session store unavailable",
            "extensions": { "code": "STORE_UNAVAILABLE" },
        }],
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
