// Mythic Profile - Web Server
// REST API with Axum over the profile engine

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use mythic_profile::{
    get_events_for_entity, init_logging, open_database, upsert_user, AstrologyProfile, Config,
    Event, ProfileEngine, ProfileError, ProfileStatus, UserBirthDetails, PROFILE_ENTITY,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    engine: Arc<ProfileEngine>,
}

impl AppState {
    fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            engine: Arc::new(ProfileEngine::new().with_actor("api")),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::internal("database lock poisoned"))
    }
}

/// API Response wrapper
#[derive(Serialize, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Body of PUT /api/users/:user_id
#[derive(Debug, Deserialize)]
struct UserBody {
    name: Option<String>,
    birth_date: Option<String>,
    birth_time: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        let status = match &err {
            ProfileError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            ProfileError::BirthDateRequired { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ProfileError::InvalidBirthDate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ProfileError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %err, "request failed");
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ProfileError::Storage(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::failure(self.message))).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// PUT /api/users/:user_id - Store birth details
async fn put_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<UserBody>,
) -> Result<Json<ApiResponse<UserBirthDetails>>, ApiError> {
    let details = UserBirthDetails {
        user_id,
        name: body.name,
        birth_date: body.birth_date,
        birth_time: body.birth_time,
    };

    let conn = state.conn()?;
    upsert_user(&conn, &details)?;

    Ok(Json(ApiResponse::ok(details)))
}

/// POST /api/profiles/:user_id/compute - Compute and store the profile
async fn compute_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<AstrologyProfile>>, ApiError> {
    let conn = state.conn()?;
    let profile = state.engine.upsert_profile(&*conn, &*conn, &user_id)?;

    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/profiles/:user_id - Latest stored profile or {"status": "not_computed"}
async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<ProfileStatus>>, ApiError> {
    let conn = state.conn()?;
    let status = state.engine.get_profile(&*conn, &user_id)?;

    Ok(Json(ApiResponse::ok(status)))
}

/// GET /api/profiles/:user_id/events - Audit trail for a profile
async fn get_profile_events(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Event>>>, ApiError> {
    let conn = state.conn()?;
    let events = get_events_for_entity(&conn, PROFILE_ENTITY, &user_id)?;

    Ok(Json(ApiResponse::ok(events)))
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/users/:user_id", put(put_user))
        .route("/profiles/:user_id", get(get_profile))
        .route("/profiles/:user_id/compute", post(compute_profile))
        .route("/profiles/:user_id/events", get(get_profile_events))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&Config::log_filter());
    let config = Config::load()?;

    info!("🌐 Mythic Profile - Web Server v{}", mythic_profile::VERSION);

    let conn = open_database(&config.db_path)?;
    info!("✓ Database opened: {:?}", config.db_path);

    let app = build_router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("🚀 Server running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use mythic_profile::setup_database;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        build_router(AppState::new(conn))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_compute_then_read() {
        let app = test_app();

        let (status, _) = send(
            &app,
            "PUT",
            "/api/users/u1",
            Some(r#"{"name":"ANNA","birth_date":"1990-07-16","birth_time":"14:05"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/profiles/u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "not_computed");

        let (status, body) = send(&app, "POST", "/api/profiles/u1/compute", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["sun_sign"], "Cancer");
        assert_eq!(body["data"]["life_path"], 6);
        assert_eq!(body["data"]["destiny"], 3);

        let (_, body) = send(&app, "GET", "/api/profiles/u1", None).await;
        assert_eq!(body["data"]["status"], "computed");
        assert_eq!(body["data"]["profile"]["full_data"]["birth_time"], "14:05");

        let (_, body) = send(&app, "GET", "/api/profiles/u1/events", None).await;
        assert_eq!(body["data"][0]["event_type"], "profile_created");
    }

    #[tokio::test]
    async fn test_missing_birth_date_is_unprocessable() {
        let app = test_app();
        send(&app, "PUT", "/api/users/u2", Some(r#"{"name":"Lynn"}"#)).await;

        let (status, body) = send(&app, "POST", "/api/profiles/u2/compute", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("birth date required"));

        let (_, body) = send(&app, "GET", "/api/profiles/u2", None).await;
        assert_eq!(body["data"]["status"], "not_computed");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let app = test_app();
        let (status, _) = send(&app, "POST", "/api/profiles/ghost/compute", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
