//! Costbook Web Server
//!
//! Axum-based REST API for the costbook expense tracker.
//!
//! - Monthly reports served live or from the report cache
//! - Input validation with `{"error": ...}` responses
//! - One persisted request log row per request
//! - Restrictive CORS policy and security headers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info};

use costbook_core::{
    AppConfig, CategoryRegistry, Clock, Database, NewRequestLog, ReportMaterializer, SystemClock,
    TeamMember,
};

mod handlers;

/// Response header naming how a report was produced (live, cached, computed)
pub const REPORT_SOURCE_HEADER: &str = "x-report-source";

/// Server configuration
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Categories accepted for new costs and listed in reports
    pub categories: CategoryRegistry,
    /// Returned by the about endpoint
    pub team: Vec<TeamMember>,
}

impl From<AppConfig> for ServerConfig {
    fn from(config: AppConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins,
            categories: config.categories,
            team: config.team,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub materializer: ReportMaterializer,
}

/// `{"data": ...}` response envelope
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// Request log middleware - persists one row per request
///
/// Best effort: a failed write is logged and the response is returned as-is.
async fn request_log_middleware(
    State(state): State<Arc<AppState>>,
    connect_info: Option<axum::extract::ConnectInfo<std::net::SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let ip = connect_info.map(|ci| ci.0.ip().to_string());

    let response = next.run(request).await;

    let entry = NewRequestLog {
        method,
        path,
        status: response.status().as_u16(),
        duration_ms: i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX),
        endpoint,
        ip,
        user_agent,
    };

    let db = state.db.clone();
    match tokio::task::spawn_blocking(move || db.write_request_log(&entry)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => error!(error = %e, "Failed to write request log"),
        Err(e) => error!(error = %e, "Request log task failed"),
    }

    response
}

/// Create the application router using the system clock
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    create_router_with_clock(db, config, Arc::new(SystemClock))
}

/// Create the application router with an explicit clock (for testing)
pub fn create_router_with_clock(
    db: Database,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> Router {
    let materializer = ReportMaterializer::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        config.categories.clone(),
        clock,
    );

    info!(categories = %config.categories, "Report categories");

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        materializer,
    });

    let api_routes = Router::new()
        .route("/report", get(handlers::get_report))
        .route("/add", post(handlers::add))
        .route("/users", get(handlers::list_users))
        .route("/users/:id", get(handlers::get_user))
        .route("/logs", get(handlers::list_logs))
        .route("/about", get(handlers::about));

    // Build CORS layer
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_log_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, config)
        .into_make_service_with_connect_info::<std::net::SocketAddr>();
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error onto a status code
    ///
    /// Client-caused errors keep their message; everything else becomes a 500.
    pub fn from_core(err: costbook_core::Error) -> Self {
        use costbook_core::Error;
        match err {
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::Conflict(msg) => Self::conflict(&msg),
            Error::InvalidData(msg) => Self::bad_request(&msg),
            e @ Error::InvalidPeriod { .. } => Self::bad_request(&e.to_string()),
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
