//! noteplex-api - HTTP API server for noteplex

mod auth;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use noteplex_core::{defaults, EventBus, EventEnvelope, NoteVisitRepository, ServerEvent};
use noteplex_db::Database;

use handlers::{files, join, note_settings, notes, uploads};
use state::AppState;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// CORS
// =============================================================================

fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str =
        std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![HeaderValue::from_static("http://localhost:3000")];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// EVENT CONSUMERS
// =============================================================================

/// Record note visits from the event bus.
///
/// Visits are fire-and-forget: a lagged receiver drops events rather
/// than back-pressuring request handling, and a failed write is logged
/// and skipped.
async fn visit_recorder(mut rx: broadcast::Receiver<EventEnvelope>, db: Database) {
    loop {
        match rx.recv().await {
            Ok(envelope) => {
                if let ServerEvent::NoteVisited { note_id, user_id } = envelope.payload {
                    if let Err(err) = db.visits.record_visit(note_id, user_id).await {
                        warn!(
                            subsystem = "api",
                            component = "visit_recorder",
                            note_id,
                            user_id,
                            error = %err,
                            "Failed to record note visit"
                        );
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(
                    subsystem = "api",
                    component = "visit_recorder",
                    skipped,
                    "Visit recorder lagged behind the event bus"
                );
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

// =============================================================================
// RATE LIMITING
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            warn!("Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "rate_limit_exceeded",
                    "error_description": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "noteplex_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "noteplex_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("noteplex-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/noteplex".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| defaults::SERVER_PORT.to_string())
        .parse()
        .unwrap_or(defaults::SERVER_PORT);

    // Rate limiting configuration
    // RATE_LIMIT_REQUESTS: requests per period (default: 100)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60)
    let rate_limit_requests: u64 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| defaults::RATE_LIMIT_REQUESTS.to_string())
        .parse()
        .unwrap_or(defaults::RATE_LIMIT_REQUESTS);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| defaults::RATE_LIMIT_PERIOD_SECS.to_string())
        .parse()
        .unwrap_or(defaults::RATE_LIMIT_PERIOD_SECS);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        rate_limit_requests,
        rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect_with_config(&database_url, noteplex_db::PoolConfig::from_env()).await?;
    noteplex_db::log_pool_status(db.pool());
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Create the event bus and start the visit recorder
    let event_bus = Arc::new(EventBus::new(defaults::EVENT_BUS_CAPACITY));
    let recorder_rx = event_bus.subscribe();
    let recorder_db = db.clone();
    tokio::spawn(async move {
        visit_recorder(recorder_rx, recorder_db).await;
    });

    // Create rate limiter if enabled
    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .expect("Rate limit period must be non-zero")
            .allow_burst(
                NonZeroU32::new(rate_limit_requests as u32).expect("Rate limit must be non-zero"),
            );
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    // Create app state
    let state = AppState::new(db, event_bus, rate_limiter);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Invitation redemption
        .route("/join/:hash", post(join::join_by_hash))
        // Note settings and team management
        .route(
            "/note-settings/:note_public_id",
            get(note_settings::get_settings).patch(note_settings::patch_settings),
        )
        .route(
            "/note-settings/:note_public_id/invitation-hash",
            patch(note_settings::regenerate_invitation_hash),
        )
        .route(
            "/note-settings/:note_public_id/team",
            get(note_settings::get_team).patch(note_settings::patch_team),
        )
        .route(
            "/note-settings/:note_public_id/team/:user_id",
            delete(note_settings::remove_team_member),
        )
        // Notes CRUD
        .route("/notes", post(notes::create_note))
        .route(
            "/notes/:note_public_id",
            get(notes::get_note)
                .patch(notes::patch_note)
                .delete(notes::delete_note),
        )
        .route(
            "/notes/:note_public_id/relation",
            put(notes::set_relation).delete(notes::delete_relation),
        )
        // Files
        .route("/uploads", post(uploads::upload_file))
        .route("/files/:key", get(files::get_file))
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(defaults::CORS_MAX_AGE_SECS))
        })
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_SIZE_BYTES))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
