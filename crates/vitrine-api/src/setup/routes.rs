//! Router assembly: API routes, docs, static fallback and HTTP layers

use crate::api_doc::get_openapi_spec;
use crate::auth::{auth_middleware, AuthState};
use crate::constants::{API_PREFIX, IMAGES_PATH, OPENAPI_PATH};
use crate::handlers::{health::health_check, image_upload::upload_image};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use vitrine_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(config.admin_api_token()));
    let body_limit = upload_body_limit(config.upload().max_file_size_bytes);

    // Multipart reads past the limit fail inside the handler, which renders
    // them as a JSON PAYLOAD_TOO_LARGE
    let protected_routes = Router::new()
        .route(&format!("{}{}", API_PREFIX, IMAGES_PATH), post(upload_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));
    let public_routes = Router::new().route("/health", get(health_check));

    let app_state_routes = public_routes.merge(protected_routes).with_state(state);

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit,
        body_limit_bytes = body_limit,
        "HTTP limits configured"
    );

    let app = app_state_routes
        .route(OPENAPI_PATH, get(|| async { Json(get_openapi_spec()) }))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"))
        .fallback_service(ServeDir::new(&config.upload().public_root))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Body ceiling for the upload route.
///
/// Twice the file limit, so a file slightly over the limit is read in full
/// and rejected by the validation gate with its size in the message.
pub fn upload_body_limit(max_file_size_bytes: usize) -> usize {
    max_file_size_bytes.saturating_mul(2)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
