use crate::auth::Principal;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use vitrine_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub admin_api_token: String,
}

impl AuthState {
    pub fn new(admin_api_token: impl Into<String>) -> Self {
        Self {
            admin_api_token: admin_api_token.into(),
        }
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized(reason: &str) -> Response {
    HttpAppError(AppError::Unauthorized(reason.to_string())).into_response()
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => return unauthorized("Missing authorization header"),
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return unauthorized("Invalid authorization header format");
    };

    if !secure_compare(token.trim(), &auth_state.admin_api_token) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with invalid API token"
        );
        return unauthorized("Invalid API token");
    }

    request.extensions_mut().insert(Principal::Admin);
    next.run(request).await
}
