//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use vitrine_core::models;

/// Returns the OpenAPI spec served by the router
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vitrine API",
        version = "0.1.0",
        description = "Image ingestion for a statically served site. Uploads are validated, resized into a bounding box, re-encoded as WebP and written under the public root with an SEO-friendly name."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadResult,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "images", description = "Image upload and optimization"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
