//! API constants
//!
//! Route prefixes shared by the router, handler annotations and tests.

/// Versioned prefix for all API routes
pub const API_PREFIX: &str = "/api/v0";

/// Image ingestion route, relative to [`API_PREFIX`]
pub const IMAGES_PATH: &str = "/images";

/// OpenAPI document route
pub const OPENAPI_PATH: &str = "/api/openapi.json";
