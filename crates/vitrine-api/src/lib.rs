//! Vitrine API Library
//!
//! This crate provides the HTTP handlers, authentication boundary, error
//! rendering and application setup for the image ingestion service.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod auth;
pub mod constants;
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use auth::Principal;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
