//! Authentication boundary
//!
//! `auth_middleware` turns a request into a [`Principal`] or rejects it with
//! 401. Handlers take `Principal` as an extractor and never look at headers.

pub mod middleware;
pub mod principal;

pub use middleware::{auth_middleware, AuthState};
pub use principal::Principal;
