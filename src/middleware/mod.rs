//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.

/// Session token authentication middleware
pub mod auth;
