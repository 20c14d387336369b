//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, query string)
//! 2. Calls the store or a service
//! 3. Returns HTTP response (JSON, status code)

/// Mocked login and session endpoints
pub mod auth;
/// Call listing, search, stats, details and annotation
pub mod calls;
/// Service health
pub mod health;
/// Organizations and Binotel accounts
pub mod organizations;
