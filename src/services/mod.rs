//! Business logic services.
//!
//! Services hold logic that is independent of HTTP: session tokens,
//! recording URLs and statistics.

pub mod session_service;
pub mod stats_service;
pub mod storage;
