//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the camelCase request/response types built from them.

/// AI-generated sentiment and summary
pub mod analysis;
/// Phone call records, filters and annotations
pub mod call;
/// Tenants and telephony accounts
pub mod organization;
/// Mocked login types
pub mod session;
/// Speech-to-text output
pub mod transcript;
