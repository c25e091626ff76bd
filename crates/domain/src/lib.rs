//! # BatchPush Domain
//!
//! Domain types and models for the dual-target Batch client.
//!
//! This crate contains:
//! - Request types (credentials, recipients, messages, optional fields,
//!   custom data records)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Vendor constants (API domain, versions, paths, default field values)
//!
//! ## Architecture
//! - No dependencies on other BatchPush crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
