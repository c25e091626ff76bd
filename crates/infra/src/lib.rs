//! # BatchPush Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - Configuration loading (environment, `.env`, TOML and JSON files)
//! - Tracing subscriber setup
//! - [`BatchClients`], which wires both dual services from a `BatchConfig`
//!
//! ## Architecture
//! - Implements traits defined in `batchpush-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod clients;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use clients::BatchClients;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
