//! # BatchPush Core
//!
//! Dispatch logic for the Batch custom data and transactional APIs. No HTTP
//! client code lives here.
//!
//! This crate contains:
//! - The `HttpTransport` port and the `RequestExecutor` that classifies
//!   responses into `BatchError`s
//! - Single-target services (one Batch application each)
//! - Dual-target coordinators that send every call to the iOS and Android
//!   applications and reconcile both outcomes
//!
//! ## Architecture Principles
//! - Only depends on `batchpush-domain`
//! - The network is reached through `HttpTransport` only
//! - Both targets of a dual call run concurrently and never share state

pub mod custom_data;
pub mod dispatch;
pub mod transactional;
pub mod transport;

pub use custom_data::{CustomDataService, DualCustomDataService};
pub use dispatch::{merge_failures, reconcile_errors, DualOutcome};
pub use transactional::{DualTransactionalService, TransactionalService};
pub use transport::ports::{HttpResponse, HttpTransport, PostRequest, TransportError};
pub use transport::RequestExecutor;
