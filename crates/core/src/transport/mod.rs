//! HTTP transport port and the request executor built on it

mod executor;
pub mod ports;

pub use executor::{classify_response, RequestExecutor};
