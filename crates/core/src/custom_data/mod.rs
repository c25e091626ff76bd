//! Custom data API (user attributes)

pub mod dual;
pub mod service;

pub use dual::DualCustomDataService;
pub use service::CustomDataService;
