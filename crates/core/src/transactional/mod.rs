//! Transactional API (push notifications)

pub mod dual;
pub mod service;

pub use dual::DualTransactionalService;
pub use service::TransactionalService;
