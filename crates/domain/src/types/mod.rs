//! Domain types and models
//!
//! Request and response shapes for the Batch custom data and transactional
//! APIs, plus the platform identities a dual dispatch fans out to.

pub mod credentials;
pub mod custom_data;
pub mod platform;
pub mod push;

pub use credentials::Credentials;
pub use custom_data::CustomDataRecord;
pub use platform::{DualResponse, Platform};
pub use push::{Message, OptionalFields, Priority, PushRequest, Recipients};
