//! Shared error taxonomy and value model for the `seal` workspace crates.

pub mod error;
pub mod protocol;

pub use error::SealError;
pub use protocol::Value;
