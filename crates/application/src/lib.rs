//! Application layer - Use cases and orchestration
//!
//! Builds bug payloads from validated form input and files them against the
//! tracker. Defines the ports the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
