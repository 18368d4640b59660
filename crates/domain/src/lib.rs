//! Domain layer for worker-management bug filing
//!
//! Contains the bug types, form input, payloads, filing outcomes and
//! directory records that the rest of the workspace speaks in.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
