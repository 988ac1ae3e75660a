//! `rolegate-core` — shared kernel for the admin API.
//!
//! This crate contains the pieces every layer agrees on: strongly-typed
//! identifiers, the API error taxonomy, and the response payload shape that
//! ends up inside every encrypted envelope.

pub mod error;
pub mod id;
pub mod response;

pub use error::ApiError;
pub use id::{ModuleId, RoleId, UserId};
pub use response::ResponsePayload;
