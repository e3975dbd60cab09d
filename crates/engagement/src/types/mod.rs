//! Shared types for the engagement engine.

pub mod actor;
pub mod errors;

pub use actor::Actor;
pub use errors::{EngagementError, EngagementResult};
