//! # noteplex-core
//!
//! Core types, traits, and abstractions for the noteplex backend.
//!
//! This crate provides the foundational data structures and trait
//! definitions that other noteplex crates depend on: domain models,
//! repository contracts, the error type, the event bus, and identifier
//! generation.

pub mod defaults;
pub mod error;
pub mod events;
pub mod ids;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{EventActor, EventBus, EventContext, EventEnvelope, ServerEvent};
pub use models::*;
pub use traits::*;
