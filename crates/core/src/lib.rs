//! # Wayfinder Core
//!
//! Domain types, traits, and error definitions for the Wayfinder location
//! agent. This crate has **no framework dependencies**. It defines the domain
//! model that the provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (the language model, the geocoder, the search
//! backends) sits behind a trait or a capability object. This enables:
//! - Swapping implementations via configuration
//! - Deterministic tests with stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod location;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use location::LocationRecord;
pub use message::{Conversation, Message, Role};
pub use provider::{ModelHandle, Provider, ProviderRequest, ProviderResponse};
pub use tool::{Action, ParamSpec, ToolDescriptor};
