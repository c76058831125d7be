//! LLM Provider implementations for Wayfinder.
//!
//! All providers implement the `wayfinder_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
