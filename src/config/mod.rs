//! Configuration module for digest runs
//!
//! This module provides the `DigestConfig` struct and its type-safe builder
//! for configuring a run with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{DigestConfigBuilder, WithSources};
pub use types::DigestConfig;
