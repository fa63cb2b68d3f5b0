//! Configuration module for the purge pipeline
//!
//! Holds the static, process-wide settings: stylesheet overrides, the
//! selector safelist, fetch limits and the browser tier the transform chain
//! compiles for. Loaded once at startup and never mutated afterwards.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod loader;
pub mod types;

// Re-exports for public API
pub use builder::PurgeConfigBuilder;
pub use types::{BrowserTargets, ConfigFile, OverrideRule, PurgeConfig, SafelistFile, SafelistSet};
