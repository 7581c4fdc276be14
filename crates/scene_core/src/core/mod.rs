//! # Core Module
//!
//! Shared abstractions used by the loaders and the scene graph.
//!
//! ## Organization
//!
//! - **Config**: Asset configuration (base resource location)

pub mod config;

// Re-export commonly used config types
pub use config::{
    AssetConfig,
    Config,
    ConfigError,
};
