//! Configuration system for morphforge.
//!
//! Provides runtime-configurable settings that persist to disk as RON files:
//! the unit-detection threshold, the anthropometric proportion table used for
//! landmark estimation, catalog and export locations. Supports CLI overrides
//! via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnalysisConfig, BodyProportions, CatalogConfig, Config, DEFAULT_MAX_AFFECTED_FRACTION,
    DebugConfig, ExportConfig, FaceProportions, ProportionTable,
};
pub use error::ConfigError;
