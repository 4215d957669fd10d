//! Command-line overrides shared by morphforge binaries.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Configuration overrides accepted on the command line.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default)]
pub struct CliArgs {
    /// Morph catalog (RON) to use instead of the built-in one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output directory for export documents.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Up-axis extent above which meshes without unit metadata are read as centimeters.
    #[arg(long)]
    pub unit_threshold: Option<f64>,

    /// Largest share of the mesh a single morph may touch before it is flagged.
    #[arg(long)]
    pub max_affected_fraction: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.catalog {
            self.catalog.path = Some(path.clone());
        }
        if let Some(ref dir) = args.output {
            self.export.output_dir = dir.clone();
        }
        if let Some(threshold) = args.unit_threshold {
            self.analysis.unit_threshold = threshold;
        }
        if let Some(fraction) = args.max_affected_fraction {
            self.analysis.max_affected_fraction = fraction;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
