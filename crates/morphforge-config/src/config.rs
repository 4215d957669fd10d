//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use morphforge_mesh::DEFAULT_UNIT_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "morphforge";

/// Default share of a mesh a face morph may touch before it is flagged.
pub const DEFAULT_MAX_AFFECTED_FRACTION: f64 = 0.5;

/// Top-level morphforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mesh analysis heuristics.
    pub analysis: AnalysisConfig,
    /// Anthropometric ratios used to place landmarks.
    pub proportions: ProportionTable,
    /// Morph catalog source.
    pub catalog: CatalogConfig,
    /// Export settings.
    pub export: ExportConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Heuristics applied while analyzing a base mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Up-axis extent above which a mesh without unit metadata is read as centimeters.
    pub unit_threshold: f64,
    /// Share of the mesh a single morph may touch before it is reported as excessive.
    pub max_affected_fraction: f64,
}

/// Face landmark fractions, measured down from the head top in units of face height.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceProportions {
    pub forehead: f64,
    pub eyebrow: f64,
    pub eye: f64,
    pub cheek: f64,
    pub nose: f64,
    pub mouth: f64,
    pub jaw: f64,
    pub chin: f64,
}

/// Body landmark fractions, measured down from the head top in units of mesh height.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyProportions {
    pub shoulder: f64,
    pub torso_top: f64,
    pub torso_bottom: f64,
}

/// Anthropometric table driving landmark estimation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProportionTable {
    /// Head length as a fraction of total height.
    pub head_fraction: f64,
    /// Face length as a fraction of total height.
    pub face_fraction: f64,
    /// Face width relative to face length.
    pub face_width_ratio: f64,
    /// Face landmark fractions.
    pub face: FaceProportions,
    /// Body landmark fractions.
    pub body: BodyProportions,
}

/// Where the morph catalog comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// External catalog file. `None` uses the catalog built into the binary.
    pub path: Option<PathBuf>,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export documents are written to.
    pub output_dir: PathBuf,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            unit_threshold: DEFAULT_UNIT_THRESHOLD,
            max_affected_fraction: DEFAULT_MAX_AFFECTED_FRACTION,
        }
    }
}

impl Default for FaceProportions {
    fn default() -> Self {
        Self {
            forehead: 0.15,
            eyebrow: 0.25,
            eye: 0.35,
            cheek: 0.50,
            nose: 0.60,
            mouth: 0.75,
            jaw: 0.90,
            chin: 0.95,
        }
    }
}

impl Default for BodyProportions {
    fn default() -> Self {
        Self {
            shoulder: 0.18,
            torso_top: 0.125,
            torso_bottom: 0.75,
        }
    }
}

impl Default for ProportionTable {
    fn default() -> Self {
        Self {
            head_fraction: 0.125,
            face_fraction: 0.10,
            face_width_ratio: 0.80,
            face: FaceProportions::default(),
            body: BodyProportions::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("morphs"),
            pretty: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

// --- Validation ---

impl ProportionTable {
    /// Checks that every ratio is finite and inside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, f64); 14] = [
            ("proportions.head_fraction", self.head_fraction),
            ("proportions.face_fraction", self.face_fraction),
            ("proportions.face_width_ratio", self.face_width_ratio),
            ("proportions.face.forehead", self.face.forehead),
            ("proportions.face.eyebrow", self.face.eyebrow),
            ("proportions.face.eye", self.face.eye),
            ("proportions.face.cheek", self.face.cheek),
            ("proportions.face.nose", self.face.nose),
            ("proportions.face.mouth", self.face.mouth),
            ("proportions.face.jaw", self.face.jaw),
            ("proportions.face.chin", self.face.chin),
            ("proportions.body.shoulder", self.body.shoulder),
            ("proportions.body.torso_top", self.body.torso_top),
            ("proportions.body.torso_bottom", self.body.torso_bottom),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a ratio in (0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Config {
    /// Rejects values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.analysis.unit_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::Invalid {
                field: "analysis.unit_threshold",
                reason: format!("must be positive and finite, got {threshold}"),
            });
        }
        let fraction = self.analysis.max_affected_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "analysis.max_affected_fraction",
                reason: format!("expected a fraction in (0, 1], got {fraction}"),
            });
        }
        self.proportions.validate()
    }

    /// Platform config directory for morphforge (`<config_dir>/morphforge`).
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
