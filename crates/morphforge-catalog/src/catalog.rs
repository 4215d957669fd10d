//! Morph catalog: the validated, immutable table of morph definitions.
//!
//! Loaded once from a versioned RON manifest and shared read-only by every
//! pipeline run.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::definition::MorphDefinition;
use crate::error::CatalogError;
use crate::name::MorphName;

/// Schema version understood by this build.
pub const CATALOG_VERSION: u32 = 1;

const BUILTIN_CATALOG: &str = include_str!("../assets/morph_catalog.ron");

// ---------------------------------------------------------------------------
// RON manifest
// ---------------------------------------------------------------------------

/// Top-level RON manifest, written as `MorphCatalog(version: 1, morphs: [...])`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "MorphCatalog")]
pub struct CatalogManifest {
    /// Schema version; must equal [`CATALOG_VERSION`].
    pub version: u32,
    /// Morph definitions.
    pub morphs: Vec<MorphDefinition>,
}

// ---------------------------------------------------------------------------
// MorphCatalog
// ---------------------------------------------------------------------------

/// Validated morph definitions with name lookup.
///
/// Immutable after construction; iteration follows manifest order.
#[derive(Debug, Clone)]
pub struct MorphCatalog {
    version: u32,
    definitions: Vec<MorphDefinition>,
    name_to_index: HashMap<MorphName, usize>,
}

impl MorphCatalog {
    /// Load a catalog from a RON manifest file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on I/O, parse, or validation failures.
    pub fn from_ron(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_ron_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            version = catalog.version,
            morphs = catalog.len(),
            "loaded morph catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on parse or validation failures.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, CatalogError> {
        let manifest: CatalogManifest = ron::from_str(ron_str)?;
        Self::from_manifest(manifest)
    }

    /// The catalog shipped with morphforge.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded asset is broken, which the test suite guards.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    /// Validate a manifest and index it by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for an unsupported version, an empty or
    /// duplicated name list, or an invalid definition.
    pub fn from_manifest(manifest: CatalogManifest) -> Result<Self, CatalogError> {
        if manifest.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: manifest.version,
                supported: CATALOG_VERSION,
            });
        }
        if manifest.morphs.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut name_to_index = HashMap::with_capacity(manifest.morphs.len());
        for (index, def) in manifest.morphs.iter().enumerate() {
            if name_to_index.insert(def.name, index).is_some() {
                return Err(CatalogError::DuplicateName(def.name));
            }
            def.validate()
                .map_err(|source| CatalogError::InvalidDefinition {
                    name: def.name,
                    source,
                })?;
        }

        Ok(Self {
            version: manifest.version,
            definitions: manifest.morphs,
            name_to_index,
        })
    }

    /// Serialize back to a RON manifest, e.g. to seed an editable catalog file.
    pub fn to_ron_string(&self) -> Result<String, CatalogError> {
        let manifest = CatalogManifest {
            version: self.version,
            morphs: self.definitions.clone(),
        };
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .struct_names(true);
        Ok(ron::ser::to_string_pretty(&manifest, pretty)?)
    }

    /// Look up a definition by name.
    pub fn get(&self, name: MorphName) -> Option<&MorphDefinition> {
        self.name_to_index
            .get(&name)
            .map(|&index| &self.definitions[index])
    }

    /// Definitions in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &MorphDefinition> {
        self.definitions.iter()
    }

    /// Names in manifest order.
    pub fn names(&self) -> impl Iterator<Item = MorphName> + '_ {
        self.definitions.iter().map(|def| def.name)
    }

    /// Schema version of the loaded manifest.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always `false` for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Anchor, DefinitionError, DirectionRule, MagnitudeBasis};

    fn sample_ron() -> &'static str {
        r#"MorphCatalog(
            version: 1,
            morphs: [
                (
                    name: EyeSize,
                    region: (anchor: Eye, height_radius_fraction: 0.20, width_max_fraction: Some(0.40)),
                    direction: TranslateAxis(axis: Vertical, sign: Positive),
                    magnitude_fraction: 0.015,
                    magnitude_basis: FaceHeight,
                    symmetric: true,
                ),
                (
                    name: Build_Heavy,
                    region: (anchor: TorsoTop, height_radius_fraction: 1.0, side: Below, falloff: Constant, width_min_fraction: Some(0.12)),
                    direction: ScaleFromCenterline(axis: Lateral),
                    magnitude_fraction: 0.03,
                    magnitude_basis: MeshWidth,
                    symmetric: true,
                ),
            ],
        )"#
    }

    #[test]
    fn test_catalog_loads_from_ron() {
        let catalog = MorphCatalog::from_ron_str(sample_ron()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.version(), 1);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = MorphCatalog::from_ron_str(sample_ron()).unwrap();
        let heavy = catalog.get(MorphName::BuildHeavy).unwrap();
        assert_eq!(heavy.region.anchor, Anchor::TorsoTop);
        assert_eq!(heavy.magnitude_basis, MagnitudeBasis::MeshWidth);
        assert!(matches!(
            heavy.direction,
            DirectionRule::ScaleFromCenterline { factor, .. } if factor == 1.0
        ));
        assert!(catalog.get(MorphName::JawWidth).is_none());
    }

    #[test]
    fn test_iteration_follows_manifest_order() {
        let catalog = MorphCatalog::from_ron_str(sample_ron()).unwrap();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec![MorphName::EyeSize, MorphName::BuildHeavy]);
    }

    #[test]
    fn test_unknown_direction_rule_rejected() {
        let ron = sample_ron().replace("ScaleFromCenterline(axis: Lateral)", "Inflate(axis: Lateral)");
        assert!(matches!(
            MorphCatalog::from_ron_str(&ron),
            Err(CatalogError::Ron(_))
        ));
    }

    #[test]
    fn test_unknown_morph_name_rejected() {
        let ron = sample_ron().replace("name: EyeSize", "name: EarSize");
        assert!(matches!(
            MorphCatalog::from_ron_str(&ron),
            Err(CatalogError::Ron(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let ron = sample_ron().replace("name: Build_Heavy", "name: EyeSize");
        assert!(matches!(
            MorphCatalog::from_ron_str(&ron),
            Err(CatalogError::DuplicateName(MorphName::EyeSize))
        ));
    }

    #[test]
    fn test_invalid_definition_names_the_morph() {
        let ron = sample_ron().replace("magnitude_fraction: 0.03", "magnitude_fraction: -0.03");
        let err = MorphCatalog::from_ron_str(&ron).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidDefinition {
                name: MorphName::BuildHeavy,
                source: DefinitionError::InvalidMagnitude(_),
            }
        ));
        assert!(err.to_string().contains("Build_Heavy"));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let ron = sample_ron().replace("version: 1", "version: 7");
        assert!(matches!(
            MorphCatalog::from_ron_str(&ron),
            Err(CatalogError::UnsupportedVersion {
                found: 7,
                supported: 1
            })
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = MorphCatalog::from_ron_str("(version: 1, morphs: [])");
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn test_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.ron");
        std::fs::write(&path, sample_ron()).unwrap();
        let catalog = MorphCatalog::from_ron(&path).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MorphCatalog::from_ron(&dir.path().join("absent.ron"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = MorphCatalog::builtin().unwrap();
        assert_eq!(catalog.version(), CATALOG_VERSION);
        assert_eq!(catalog.len(), MorphName::ALL.len());
    }

    #[test]
    fn test_builtin_covers_vocabulary() {
        let catalog = MorphCatalog::builtin().unwrap();
        for &name in MorphName::ALL {
            assert!(catalog.get(name).is_some(), "builtin catalog lacks {name}");
        }
    }

    #[test]
    fn test_ron_string_reloads() {
        let catalog = MorphCatalog::builtin().unwrap();
        let ron = catalog.to_ron_string().unwrap();
        let reloaded = MorphCatalog::from_ron_str(&ron).unwrap();
        assert_eq!(reloaded.len(), catalog.len());
        for def in catalog.iter() {
            assert_eq!(reloaded.get(def.name), Some(def));
        }
    }
}
