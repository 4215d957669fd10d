//! Catalog load errors.

use thiserror::Error;

use crate::definition::DefinitionError;
use crate::name::MorphName;

/// Errors returned while loading or validating a morph catalog.
///
/// Any of these aborts before a mesh is processed.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O error reading the catalog file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RON deserialization error: malformed syntax, unknown morph name or direction rule.
    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON serialization error.
    #[error("ron serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// The catalog declares a schema version this build does not understand.
    #[error("unsupported catalog version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The catalog has no definitions.
    #[error("catalog defines no morphs")]
    Empty,

    /// The same morph name appears twice.
    #[error("duplicate morph name: {0}")]
    DuplicateName(MorphName),

    /// A definition failed validation.
    #[error("invalid definition `{name}`: {source}")]
    InvalidDefinition {
        name: MorphName,
        #[source]
        source: DefinitionError,
    },
}
