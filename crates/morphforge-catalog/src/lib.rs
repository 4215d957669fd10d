//! Morph vocabulary and the declarative, versioned morph catalog.

mod catalog;
mod definition;
mod error;
mod name;

pub use catalog::{CATALOG_VERSION, CatalogManifest, MorphCatalog};
pub use definition::{
    Anchor, BandSide, BodyAxis, DefinitionError, DirectionRule, DirectionTerm, Falloff,
    MagnitudeBasis, MorphDefinition, RegionSpec, Sign, WidthProfile,
};
pub use error::CatalogError;
pub use name::{MorphName, UnknownMorphName};
