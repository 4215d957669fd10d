//! Morph target synthesis.
//!
//! For each catalog definition the pipeline runs
//! `BoundsAnalyzer → LandmarkEstimator → RegionClassifier → DisplacementSynthesizer`
//! and assembles a sparse [`MorphTarget`]. Everything is a pure function of the
//! base mesh and the catalog.

mod blend;
mod builder;
mod displacement;
mod landmarks;
mod region;

pub use blend::{BlendError, blend};
pub use builder::{
    BuildOptions, MorphReport, MorphSet, MorphTarget, MorphTargetBuilder, PartialMatchWarning,
    Plausibility,
};
pub use morphforge_config::DEFAULT_MAX_AFFECTED_FRACTION;
pub use displacement::DisplacementSynthesizer;
pub use landmarks::{LandmarkEstimator, Landmarks};
pub use region::{RegionClassifier, lateral_sign};
