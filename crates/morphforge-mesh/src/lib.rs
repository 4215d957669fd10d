//! Base mesh representation and geometric analysis for morph synthesis.
//!
//! A [`Mesh`] is an ordered list of vertex positions. [`BoundsAnalyzer`] turns it
//! into a [`MeshFrame`]: bounding box, up axis, and unit, plus the mapping between
//! mesh axes and anatomical axes (lateral, vertical, forward depth) that the rest
//! of the pipeline works in.

mod bounds;
mod error;
mod frame;
mod mesh;

pub use bounds::{Aabb, Axis, BoundsAnalyzer, DEFAULT_UNIT_THRESHOLD, detect_unit, detect_up_axis};
pub use error::GeometryError;
pub use frame::{MeshFrame, Provenance, Unit, UpAxis};
pub use mesh::Mesh;
