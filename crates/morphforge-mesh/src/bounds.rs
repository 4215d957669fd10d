//! Bounding box, up-axis and unit detection.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::frame::{MeshFrame, Provenance, Unit, UpAxis};
use crate::mesh::Mesh;

/// Up-axis extent above which an undeclared mesh is read as centimeters.
///
/// A humanoid is ~1.8 m or ~180 cm tall, so anything taller than 50 units is far
/// more plausibly centimeters. Meshes close to the cutoff (a 0.6 m child model
/// vs. a 60-unit figurine) are ambiguous; declare the unit on the mesh instead.
pub const DEFAULT_UNIT_THRESHOLD: f64 = 50.0;

/// Mesh axis identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Axis-Aligned Bounding Box in mesh space.
///
/// Invariant: min <= max on every axis. The constructor enforces this by
/// swapping components if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create an AABB from two corners. Automatically sorts
    /// components so that min <= max on every axis.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box enclosing all points, or `None` for an empty slice.
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Returns the center point.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along a single axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        let size = self.size();
        match axis {
            Axis::X => size.x,
            Axis::Y => size.y,
            Axis::Z => size.z,
        }
    }

    /// First axis with zero extent, if any.
    pub fn degenerate_axis(&self) -> Option<Axis> {
        [Axis::X, Axis::Y, Axis::Z]
            .into_iter()
            .find(|&axis| self.extent(axis) <= 0.0)
    }

    /// Returns true if the box is flat on at least one axis.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate_axis().is_some()
    }
}

/// Y is up only when it is strictly the tallest extent; everything else is Z-up.
pub fn detect_up_axis(size: DVec3) -> UpAxis {
    if size.y > size.z && size.y > size.x {
        UpAxis::Y
    } else {
        UpAxis::Z
    }
}

/// Centimeters when the vertical extent exceeds `threshold`, otherwise meters.
pub fn detect_unit(up_extent: f64, threshold: f64) -> Unit {
    if up_extent > threshold {
        Unit::Centimeter
    } else {
        Unit::Meter
    }
}

/// Computes the [`MeshFrame`] of a base mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsAnalyzer {
    unit_threshold: f64,
}

impl Default for BoundsAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_THRESHOLD)
    }
}

impl BoundsAnalyzer {
    /// Create an analyzer with the given centimeter/meter cutoff.
    pub fn new(unit_threshold: f64) -> Self {
        Self { unit_threshold }
    }

    /// Analyze a mesh.
    ///
    /// # Errors
    ///
    /// [`GeometryError::EmptyMesh`] for zero vertices, [`GeometryError::NonFinite`]
    /// for NaN/infinite positions, [`GeometryError::Degenerate`] if any axis has
    /// zero extent, [`GeometryError::TooManyVertices`] past `u32::MAX` vertices.
    pub fn analyze(&self, mesh: &Mesh) -> Result<MeshFrame, GeometryError> {
        if u32::try_from(mesh.len()).is_err() {
            return Err(GeometryError::TooManyVertices {
                mesh: mesh.name.clone(),
                count: mesh.len(),
            });
        }
        if let Some(index) = mesh.positions.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFinite {
                mesh: mesh.name.clone(),
                index,
            });
        }

        let bounds = Aabb::from_points(&mesh.positions).ok_or_else(|| GeometryError::EmptyMesh {
            mesh: mesh.name.clone(),
        })?;

        if let Some(axis) = bounds.degenerate_axis() {
            return Err(GeometryError::Degenerate {
                mesh: mesh.name.clone(),
                axis,
            });
        }

        let size = bounds.size();
        let (up_axis, up_axis_source) = match mesh.up_axis {
            Some(declared) => (declared, Provenance::Declared),
            None => (detect_up_axis(size), Provenance::Detected),
        };
        let up_extent = match up_axis {
            UpAxis::Y => size.y,
            UpAxis::Z => size.z,
        };
        let (unit, unit_source) = match mesh.unit {
            Some(declared) => (declared, Provenance::Declared),
            None => (
                detect_unit(up_extent, self.unit_threshold),
                Provenance::Detected,
            ),
        };

        tracing::debug!(
            mesh = %mesh.name,
            vertices = mesh.len(),
            ?up_axis,
            ?up_axis_source,
            ?unit,
            ?unit_source,
            height = up_extent,
            "analyzed mesh bounds"
        );

        Ok(MeshFrame {
            bounds,
            up_axis,
            unit,
            up_axis_source,
            unit_source,
        })
    }
}
