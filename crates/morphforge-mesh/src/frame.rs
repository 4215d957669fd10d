//! Mesh frame: the per-mesh analysis result and the mesh ⇄ anatomical axis mapping.
//!
//! Anatomical vectors are stored in a [`DVec3`] as `(lateral, vertical, depth)`,
//! where lateral is the mesh X axis and depth is positive towards the face.
//!
//! | up axis | forward | mesh → anatomical        |
//! |---------|---------|--------------------------|
//! | Y       | +Z      | `(x, y, z)`              |
//! | Z       | −Y      | `(x, z, −y)`             |
//!
//! The map is a rotation, so it applies unchanged to points and displacements.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// Mesh axis treated as vertical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpAxis {
    /// glTF convention.
    Y,
    /// Blender convention.
    Z,
}

/// Length unit of the mesh positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Centimeter,
    Meter,
}

impl Unit {
    /// Meters per mesh unit.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Unit::Centimeter => 0.01,
            Unit::Meter => 1.0,
        }
    }
}

/// Whether a frame property came from mesh metadata or from the heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Declared,
    Detected,
}

/// Immutable analysis result for one mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshFrame {
    /// Axis-aligned bounds of the basis positions, in mesh axes.
    pub bounds: Aabb,
    /// Vertical axis.
    pub up_axis: UpAxis,
    /// Position unit.
    pub unit: Unit,
    /// Source of `up_axis`.
    pub up_axis_source: Provenance,
    /// Source of `unit`.
    pub unit_source: Provenance,
}

impl MeshFrame {
    /// Map a mesh-space point or vector to `(lateral, vertical, depth)`.
    pub fn to_anatomical(&self, v: DVec3) -> DVec3 {
        match self.up_axis {
            UpAxis::Y => v,
            UpAxis::Z => DVec3::new(v.x, v.z, -v.y),
        }
    }

    /// Map a `(lateral, vertical, depth)` point or vector back to mesh axes.
    pub fn to_mesh(&self, a: DVec3) -> DVec3 {
        match self.up_axis {
            UpAxis::Y => a,
            UpAxis::Z => DVec3::new(a.x, -a.z, a.y),
        }
    }

    /// Bounds expressed in anatomical axes.
    pub fn anatomical_bounds(&self) -> Aabb {
        Aabb::new(
            self.to_anatomical(self.bounds.min),
            self.to_anatomical(self.bounds.max),
        )
    }

    /// Extent along the up axis.
    pub fn height(&self) -> f64 {
        self.anatomical_bounds().size().y
    }

    /// Height expressed in meters.
    pub fn height_m(&self) -> f64 {
        self.height() * self.unit.meters_per_unit()
    }
}
