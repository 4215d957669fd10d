use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::frame::{Unit, UpAxis};

/// A static base mesh: vertex positions with stable indices.
///
/// Topology is not needed by the synthesis pipeline and is not stored. `unit` and
/// `up_axis` carry upstream metadata when the source format declares it; when
/// present they take precedence over the detection heuristics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Identifies the mesh in logs and errors (e.g. "base_female").
    pub name: String,
    /// Basis positions, indexed by vertex.
    pub positions: Vec<DVec3>,
    /// Declared unit, if the source format supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// Declared up axis, if the source format supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_axis: Option<UpAxis>,
}

impl Mesh {
    /// Create a mesh without unit or axis metadata.
    pub fn new(name: impl Into<String>, positions: Vec<DVec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            unit: None,
            up_axis: None,
        }
    }

    /// Declare the unit the positions are expressed in.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Declare the up axis of the positions.
    pub fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = Some(up_axis);
        self
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
