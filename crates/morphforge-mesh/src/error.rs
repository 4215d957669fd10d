//! Geometry error types.

use crate::bounds::Axis;

/// Fatal problems with a base mesh. Each variant names the mesh it came from.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The mesh has no vertices.
    #[error("mesh `{mesh}` has no vertices")]
    EmptyMesh {
        /// Mesh name.
        mesh: String,
    },

    /// The bounding box has zero extent on an axis.
    #[error("mesh `{mesh}` is degenerate: zero extent along {axis:?}")]
    Degenerate {
        /// Mesh name.
        mesh: String,
        /// First axis found with zero extent.
        axis: Axis,
    },

    /// A vertex position contains NaN or infinity.
    #[error("mesh `{mesh}` has a non-finite position at vertex {index}")]
    NonFinite {
        /// Mesh name.
        mesh: String,
        /// Offending vertex index.
        index: usize,
    },

    /// Vertex indices would not fit the `u32` keys of a morph target.
    #[error("mesh `{mesh}` has {count} vertices, more than a morph target can index")]
    TooManyVertices {
        /// Mesh name.
        mesh: String,
        /// Vertex count.
        count: usize,
    },
}
