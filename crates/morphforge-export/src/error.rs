use morphforge_catalog::MorphName;
use morphforge_mesh::UpAxis;
use thiserror::Error;

/// Errors raised while exporting or importing an interchange document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The morph set was built from a different mesh.
    #[error("morph set for `{set}` ({set_vertices} vertices) does not match mesh `{mesh}` ({mesh_vertices} vertices)")]
    MeshMismatch {
        mesh: String,
        mesh_vertices: usize,
        set: String,
        set_vertices: usize,
    },

    /// The mesh declares a different up axis than the set was built in.
    #[error("mesh `{mesh}` declares {declared:?}-up but its morph set was built {built:?}-up")]
    FrameMismatch {
        mesh: String,
        declared: UpAxis,
        built: UpAxis,
    },

    #[error("target `{name}` references vertex {index} of a {vertex_count}-vertex basis")]
    IndexOutOfRange {
        name: MorphName,
        index: u32,
        vertex_count: usize,
    },

    #[error("target `{0}` appears more than once")]
    DuplicateTarget(MorphName),
}
