//! The JSON interchange document handed to downstream renderers.
//!
//! Documents are always Y-up (glTF convention). Z-up meshes are rotated with
//! `(x, y, z) ↦ (x, z, −y)`, applied identically to the basis and to every delta
//! so that blending commutes with the conversion.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use glam::DVec3;
use morphforge_catalog::MorphName;
use morphforge_mesh::{Mesh, Unit, UpAxis};
use morphforge_synth::{MorphSet, MorphTarget};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Document schema version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// One displaced vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDelta {
    pub index: u32,
    pub delta: DVec3,
}

/// One morph target, deltas in ascending index order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportTarget {
    pub name: MorphName,
    pub deltas: Vec<ExportDelta>,
}

/// A base mesh and its morph targets, Y-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub format_version: u32,
    pub mesh: String,
    pub up_axis: UpAxis,
    pub unit: Unit,
    pub basis: Vec<DVec3>,
    pub targets: Vec<ExportTarget>,
}

/// Rotate a point or displacement from `up_axis` into Y-up.
pub fn to_y_up(up_axis: UpAxis, v: DVec3) -> DVec3 {
    match up_axis {
        UpAxis::Y => v,
        UpAxis::Z => DVec3::new(v.x, v.z, -v.y),
    }
}

/// Build the interchange document for a mesh and the morph set built from it.
///
/// Basis and deltas are rotated out of the frame the set was built in.
///
/// # Errors
///
/// [`ExportError::MeshMismatch`] if `set` was not built from `mesh`, and
/// [`ExportError::FrameMismatch`] if the mesh declares an up axis other than
/// the one the set was built in.
pub fn export(mesh: &Mesh, set: &MorphSet) -> Result<ExportDocument, ExportError> {
    if set.mesh != mesh.name || set.vertex_count != mesh.len() {
        return Err(ExportError::MeshMismatch {
            mesh: mesh.name.clone(),
            mesh_vertices: mesh.len(),
            set: set.mesh.clone(),
            set_vertices: set.vertex_count,
        });
    }
    let frame = &set.frame;
    if let Some(declared) = mesh.up_axis.filter(|&axis| axis != frame.up_axis) {
        return Err(ExportError::FrameMismatch {
            mesh: mesh.name.clone(),
            declared,
            built: frame.up_axis,
        });
    }

    let up = frame.up_axis;
    let basis = mesh.positions.iter().map(|&p| to_y_up(up, p)).collect();
    let targets = set
        .targets
        .iter()
        .map(|target| ExportTarget {
            name: target.name,
            deltas: target
                .deltas
                .iter()
                .map(|(&index, &delta)| ExportDelta {
                    index,
                    delta: to_y_up(up, delta),
                })
                .collect(),
        })
        .collect();

    tracing::debug!(mesh = %mesh.name, from = ?up, "exported morph set");

    Ok(ExportDocument {
        format_version: FORMAT_VERSION,
        mesh: mesh.name.clone(),
        up_axis: UpAxis::Y,
        unit: frame.unit,
        basis,
        targets,
    })
}

/// Recover the Y-up basis mesh and its targets from a document.
///
/// # Errors
///
/// Returns [`ExportError`] for an unknown version, a repeated target, or a
/// delta indexing past the basis.
pub fn import(doc: &ExportDocument) -> Result<(Mesh, Vec<MorphTarget>), ExportError> {
    if doc.format_version != FORMAT_VERSION {
        return Err(ExportError::UnsupportedVersion {
            found: doc.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let vertex_count = doc.basis.len();
    let mut seen = BTreeSet::new();
    let mut targets = Vec::with_capacity(doc.targets.len());
    for target in &doc.targets {
        if !seen.insert(target.name) {
            return Err(ExportError::DuplicateTarget(target.name));
        }
        if let Some(bad) = target
            .deltas
            .iter()
            .find(|d| d.index as usize >= vertex_count)
        {
            return Err(ExportError::IndexOutOfRange {
                name: target.name,
                index: bad.index,
                vertex_count,
            });
        }
        targets.push(MorphTarget {
            name: target.name,
            deltas: target.deltas.iter().map(|d| (d.index, d.delta)).collect(),
        });
    }

    let mesh = Mesh::new(doc.mesh.clone(), doc.basis.clone())
        .with_unit(doc.unit)
        .with_up_axis(doc.up_axis);
    Ok((mesh, targets))
}

/// Serialize a document to a JSON string.
pub fn to_json_string(doc: &ExportDocument, pretty: bool) -> Result<String, ExportError> {
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(json)
}

/// Write a document to `path`, creating parent directories as needed.
pub fn write_json(doc: &ExportDocument, path: &Path, pretty: bool) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json_string(doc, pretty)?)?;
    tracing::info!(path = %path.display(), targets = doc.targets.len(), "wrote morph document");
    Ok(())
}

/// Read a document from `path`.
pub fn read_json(path: &Path) -> Result<ExportDocument, ExportError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
