//! Linear blending of morph targets onto a basis.

use std::collections::BTreeMap;

use glam::DVec3;
use morphforge_catalog::MorphName;
use thiserror::Error;

use crate::builder::{MorphSet, MorphTarget};

/// Rejected blend requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlendError {
    #[error("basis has {found} vertices, morph set was built for {expected}")]
    VertexCountMismatch { expected: usize, found: usize },

    #[error("weight {weight} for `{name}` is outside [0, 1]")]
    WeightOutOfRange { name: MorphName, weight: f64 },

    #[error("no target named `{0}`")]
    UnknownMorph(MorphName),

    #[error("target `{name}` displaces vertex {index}, past the end of the basis")]
    IndexOutOfRange { name: MorphName, index: u32 },
}

/// `basis + Σ wᵢ·deltaᵢ` over the weighted targets.
///
/// Morphs without a weight contribute nothing.
///
/// # Errors
///
/// Returns [`BlendError`] for a weight outside `[0, 1]`, a weight naming no
/// target, or a delta indexing past the basis.
pub fn blend(
    basis: &[DVec3],
    targets: &[MorphTarget],
    weights: &BTreeMap<MorphName, f64>,
) -> Result<Vec<DVec3>, BlendError> {
    let mut out = basis.to_vec();
    for (&name, &weight) in weights {
        if !(0.0..=1.0).contains(&weight) {
            return Err(BlendError::WeightOutOfRange { name, weight });
        }
        let target = targets
            .iter()
            .find(|t| t.name == name)
            .ok_or(BlendError::UnknownMorph(name))?;
        for (&index, &delta) in &target.deltas {
            let position = out
                .get_mut(index as usize)
                .ok_or(BlendError::IndexOutOfRange { name, index })?;
            *position += delta * weight;
        }
    }
    Ok(out)
}

impl MorphSet {
    /// Blend this set's targets onto `basis`, which must be the mesh it was built from.
    ///
    /// # Errors
    ///
    /// See [`blend`]; additionally rejects a basis of the wrong length.
    pub fn blend(
        &self,
        basis: &[DVec3],
        weights: &BTreeMap<MorphName, f64>,
    ) -> Result<Vec<DVec3>, BlendError> {
        if basis.len() != self.vertex_count {
            return Err(BlendError::VertexCountMismatch {
                expected: self.vertex_count,
                found: basis.len(),
            });
        }
        blend(basis, &self.targets, weights)
    }
}
