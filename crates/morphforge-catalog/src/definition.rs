//! Declarative morph definitions: where a morph acts and how it moves vertices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::name::MorphName;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Landmark a region band is centred on.
///
/// Face anchors measure offsets and radii in face height and widths in face
/// width; body anchors use mesh height and mesh width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    HeadTop,
    Forehead,
    Eyebrow,
    Eye,
    Cheek,
    Nose,
    Mouth,
    Jaw,
    Chin,
    HeadBase,
    Shoulder,
    TorsoTop,
    TorsoBottom,
    Floor,
}

impl Anchor {
    /// Returns `true` for anchors scaled by the face rather than the whole body.
    pub fn is_face(self) -> bool {
        matches!(
            self,
            Anchor::HeadTop
                | Anchor::Forehead
                | Anchor::Eyebrow
                | Anchor::Eye
                | Anchor::Cheek
                | Anchor::Nose
                | Anchor::Mouth
                | Anchor::Jaw
                | Anchor::Chin
        )
    }
}

/// Height falloff from the band centre to its edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Falloff {
    /// `1 - t`
    #[default]
    Linear,
    /// `1 - (3t² - 2t³)`
    Smooth,
    /// Full weight anywhere inside the band.
    Constant,
}

/// Which side of the band centre is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandSide {
    #[default]
    Both,
    /// Only vertices strictly below the centre.
    Below,
    /// Only vertices strictly above the centre.
    Above,
}

/// Lateral weight shaping inside the width band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidthProfile {
    #[default]
    Flat,
    /// 0 at the inner bound rising to 1 at the outer bound.
    ///
    /// A missing inner bound is the centreline.
    RampOut,
    /// 1 at the inner bound falling to 0 at the outer bound.
    RampIn,
    /// 1 midway between the bounds, 0 at both.
    Arch,
}

/// Spatial extent of a morph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    /// Landmark the band is centred on.
    pub anchor: Anchor,
    /// Signed offset of the band centre from the anchor, positive is up.
    #[serde(default)]
    pub height_fraction: f64,
    /// Half-height of the band.
    pub height_radius_fraction: f64,
    /// Exclusive inner bound on lateral distance from the centreline.
    #[serde(default)]
    pub width_min_fraction: Option<f64>,
    /// Exclusive outer bound on lateral distance from the centreline.
    #[serde(default)]
    pub width_max_fraction: Option<f64>,
    #[serde(default)]
    pub falloff: Falloff,
    #[serde(default)]
    pub side: BandSide,
    #[serde(default)]
    pub width_profile: WidthProfile,
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Anatomical axis a direction term acts along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyAxis {
    /// Left/right (mesh X).
    Lateral,
    /// Along the up axis.
    Vertical,
    /// Front/back, positive towards the face.
    Depth,
}

/// Direction along a [`BodyAxis`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// `1.0` or `-1.0`.
    pub fn value(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

fn unit_factor() -> f64 {
    1.0
}

/// A single, non-composite displacement rule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DirectionTerm {
    /// Fixed offset along an axis, scaled by the morph magnitude.
    TranslateAxis {
        axis: BodyAxis,
        sign: Sign,
        #[serde(default = "unit_factor")]
        factor: f64,
    },
    /// Offset proportional to the distance from the axis centre.
    ScaleFromCenterline {
        axis: BodyAxis,
        #[serde(default = "unit_factor")]
        factor: f64,
    },
}

impl DirectionTerm {
    fn factor(&self) -> f64 {
        match *self {
            DirectionTerm::TranslateAxis { factor, .. } => factor,
            DirectionTerm::ScaleFromCenterline { factor, .. } => factor,
        }
    }
}

/// How a morph displaces the vertices in its region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DirectionRule {
    TranslateAxis {
        axis: BodyAxis,
        sign: Sign,
        #[serde(default = "unit_factor")]
        factor: f64,
    },
    ScaleFromCenterline {
        axis: BodyAxis,
        #[serde(default = "unit_factor")]
        factor: f64,
    },
    /// Ordered terms whose displacements are summed.
    Composite(Vec<DirectionTerm>),
}

impl DirectionRule {
    /// The rule flattened into its terms.
    pub fn terms(&self) -> Vec<DirectionTerm> {
        match *self {
            DirectionRule::TranslateAxis { axis, sign, factor } => {
                vec![DirectionTerm::TranslateAxis { axis, sign, factor }]
            }
            DirectionRule::ScaleFromCenterline { axis, factor } => {
                vec![DirectionTerm::ScaleFromCenterline { axis, factor }]
            }
            DirectionRule::Composite(ref terms) => terms.clone(),
        }
    }
}

/// Quantity the magnitude fraction is multiplied by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagnitudeBasis {
    FaceHeight,
    MeshWidth,
    MeshHeight,
}

// ---------------------------------------------------------------------------
// MorphDefinition
// ---------------------------------------------------------------------------

/// Reasons a single definition is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("height radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("height offset must be finite, got {0}")]
    InvalidOffset(f64),

    #[error("width bound must be finite and non-negative, got {0}")]
    InvalidWidthBound(f64),

    #[error("width band is empty: min {min} >= max {max}")]
    EmptyWidthBand { min: f64, max: f64 },

    #[error("magnitude fraction must be finite and non-negative, got {0}")]
    InvalidMagnitude(f64),

    #[error("direction factor must be finite, got {0}")]
    InvalidFactor(f64),

    #[error("composite direction has no terms")]
    EmptyComposite,

    #[error("{0:?} width profile needs an outer width bound")]
    ProfileWithoutBand(WidthProfile),
}

/// One entry of the morph catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MorphDefinition {
    pub name: MorphName,
    pub region: RegionSpec,
    pub direction: DirectionRule,
    pub magnitude_fraction: f64,
    pub magnitude_basis: MagnitudeBasis,
    /// Mirror lateral translation across the centreline.
    pub symmetric: bool,
}

impl MorphDefinition {
    /// Checks every numeric field and the direction structure.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let region = &self.region;
        let radius = region.height_radius_fraction;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(DefinitionError::InvalidRadius(radius));
        }
        if !region.height_fraction.is_finite() {
            return Err(DefinitionError::InvalidOffset(region.height_fraction));
        }
        for bound in [region.width_min_fraction, region.width_max_fraction]
            .into_iter()
            .flatten()
        {
            if !(bound.is_finite() && bound >= 0.0) {
                return Err(DefinitionError::InvalidWidthBound(bound));
            }
        }
        if let (Some(min), Some(max)) = (region.width_min_fraction, region.width_max_fraction)
            && min >= max
        {
            return Err(DefinitionError::EmptyWidthBand { min, max });
        }
        if region.width_profile != WidthProfile::Flat && region.width_max_fraction.is_none() {
            return Err(DefinitionError::ProfileWithoutBand(region.width_profile));
        }

        let magnitude = self.magnitude_fraction;
        if !(magnitude.is_finite() && magnitude >= 0.0) {
            return Err(DefinitionError::InvalidMagnitude(magnitude));
        }

        let terms = self.direction.terms();
        if terms.is_empty() {
            return Err(DefinitionError::EmptyComposite);
        }
        if let Some(bad) = terms.iter().map(DirectionTerm::factor).find(|f| !f.is_finite()) {
            return Err(DefinitionError::InvalidFactor(bad));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
