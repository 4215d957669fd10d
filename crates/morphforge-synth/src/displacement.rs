//! Per-vertex displacement from a morph's direction rule.
//!
//! Positions and results are anatomical `(lateral, vertical, depth)` vectors.

use glam::DVec3;
use morphforge_catalog::{BodyAxis, DirectionTerm, MorphDefinition};

use crate::landmarks::Landmarks;
use crate::region::lateral_sign;

fn unit(axis: BodyAxis) -> DVec3 {
    match axis {
        BodyAxis::Lateral => DVec3::X,
        BodyAxis::Vertical => DVec3::Y,
        BodyAxis::Depth => DVec3::Z,
    }
}

fn component(v: DVec3, axis: BodyAxis) -> f64 {
    match axis {
        BodyAxis::Lateral => v.x,
        BodyAxis::Vertical => v.y,
        BodyAxis::Depth => v.z,
    }
}

/// Evaluates one definition's direction rule for weighted vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementSynthesizer {
    terms: Vec<DirectionTerm>,
    /// `magnitude_fraction × basis length`, in mesh units.
    magnitude: f64,
    magnitude_fraction: f64,
    symmetric: bool,
    /// Scale centres per anatomical axis.
    centre: DVec3,
}

impl DisplacementSynthesizer {
    /// `region_centre` is the band centre height, used by vertical scale terms.
    pub fn new(definition: &MorphDefinition, landmarks: &Landmarks, region_centre: f64) -> Self {
        Self {
            terms: definition.direction.terms(),
            magnitude: definition.magnitude_fraction
                * landmarks.basis_length(definition.magnitude_basis),
            magnitude_fraction: definition.magnitude_fraction,
            symmetric: definition.symmetric,
            centre: DVec3::new(landmarks.center_x, region_centre, landmarks.center_depth),
        }
    }

    /// Absolute magnitude in mesh units.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Displacement of an anatomical position with region weight `weight`.
    pub fn synthesize(&self, p: DVec3, weight: f64) -> DVec3 {
        self.terms
            .iter()
            .fold(DVec3::ZERO, |acc, term| acc + self.term(term, p, weight))
    }

    fn term(&self, term: &DirectionTerm, p: DVec3, weight: f64) -> DVec3 {
        match *term {
            DirectionTerm::TranslateAxis { axis, sign, factor } => {
                let mut sign = sign.value();
                if self.symmetric && axis == BodyAxis::Lateral {
                    // A centreline vertex is its own mirror.
                    if p.x == self.centre.x {
                        return DVec3::ZERO;
                    }
                    sign *= lateral_sign(p.x, self.centre.x);
                }
                unit(axis) * (self.magnitude * factor * weight * sign)
            }
            // Dimensionless: the distance from the centre already carries mesh scale.
            DirectionTerm::ScaleFromCenterline { axis, factor } => {
                let distance = component(p, axis) - component(self.centre, axis);
                unit(axis) * (distance * self.magnitude_fraction * factor * weight)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LandmarkEstimator;
    use morphforge_catalog::{
        Anchor, BandSide, DirectionRule, Falloff, MagnitudeBasis, MorphName, RegionSpec, Sign,
        WidthProfile,
    };
    use morphforge_mesh::{Aabb, MeshFrame, Provenance, Unit, UpAxis};

    fn landmarks() -> Landmarks {
        let frame = MeshFrame {
            bounds: Aabb::new(DVec3::new(-0.5, 0.0, -0.25), DVec3::new(0.5, 2.0, 0.25)),
            up_axis: UpAxis::Y,
            unit: Unit::Meter,
            up_axis_source: Provenance::Detected,
            unit_source: Provenance::Detected,
        };
        LandmarkEstimator::default().estimate(&frame)
    }

    fn definition(direction: DirectionRule, basis: MagnitudeBasis, symmetric: bool) -> MorphDefinition {
        MorphDefinition {
            name: MorphName::EyeSpacing,
            region: RegionSpec {
                anchor: Anchor::Eye,
                height_fraction: 0.0,
                height_radius_fraction: 0.2,
                width_min_fraction: None,
                width_max_fraction: None,
                falloff: Falloff::Linear,
                side: BandSide::Both,
                width_profile: WidthProfile::Flat,
            },
            direction,
            magnitude_fraction: 0.5,
            magnitude_basis: basis,
            symmetric,
        }
    }

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-12
    }

    #[test]
    fn test_translate_uses_basis_length() {
        let def = definition(
            DirectionRule::TranslateAxis {
                axis: BodyAxis::Vertical,
                sign: Sign::Negative,
                factor: 1.0,
            },
            MagnitudeBasis::MeshWidth,
            true,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.0);
        assert_eq!(s.magnitude(), 0.5);
        let d = s.synthesize(DVec3::new(0.2, 1.0, 0.0), 0.5);
        assert!(close(d, DVec3::new(0.0, -0.25, 0.0)));
    }

    #[test]
    fn test_symmetric_lateral_translate_mirrors() {
        let def = definition(
            DirectionRule::TranslateAxis {
                axis: BodyAxis::Lateral,
                sign: Sign::Positive,
                factor: 1.0,
            },
            MagnitudeBasis::MeshWidth,
            true,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.0);
        let right = s.synthesize(DVec3::new(0.2, 1.0, 0.0), 1.0);
        let left = s.synthesize(DVec3::new(-0.2, 1.0, 0.0), 1.0);
        assert!(close(right, DVec3::new(0.5, 0.0, 0.0)));
        assert!(close(left, -right));
    }

    #[test]
    fn test_symmetric_lateral_translate_holds_centreline() {
        let def = definition(
            DirectionRule::Composite(vec![
                DirectionTerm::TranslateAxis {
                    axis: BodyAxis::Lateral,
                    sign: Sign::Positive,
                    factor: 1.0,
                },
                DirectionTerm::TranslateAxis {
                    axis: BodyAxis::Depth,
                    sign: Sign::Positive,
                    factor: 1.0,
                },
            ]),
            MagnitudeBasis::MeshWidth,
            true,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.0);
        let d = s.synthesize(DVec3::new(0.0, 1.0, 0.0), 1.0);
        assert!(close(d, DVec3::new(0.0, 0.0, 0.5)));
    }

    #[test]
    fn test_asymmetric_lateral_translate_does_not_mirror() {
        let def = definition(
            DirectionRule::TranslateAxis {
                axis: BodyAxis::Lateral,
                sign: Sign::Positive,
                factor: 1.0,
            },
            MagnitudeBasis::MeshWidth,
            false,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.0);
        let left = s.synthesize(DVec3::new(-0.2, 1.0, 0.0), 1.0);
        assert!(close(left, DVec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_scale_is_dimensionless() {
        let width = definition(
            DirectionRule::ScaleFromCenterline {
                axis: BodyAxis::Lateral,
                factor: 1.0,
            },
            MagnitudeBasis::MeshWidth,
            true,
        );
        let height = MorphDefinition {
            magnitude_basis: MagnitudeBasis::MeshHeight,
            ..width.clone()
        };
        let lm = landmarks();
        let p = DVec3::new(0.4, 1.0, 0.0);
        let a = DisplacementSynthesizer::new(&width, &lm, 1.0).synthesize(p, 1.0);
        let b = DisplacementSynthesizer::new(&height, &lm, 1.0).synthesize(p, 1.0);
        assert!(close(a, DVec3::new(0.2, 0.0, 0.0)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_vertical_scale_uses_region_centre() {
        let def = definition(
            DirectionRule::ScaleFromCenterline {
                axis: BodyAxis::Vertical,
                factor: 2.0,
            },
            MagnitudeBasis::FaceHeight,
            true,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.5);
        let above = s.synthesize(DVec3::new(0.0, 1.75, 0.0), 1.0);
        let below = s.synthesize(DVec3::new(0.0, 1.25, 0.0), 1.0);
        assert!(close(above, DVec3::new(0.0, 0.25, 0.0)));
        assert!(close(below, -above));
    }

    #[test]
    fn test_composite_sums_terms() {
        let def = definition(
            DirectionRule::Composite(vec![
                DirectionTerm::TranslateAxis {
                    axis: BodyAxis::Depth,
                    sign: Sign::Positive,
                    factor: 1.0,
                },
                DirectionTerm::TranslateAxis {
                    axis: BodyAxis::Vertical,
                    sign: Sign::Negative,
                    factor: 0.5,
                },
            ]),
            MagnitudeBasis::MeshWidth,
            true,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.0);
        let d = s.synthesize(DVec3::new(0.1, 1.0, 0.0), 1.0);
        assert!(close(d, DVec3::new(0.0, -0.25, 0.5)));
    }

    #[test]
    fn test_zero_weight_is_zero() {
        let def = definition(
            DirectionRule::TranslateAxis {
                axis: BodyAxis::Depth,
                sign: Sign::Positive,
                factor: 1.0,
            },
            MagnitudeBasis::FaceHeight,
            true,
        );
        let s = DisplacementSynthesizer::new(&def, &landmarks(), 1.0);
        assert_eq!(s.synthesize(DVec3::new(0.1, 1.0, 0.0), 0.0), DVec3::ZERO);
    }
}
