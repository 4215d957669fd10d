//! Region classification: which vertices a morph touches, and how strongly.

use glam::DVec3;
use morphforge_catalog::{BandSide, Falloff, RegionSpec, WidthProfile};

use crate::landmarks::Landmarks;

/// `+1` right of the symmetry plane, `-1` on or left of it.
///
/// Assumes the mesh is mirror-symmetric about `center_x`.
pub fn lateral_sign(x: f64, center_x: f64) -> f64 {
    if x > center_x { 1.0 } else { -1.0 }
}

/// A [`RegionSpec`] resolved against one mesh's landmarks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionClassifier {
    centre: f64,
    radius: f64,
    width_min: Option<f64>,
    width_max: Option<f64>,
    falloff: Falloff,
    side: BandSide,
    profile: WidthProfile,
    center_x: f64,
}

impl RegionClassifier {
    pub fn new(spec: &RegionSpec, landmarks: &Landmarks) -> Self {
        let length = landmarks.frame_length(spec.anchor);
        let width = landmarks.frame_width(spec.anchor);
        Self {
            centre: landmarks.anchor_height(spec.anchor) + spec.height_fraction * length,
            radius: spec.height_radius_fraction * length,
            width_min: spec.width_min_fraction.map(|f| f * width),
            width_max: spec.width_max_fraction.map(|f| f * width),
            falloff: spec.falloff,
            side: spec.side,
            profile: spec.width_profile,
            center_x: landmarks.center_x,
        }
    }

    /// Height of the band centre.
    pub fn centre(&self) -> f64 {
        self.centre
    }

    /// Half-height of the band.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Weight of an anatomical position, or `None` if it lies outside the region.
    ///
    /// The returned weight is always in `(0, 1]`.
    pub fn classify(&self, p: DVec3) -> Option<f64> {
        let offset = p.y - self.centre;
        match self.side {
            BandSide::Both => {}
            BandSide::Below if offset >= 0.0 => return None,
            BandSide::Above if offset <= 0.0 => return None,
            BandSide::Below | BandSide::Above => {}
        }

        let t = offset.abs() / self.radius;
        if t >= 1.0 {
            return None;
        }

        let lateral = (p.x - self.center_x).abs();
        if self.width_min.is_some_and(|min| lateral <= min)
            || self.width_max.is_some_and(|max| lateral >= max)
        {
            return None;
        }

        let weight = falloff_weight(self.falloff, t) * self.profile_weight(lateral);
        (weight > 0.0).then_some(weight.min(1.0))
    }

    /// `+1` or `-1` depending on which side of the symmetry plane `x` lies.
    pub fn lateral_sign(&self, x: f64) -> f64 {
        lateral_sign(x, self.center_x)
    }

    fn profile_weight(&self, lateral: f64) -> f64 {
        let Some(max) = self.width_max else {
            return 1.0;
        };
        let min = self.width_min.unwrap_or(0.0);
        let s = (lateral - min) / (max - min);
        match self.profile {
            WidthProfile::Flat => 1.0,
            WidthProfile::RampOut => s,
            WidthProfile::RampIn => 1.0 - s,
            WidthProfile::Arch => 1.0 - (2.0 * s - 1.0).abs(),
        }
    }
}

fn falloff_weight(falloff: Falloff, t: f64) -> f64 {
    match falloff {
        Falloff::Linear => 1.0 - t,
        Falloff::Smooth => 1.0 - t * t * (3.0 - 2.0 * t),
        Falloff::Constant => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LandmarkEstimator;
    use morphforge_catalog::Anchor;
    use morphforge_mesh::{Aabb, MeshFrame, Provenance, Unit, UpAxis};

    /// 2 m tall, 1 m wide, Y-up; floor at 0 so body bands land on exact binary fractions.
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

    /// Centre 1.0, radius 0.5.
    fn band() -> RegionSpec {
        RegionSpec {
            anchor: Anchor::Floor,
            height_fraction: 0.5,
            height_radius_fraction: 0.25,
            width_min_fraction: None,
            width_max_fraction: None,
            falloff: Falloff::Linear,
            side: BandSide::Both,
            width_profile: WidthProfile::Flat,
        }
    }

    #[test]
    fn test_band_resolution() {
        let c = RegionClassifier::new(&band(), &landmarks());
        assert_eq!(c.centre(), 1.0);
        assert_eq!(c.radius(), 0.5);
    }

    #[test]
    fn test_linear_falloff() {
        let c = RegionClassifier::new(&band(), &landmarks());
        assert_eq!(c.classify(DVec3::new(0.1, 1.0, 0.0)), Some(1.0));
        assert_eq!(c.classify(DVec3::new(0.1, 1.25, 0.0)), Some(0.5));
        assert_eq!(c.classify(DVec3::new(0.1, 0.75, 0.0)), Some(0.5));
    }

    #[test]
    fn test_open_boundary_excluded() {
        let c = RegionClassifier::new(&band(), &landmarks());
        assert_eq!(c.classify(DVec3::new(0.1, 1.5, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(0.1, 0.5, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(0.1, 1.75, 0.0)), None);
    }

    #[test]
    fn test_smooth_falloff() {
        let mut spec = band();
        spec.falloff = Falloff::Smooth;
        let c = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(c.classify(DVec3::new(0.0, 1.25, 0.0)), Some(0.5));
        let w = c.classify(DVec3::new(0.0, 1.125, 0.0)).unwrap();
        assert!((w - (1.0 - 0.15625)).abs() < 1e-12);
    }

    #[test]
    fn test_constant_falloff() {
        let mut spec = band();
        spec.falloff = Falloff::Constant;
        let c = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(c.classify(DVec3::new(0.0, 1.4, 0.0)), Some(1.0));
        assert_eq!(c.classify(DVec3::new(0.0, 1.5, 0.0)), None);
    }

    #[test]
    fn test_width_band_is_exclusive() {
        let mut spec = band();
        spec.width_min_fraction = Some(0.125);
        spec.width_max_fraction = Some(0.25);
        let c = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(c.classify(DVec3::new(0.125, 1.0, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(-0.25, 1.0, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(0.0, 1.0, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(-0.2, 1.0, 0.0)), Some(1.0));
    }

    #[test]
    fn test_side_below_excludes_centre() {
        let mut spec = band();
        spec.side = BandSide::Below;
        let c = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(c.classify(DVec3::new(0.0, 1.0, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(0.0, 1.25, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(0.0, 0.75, 0.0)), Some(0.5));
    }

    #[test]
    fn test_side_above() {
        let mut spec = band();
        spec.side = BandSide::Above;
        let c = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(c.classify(DVec3::new(0.0, 0.75, 0.0)), None);
        assert_eq!(c.classify(DVec3::new(0.0, 1.25, 0.0)), Some(0.5));
    }

    #[test]
    fn test_width_profiles() {
        let mut spec = band();
        spec.width_max_fraction = Some(0.5);
        spec.width_profile = WidthProfile::RampOut;
        let ramp_out = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(ramp_out.classify(DVec3::new(0.125, 1.0, 0.0)), Some(0.25));
        assert_eq!(ramp_out.classify(DVec3::new(0.0, 1.0, 0.0)), None);

        spec.width_profile = WidthProfile::RampIn;
        let ramp_in = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(ramp_in.classify(DVec3::new(0.0, 1.0, 0.0)), Some(1.0));
        assert_eq!(ramp_in.classify(DVec3::new(-0.375, 1.0, 0.0)), Some(0.25));

        spec.width_profile = WidthProfile::Arch;
        let arch = RegionClassifier::new(&spec, &landmarks());
        assert_eq!(arch.classify(DVec3::new(0.25, 1.0, 0.0)), Some(1.0));
        assert_eq!(arch.classify(DVec3::new(0.125, 1.0, 0.0)), Some(0.5));
    }

    #[test]
    fn test_face_anchor_uses_face_frame() {
        let lm = landmarks();
        let spec = RegionSpec {
            anchor: Anchor::Eye,
            height_fraction: 0.1,
            height_radius_fraction: 0.2,
            ..band()
        };
        let c = RegionClassifier::new(&spec, &lm);
        assert!((c.centre() - (lm.eye_height + 0.1 * lm.face_height)).abs() < 1e-12);
        assert!((c.radius() - 0.2 * lm.face_height).abs() < 1e-12);
    }

    #[test]
    fn test_lateral_sign() {
        assert_eq!(lateral_sign(0.1, 0.0), 1.0);
        assert_eq!(lateral_sign(-0.1, 0.0), -1.0);
        assert_eq!(lateral_sign(0.0, 0.0), -1.0);
    }
}
