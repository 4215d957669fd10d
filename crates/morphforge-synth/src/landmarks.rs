//! Anthropometric landmark estimation from mesh bounds.
//!
//! All heights are measured along the anatomical vertical axis, in mesh units.

use morphforge_catalog::{Anchor, MagnitudeBasis};
use morphforge_config::ProportionTable;
use morphforge_mesh::MeshFrame;

/// Named heights and scale lengths of a humanoid mesh.
///
/// Derived once per mesh from its bounds and a [`ProportionTable`]; never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmarks {
    pub head_top: f64,
    pub head_base: f64,
    pub forehead_height: f64,
    pub eyebrow_height: f64,
    pub eye_height: f64,
    pub cheek_height: f64,
    pub nose_height: f64,
    pub mouth_height: f64,
    pub jaw_height: f64,
    pub chin_height: f64,
    pub shoulder_height: f64,
    pub torso_top: f64,
    pub torso_bottom: f64,
    pub floor: f64,
    pub face_width: f64,
    pub face_height: f64,
    pub mesh_height: f64,
    pub mesh_width: f64,
    /// Lateral coordinate of the symmetry plane.
    pub center_x: f64,
    /// Depth coordinate of the bounds centre.
    pub center_depth: f64,
}

impl Landmarks {
    /// Height of an anchor landmark.
    pub fn anchor_height(&self, anchor: Anchor) -> f64 {
        match anchor {
            Anchor::HeadTop => self.head_top,
            Anchor::Forehead => self.forehead_height,
            Anchor::Eyebrow => self.eyebrow_height,
            Anchor::Eye => self.eye_height,
            Anchor::Cheek => self.cheek_height,
            Anchor::Nose => self.nose_height,
            Anchor::Mouth => self.mouth_height,
            Anchor::Jaw => self.jaw_height,
            Anchor::Chin => self.chin_height,
            Anchor::HeadBase => self.head_base,
            Anchor::Shoulder => self.shoulder_height,
            Anchor::TorsoTop => self.torso_top,
            Anchor::TorsoBottom => self.torso_bottom,
            Anchor::Floor => self.floor,
        }
    }

    /// Vertical length that offsets and radii around `anchor` are fractions of.
    pub fn frame_length(&self, anchor: Anchor) -> f64 {
        if anchor.is_face() {
            self.face_height
        } else {
            self.mesh_height
        }
    }

    /// Lateral length that width bounds around `anchor` are fractions of.
    pub fn frame_width(&self, anchor: Anchor) -> f64 {
        if anchor.is_face() {
            self.face_width
        } else {
            self.mesh_width
        }
    }

    /// Length a magnitude fraction is multiplied by.
    pub fn basis_length(&self, basis: MagnitudeBasis) -> f64 {
        match basis {
            MagnitudeBasis::FaceHeight => self.face_height,
            MagnitudeBasis::MeshWidth => self.mesh_width,
            MagnitudeBasis::MeshHeight => self.mesh_height,
        }
    }
}

/// Places [`Landmarks`] on a mesh frame using a proportion table.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkEstimator {
    proportions: ProportionTable,
}

impl Default for LandmarkEstimator {
    fn default() -> Self {
        Self::new(ProportionTable::default())
    }
}

impl LandmarkEstimator {
    pub fn new(proportions: ProportionTable) -> Self {
        Self { proportions }
    }

    /// Estimate landmarks for a mesh frame.
    pub fn estimate(&self, frame: &MeshFrame) -> Landmarks {
        let p = &self.proportions;
        let bounds = frame.anatomical_bounds();
        let size = bounds.size();
        let center = bounds.center();

        let head_top = bounds.max.y;
        let mesh_height = size.y;
        let face_height = mesh_height * p.face_fraction;
        let face = |k: f64| head_top - face_height * k;
        let body = |k: f64| head_top - mesh_height * k;

        Landmarks {
            head_top,
            head_base: body(p.head_fraction),
            forehead_height: face(p.face.forehead),
            eyebrow_height: face(p.face.eyebrow),
            eye_height: face(p.face.eye),
            cheek_height: face(p.face.cheek),
            nose_height: face(p.face.nose),
            mouth_height: face(p.face.mouth),
            jaw_height: face(p.face.jaw),
            chin_height: face(p.face.chin),
            shoulder_height: body(p.body.shoulder),
            torso_top: body(p.body.torso_top),
            torso_bottom: body(p.body.torso_bottom),
            floor: bounds.min.y,
            face_width: face_height * p.face_width_ratio,
            face_height,
            mesh_height,
            mesh_width: size.x,
            center_x: center.x,
            center_depth: center.z,
        }
    }
}
