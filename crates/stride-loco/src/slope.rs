use stride_core::types::{Vec3, vec3};
use stride_core::Scalar;

/// How far below the character the ground probe reaches.
pub const PROBE_DISTANCE: Scalar = 1.5;

#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    pub normal: Vec3,
    pub distance: Scalar,
}

/// Downward raycast capability supplied by the physics collaborator.
pub trait GroundProbe {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<RayHit>;
}

/// Ground surface directly beneath the character. Recomputed every tick,
/// no memory; a probe miss means flat ground. Independent of the contact
/// classifier and may disagree with it (hovering within probe range).
#[derive(Copy, Clone, Debug)]
pub struct SlopeSample {
    pub normal: Vec3,
    pub angle: Scalar,
}

impl Default for SlopeSample {
    fn default() -> Self {
        Self { normal: vec3(0.0, 1.0, 0.0), angle: 0.0 }
    }
}

impl SlopeSample {
    pub fn probe(probe: &impl GroundProbe, origin: Vec3) -> Self {
        match probe.raycast(origin, vec3(0.0, -1.0, 0.0), PROBE_DISTANCE) {
            Some(hit) => {
                let n = hit.normal;
                let angle = n.dot(vec3(0.0, 1.0, 0.0)).clamp(-1.0, 1.0).acos();
                Self { normal: n, angle }
            }
            None => Self::default(),
        }
    }

    /// Ground movement force scale, linear in the probed angle. Deliberately
    /// independent of travel direction: uphill and downhill get the same
    /// boost.
    #[inline]
    pub fn force_multiplier(&self) -> Scalar {
        1.0 + self.angle * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_4;

    struct FixedProbe(Option<RayHit>);
    impl GroundProbe for FixedProbe {
        fn raycast(&self, _origin: Vec3, _dir: Vec3, _max: Scalar) -> Option<RayHit> {
            self.0
        }
    }

    #[test]
    fn miss_is_flat_ground() {
        let s = SlopeSample::probe(&FixedProbe(None), Vec3::ZERO);
        assert_eq!(s.angle, 0.0);
        assert_eq!(s.normal, vec3(0.0, 1.0, 0.0));
        assert_eq!(s.force_multiplier(), 1.0);
    }

    #[test]
    fn forty_five_degree_normal() {
        let n = vec3(1.0, 1.0, 0.0).normalize();
        let s = SlopeSample::probe(
            &FixedProbe(Some(RayHit { normal: n, distance: 0.5 })),
            Vec3::ZERO,
        );
        assert!((s.angle - FRAC_PI_4).abs() < 1e-5);
        assert!((s.force_multiplier() - 2.5708).abs() < 1e-3);
    }

    #[test]
    fn vertical_normal_is_zero_angle() {
        let s = SlopeSample::probe(
            &FixedProbe(Some(RayHit { normal: vec3(0.0, 1.0, 0.0), distance: 1.0 })),
            Vec3::ZERO,
        );
        assert!(s.angle.abs() < 1e-6);
    }
}
