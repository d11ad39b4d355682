use core::f32::consts::PI;

use stride_core::types::Vec3;

/// Mass only. This engine never integrates rotation, so no inertia tensor.
#[derive(Copy, Clone, Debug)]
pub struct MassProps {
    pub mass: f32,
    pub inv_mass: f32,
}

impl MassProps {
    pub fn infinite() -> Self {
        Self { mass: f32::INFINITY, inv_mass: 0.0 }
    }

    pub fn from_mass(mass: f32) -> Self {
        Self { mass, inv_mass: 1.0 / mass }
    }

    pub fn from_sphere(radius: f32, density: f32) -> Self {
        let vol = (4.0 / 3.0) * PI * radius * radius * radius;
        Self::from_mass(density * vol)
    }

    pub fn from_box(half: Vec3, density: f32) -> Self {
        let dims = half * 2.0;
        Self::from_mass(density * dims.x * dims.y * dims.z)
    }

    pub fn from_capsule(radius: f32, half_h: f32, density: f32) -> Self {
        let vol_cyl = PI * radius * radius * (half_h * 2.0);
        let vol_sph = (4.0 / 3.0) * PI * radius * radius * radius;
        Self::from_mass(density * (vol_cyl + vol_sph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_mass_has_zero_inverse() {
        let m = MassProps::infinite();
        assert_eq!(m.inv_mass, 0.0);
    }

    #[test]
    fn unit_mass_round_trip() {
        let m = MassProps::from_mass(1.0);
        assert_eq!(m.inv_mass, 1.0);
    }
}
