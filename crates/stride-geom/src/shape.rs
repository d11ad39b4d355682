use glam::Mat3A;
use stride_core::types::{Isometry, Vec3};

use crate::aabb::Aabb;

#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Sphere { r: f32 },
    Box { hx: f32, hy: f32, hz: f32 },
    Capsule { r: f32, hh: f32 }, // half-height along local Y
}

#[inline]
pub fn aabb_of(shape: &Shape, xf: &Isometry) -> Aabb {
    match *shape {
        Shape::Sphere { r } => Aabb::from_center_half_extents(xf.pos, Vec3::splat(r)),
        Shape::Box { hx, hy, hz } => {
            let he = Vec3::new(hx, hy, hz);
            let rot = Mat3A::from_quat(xf.rot);
            let m = Mat3A::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
            Aabb::from_center_half_extents(xf.pos, m * he)
        }
        Shape::Capsule { r, hh } => {
            let axis_world = xf.rot * Vec3::new(0.0, hh.abs(), 0.0);
            let he = axis_world.abs() + Vec3::splat(r);
            Aabb::from_center_half_extents(xf.pos, he)
        }
    }
}

impl Shape {
    /// World-space segment endpoints of a capsule's core, or `pos` twice for
    /// the degenerate shapes.
    #[inline]
    pub fn capsule_segment(&self, xf: &Isometry) -> (Vec3, Vec3) {
        match *self {
            Shape::Capsule { hh, .. } => {
                let up = xf.rot * Vec3::new(0.0, hh, 0.0);
                (xf.pos + up, xf.pos - up)
            }
            _ => (xf.pos, xf.pos),
        }
    }
}
