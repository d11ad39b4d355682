use stride_core::types::Vec3;

use crate::aabb::Aabb;

/// Slab test against an AABB, bounded by `max_t` along a unit `dir`.
/// Rays starting inside the box miss, matching convex-shape ray semantics:
/// the ground probe fires from the character's own center and must not see
/// its own collider volume as ground.
pub fn ray_aabb(origin: Vec3, dir: Vec3, aabb: &Aabb, max_t: f32) -> Option<(f32, Vec3)> {
    let inv = Vec3::new(
        if dir.x.abs() > 1e-9 { 1.0 / dir.x } else { 1.0e9 },
        if dir.y.abs() > 1e-9 { 1.0 / dir.y } else { 1.0e9 },
        if dir.z.abs() > 1e-9 { 1.0 / dir.z } else { 1.0e9 },
    );
    let t1 = (aabb.min - origin) * inv;
    let t2 = (aabb.max - origin) * inv;
    let tmin = t1.min(t2);
    let tmax = t1.max(t2);

    let mut t_enter = tmin.x;
    let mut n = Vec3::new(if t1.x > t2.x { 1.0 } else { -1.0 }, 0.0, 0.0);
    if tmin.y > t_enter {
        t_enter = tmin.y;
        n = Vec3::new(0.0, if t1.y > t2.y { 1.0 } else { -1.0 }, 0.0);
    }
    if tmin.z > t_enter {
        t_enter = tmin.z;
        n = Vec3::new(0.0, 0.0, if t1.z > t2.z { 1.0 } else { -1.0 });
    }
    let t_exit = tmax.x.min(tmax.y).min(tmax.z);

    if t_enter <= t_exit && t_enter >= 0.0 && t_enter <= max_t {
        Some((t_enter, n))
    } else {
        None
    }
}

/// Ray vs sphere surface, bounded by `max_t` along a unit `dir`.
/// Origins inside the sphere miss, same convention as `ray_aabb`.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, r: f32, max_t: f32) -> Option<(f32, Vec3)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - r * r;
    if c < 0.0 { return None; } // inside
    let disc = b * b - c;
    if disc < 0.0 { return None; }
    let t = -b - disc.sqrt();
    if t < 0.0 || t > max_t { return None; }
    let n = (origin + dir * t - center) / r;
    Some((t, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::vec3;

    const DOWN: Vec3 = Vec3::new(0.0, -1.0, 0.0);

    #[test]
    fn downward_ray_hits_floor_top() {
        let floor = Aabb::new(vec3(-10.0, -1.0, -10.0), vec3(10.0, 0.5, 10.0));
        let (t, n) = ray_aabb(vec3(0.0, 1.5, 0.0), DOWN, &floor, 1.5).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        assert!((n.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ray_respects_max_distance() {
        let floor = Aabb::new(vec3(-10.0, -1.0, -10.0), vec3(10.0, 0.5, 10.0));
        assert!(ray_aabb(vec3(0.0, 5.0, 0.0), DOWN, &floor, 1.5).is_none());
    }

    #[test]
    fn origin_inside_box_misses() {
        let b = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
        assert!(ray_aabb(vec3(0.0, 0.0, 0.0), DOWN, &b, 10.0).is_none());
    }

    #[test]
    fn sphere_normal_tilts_off_apex() {
        // Probe a little off the apex of a unit sphere: the hit normal leans.
        let (t, n) = ray_sphere(vec3(0.3, 3.0, 0.0), DOWN, Vec3::ZERO, 1.0, 5.0).unwrap();
        assert!(t > 0.0);
        assert!(n.x > 0.0 && n.y > 0.9);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn origin_inside_sphere_misses() {
        assert!(ray_sphere(vec3(0.0, 0.0, 0.0), DOWN, Vec3::ZERO, 1.0, 5.0).is_none());
    }
}
