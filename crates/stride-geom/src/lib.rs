pub mod aabb;
pub mod shape;
pub mod mass;
pub mod ray;

pub use aabb::Aabb;
pub use shape::{Shape, aabb_of};
pub use mass::MassProps;
pub use ray::{ray_aabb, ray_sphere};
