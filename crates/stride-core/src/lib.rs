pub mod scalar;
pub mod ids;
pub mod types;
pub mod hash;
pub mod schedule;

pub use scalar::Scalar;
pub use ids::{BodyId, ColliderId};
pub use types::{Isometry, Vec3, Velocity, iso, quat_identity, vec3};
pub use hash::{StepHasher, hash_bool, hash_f32, hash_quat, hash_vec3};
pub use schedule::{StepStage, schedule_digest};
pub use glam::Quat;
