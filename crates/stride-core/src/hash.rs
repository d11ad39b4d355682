use blake3::Hasher;
use glam::Quat;

use crate::types::Vec3;

/// Accumulates the per-tick state digest used for lockstep comparison.
pub struct StepHasher(Hasher);

impl StepHasher {
    pub fn new() -> Self { StepHasher(Hasher::new()) }
    pub fn update_bytes(&mut self, bytes: &[u8]) { self.0.update(bytes); }
    pub fn finalize(self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

impl Default for StepHasher {
    fn default() -> Self { Self::new() }
}

#[inline]
pub fn hash_f32(h: &mut StepHasher, x: f32) {
    h.update_bytes(&x.to_le_bytes());
}

#[inline]
pub fn hash_bool(h: &mut StepHasher, b: bool) {
    h.update_bytes(&[b as u8]);
}

#[inline]
pub fn hash_vec3(h: &mut StepHasher, v: &Vec3) {
    for c in [v.x, v.y, v.z] { hash_f32(h, c); }
}

#[inline]
pub fn hash_quat(h: &mut StepHasher, q: &Quat) {
    for c in [q.x, q.y, q.z, q.w] { hash_f32(h, c); }
}
