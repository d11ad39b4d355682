use stride_core::types::{Vec3, vec3};
use stride_core::Scalar;

pub const CTRL_FORWARD: u32 = 1;
pub const CTRL_BACK: u32 = 2;
pub const CTRL_LEFT: u32 = 4;
pub const CTRL_RIGHT: u32 = 8;
pub const CTRL_JUMP: u32 = 16;
pub const CTRL_PROWL: u32 = 32;
pub const CTRL_SPRINT: u32 = 64;

/// Exposed for the input layer: radians of yaw per unit of pointer motion.
pub const YAW_SENSITIVITY: Scalar = 0.1;

const BRAKE_PROWL: Scalar = 0.12;
const BRAKE_SPRINT: Scalar = 0.04;
const BRAKE_DEFAULT: Scalar = 0.06;

/// Most recent input sample. Produced externally once per tick; the
/// locomotion core only reads it. Character-local axes: +Z forward, +X right.
#[derive(Copy, Clone, Debug, Default)]
pub struct Controls {
    pub buttons: u32,
    pub yaw: Scalar,
    pub pitch: Scalar,
}

impl Controls {
    #[inline]
    pub fn is_down(&self, flag: u32) -> bool {
        self.buttons & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u32, down: bool) {
        if down { self.buttons |= flag; } else { self.buttons &= !flag; }
    }

    /// Stance-selected brake coefficient; divides desired speed and scales the
    /// braking impulse. Prowl wins over sprint.
    pub fn brake_coefficient(&self) -> Scalar {
        if self.is_down(CTRL_PROWL) {
            BRAKE_PROWL
        } else if self.is_down(CTRL_SPRINT) {
            BRAKE_SPRINT
        } else {
            BRAKE_DEFAULT
        }
    }

    /// Unit move direction in character-local space, zero when no input or
    /// opposite inputs cancel. Diagonals are not faster.
    pub fn move_dir_local(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.is_down(CTRL_FORWARD) { dir += vec3(0.0, 0.0, 1.0); }
        if self.is_down(CTRL_BACK) { dir += vec3(0.0, 0.0, -1.0); }
        if self.is_down(CTRL_LEFT) { dir += vec3(-1.0, 0.0, 0.0); }
        if self.is_down(CTRL_RIGHT) { dir += vec3(1.0, 0.0, 0.0); }
        if dir.length_squared() > 0.0 { dir = dir.normalize(); }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prowl_overrides_sprint() {
        let mut c = Controls::default();
        assert_eq!(c.brake_coefficient(), 0.06);
        c.set(CTRL_SPRINT, true);
        assert_eq!(c.brake_coefficient(), 0.04);
        c.set(CTRL_PROWL, true);
        assert_eq!(c.brake_coefficient(), 0.12);
    }

    #[test]
    fn diagonal_is_unit_length() {
        let mut c = Controls::default();
        c.set(CTRL_FORWARD, true);
        c.set(CTRL_RIGHT, true);
        let d = c.move_dir_local();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.z > 0.0 && d.x > 0.0);
    }

    #[test]
    fn opposite_inputs_cancel() {
        let mut c = Controls::default();
        c.set(CTRL_FORWARD, true);
        c.set(CTRL_BACK, true);
        assert_eq!(c.move_dir_local(), Vec3::ZERO);
    }

    #[test]
    fn set_and_clear_flags() {
        let mut c = Controls::default();
        c.set(CTRL_JUMP, true);
        assert!(c.is_down(CTRL_JUMP));
        c.set(CTRL_JUMP, false);
        assert!(!c.is_down(CTRL_JUMP));
    }
}
