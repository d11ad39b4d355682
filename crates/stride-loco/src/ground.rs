use stride_core::types::Vec3;
use stride_core::Scalar;

/// Hysteresis band: off-ground for less than this still counts as grounded,
/// masking solver jitter on uneven ground.
pub const GROUND_GRACE: Scalar = 0.10;

// A contact counts as walkable ground when it sits below this window above
// the character origin and its normal is near-vertical.
const CONTACT_HEIGHT_WINDOW: Scalar = 1.0;
const MIN_GROUND_NORMAL_Y: Scalar = 0.75;

/// One contact reported by the collision system this tick. `normal` points
/// from the touched surface toward the character.
#[derive(Copy, Clone, Debug)]
pub struct ContactEvent {
    pub position: Vec3,
    pub normal: Vec3,
    pub distance: Scalar,
    pub impulse: Scalar,
}

/// Per-tick sticky-OR ground classifier plus the in-air timer.
/// `on_ground` holds only within a tick: set by `observe_contacts`, read by
/// the controller, cleared by `end_tick` so stale contacts never leak.
#[derive(Copy, Clone, Debug, Default)]
pub struct GroundState {
    pub on_ground: bool,
    pub in_air_timer: Scalar,
}

impl GroundState {
    /// OR in every walkable contact delivered this tick.
    pub fn observe_contacts(&mut self, origin: Vec3, contacts: &[ContactEvent]) {
        for c in contacts {
            if c.position.y < origin.y + CONTACT_HEIGHT_WINDOW && c.normal.y > MIN_GROUND_NORMAL_Y {
                self.on_ground = true;
            }
        }
    }

    /// Accumulate airtime, or reset it the tick we touch ground.
    pub fn advance_timer(&mut self, dt: Scalar) {
        if self.on_ground {
            self.in_air_timer = 0.0;
        } else {
            self.in_air_timer += dt;
        }
    }

    #[inline]
    pub fn soft_grounded(&self) -> bool {
        self.in_air_timer < GROUND_GRACE
    }

    /// Clear the sticky flag for the next tick's contacts.
    #[inline]
    pub fn end_tick(&mut self) {
        self.on_ground = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::vec3;

    fn floor_contact(origin: Vec3) -> ContactEvent {
        ContactEvent {
            position: origin - vec3(0.0, 0.9, 0.0),
            normal: vec3(0.0, 1.0, 0.0),
            distance: 0.0,
            impulse: 0.0,
        }
    }

    #[test]
    fn walkable_contact_sets_grounded() {
        let origin = vec3(0.0, 1.4, 0.0);
        let mut g = GroundState::default();
        g.observe_contacts(origin, &[floor_contact(origin)]);
        assert!(g.on_ground);
    }

    #[test]
    fn steep_normal_is_not_ground() {
        let origin = vec3(0.0, 1.4, 0.0);
        let mut g = GroundState::default();
        let wall = ContactEvent {
            position: origin - vec3(0.3, 0.0, 0.0),
            normal: vec3(1.0, 0.2, 0.0).normalize(),
            distance: 0.0,
            impulse: 0.0,
        };
        g.observe_contacts(origin, &[wall]);
        assert!(!g.on_ground);
    }

    #[test]
    fn contact_above_window_is_ignored() {
        let origin = vec3(0.0, 1.4, 0.0);
        let mut g = GroundState::default();
        let overhead = ContactEvent {
            position: origin + vec3(0.0, 1.5, 0.0),
            normal: vec3(0.0, 1.0, 0.0),
            distance: 0.0,
            impulse: 0.0,
        };
        g.observe_contacts(origin, &[overhead]);
        assert!(!g.on_ground);
    }

    #[test]
    fn contacts_or_idempotently() {
        let origin = vec3(0.0, 1.4, 0.0);
        let mut g = GroundState::default();
        let c = floor_contact(origin);
        g.observe_contacts(origin, &[c, c, c]);
        assert!(g.on_ground);
    }

    #[test]
    fn timer_accumulates_in_air_and_resets_on_ground() {
        let mut g = GroundState::default();
        g.advance_timer(0.04);
        g.advance_timer(0.04);
        assert!((g.in_air_timer - 0.08).abs() < 1e-6);
        assert!(g.soft_grounded());
        g.advance_timer(0.04);
        assert!(!g.soft_grounded());
        g.on_ground = true;
        g.advance_timer(0.04);
        assert_eq!(g.in_air_timer, 0.0);
        assert!(g.soft_grounded());
    }

    #[test]
    fn end_tick_clears_sticky_flag() {
        let origin = vec3(0.0, 1.4, 0.0);
        let mut g = GroundState::default();
        g.observe_contacts(origin, &[floor_contact(origin)]);
        g.end_tick();
        assert!(!g.on_ground);
        g.observe_contacts(origin, &[]);
        assert!(!g.on_ground);
    }
}
