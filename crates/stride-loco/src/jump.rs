use stride_core::Scalar;

/// Upward impulse magnitude of a jump.
pub const JUMP_FORCE: Scalar = 9.0;
/// Post-jump window during which air damping is suppressed so the impulse is
/// not immediately eaten.
pub const JUMP_GRACE: Scalar = 0.2;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum JumpPhase { Ready, Cooldown }

/// Jump eligibility and the post-jump grace timer. One impulse per grounded
/// press-and-hold: `ok_to_jump` only rearms when the key is released while
/// grounded, never by time and never in the air.
#[derive(Copy, Clone, Debug)]
pub struct JumpCtrl {
    pub ok_to_jump: bool,
    pub jump_timer: Scalar,
}

impl Default for JumpCtrl {
    fn default() -> Self {
        Self { ok_to_jump: true, jump_timer: 0.0 }
    }
}

impl JumpCtrl {
    #[inline]
    pub fn phase(&self) -> JumpPhase {
        if self.ok_to_jump { JumpPhase::Ready } else { JumpPhase::Cooldown }
    }

    /// Unconditional per-tick decrement, clamped at zero.
    #[inline]
    pub fn tick_timer(&mut self, dt: Scalar) {
        self.jump_timer = (self.jump_timer - dt).max(0.0);
    }

    /// Grounded-tick transition. Returns the upward impulse magnitude when a
    /// jump fires. Airborne ticks never reach this, so an airborne release
    /// cannot rearm the jump.
    pub fn on_grounded(&mut self, jump_held: bool) -> Option<Scalar> {
        if jump_held {
            if self.ok_to_jump {
                self.ok_to_jump = false;
                self.jump_timer = JUMP_GRACE;
                return Some(JUMP_FORCE);
            }
        } else {
            self.ok_to_jump = true;
        }
        None
    }

    /// True while the post-jump grace window is open.
    #[inline]
    pub fn in_grace(&self) -> bool {
        self.jump_timer > 0.0
    }
}
