use glam::Quat;
use serde::{Deserialize, Serialize};
use stride_core::types::{Vec3, vec3};
use stride_core::{Scalar, StepHasher, hash_bool, hash_f32};

use crate::controls::{CTRL_JUMP, Controls};
use crate::damping::{damp_vertical, should_damp};
use crate::ground::{ContactEvent, GroundState};
use crate::jump::JumpCtrl;
use crate::slope::{GroundProbe, SlopeSample};

/// Ground movement gain; divided by the brake coefficient it also sets the
/// desired ground speed.
pub const MOVE_FORCE: Scalar = 0.8;
/// Same, while airborne: barely any steering authority.
pub const INAIR_MOVE_FORCE: Scalar = 0.002;
/// Downward force while soft-grounded, suppresses bouncing on uneven ground.
pub const STICK_FORCE: Scalar = 40.0;
/// Stalled or bogus frames are clamped so timers stay monotone and impulses
/// stay bounded.
pub const MAX_DT: Scalar = 0.25;

/// Capability handle to the character's rigid body for one tick. The physics
/// collaborator owns the state; impulses change velocity immediately through
/// the body's inverse mass, forces accumulate over the tick (F·dt).
pub trait BodyHandle {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, v: Vec3);
    fn apply_impulse(&mut self, j: Vec3);
    fn apply_force(&mut self, f: Vec3);
}

/// Replication/persistence surface. Plain serializable fields, independent of
/// any wire mechanism.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub yaw: Scalar,
    pub pitch: Scalar,
    pub on_ground: bool,
    pub ok_to_jump: bool,
    pub in_air_timer: Scalar,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self { yaw: 0.0, pitch: 0.0, on_ground: false, ok_to_jump: true, in_air_timer: 0.0 }
    }
}

/// What one tick did, for ledgers and tests. `on_ground` here is the value
/// observed during the tick, before the end-of-tick reset.
#[derive(Copy, Clone, Debug, Default)]
pub struct TickOutcome {
    pub on_ground: bool,
    pub soft_grounded: bool,
    pub in_air_timer: Scalar,
    pub slope_angle: Scalar,
    pub brake: Scalar,
    pub jump_impulse: Option<Scalar>,
    pub damped: bool,
}

/// Per-tick locomotion orchestrator. Owns ground/slope/jump bookkeeping;
/// the body and the raycast query are borrowed capabilities, never owned.
#[derive(Copy, Clone, Debug, Default)]
pub struct CharacterCtrl {
    pub controls: Controls,
    pub ground: GroundState,
    pub jump: JumpCtrl,
    pub slope: SlopeSample,
}

impl CharacterCtrl {
    pub fn new() -> Self { Self::default() }

    pub fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }

    pub fn state(&self) -> CharacterState {
        CharacterState {
            yaw: self.controls.yaw,
            pitch: self.controls.pitch,
            on_ground: self.ground.on_ground,
            ok_to_jump: self.jump.ok_to_jump,
            in_air_timer: self.ground.in_air_timer,
        }
    }

    pub fn apply_state(&mut self, s: &CharacterState) {
        self.controls.yaw = s.yaw;
        self.controls.pitch = s.pitch;
        self.ground.on_ground = s.on_ground;
        self.jump.ok_to_jump = s.ok_to_jump;
        self.ground.in_air_timer = s.in_air_timer;
    }

    /// Stable field order; feeds the world's step hash.
    pub fn hash_into(&self, h: &mut StepHasher) {
        hash_f32(h, self.controls.yaw);
        hash_f32(h, self.controls.pitch);
        hash_bool(h, self.ground.on_ground);
        hash_bool(h, self.jump.ok_to_jump);
        hash_f32(h, self.ground.in_air_timer);
        hash_f32(h, self.jump.jump_timer);
    }

    /// One physics tick. `contacts` are this tick's events for this body;
    /// they are consumed here and never carried over.
    pub fn fixed_update(
        &mut self,
        body: &mut impl BodyHandle,
        probe: &impl GroundProbe,
        contacts: &[ContactEvent],
        dt: Scalar,
    ) -> TickOutcome {
        let dt = dt.clamp(0.0, MAX_DT);
        let origin = body.position();

        // Bookkeeping first: contacts, then timers, so a landing tick reads
        // in_air_timer == 0.
        self.ground.observe_contacts(origin, contacts);
        self.ground.advance_timer(dt);
        self.jump.tick_timer(dt);
        let soft_grounded = self.ground.soft_grounded();

        self.slope = SlopeSample::probe(probe, origin);

        let rot = body.rotation();
        let velocity = body.linear_velocity();
        let plane_velocity = vec3(velocity.x, 0.0, velocity.z);

        let brake = self.controls.brake_coefficient();
        let move_dir = self.controls.move_dir_local();

        let desired_speed = (if soft_grounded { MOVE_FORCE } else { INAIR_MOVE_FORCE }) / brake;
        let desired_velocity = rot * (move_dir * desired_speed);
        let velocity_diff = desired_velocity - plane_velocity;
        let gain = if soft_grounded {
            MOVE_FORCE * self.slope.force_multiplier()
        } else {
            INAIR_MOVE_FORCE
        };
        body.apply_impulse(velocity_diff * gain);

        let mut jump_impulse = None;
        if soft_grounded {
            body.apply_force(vec3(0.0, -STICK_FORCE, 0.0));
            // Brake against the velocity snapshot taken before the movement
            // impulse; this caps steady-state ground speed.
            body.apply_impulse(-plane_velocity * brake);
            if let Some(mag) = self.jump.on_grounded(self.controls.is_down(CTRL_JUMP)) {
                body.apply_impulse(vec3(0.0, mag, 0.0));
                jump_impulse = Some(mag);
            }
        }

        // Secondary pass, keyed off this same tick's ground/jump state.
        let mut damped = false;
        if should_damp(self.ground.on_ground, self.jump.in_grace()) {
            let mut v = body.linear_velocity();
            v.y = damp_vertical(v.y, dt);
            body.set_linear_velocity(v);
            damped = true;
        }

        let outcome = TickOutcome {
            on_ground: self.ground.on_ground,
            soft_grounded,
            in_air_timer: self.ground.in_air_timer,
            slope_angle: self.slope.angle,
            brake,
            jump_impulse,
            damped,
        };
        self.ground.end_tick();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{CTRL_FORWARD, CTRL_JUMP};
    use crate::ground::ContactEvent;
    use crate::jump::{JUMP_FORCE, JUMP_GRACE};
    use crate::slope::RayHit;

    const DT: Scalar = 1.0 / 60.0;

    struct TestBody {
        pos: Vec3,
        rot: Quat,
        vel: Vec3,
        impulses: Vec<Vec3>,
        forces: Vec<Vec3>,
    }

    impl TestBody {
        fn new() -> Self {
            Self {
                pos: vec3(0.0, 1.4, 0.0),
                rot: Quat::IDENTITY,
                vel: Vec3::ZERO,
                impulses: Vec::new(),
                forces: Vec::new(),
            }
        }
    }

    // Unit mass, matching the character body the world registers.
    impl BodyHandle for TestBody {
        fn position(&self) -> Vec3 { self.pos }
        fn rotation(&self) -> Quat { self.rot }
        fn linear_velocity(&self) -> Vec3 { self.vel }
        fn set_linear_velocity(&mut self, v: Vec3) { self.vel = v; }
        fn apply_impulse(&mut self, j: Vec3) {
            self.impulses.push(j);
            self.vel += j;
        }
        fn apply_force(&mut self, f: Vec3) {
            // Recorded only; these tests never integrate forces.
            self.forces.push(f);
        }
    }

    struct FlatProbe;
    impl GroundProbe for FlatProbe {
        fn raycast(&self, _o: Vec3, _d: Vec3, _m: Scalar) -> Option<RayHit> {
            Some(RayHit { normal: vec3(0.0, 1.0, 0.0), distance: 1.0 })
        }
    }

    struct NoProbe;
    impl GroundProbe for NoProbe {
        fn raycast(&self, _o: Vec3, _d: Vec3, _m: Scalar) -> Option<RayHit> { None }
    }

    fn floor_contact(origin: Vec3) -> ContactEvent {
        ContactEvent {
            position: origin - vec3(0.0, 0.9, 0.0),
            normal: vec3(0.0, 1.0, 0.0),
            distance: 0.0,
            impulse: 0.0,
        }
    }

    fn grounded_tick(ctrl: &mut CharacterCtrl, body: &mut TestBody) -> TickOutcome {
        let c = floor_contact(body.pos);
        ctrl.fixed_update(body, &FlatProbe, &[c], DT)
    }

    #[test]
    fn landing_resets_air_timer_to_exactly_zero() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        for _ in 0..10 {
            let out = ctrl.fixed_update(&mut body, &NoProbe, &[], DT);
            assert!(out.in_air_timer >= 0.0);
        }
        assert!(ctrl.ground.in_air_timer > 0.1);
        let out = grounded_tick(&mut ctrl, &mut body);
        assert_eq!(out.in_air_timer, 0.0);
        assert!(out.on_ground && out.soft_grounded);
    }

    #[test]
    fn jump_impulse_fires_exactly_once_per_hold() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        ctrl.controls.set(CTRL_JUMP, true);
        let mut fired = 0;
        for _ in 0..8 {
            let out = grounded_tick(&mut ctrl, &mut body);
            if let Some(mag) = out.jump_impulse {
                assert_eq!(mag, JUMP_FORCE);
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(!ctrl.jump.ok_to_jump);
        let ups = body.impulses.iter().filter(|j| j.y == JUMP_FORCE).count();
        assert_eq!(ups, 1);
    }

    #[test]
    fn jump_timer_set_on_fire_and_counts_down() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        ctrl.controls.set(CTRL_JUMP, true);
        grounded_tick(&mut ctrl, &mut body);
        assert_eq!(ctrl.jump.jump_timer, JUMP_GRACE);
        grounded_tick(&mut ctrl, &mut body);
        assert!((ctrl.jump.jump_timer - (JUMP_GRACE - DT)).abs() < 1e-6);
    }

    #[test]
    fn airborne_release_does_not_rearm_jump() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        ctrl.controls.set(CTRL_JUMP, true);
        grounded_tick(&mut ctrl, &mut body);
        assert!(!ctrl.jump.ok_to_jump);

        // Release in the air: stays disarmed.
        ctrl.controls.set(CTRL_JUMP, false);
        ctrl.ground.in_air_timer = 1.0;
        for _ in 0..5 {
            ctrl.fixed_update(&mut body, &NoProbe, &[], DT);
        }
        assert!(!ctrl.jump.ok_to_jump);

        // Release while grounded: rearms.
        grounded_tick(&mut ctrl, &mut body);
        assert!(ctrl.jump.ok_to_jump);
    }

    #[test]
    fn airborne_vertical_damping_matches_policy() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        body.vel = vec3(0.0, 10.0, 0.0);
        // dt of 0.1 pushes in_air_timer to exactly the grace bound: airborne.
        let out = ctrl.fixed_update(&mut body, &NoProbe, &[], 0.1);
        assert!(!out.soft_grounded);
        assert!(out.damped);
        assert!((body.vel.y - 9.9).abs() < 1e-5);
    }

    #[test]
    fn jump_grace_suppresses_damping() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        ctrl.controls.set(CTRL_JUMP, true);
        let out = grounded_tick(&mut ctrl, &mut body);
        assert!(out.jump_impulse.is_some());
        let vy = body.vel.y;
        // Airborne now, but inside the grace window: vy untouched.
        let out = ctrl.fixed_update(&mut body, &NoProbe, &[], DT);
        assert!(!out.damped);
        assert_eq!(body.vel.y, vy);
    }

    #[test]
    fn braking_monotonically_stops_planar_motion() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        body.vel = vec3(5.0, 0.0, 0.0);
        let mut prev = 5.0_f32;
        for _ in 0..30 {
            grounded_tick(&mut ctrl, &mut body);
            let speed = vec3(body.vel.x, 0.0, body.vel.z).length();
            assert!(speed <= prev + 1e-6);
            assert!(body.vel.x >= -1e-6, "braking must never reverse direction");
            prev = speed;
        }
        assert!(prev < 1e-3);
    }

    #[test]
    fn grounded_movement_targets_brake_limited_speed() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        ctrl.controls.set(CTRL_FORWARD, true);
        let out = grounded_tick(&mut ctrl, &mut body);
        assert_eq!(out.brake, 0.06);
        // First tick from rest: impulse = desired_speed * MOVE_FORCE, forward.
        let expected = (MOVE_FORCE / 0.06) * MOVE_FORCE;
        let first = body.impulses[0];
        assert!((first.z - expected).abs() < 1e-3);
        assert!(first.x.abs() < 1e-6 && first.y.abs() < 1e-6);
    }

    #[test]
    fn stick_force_only_while_soft_grounded() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        grounded_tick(&mut ctrl, &mut body);
        assert_eq!(body.forces.len(), 1);
        assert_eq!(body.forces[0], vec3(0.0, -STICK_FORCE, 0.0));

        ctrl.ground.in_air_timer = 1.0;
        ctrl.fixed_update(&mut body, &NoProbe, &[], DT);
        assert_eq!(body.forces.len(), 1);
    }

    #[test]
    fn out_of_range_dt_is_clamped() {
        let mut ctrl = CharacterCtrl::new();
        let mut body = TestBody::new();
        ctrl.fixed_update(&mut body, &NoProbe, &[], -0.5);
        assert_eq!(ctrl.ground.in_air_timer, 0.0);
        ctrl.fixed_update(&mut body, &NoProbe, &[], 100.0);
        assert_eq!(ctrl.ground.in_air_timer, MAX_DT);
    }

    #[test]
    fn replication_state_defaults_and_round_trip() {
        let s = CharacterState::default();
        assert_eq!(s.yaw, 0.0);
        assert_eq!(s.pitch, 0.0);
        assert!(!s.on_ground);
        assert!(s.ok_to_jump);
        assert_eq!(s.in_air_timer, 0.0);

        let mut ctrl = CharacterCtrl::new();
        let snap = CharacterState { yaw: 1.5, pitch: -0.2, on_ground: true, ok_to_jump: false, in_air_timer: 0.07 };
        ctrl.apply_state(&snap);
        assert_eq!(ctrl.state(), snap);
    }
}
