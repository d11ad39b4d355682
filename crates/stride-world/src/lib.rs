use glam::Quat;
use stride_core::{
    BodyId, ColliderId, Isometry, Scalar, StepHasher, StepStage, Vec3, Velocity, hash_quat,
    hash_vec3, iso, quat_identity, vec3,
};
use stride_dynamics::{Bodies, BodyDesc};
use stride_geom::{Aabb, MassProps, Shape, aabb_of, ray_aabb, ray_sphere};
use stride_loco::{
    BodyHandle, CharacterCtrl, CharacterState, ContactEvent, Controls, GroundProbe, RayHit,
    TickOutcome,
};
use stride_viz::{DebugSettings, Ledger, LedgerEvent, ScheduleRecorder};

/* ---------------- Collider & Contact ---------------- */
#[derive(Copy, Clone, Debug)]
pub struct Collider {
    pub body: BodyId,
    pub shape: Shape,
    pub aabb: Aabb,
}

#[derive(Copy, Clone, Debug)]
struct Contact {
    a_collider: usize,
    b_collider: usize,
    normal: Vec3, // from A -> B
    depth: Scalar,
    point: Vec3,
    jn: Scalar, // accumulated normal impulse, filled by the solver
}

#[derive(Copy, Clone, Debug, Default)]
pub struct StepStats {
    pub pairs_tested: u32,
    pub contacts: u32,
}

/// Body conditioning applied when a character is registered: unit mass, no
/// built-in damping, dead bounce, and a collision margin shaved off the
/// capsule radius so resting contact sits flush.
#[derive(Copy, Clone, Debug)]
pub struct CharacterBodyDesc {
    pub mass: Scalar,
    pub radius: Scalar,
    pub half_height: Scalar,
    pub collision_margin: Scalar,
    pub linear_damping: Scalar,
    pub restitution: Scalar,
}

impl Default for CharacterBodyDesc {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 0.35,
            half_height: 0.55,
            collision_margin: 0.04,
            linear_damping: 0.0,
            restitution: 0.0,
        }
    }
}

struct CharacterInstance {
    body: BodyId,
    desc: CharacterBodyDesc,
    ctrl: CharacterCtrl,
    last: TickOutcome,
}

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    pub bodies: usize,
    pub colliders: usize,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self { bodies: 128, colliders: 128 }
    }

    pub fn with_capacity(mut self, bodies: usize, colliders: usize) -> Self {
        self.bodies = bodies;
        self.colliders = colliders;
        self
    }

    pub fn build(self) -> World {
        World::with_capacity(self.bodies, self.colliders)
    }
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

/// Immutable scene snapshot the downward probe runs against. Capsules are
/// skipped: characters are never ground for each other.
pub struct SceneProbe {
    boxes: Vec<Aabb>,
    spheres: Vec<(Vec3, Scalar)>,
}

impl GroundProbe for SceneProbe {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for bb in &self.boxes {
            if let Some((t, n)) = ray_aabb(origin, dir, bb, max_dist) {
                if best.map_or(true, |h| t < h.distance) {
                    best = Some(RayHit { normal: n, distance: t });
                }
            }
        }
        for &(center, r) in &self.spheres {
            if let Some((t, n)) = ray_sphere(origin, dir, center, r, max_dist) {
                if best.map_or(true, |h| t < h.distance) {
                    best = Some(RayHit { normal: n, distance: t });
                }
            }
        }
        best
    }
}

/// One-tick mutable view of a character's body.
struct BodyView<'a> {
    bodies: &'a mut Bodies,
    id: u32,
    dt: Scalar,
}

impl BodyHandle for BodyView<'_> {
    fn position(&self) -> Vec3 { self.bodies.pose(self.id).pos }
    fn rotation(&self) -> Quat { self.bodies.pose(self.id).rot }
    fn linear_velocity(&self) -> Vec3 { self.bodies.vel(self.id).lin }
    fn set_linear_velocity(&mut self, v: Vec3) { self.bodies.set_linvel(self.id, v); }
    fn apply_impulse(&mut self, j: Vec3) { self.bodies.apply_impulse(self.id, j); }
    fn apply_force(&mut self, f: Vec3) { self.bodies.apply_force(self.id, f, self.dt); }
}

/* ---------------- World ---------------- */
pub struct World {
    pub gravity: Vec3,

    schedule: ScheduleRecorder,
    bodies: Bodies,
    colliders: Vec<Collider>,
    restitution: Vec<Scalar>,

    characters: Vec<CharacterInstance>,

    tick: u64,
    debug: DebugSettings,
    ledger: Ledger,
}

impl World {
    pub fn with_capacity(bodies: usize, colliders: usize) -> Self {
        Self {
            gravity: vec3(0.0, -9.81, 0.0),
            schedule: ScheduleRecorder::new(),
            bodies: Bodies::with_capacity(bodies),
            colliders: Vec::with_capacity(colliders),
            restitution: Vec::with_capacity(bodies),
            characters: Vec::new(),
            tick: 0,
            debug: DebugSettings::default(),
            ledger: Ledger::new(4096),
        }
    }

    /* ---------- Read-only helpers ---------- */
    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    pub fn num_bodies(&self) -> u32 { self.bodies.len() as u32 }
    pub fn body_pose(&self, id: BodyId) -> Isometry { self.bodies.pose(id.0) }
    pub fn body_vel(&self, id: BodyId) -> Velocity { self.bodies.vel(id.0) }
    pub fn ledger(&self) -> &Ledger { &self.ledger }

    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }
    pub fn set_gravity(&mut self, g: Vec3) { self.gravity = g; }

    pub fn set_body_vel(&mut self, id: BodyId, vel: Velocity) {
        self.bodies.set_linvel(id.0, vel.lin);
    }

    /// Pose writes happen at tick boundaries only, so hashes stay comparable.
    pub fn set_body_pose(&mut self, id: BodyId, pose: Isometry) {
        self.bodies.set_pose(id.0, pose);
        for c in &mut self.colliders {
            if c.body == id {
                c.aabb = aabb_of(&c.shape, &pose);
            }
        }
    }

    /* ---------- World composition ---------- */
    pub fn add_body(&mut self, pose: Isometry, vel: Velocity, mass: MassProps, dynamic: bool) -> BodyId {
        let inv_mass = if dynamic { mass.inv_mass } else { 0.0 };
        let id = self.bodies.add(BodyDesc { pose, vel, inv_mass, dynamic });
        self.restitution.push(0.0);
        BodyId(id)
    }

    pub fn add_collider(&mut self, body: BodyId, shape: Shape) -> ColliderId {
        let pose = self.bodies.pose(body.0);
        let aabb = aabb_of(&shape, &pose);
        let id = self.colliders.len() as u32;
        self.colliders.push(Collider { body, shape, aabb });
        ColliderId(id)
    }

    /// Spawn a conditioned character body + capsule collider and register a
    /// controller on it.
    pub fn add_character(&mut self, pos: Vec3, desc: CharacterBodyDesc) -> BodyId {
        let body = self.add_body(
            iso(pos, quat_identity()),
            Velocity::default(),
            MassProps::from_mass(desc.mass),
            true,
        );
        let r = (desc.radius - desc.collision_margin).max(0.01);
        self.add_collider(body, Shape::Capsule { r, hh: desc.half_height });
        self.restitution[body.0 as usize] = desc.restitution;
        self.register_character(body, desc);
        body
    }

    /// Low-level registration on an existing body. The Characters stage skips
    /// the tick (with a ledger diagnostic) if the body has no collider.
    pub fn register_character(&mut self, body: BodyId, desc: CharacterBodyDesc) {
        self.characters.push(CharacterInstance {
            body,
            desc,
            ctrl: CharacterCtrl::new(),
            last: TickOutcome::default(),
        });
    }

    /// Store this tick's controls and turn the body to the commanded yaw.
    pub fn set_character_controls(&mut self, body: BodyId, controls: Controls) {
        if let Some(inst) = self.characters.iter_mut().find(|i| i.body == body) {
            self.bodies.set_rotation(body.0, Quat::from_rotation_y(controls.yaw));
            inst.ctrl.set_controls(controls);
        }
    }

    pub fn character_state(&self, body: BodyId) -> Option<CharacterState> {
        self.characters.iter().find(|i| i.body == body).map(|i| i.ctrl.state())
    }

    pub fn apply_character_state(&mut self, body: BodyId, state: &CharacterState) {
        if let Some(inst) = self.characters.iter_mut().find(|i| i.body == body) {
            inst.ctrl.apply_state(state);
            self.bodies.set_rotation(body.0, Quat::from_rotation_y(state.yaw));
        }
    }

    /// What the last `step` did for this character.
    pub fn character_outcome(&self, body: BodyId) -> Option<TickOutcome> {
        self.characters.iter().find(|i| i.body == body).map(|i| i.last)
    }

    /* ---------- Ray query ---------- */
    pub fn ground_probe(&self, exclude: BodyId) -> SceneProbe {
        let mut boxes = Vec::new();
        let mut spheres = Vec::new();
        for c in &self.colliders {
            if c.body == exclude { continue; }
            match c.shape {
                Shape::Box { .. } => boxes.push(c.aabb),
                Shape::Sphere { r } => spheres.push((self.bodies.pose(c.body.0).pos, r)),
                Shape::Capsule { .. } => {}
            }
        }
        SceneProbe { boxes, spheres }
    }

    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: Scalar, exclude: BodyId) -> Option<RayHit> {
        self.ground_probe(exclude).raycast(origin, dir, max_dist)
    }

    /* ---------- Step ---------- */
    pub fn step(&mut self, dt: Scalar) -> StepStats {
        self.schedule.clear();
        self.tick = self.tick.wrapping_add(1);
        self.ledger.clear();

        self.schedule.push(StepStage::Integrate);
        for inst in &self.characters {
            if inst.desc.linear_damping > 0.0 {
                let v = self.bodies.vel(inst.body.0).lin;
                self.bodies.set_linvel(inst.body.0, v / (1.0 + inst.desc.linear_damping * dt));
            }
        }
        self.bodies.integrate_all(self.gravity, dt);

        self.schedule.push(StepStage::UpdateAabbs);
        self.refresh_aabbs();

        self.schedule.push(StepStage::Narrowphase);
        let (mut contacts, pairs_tested) = self.collect_contacts();

        self.schedule.push(StepStage::Solve);
        if !contacts.is_empty() {
            self.solve_contacts(&mut contacts);
            self.refresh_aabbs();
        }

        self.schedule.push(StepStage::Characters);
        self.step_characters(&contacts, dt);

        if self.debug.print_every != 0 && (self.tick as u32) % self.debug.print_every == 0 {
            self.print_debug_block(&contacts);
            let _ = self.ledger.write_jsonl("out", self.tick);
        }
        if self.debug.json_every != 0 && (self.tick as u32) % self.debug.json_every == 0 {
            let _ = self.ledger.write_jsonl("out", self.tick);
        }

        StepStats { pairs_tested, contacts: contacts.len() as u32 }
    }

    pub fn step_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_bytes(&self.schedule.digest());
        for i in self.bodies.indices() {
            let pose = self.bodies.pose(i);
            let vel = self.bodies.vel(i);
            h.update_bytes(&i.to_le_bytes());
            hash_vec3(&mut h, &pose.pos);
            hash_quat(&mut h, &pose.rot);
            hash_vec3(&mut h, &vel.lin);
        }
        for inst in &self.characters {
            h.update_bytes(&inst.body.0.to_le_bytes());
            inst.ctrl.hash_into(&mut h);
        }
        h.finalize()
    }

    fn refresh_aabbs(&mut self) {
        for idx in 0..self.colliders.len() {
            let b = self.colliders[idx].body;
            let shape = self.colliders[idx].shape;
            let pose = self.bodies.pose(b.0);
            self.colliders[idx].aabb = aabb_of(&shape, &pose);
        }
    }

    /* ---------- Narrowphase ---------- */
    fn collect_contacts(&self) -> (Vec<Contact>, u32) {
        let mut contacts = Vec::new();
        let mut pairs_tested = 0u32;
        for i in 0..self.colliders.len() {
            for j in (i + 1)..self.colliders.len() {
                let (a, b) = (&self.colliders[i], &self.colliders[j]);
                if a.body == b.body { continue; }
                if self.bodies.inv_mass_of(a.body.0) == 0.0
                    && self.bodies.inv_mass_of(b.body.0) == 0.0
                {
                    continue;
                }
                if !a.aabb.overlaps(&b.aabb) { continue; }
                pairs_tested += 1;

                if let Some(c) = self.contact_box_box(i, j)        { contacts.push(c); continue; }
                if let Some(c) = self.contact_sphere_sphere(i, j)  { contacts.push(c); continue; }
                if let Some(c) = self.contact_sphere_box(i, j)     { contacts.push(c); continue; }
                if let Some(c) = self.contact_capsule_box(i, j)    { contacts.push(c); continue; }
                if let Some(c) = self.contact_capsule_sphere(i, j) { contacts.push(c); }
            }
        }

        // Final orientation is A -> B, robust against per-case conventions.
        for c in &mut contacts {
            let pa = self.bodies.pose(self.colliders[c.a_collider].body.0).pos;
            let pb = self.bodies.pose(self.colliders[c.b_collider].body.0).pos;
            if c.normal.dot(pb - pa) < 0.0 {
                c.normal = -c.normal;
            }
        }

        // Quantize normals and depths to kill ulp jitter between runs.
        let q = 1.0e-6f32;
        for c in &mut contacts {
            let x = (c.normal.x / q).round() * q;
            let y = (c.normal.y / q).round() * q;
            let z = (c.normal.z / q).round() * q;
            let len = (x * x + y * y + z * z).sqrt();
            c.normal = if len > 1.0e-20 { vec3(x / len, y / len, z / len) } else { vec3(0.0, 1.0, 0.0) };
            c.depth = (c.depth / q).round() * q;
        }

        (contacts, pairs_tested)
    }

    fn contact_box_box(&self, ci: usize, cj: usize) -> Option<Contact> {
        let a = &self.colliders[ci];
        let b = &self.colliders[cj];
        match (a.shape, b.shape) {
            (Shape::Box { .. }, Shape::Box { .. }) => {}
            _ => return None,
        }
        let aa = a.aabb;
        let bb = b.aabb;
        if !aa.overlaps(&bb) { return None; }
        let ca = (aa.min + aa.max) * 0.5;
        let cb = (bb.min + bb.max) * 0.5;
        let px = (aa.max.x - bb.min.x).min(bb.max.x - aa.min.x);
        let py = (aa.max.y - bb.min.y).min(bb.max.y - aa.min.y);
        let pz = (aa.max.z - bb.min.z).min(bb.max.z - aa.min.z);
        let (normal, depth) = if px <= py && px <= pz {
            let dir = if cb.x > ca.x { 1.0 } else { -1.0 };
            (vec3(dir, 0.0, 0.0), px)
        } else if py <= pz {
            let dir = if cb.y > ca.y { 1.0 } else { -1.0 };
            (vec3(0.0, dir, 0.0), py)
        } else {
            let dir = if cb.z > ca.z { 1.0 } else { -1.0 };
            (vec3(0.0, 0.0, dir), pz)
        };
        if depth <= 0.0 { return None; }
        Some(Contact {
            a_collider: ci,
            b_collider: cj,
            normal,
            depth,
            point: (ca + cb) * 0.5,
            jn: 0.0,
        })
    }

    fn contact_sphere_sphere(&self, ci: usize, cj: usize) -> Option<Contact> {
        let a = &self.colliders[ci];
        let b = &self.colliders[cj];
        let (ra, rb) = match (a.shape, b.shape) {
            (Shape::Sphere { r: r1 }, Shape::Sphere { r: r2 }) => (r1, r2),
            _ => return None,
        };
        let pa = self.bodies.pose(a.body.0).pos;
        let pb = self.bodies.pose(b.body.0).pos;
        let d = pb - pa;
        let dist2 = d.length_squared();
        let rsum = ra + rb;
        if dist2 >= rsum * rsum { return None; }
        let dist = dist2.sqrt();
        let normal = if dist > 1.0e-6 { d / dist } else { vec3(1.0, 0.0, 0.0) };
        Some(Contact {
            a_collider: ci,
            b_collider: cj,
            normal,
            depth: rsum - dist,
            point: pa + normal * ra,
            jn: 0.0,
        })
    }

    fn contact_sphere_box(&self, ci: usize, cj: usize) -> Option<Contact> {
        let (si, bi) = match (self.colliders[ci].shape, self.colliders[cj].shape) {
            (Shape::Sphere { .. }, Shape::Box { .. }) => (ci, cj),
            (Shape::Box { .. }, Shape::Sphere { .. }) => (cj, ci),
            _ => return None,
        };
        let s = &self.colliders[si];
        let b = &self.colliders[bi];
        let r = match s.shape { Shape::Sphere { r } => r, _ => unreachable!() };
        let ps = self.bodies.pose(s.body.0).pos;
        let q = b.aabb.closest_point(ps);
        let mut n = ps - q; // box -> sphere
        let dist = n.length();
        if dist >= r { return None; }
        if dist > 1.0e-6 { n /= dist; } else { n = vec3(0.0, 1.0, 0.0); }
        // A is the sphere, B is the box
        Some(Contact {
            a_collider: si,
            b_collider: bi,
            normal: -n,
            depth: r - dist,
            point: q,
            jn: 0.0,
        })
    }

    fn contact_capsule_box(&self, ci: usize, cj: usize) -> Option<Contact> {
        let (cap_i, box_i) = match (self.colliders[ci].shape, self.colliders[cj].shape) {
            (Shape::Capsule { .. }, Shape::Box { .. }) => (ci, cj),
            (Shape::Box { .. }, Shape::Capsule { .. }) => (cj, ci),
            _ => return None,
        };
        let cap = &self.colliders[cap_i];
        let bx = &self.colliders[box_i];
        let r = match cap.shape { Shape::Capsule { r, .. } => r, _ => unreachable!() };
        let pose = self.bodies.pose(cap.body.0);
        let (pa, pb) = cap.shape.capsule_segment(&pose);
        let (p_seg, p_box) = closest_points_segment_aabb(pa, pb, bx.aabb.min, bx.aabb.max);
        let mut n = p_seg - p_box; // box -> capsule axis
        let dist = n.length();
        if dist >= r { return None; }
        if dist > 1.0e-6 { n /= dist; } else { n = vec3(0.0, 1.0, 0.0); }
        // A is the capsule, B is the box
        Some(Contact {
            a_collider: cap_i,
            b_collider: box_i,
            normal: -n,
            depth: r - dist,
            point: p_box,
            jn: 0.0,
        })
    }

    fn contact_capsule_sphere(&self, ci: usize, cj: usize) -> Option<Contact> {
        let (cap_i, sph_i) = match (self.colliders[ci].shape, self.colliders[cj].shape) {
            (Shape::Capsule { .. }, Shape::Sphere { .. }) => (ci, cj),
            (Shape::Sphere { .. }, Shape::Capsule { .. }) => (cj, ci),
            _ => return None,
        };
        let cap = &self.colliders[cap_i];
        let sph = &self.colliders[sph_i];
        let r_cap = match cap.shape { Shape::Capsule { r, .. } => r, _ => unreachable!() };
        let r_sph = match sph.shape { Shape::Sphere { r } => r, _ => unreachable!() };
        let pose = self.bodies.pose(cap.body.0);
        let (pa, pb) = cap.shape.capsule_segment(&pose);
        let center = self.bodies.pose(sph.body.0).pos;
        let p_seg = closest_point_on_segment(pa, pb, center);
        let mut n = p_seg - center; // sphere -> capsule axis
        let dist = n.length();
        let rsum = r_cap + r_sph;
        if dist >= rsum { return None; }
        if dist > 1.0e-6 { n /= dist; } else { n = vec3(0.0, 1.0, 0.0); }
        // A is the capsule, B is the sphere
        Some(Contact {
            a_collider: cap_i,
            b_collider: sph_i,
            normal: -n,
            depth: rsum - dist,
            point: center + n * r_sph,
            jn: 0.0,
        })
    }

    /* ---------- Solver (normal + positional correction) ---------- */
    fn solve_contacts(&mut self, contacts: &mut [Contact]) {
        let iterations = 12;
        let slop = 0.010;
        let beta = 0.10;

        for it in 0..iterations {
            for c in contacts.iter_mut() {
                let ai = self.colliders[c.a_collider].body.0;
                let bi = self.colliders[c.b_collider].body.0;
                if ai == bi { continue; }

                let inv_a = self.bodies.inv_mass_of(ai);
                let inv_b = self.bodies.inv_mass_of(bi);
                let denom = inv_a + inv_b;
                if denom == 0.0 { continue; }

                let restitution = self.restitution[ai as usize].max(self.restitution[bi as usize]);
                let n = c.normal;
                let rel_v_n = (self.bodies.vel(bi).lin - self.bodies.vel(ai).lin).dot(n);

                if rel_v_n < 0.0 {
                    let jn = -(1.0 + restitution) * rel_v_n / denom;
                    let imp_n = n * jn;
                    self.bodies.apply_impulse(ai, -imp_n);
                    self.bodies.apply_impulse(bi, imp_n);
                    c.jn += jn;
                    if inv_a > 0.0 { self.ledger.push(LedgerEvent::ImpulseN { body: ai, jn }); }
                    if inv_b > 0.0 { self.ledger.push(LedgerEvent::ImpulseN { body: bi, jn }); }
                }

                let corr = (c.depth - slop).max(0.0) * beta;
                if corr > 0.0 {
                    let corr_vec = n * (corr / denom);
                    self.bodies.apply_position_delta(ai, -corr_vec * inv_a);
                    self.bodies.apply_position_delta(bi, corr_vec * inv_b);
                    if it == 0 {
                        if inv_a > 0.0 { self.ledger.push(LedgerEvent::PosCorr { body: ai, corr }); }
                        if inv_b > 0.0 { self.ledger.push(LedgerEvent::PosCorr { body: bi, corr }); }
                    }
                }
            }
        }
    }

    /* ---------- Characters stage ---------- */
    fn step_characters(&mut self, contacts: &[Contact], dt: Scalar) {
        let mut characters = std::mem::take(&mut self.characters);
        for inst in &mut characters {
            let body = inst.body;
            if !self.colliders.iter().any(|c| c.body == body) {
                self.ledger.push(LedgerEvent::SkipNoCollider { body: body.0 });
                continue;
            }

            // This tick's contact events, normals pointing surface -> character.
            let mut events: Vec<ContactEvent> = Vec::new();
            for c in contacts {
                let a = self.colliders[c.a_collider].body;
                let b = self.colliders[c.b_collider].body;
                let normal = if a == body {
                    -c.normal
                } else if b == body {
                    c.normal
                } else {
                    continue;
                };
                events.push(ContactEvent {
                    position: c.point,
                    normal,
                    distance: -c.depth,
                    impulse: c.jn,
                });
                self.ledger.push(LedgerEvent::GroundContact { body: body.0, ny: normal.y, depth: c.depth });
            }

            let probe = self.ground_probe(body);
            let out = {
                let mut view = BodyView { bodies: &mut self.bodies, id: body.0, dt };
                inst.ctrl.fixed_update(&mut view, &probe, &events, dt)
            };

            self.ledger.push(LedgerEvent::Grounded {
                body: body.0,
                soft: out.soft_grounded,
                in_air: out.in_air_timer,
            });
            self.ledger.push(LedgerEvent::SlopeProbe { body: body.0, angle: out.slope_angle });
            if let Some(impulse) = out.jump_impulse {
                self.ledger.push(LedgerEvent::Jump { body: body.0, impulse });
            }
            if out.damped {
                self.ledger.push(LedgerEvent::AirDamp { body: body.0, vy: self.bodies.vel(body.0).lin.y });
            }
            inst.last = out;
        }
        self.characters = characters;
    }

    /* ---------- Debug printer ---------- */
    fn print_debug_block(&self, contacts: &[Contact]) {
        println!("--- debug @ tick {} ---", self.tick);

        if self.debug.show_bodies {
            let mut lines = 0usize;
            for i in self.bodies.indices() {
                let p = self.bodies.pose(i).pos;
                let v = self.bodies.vel(i).lin;
                println!(
                    "body {:3}  pos=({:+.3},{:+.3},{:+.3})  vel=({:+.3},{:+.3},{:+.3})",
                    i, p.x, p.y, p.z, v.x, v.y, v.z
                );
                lines += 1;
                if lines >= self.debug.max_lines { break; }
            }
        }

        if self.debug.show_contacts {
            if contacts.is_empty() {
                println!("contacts: (none)");
            } else {
                let mut shown = 0usize;
                for c in contacts {
                    println!(
                        "contact  cA={} cB={}  n=({:+.3},{:+.3},{:+.3})  depth={:.5}  jn={:.4}",
                        c.a_collider, c.b_collider, c.normal.x, c.normal.y, c.normal.z, c.depth, c.jn
                    );
                    shown += 1;
                    if shown >= self.debug.max_lines { break; }
                }
            }
        }

        if self.debug.show_characters {
            for inst in &self.characters {
                let s = inst.ctrl.state();
                println!(
                    "char  body={}  yaw={:+.3}  on_ground={}  ok_to_jump={}  in_air={:.3}  slope={:.3}",
                    inst.body.0, s.yaw, inst.last.on_ground, s.ok_to_jump, s.in_air_timer, inst.last.slope_angle
                );
            }
        }
    }
}

/* ---------- helpers ---------- */
#[inline]
fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= 1.0e-12 { return a; }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

fn closest_points_segment_aabb(a: Vec3, b: Vec3, mn: Vec3, mx: Vec3) -> (Vec3, Vec3) {
    let mut ps = (a + b) * 0.5;
    let mut qs = ps.clamp(mn, mx);
    for _ in 0..3 {
        ps = closest_point_on_segment(a, b, qs);
        qs = ps.clamp(mn, mx);
    }
    (ps, qs)
}
