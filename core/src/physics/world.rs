//! The stepped simulation: body/shape/joint storage, the fixed-substep
//! integration loop, and broad-phase/narrow-phase/solver wiring.
//!
//! Grounded on the original engine's `PhysicsWorld`. Dynamic and static
//! bodies are stored in separate `Vec`s (the original split them the same
//! way — static geometry never integrates or sleeps, so there is no reason
//! to share one heterogeneous array and dispatch on a type tag every
//! substep). Shapes are interned once in `shapes` and referenced by bodies
//! through `ShapeHandle`, the same indirection the original used to let
//! multiple bodies share a shape.
//!
//! No warm-starting: every contact is regenerated and solved from zero each
//! substep, matching [`resolve`](super::resolve)'s own design note.

use glam::Vec3;
use log::{debug, trace};

use super::aabb::Aabb;
use super::body::{Body, BodyDef, BodyType, ShapeHandle};
use super::bvh::{Bvh, BvhSplitMode};
use super::epa::ContactInfo;
use super::error::PhysicsError;
use super::joints::Joint;
use super::narrowphase::{dynamic_dynamic_contact, dynamic_static_contact, ground_contact};
use super::resolve::{solve_contact_dynamic, solve_contact_static};
use super::shapes::Shape;
use super::sleep::update_sleep;

/// A stable reference to a body created via [`PhysicsWorld::create_body`].
/// Distinguishes dynamic from static storage since the two live in separate
/// arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyHandle {
    Dynamic(usize),
    Static(usize),
}

/// Construction parameters for a [`PhysicsWorld`], mirroring the builder
/// pattern the original used for its top-level world configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorldDef {
    pub gravity: Vec3,
    pub iters: u32,
    pub bvh_split_mode: BvhSplitMode,
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 0.0, -9.8),
            iters: 4,
            bvh_split_mode: BvhSplitMode::Midpoint,
        }
    }
}

impl WorldDef {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_iters(mut self, iters: u32) -> Self {
        self.iters = iters;
        self
    }

    pub fn with_bvh_split_mode(mut self, mode: BvhSplitMode) -> Self {
        self.bvh_split_mode = mode;
        self
    }
}

type CollisionListener = Box<dyn FnMut(&ContactInfo)>;

pub struct PhysicsWorld {
    pub gravity: Vec3,
    pub iters: u32,
    bvh_split_mode: BvhSplitMode,

    shapes: Vec<Shape>,
    pub dynamic_bodies: Vec<Body>,
    pub static_bodies: Vec<Body>,
    pub joints: Vec<Joint>,

    /// Every contact solved (or, for sensors, merely detected) during the
    /// most recent `step` call. Cleared and rebuilt each step — there is no
    /// persistent manifold.
    pub contacts: Vec<ContactInfo>,

    /// `None` until `build_bvh` is called at least once.
    pub static_bvh: Option<Bvh<Aabb>>,

    dynamic_dynamic_collision_listener: Option<CollisionListener>,
    static_dynamic_collision_listener: Option<CollisionListener>,
}

impl PhysicsWorld {
    pub fn new(def: WorldDef) -> Self {
        Self {
            gravity: def.gravity,
            iters: def.iters,
            bvh_split_mode: def.bvh_split_mode,
            shapes: Vec::new(),
            dynamic_bodies: Vec::new(),
            static_bodies: Vec::new(),
            joints: Vec::new(),
            contacts: Vec::new(),
            static_bvh: None,
            dynamic_dynamic_collision_listener: None,
            static_dynamic_collision_listener: None,
        }
    }

    /// Interns a shape, returning the handle bodies reference it by. Shapes
    /// are never removed — a handle stays valid for the world's lifetime.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeHandle {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn set_dynamic_dynamic_collision_listener(
        &mut self,
        listener: impl FnMut(&ContactInfo) + 'static,
    ) {
        self.dynamic_dynamic_collision_listener = Some(Box::new(listener));
    }

    pub fn set_static_dynamic_collision_listener(
        &mut self,
        listener: impl FnMut(&ContactInfo) + 'static,
    ) {
        self.static_dynamic_collision_listener = Some(Box::new(listener));
    }

    /// Constructs a body from `def`, computing mass properties and the
    /// initial AABB for dynamic bodies, and stores it in the appropriate
    /// array.
    pub fn create_body(&mut self, def: BodyDef) -> Result<BodyHandle, PhysicsError> {
        let body_type = def.body_type;
        let mut body = Body::new(def)?;
        if body.is_dynamic() {
            body.recompute_mass_properties(&self.shapes);
            body.update_inverse_inertia_world();
        }
        body.update_aabb(&self.shapes);

        let handle = match body_type {
            BodyType::Dynamic => {
                self.dynamic_bodies.push(body);
                BodyHandle::Dynamic(self.dynamic_bodies.len() - 1)
            }
            BodyType::Static => {
                self.static_bodies.push(body);
                BodyHandle::Static(self.static_bodies.len() - 1)
            }
        };
        debug!("create_body: {handle:?}");
        Ok(handle)
    }

    pub fn add_joint(&mut self, joint: Joint) {
        self.joints.push(joint);
    }

    /// (Re)builds the broad-phase tree over every static body's current
    /// AABB. Idempotent — call again after adding more static bodies to
    /// pick them up; bodies added after the last `build_bvh` call are
    /// invisible to `step`'s dynamic-static broad phase until it's called
    /// again.
    pub fn build_bvh(&mut self) {
        let aabbs: Vec<Aabb> = self.static_bodies.iter().map(|b| b.aabb).collect();
        debug!("build_bvh: {} static bodies", aabbs.len());
        self.static_bvh = Some(Bvh::build(aabbs, self.bvh_split_mode));
    }

    /// Advances the simulation by `delta_t`, split into `self.iters` equal
    /// substeps. Each substep: applies joint forces, integrates awake
    /// dynamic bodies, resolves dynamic-dynamic and dynamic-static contacts
    /// (plus the implicit ground plane), then updates sleep state.
    pub fn step(&mut self, delta_t: f32) {
        let iters = self.iters.max(1);
        let h = delta_t / iters as f32;
        self.contacts.clear();

        for _ in 0..iters {
            self.substep(h);
        }
    }

    fn substep(&mut self, h: f32) {
        for joint in &self.joints {
            joint.apply_forces(&mut self.dynamic_bodies);
        }

        for body in self.dynamic_bodies.iter_mut() {
            if body.is_awake() {
                let mass = body.dynamics.as_ref().map_or(0.0, |d| d.mass);
                body.apply_force(self.gravity * mass);
                super::integrate::integrate(body, h);
                body.update_aabb(&self.shapes);
            }
        }

        self.solve_dynamic_dynamic();
        self.solve_dynamic_static();

        for body in self.dynamic_bodies.iter_mut() {
            update_sleep(body);
        }
    }

    fn solve_dynamic_dynamic(&mut self) {
        let n = self.dynamic_bodies.len();
        for i in 0..n {
            if self.dynamic_bodies[i].is_awake() {
                if let Some(contact) = ground_contact(i, &self.dynamic_bodies[i], &self.shapes) {
                    solve_contact_static(&contact, &mut self.dynamic_bodies[i]);
                    self.contacts.push(contact);
                }
            }

            for j in 0..i {
                if !self.dynamic_bodies[i].is_awake() && !self.dynamic_bodies[j].is_awake() {
                    continue;
                }
                if !self.dynamic_bodies[i].aabb.intersects(&self.dynamic_bodies[j].aabb) {
                    continue;
                }

                let contact = dynamic_dynamic_contact(
                    j,
                    i,
                    &self.dynamic_bodies[j],
                    &self.dynamic_bodies[i],
                    &self.shapes,
                );
                if let Some(contact) = contact {
                    trace!("dynamic-dynamic contact {j}x{i} depth={}", contact.depth);
                    let (a, b) = super::body::index_two_mut(&mut self.dynamic_bodies, j, i);
                    solve_contact_dynamic(&contact, a, b);
                    if let Some(listener) = self.dynamic_dynamic_collision_listener.as_mut() {
                        listener(&contact);
                    }
                    self.contacts.push(contact);
                }
            }
        }
    }

    fn solve_dynamic_static(&mut self) {
        for i in 0..self.dynamic_bodies.len() {
            if !self.dynamic_bodies[i].is_awake() {
                continue;
            }

            if let Some(bvh) = &self.static_bvh {
                let candidates = bvh.query(&self.dynamic_bodies[i].aabb);
                for s in candidates {
                    self.resolve_dynamic_static_pair(i, s);
                }
            } else {
                for s in 0..self.static_bodies.len() {
                    if self.dynamic_bodies[i].aabb.intersects(&self.static_bodies[s].aabb) {
                        self.resolve_dynamic_static_pair(i, s);
                    }
                }
            }
        }
    }

    fn resolve_dynamic_static_pair(&mut self, dynamic_idx: usize, static_idx: usize) {
        let contact = dynamic_static_contact(
            dynamic_idx,
            static_idx,
            &self.dynamic_bodies[dynamic_idx],
            &self.static_bodies[static_idx],
            &self.shapes,
        );
        let Some(contact) = contact else {
            return;
        };

        if self.static_bodies[static_idx].is_sensor {
            trace!("sensor contact static={static_idx} dynamic={dynamic_idx}");
        } else {
            solve_contact_static(&contact, &mut self.dynamic_bodies[dynamic_idx]);
        }

        if let Some(listener) = self.static_dynamic_collision_listener.as_mut() {
            listener(&contact);
        }
        self.contacts.push(contact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyType;

    fn falling_sphere_world() -> (PhysicsWorld, BodyHandle) {
        let mut world = PhysicsWorld::new(WorldDef::default());
        let shape = world.add_shape(Shape::sphere(0.5));
        let handle = world
            .create_body(BodyDef {
                body_type: BodyType::Dynamic,
                pos: Vec3::new(0.0, 0.0, 2.0),
                shapes: vec![shape],
                ..Default::default()
            })
            .unwrap();
        (world, handle)
    }

    #[test]
    fn sphere_settles_on_implicit_ground() {
        let (mut world, handle) = falling_sphere_world();
        let BodyHandle::Dynamic(idx) = handle else { unreachable!() };
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let pos = world.dynamic_bodies[idx].pos;
        assert!((pos.z - 0.5).abs() < 0.05, "expected to rest near z=0.5, got {pos:?}");
    }

    #[test]
    fn sleeping_body_stops_accumulating_motion() {
        let (mut world, handle) = falling_sphere_world();
        let BodyHandle::Dynamic(idx) = handle else { unreachable!() };
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        assert!(!world.dynamic_bodies[idx].is_awake());
        let d = world.dynamic_bodies[idx].dynamics.as_ref().unwrap();
        assert_eq!(d.vel, Vec3::ZERO);
        assert_eq!(d.angular_vel, Vec3::ZERO);
    }

    #[test]
    fn two_spheres_collide_head_on() {
        let mut world = PhysicsWorld::new(WorldDef::default().with_gravity(Vec3::ZERO));
        let shape = world.add_shape(Shape::sphere(0.5));
        let a = world
            .create_body(BodyDef {
                body_type: BodyType::Dynamic,
                pos: Vec3::new(-2.0, 0.0, 0.0),
                vel: Vec3::new(1.0, 0.0, 0.0),
                shapes: vec![shape],
                ..Default::default()
            })
            .unwrap();
        let b = world
            .create_body(BodyDef {
                body_type: BodyType::Dynamic,
                pos: Vec3::new(2.0, 0.0, 0.0),
                vel: Vec3::new(-1.0, 0.0, 0.0),
                shapes: vec![shape],
                ..Default::default()
            })
            .unwrap();

        for _ in 0..400 {
            world.step(1.0 / 60.0);
        }

        let (BodyHandle::Dynamic(ia), BodyHandle::Dynamic(ib)) = (a, b) else { unreachable!() };
        let separation = (world.dynamic_bodies[ib].pos - world.dynamic_bodies[ia].pos).length();
        assert!(separation >= 0.95, "spheres should not interpenetrate, got {separation}");
    }

    #[test]
    fn sensor_static_body_reports_contact_without_blocking() {
        let mut world = PhysicsWorld::new(WorldDef::default());
        let sphere = world.add_shape(Shape::sphere(0.5));
        let plate = world.add_shape(Shape::cuboid(Vec3::new(2.0, 2.0, 0.1)));
        world
            .create_body(BodyDef {
                body_type: BodyType::Static,
                pos: Vec3::new(0.0, 0.0, -5.0),
                shapes: vec![plate],
                is_sensor: true,
                ..Default::default()
            })
            .unwrap();
        world.build_bvh();

        let handle = world
            .create_body(BodyDef {
                body_type: BodyType::Dynamic,
                pos: Vec3::new(0.0, 0.0, -4.7),
                shapes: vec![sphere],
                ..Default::default()
            })
            .unwrap();

        let hits = std::rc::Rc::new(std::cell::Cell::new(0usize));
        let hits_inner = hits.clone();
        world.set_static_dynamic_collision_listener(move |_| {
            hits_inner.set(hits_inner.get() + 1);
        });

        world.step(1.0 / 60.0);

        let BodyHandle::Dynamic(idx) = handle else { unreachable!() };
        assert!(hits.get() > 0, "sensor contact should still reach the listener");
        // A sensor must not have its impulse solved: the body keeps falling
        // under gravity rather than resting on the plate.
        assert!(world.dynamic_bodies[idx].dynamics.as_ref().unwrap().vel.z < 0.0);
    }
}
