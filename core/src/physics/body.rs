//! Rigid bodies: static and dynamic, with the per-body state the integrator
//! and solver need.
//!
//! Grounded on the original engine's `Body.h`/`BodyDef.h`. Shapes are stored
//! in the owning `PhysicsWorld` and referenced here by index (`ShapeHandle`)
//! rather than by pointer, since a shape may be shared by more than one body.

use glam::{Mat3, Quat, Vec3};

use super::aabb::Aabb;
use super::error::PhysicsError;
use super::shapes::Shape;

pub type ShapeHandle = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Static,
    Dynamic,
}

/// Construction parameters for a new body, mirroring the original's
/// `BodyDef`. Unlike the original, `orientation` defaults to the identity
/// quaternion rather than the degenerate `(0,0,0,0)` the C++ struct used —
/// that value is not a valid rotation and was never normalized before use.
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub body_type: BodyType,
    pub pos: Vec3,
    pub vel: Vec3,
    pub orientation: Quat,
    pub angular_vel: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub rotation_locked: bool,
    pub shapes: Vec<ShapeHandle>,
    /// Static bodies only: marks the body as a trigger volume. Sensors report
    /// contacts to the static-dynamic collision listener but are never solved
    /// as impulses.
    pub is_sensor: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            angular_vel: Vec3::ZERO,
            linear_damping: 1.0,
            angular_damping: 1.0,
            density: 1.0,
            friction: 0.2,
            restitution: 0.2,
            rotation_locked: false,
            shapes: Vec::new(),
            is_sensor: false,
        }
    }
}

/// State that only dynamic bodies carry: velocities, mass properties,
/// accumulated forces/torques and the sleep counter.
#[derive(Debug, Clone)]
pub struct Dynamics {
    pub vel: Vec3,
    pub angular_vel: Vec3,

    pub linear_damping: f32,
    pub angular_damping: f32,

    pub density: f32,
    pub mass: f32,
    pub centroid: Vec3,

    pub inertia: Mat3,
    pub inertia_inv: Mat3,
    pub inertia_inv_world: Mat3,

    pub forces: Vec3,
    pub torques: Vec3,

    pub still_frames: u32,
    pub rotation_locked: bool,
    pub is_awake: bool,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub body_type: BodyType,

    pub pos: Vec3,
    pub orientation: Quat,
    orientation_mat: Mat3,
    orientation_mat_inv: Mat3,

    pub friction: f32,
    pub restitution: f32,

    pub aabb: Aabb,
    pub shapes: Vec<ShapeHandle>,
    pub is_sensor: bool,

    pub dynamics: Option<Dynamics>,
}

impl Body {
    pub fn new(def: BodyDef) -> Result<Self, PhysicsError> {
        if def.shapes.is_empty() {
            return Err(PhysicsError::InvalidShape);
        }
        let orientation_mat = Mat3::from_quat(def.orientation);
        let dynamics = match def.body_type {
            BodyType::Static => None,
            BodyType::Dynamic => Some(Dynamics {
                vel: def.vel,
                angular_vel: def.angular_vel,
                linear_damping: def.linear_damping,
                angular_damping: def.angular_damping,
                density: def.density,
                mass: 0.0,
                centroid: Vec3::ZERO,
                inertia: Mat3::IDENTITY,
                inertia_inv: Mat3::IDENTITY,
                inertia_inv_world: Mat3::IDENTITY,
                forces: Vec3::ZERO,
                torques: Vec3::ZERO,
                still_frames: 0,
                rotation_locked: def.rotation_locked,
                is_awake: true,
            }),
        };
        Ok(Self {
            body_type: def.body_type,
            pos: def.pos,
            orientation: def.orientation,
            orientation_mat,
            orientation_mat_inv: orientation_mat.transpose(),
            friction: def.friction,
            restitution: def.restitution,
            aabb: Aabb::empty(),
            shapes: def.shapes,
            is_sensor: def.is_sensor,
            dynamics,
        })
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamics.is_some()
    }

    pub fn is_awake(&self) -> bool {
        self.dynamics.as_ref().map_or(true, |d| d.is_awake)
    }

    pub fn orientation_mat(&self) -> Mat3 {
        self.orientation_mat
    }

    pub fn orientation_mat_inv(&self) -> Mat3 {
        self.orientation_mat_inv
    }

    pub fn update_orientation_mat(&mut self) {
        self.orientation_mat = Mat3::from_quat(self.orientation);
        self.orientation_mat_inv = self.orientation_mat.transpose();
    }

    pub fn world_pos(&self, local: Vec3) -> Vec3 {
        self.orientation_mat * local + self.pos
    }

    pub fn local_pos(&self, world: Vec3) -> Vec3 {
        self.orientation_mat_inv * (world - self.pos)
    }

    pub fn world_vec(&self, local: Vec3) -> Vec3 {
        self.orientation_mat * local
    }

    pub fn local_vec(&self, world: Vec3) -> Vec3 {
        self.orientation_mat_inv * world
    }

    pub fn update_aabb(&mut self, shapes: &[Shape]) {
        let mut aabb = Aabb::empty();
        for &handle in &self.shapes {
            aabb.combine_aabb(&shapes[handle].world_aabb(self.pos, self.orientation));
        }
        self.aabb = aabb;
    }

    /// Recomputes mass, centroid and inertia from the body's shape list at
    /// the current density. No parallel-axis correction is applied when
    /// combining multiple shapes' inertia tensors — each shape's own local
    /// inertia (about its own, already-recentred origin) is summed directly,
    /// matching the original engine's `updateMassProperties`.
    pub fn recompute_mass_properties(&mut self, shapes: &[Shape]) {
        let Some(dyn_data) = self.dynamics.as_mut() else {
            return;
        };

        let mut mass = 0.0f32;
        let mut weighted_centroid = Vec3::ZERO;
        for &handle in &self.shapes {
            let m = shapes[handle].mass_properties();
            let shape_mass = m.volume * dyn_data.density;
            mass += shape_mass;
            weighted_centroid += shape_mass * m.centroid;
        }
        let centroid = if mass > 0.0 {
            weighted_centroid / mass
        } else {
            Vec3::ZERO
        };

        let mut diag = Vec3::ZERO;
        let mut products = Vec3::ZERO;
        for &handle in &self.shapes {
            let m = shapes[handle].mass_properties();
            diag += m.inertia_diag * dyn_data.density;
            products += m.inertia_products * dyn_data.density;
        }

        dyn_data.mass = mass;
        dyn_data.centroid = centroid;
        dyn_data.inertia = super::shapes::MassProperties {
            volume: 0.0,
            centroid: Vec3::ZERO,
            inertia_diag: diag,
            inertia_products: products,
        }
        .inertia_tensor();
        dyn_data.inertia_inv = dyn_data.inertia.inverse();
    }

    pub fn update_inverse_inertia_world(&mut self) {
        let orientation_mat_inv = self.orientation_mat_inv;
        if let Some(d) = self.dynamics.as_mut() {
            d.inertia_inv_world =
                orientation_mat_inv.transpose() * d.inertia_inv * orientation_mat_inv;
        }
    }

    pub fn velocity_at_point(&self, world_point: Vec3) -> Vec3 {
        match &self.dynamics {
            Some(d) => d.vel + d.angular_vel.cross(world_point - self.pos),
            None => Vec3::ZERO,
        }
    }

    /// Force in world coordinates, applied at the centroid.
    pub fn apply_force(&mut self, force: Vec3) {
        if let Some(d) = self.dynamics.as_mut() {
            d.forces += force;
        }
    }

    /// Force in world coordinates, applied at a point given in local
    /// coordinates.
    pub fn apply_force_local(&mut self, force: Vec3, local_point: Vec3) {
        let world_point = self.world_pos(local_point);
        self.apply_force_world(force, world_point);
    }

    /// Force in world coordinates, applied at a point given in world
    /// coordinates.
    pub fn apply_force_world(&mut self, force: Vec3, world_point: Vec3) {
        let pos = self.pos;
        if let Some(d) = self.dynamics.as_mut() {
            d.forces += force;
            if !d.rotation_locked {
                d.torques += (world_point - pos).cross(force);
            }
        }
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        if let Some(d) = self.dynamics.as_mut() {
            if !d.rotation_locked {
                d.torques += torque;
            }
        }
    }

    pub fn reset_forces(&mut self) {
        if let Some(d) = self.dynamics.as_mut() {
            d.forces = Vec3::ZERO;
            d.torques = Vec3::ZERO;
        }
    }

    /// Applies an instantaneous impulse at a point given in world
    /// coordinates, updating linear and angular velocity directly.
    pub fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        let pos = self.pos;
        if let Some(d) = self.dynamics.as_mut() {
            if d.mass <= 0.0 {
                return;
            }
            d.vel += impulse / d.mass;
            if !d.rotation_locked {
                let impulsive_torque = (world_point - pos).cross(impulse);
                d.angular_vel += d.inertia_inv_world * impulsive_torque;
            }
        }
    }

    pub fn set_awake(&mut self) {
        if let Some(d) = self.dynamics.as_mut() {
            d.still_frames = 0;
            d.is_awake = true;
        }
    }
}

/// Borrows two distinct elements of `bodies` mutably at once. Panics if `i
/// == j`; the world and joint solvers never pair a body against itself.
pub(crate) fn index_two_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    assert!(i != j, "index_two_mut requires distinct indices");
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
