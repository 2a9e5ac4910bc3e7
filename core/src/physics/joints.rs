//! Joints: direct positional/rotational projection plus a synthesized
//! zero-depth contact to kill relative velocity at the constraint point.
//!
//! Grounded on the original engine's `Joint.h` family. Unlike a Lagrange-
//! multiplier solver, these correct position and velocity directly each
//! substep rather than accumulating a constraint force — cheap, and
//! adequate at the scales this engine targets, but with no guarantee of
//! consistency between joints sharing a body. Substepping hides most of
//! the resulting drift.

use glam::{Quat, Vec3};

use super::body::{index_two_mut, Body};
use super::epa::ContactInfo;
use super::error::PhysicsError;
use super::resolve::{solve_contact_dynamic, solve_contact_static};

/// Hooke's-law spring pulling a body's local point toward a fixed world
/// anchor.
#[derive(Debug, Clone, Copy)]
pub struct AnchoredSpringJoint {
    pub body: usize,
    pub local: Vec3,
    pub anchor: Vec3,
    pub spring_constant: f32,
    pub length: f32,
}

impl AnchoredSpringJoint {
    pub fn new(body: usize, local: Vec3, anchor: Vec3, spring_constant: f32, length: f32) -> Self {
        Self { body, local, anchor, spring_constant, length }
    }

    pub fn apply_forces(&self, bodies: &mut [Body]) {
        let b = &mut bodies[self.body];
        let world = b.world_pos(self.local);
        let dir_raw = self.anchor - world;
        let dir_len = dir_raw.length();
        if dir_len < 1e-8 {
            return;
        }
        let dir = dir_raw / dir_len;
        let diff = dir_len - self.length;
        let force = dir * (diff * self.spring_constant);
        b.apply_force_local(force, self.local);
    }
}

/// Hooke's-law spring between two bodies' local attachment points.
#[derive(Debug, Clone, Copy)]
pub struct SpringJoint {
    pub a: usize,
    pub b: usize,
    pub local_a: Vec3,
    pub local_b: Vec3,
    pub spring_constant: f32,
    pub length: f32,
}

impl SpringJoint {
    pub fn new(a: usize, b: usize, local_a: Vec3, local_b: Vec3, spring_constant: f32, length: f32) -> Self {
        Self { a, b, local_a, local_b, spring_constant, length }
    }

    pub fn apply_forces(&self, bodies: &mut [Body]) {
        let world_a = bodies[self.a].world_pos(self.local_a);
        let world_b = bodies[self.b].world_pos(self.local_b);
        let dir_raw = world_b - world_a;
        let dir_len = dir_raw.length();
        if dir_len < 1e-8 {
            return;
        }
        let dir = dir_raw / dir_len;
        let diff = dir_len - self.length;
        let force = dir * (diff * self.spring_constant);
        bodies[self.a].apply_force_local(force, self.local_a);
        bodies[self.b].apply_force_local(-force, self.local_b);
    }
}

fn velocity_direction_or(fallback: Vec3, vel: Vec3) -> Vec3 {
    let len = vel.length();
    if len < 1e-8 {
        fallback
    } else {
        vel / len
    }
}

/// Ball joint anchoring one body's local point to a fixed world position.
#[derive(Debug, Clone, Copy)]
pub struct AnchoredBallJoint {
    pub body: usize,
    pub local: Vec3,
    pub anchor: Vec3,
}

impl AnchoredBallJoint {
    pub fn new(body: usize, local: Vec3, anchor: Vec3) -> Self {
        Self { body, local, anchor }
    }

    pub fn apply_forces(&self, bodies: &mut [Body]) {
        let b = &mut bodies[self.body];
        let dir = b.world_pos(self.local) - self.anchor;
        b.pos -= dir;

        let closing_vel = b.velocity_at_point(self.anchor);
        let normal = -velocity_direction_or(Vec3::Z, closing_vel);

        let contact = ContactInfo {
            body_a: None,
            body_b: self.body,
            poc: self.anchor,
            poc_a: self.anchor,
            poc_b: self.anchor,
            normal,
            depth: 0.0,
            friction: 1.0,
            restitution: 0.0,
        };
        solve_contact_static(&contact, b);
    }
}

/// Ball joint holding two bodies' local points coincident.
#[derive(Debug, Clone, Copy)]
pub struct BallJoint {
    pub a: usize,
    pub b: usize,
    pub local_a: Vec3,
    pub local_b: Vec3,
}

impl BallJoint {
    pub fn new(a: usize, b: usize, local_a: Vec3, local_b: Vec3) -> Self {
        Self { a, b, local_a, local_b }
    }

    pub fn apply_forces(&self, bodies: &mut [Body]) {
        let world_a = bodies[self.a].world_pos(self.local_a);
        let world_b = bodies[self.b].world_pos(self.local_b);
        let dir = world_b - world_a;
        bodies[self.a].pos += dir * 0.5;
        bodies[self.b].pos -= dir * 0.5;

        let poc = (world_a + world_b) * 0.5;
        let closing_vel = bodies[self.b].velocity_at_point(poc) - bodies[self.a].velocity_at_point(poc);
        let normal = -velocity_direction_or(Vec3::Z, closing_vel);

        let contact = ContactInfo {
            body_a: Some(self.a),
            body_b: self.b,
            poc,
            poc_a: poc,
            poc_b: poc,
            normal,
            depth: 0.0,
            friction: 1.0,
            restitution: 0.0,
        };
        let (a, b) = index_two_mut(bodies, self.a, self.b);
        solve_contact_dynamic(&contact, a, b);
    }
}

/// Revolute joint pinning one body's local point and axis to a fixed world
/// anchor and axis. Rotation around the axis is unconstrained.
#[derive(Debug, Clone, Copy)]
pub struct AnchoredRevoluteJoint {
    pub body: usize,
    pub local: Vec3,
    pub local_axis: Vec3,
    pub anchor: Vec3,
    pub anchor_axis: Vec3,
}

impl AnchoredRevoluteJoint {
    pub fn new(
        body: usize,
        local: Vec3,
        local_axis: Vec3,
        anchor: Vec3,
        anchor_axis: Vec3,
    ) -> Result<Self, PhysicsError> {
        if local_axis.length_squared() < 1e-12 || anchor_axis.length_squared() < 1e-12 {
            return Err(PhysicsError::DegenerateJointAxis);
        }
        Ok(Self { body, local, local_axis, anchor, anchor_axis })
    }

    pub fn apply_forces(&self, bodies: &mut [Body]) {
        let b = &mut bodies[self.body];
        let dir = b.world_pos(self.local) - self.anchor;
        b.pos -= dir;
    }
}

/// Revolute joint holding two bodies' local points coincident and their
/// local axes aligned, pruning angular velocity to the shared axis.
#[derive(Debug, Clone, Copy)]
pub struct RevoluteJoint {
    pub a: usize,
    pub b: usize,
    pub local_a: Vec3,
    pub local_b: Vec3,
    pub local_axis_a: Vec3,
    pub local_axis_b: Vec3,
}

impl RevoluteJoint {
    pub fn new(
        a: usize,
        b: usize,
        local_a: Vec3,
        local_b: Vec3,
        local_axis_a: Vec3,
        local_axis_b: Vec3,
    ) -> Result<Self, PhysicsError> {
        if local_axis_a.length_squared() < 1e-12 || local_axis_b.length_squared() < 1e-12 {
            return Err(PhysicsError::DegenerateJointAxis);
        }
        Ok(Self { a, b, local_a, local_b, local_axis_a, local_axis_b })
    }

    pub fn apply_forces(&self, bodies: &mut [Body]) {
        let world_a = bodies[self.a].world_pos(self.local_a);
        let world_b = bodies[self.b].world_pos(self.local_b);
        let dir = world_b - world_a;
        bodies[self.a].pos += dir * 0.5;
        bodies[self.b].pos -= dir * 0.5;

        let world_axis_a = bodies[self.a].world_vec(self.local_axis_a).normalize();
        let world_axis_b = bodies[self.b].world_vec(self.local_axis_b).normalize();

        let cos = world_axis_a.dot(world_axis_b);
        let rot = if cos < -0.9999 {
            let mut rot_axis = Vec3::Z.cross(world_axis_a);
            if rot_axis.length_squared() < 0.01 {
                rot_axis = Vec3::X.cross(world_axis_a);
            }
            Quat::from_axis_angle(rot_axis.normalize(), std::f32::consts::PI)
        } else {
            let rot_axis = world_axis_a.cross(world_axis_b);
            let s = ((1.0 + cos) * 2.0).sqrt();
            let inv_s = 1.0 / s;
            Quat::from_xyzw(rot_axis.x * inv_s, rot_axis.y * inv_s, rot_axis.z * inv_s, s * 0.5)
        };

        let a = &mut bodies[self.a];
        a.orientation = (rot * a.orientation).normalize();
        a.update_orientation_mat();
        a.update_inverse_inertia_world();
        if let Some(d) = a.dynamics.as_mut() {
            d.angular_vel = world_axis_a * d.angular_vel.dot(world_axis_a);
        }
        a.set_awake();

        let b = &mut bodies[self.b];
        if let Some(d) = b.dynamics.as_mut() {
            d.angular_vel = world_axis_b * d.angular_vel.dot(world_axis_b);
        }
        b.set_awake();
    }
}

/// A joint constraint between bodies, applied once per substep before
/// integration.
#[derive(Debug, Clone, Copy)]
pub enum Joint {
    AnchoredSpring(AnchoredSpringJoint),
    Spring(SpringJoint),
    AnchoredBall(AnchoredBallJoint),
    Ball(BallJoint),
    AnchoredRevolute(AnchoredRevoluteJoint),
    Revolute(RevoluteJoint),
}

impl Joint {
    pub fn apply_forces(&self, bodies: &mut [Body]) {
        match self {
            Joint::AnchoredSpring(j) => j.apply_forces(bodies),
            Joint::Spring(j) => j.apply_forces(bodies),
            Joint::AnchoredBall(j) => j.apply_forces(bodies),
            Joint::Ball(j) => j.apply_forces(bodies),
            Joint::AnchoredRevolute(j) => j.apply_forces(bodies),
            Joint::Revolute(j) => j.apply_forces(bodies),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::{BodyDef, BodyType};
    use crate::physics::shapes::Shape;

    fn dynamic_body(pos: Vec3) -> (Body, Vec<Shape>) {
        let shapes = vec![Shape::sphere(0.5)];
        let def = BodyDef {
            body_type: BodyType::Dynamic,
            pos,
            shapes: vec![0],
            ..Default::default()
        };
        let mut body = Body::new(def).unwrap();
        body.recompute_mass_properties(&shapes);
        body.update_inverse_inertia_world();
        (body, shapes)
    }

    #[test]
    fn anchored_spring_pulls_body_toward_anchor() {
        let (mut body, _shapes) = dynamic_body(Vec3::new(2.0, 0.0, 0.0));
        let joint = AnchoredSpringJoint::new(0, Vec3::ZERO, Vec3::ZERO, 10.0, 1.0);
        let mut bodies = vec![body];
        joint.apply_forces(&mut bodies);
        body = bodies.remove(0);
        let force = body.dynamics.as_ref().unwrap().forces;
        assert!(force.x < 0.0, "spring should pull back toward the anchor");
    }

    #[test]
    fn anchored_ball_snaps_body_to_anchor() {
        let (body, _shapes) = dynamic_body(Vec3::new(1.0, 0.0, 0.0));
        let joint = AnchoredBallJoint::new(0, Vec3::ZERO, Vec3::new(0.3, 0.0, 0.0));
        let mut bodies = vec![body];
        joint.apply_forces(&mut bodies);
        assert!((bodies[0].pos - Vec3::new(0.3, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn ball_joint_centers_attachment_points() {
        let (a, _) = dynamic_body(Vec3::new(-1.0, 0.0, 0.0));
        let (b, _) = dynamic_body(Vec3::new(1.0, 0.0, 0.0));
        let joint = BallJoint::new(0, 1, Vec3::ZERO, Vec3::ZERO);
        let mut bodies = vec![a, b];
        joint.apply_forces(&mut bodies);
        assert!((bodies[0].pos - bodies[1].pos).length() < 1e-5);
    }

    #[test]
    fn revolute_joint_rejects_zero_length_axis() {
        let result = RevoluteJoint::new(0, 1, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::Z);
        assert!(matches!(result, Err(PhysicsError::DegenerateJointAxis)));
    }

    #[test]
    fn anchored_revolute_rejects_zero_length_axis() {
        let result =
            AnchoredRevoluteJoint::new(0, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::Z);
        assert!(matches!(result, Err(PhysicsError::DegenerateJointAxis)));
    }

    #[test]
    fn revolute_joint_aligns_axes() {
        let (a, _) = dynamic_body(Vec3::new(-1.0, 0.0, 0.0));
        let (b, _) = dynamic_body(Vec3::new(1.0, 0.0, 0.0));
        let joint = RevoluteJoint::new(0, 1, Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::Z).unwrap();
        let mut bodies = vec![a, b];
        joint.apply_forces(&mut bodies);
        let world_axis_a = bodies[0].world_vec(Vec3::X).normalize();
        let world_axis_b = bodies[1].world_vec(Vec3::Z).normalize();
        assert!(world_axis_a.dot(world_axis_b) > 0.99);
    }
}
