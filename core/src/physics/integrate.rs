//! Semi-implicit Euler integration of rigid body motion.
//!
//! Grounded on the original engine's `DynamicBody::update`. Orientation is
//! advanced via the axis-angle exponential map rather than the original's
//! quaternion update (which took `sin` of the half-angle and then took `sin`
//! again when building the incremental quaternion — not reproduced here, see
//! the Design Notes on the orientation update).

use glam::{Quat, Vec3};

use super::body::Body;

/// Advances one dynamic body by `dt`, applying accumulated forces/torques,
/// then clearing them. Sleeping and static bodies are left untouched by the
/// caller (see `PhysicsWorld::step`), so this function assumes the body is
/// awake and dynamic.
pub fn integrate(body: &mut Body, dt: f32) {
    body.update_orientation_mat();
    body.update_inverse_inertia_world();

    let pos = body.pos;
    let orientation = body.orientation;

    let Some(d) = body.dynamics.as_mut() else {
        return;
    };

    let acceleration = d.forces / d.mass;
    d.vel += acceleration * dt;
    d.vel *= d.linear_damping;
    let new_pos = pos + d.vel * dt;

    let mut new_orientation = orientation;
    if !d.rotation_locked {
        let angular_acceleration = d.inertia_inv_world * d.torques;
        d.angular_vel += angular_acceleration * dt;
        d.angular_vel *= d.angular_damping;

        let delta = d.angular_vel * dt;
        let delta_len = delta.length();
        if delta_len > 1e-8 {
            let half_angle = 0.5 * delta_len;
            let axis = delta / delta_len;
            let rot = Quat::from_axis_angle(axis, 2.0 * half_angle);
            new_orientation = (rot * orientation).normalize();
        }
    }

    body.pos = new_pos;
    body.orientation = new_orientation;
    body.update_orientation_mat();
    body.update_inverse_inertia_world();

    d.forces = Vec3::ZERO;
    d.torques = Vec3::ZERO;
}
