//! Contact impulse resolution.
//!
//! Grounded on the original engine's `ContactInfo::solveContactStatic` /
//! `solveContactDynamic`. Builds a contact-space basis `(tangent, bitangent,
//! normal)`, assembles the 3x3 impulse-to-velocity-change matrix, solves for
//! the impulse that brings the closing velocity to the restitution target,
//! clamps it to the Coulomb friction cone, then applies it and does a split
//! positional correction (pushing the bodies directly out of penetration
//! rather than accumulating it as a velocity bias).
//!
//! No warm-starting: contacts are regenerated and solved from zero every
//! step.

use glam::{Mat3, Vec3};

use super::body::Body;
use super::epa::{skew, ContactInfo};

fn contact_basis(normal: Vec3) -> Mat3 {
    let tangent = if normal.x.abs() > normal.y.abs() {
        normal.cross(Vec3::Y)
    } else {
        normal.cross(Vec3::X)
    }
    .normalize();
    let bitangent = normal.cross(tangent);
    Mat3::from_cols(tangent, bitangent, normal)
}

/// Solves an impulse that brings `desired_vel` (in contact space) about,
/// clamping the tangential components to the friction cone. Returns the
/// impulse in contact space.
fn solve_friction_clamped(
    delta_vel_contact: Mat3,
    impulse_unit_velocity: Mat3,
    desired_vel: Vec3,
    d_vel: f32,
    friction: f32,
) -> Vec3 {
    let mut impulse_contact = impulse_unit_velocity * desired_vel;

    let planar_impulse = (impulse_contact.x * impulse_contact.x
        + impulse_contact.y * impulse_contact.y)
        .sqrt();

    if planar_impulse > impulse_contact.z * friction {
        impulse_contact.x /= planar_impulse;
        impulse_contact.y /= planar_impulse;

        let col_z = delta_vel_contact.z_axis;
        let mut iz = col_z.z
            + col_z.x * friction * impulse_contact.x
            + col_z.y * friction * impulse_contact.y;
        iz = d_vel / iz;
        impulse_contact.x *= friction * iz;
        impulse_contact.y *= friction * iz;
        impulse_contact.z = iz;
    }

    impulse_contact
}

/// Resolves a contact between a dynamic body `b` and an immovable surface
/// (a static body, or `None` for the implicit ground plane).
pub fn solve_contact_static(contact: &ContactInfo, b: &mut Body) {
    let Some(d) = b.dynamics.as_ref() else {
        return;
    };
    if d.mass <= 0.0 {
        return;
    }

    let rel_poc_b = contact.poc - b.pos;
    let inv_mass = 1.0 / d.mass;

    let contact_to_world = contact_basis(contact.normal);

    let mut delta_vel_contact = Mat3::from_diagonal(Vec3::splat(inv_mass));
    if !d.rotation_locked {
        let impulse_to_torque = skew(rel_poc_b);
        let mut delta_vel_world = d.inertia_inv_world * impulse_to_torque;
        delta_vel_world = impulse_to_torque * delta_vel_world;
        delta_vel_world *= -1.0;
        delta_vel_contact += contact_to_world.transpose() * delta_vel_world * contact_to_world;
    }

    let impulse_unit_velocity = delta_vel_contact.inverse();

    let closing_vel = b.velocity_at_point(contact.poc);
    let contact_closing_vel = contact_to_world.transpose() * closing_vel;
    if contact_closing_vel.z > 0.0 {
        return;
    }

    let d_vel = -contact_closing_vel.z * (1.0 + contact.restitution);
    let desired_vel = Vec3::new(-contact_closing_vel.x, -contact_closing_vel.y, d_vel);

    let impulse_contact = solve_friction_clamped(
        delta_vel_contact,
        impulse_unit_velocity,
        desired_vel,
        d_vel,
        contact.friction,
    );
    let impulse_world = contact_to_world * impulse_contact;

    b.set_awake();
    b.apply_impulse(impulse_world, contact.poc);
    b.pos += contact.depth * contact.normal;
}

/// Resolves a contact between two dynamic bodies `a` and `b`.
pub fn solve_contact_dynamic(contact: &ContactInfo, a: &mut Body, b: &mut Body) {
    let (Some(da), Some(db)) = (a.dynamics.as_ref(), b.dynamics.as_ref()) else {
        return;
    };
    if da.mass <= 0.0 || db.mass <= 0.0 {
        return;
    }

    let inv_mass = 1.0 / db.mass + 1.0 / da.mass;
    let contact_to_world = contact_basis(contact.normal);

    let mut delta_vel_world = Mat3::ZERO;
    let rel_poc_b = contact.poc - b.pos;
    if !db.rotation_locked {
        let impulse_to_torque = skew(rel_poc_b);
        let mut dv = db.inertia_inv_world * impulse_to_torque;
        dv = impulse_to_torque * dv;
        delta_vel_world -= dv;
    }

    let rel_poc_a = contact.poc - a.pos;
    if !da.rotation_locked {
        let impulse_to_torque = skew(rel_poc_a);
        let mut dv = da.inertia_inv_world * impulse_to_torque;
        dv = impulse_to_torque * dv;
        delta_vel_world -= dv;
    }

    let mut delta_vel_contact = Mat3::from_diagonal(Vec3::splat(inv_mass));
    delta_vel_contact += contact_to_world.transpose() * delta_vel_world * contact_to_world;

    let impulse_unit_velocity = delta_vel_contact.inverse();

    let closing_vel = b.velocity_at_point(contact.poc) - a.velocity_at_point(contact.poc);
    let contact_closing_vel = contact_to_world.transpose() * closing_vel;
    if contact_closing_vel.z > 0.0 {
        return;
    }

    let d_vel = -contact_closing_vel.z * (1.0 + contact.restitution);
    let desired_vel = Vec3::new(-contact_closing_vel.x, -contact_closing_vel.y, d_vel);

    let impulse_contact = solve_friction_clamped(
        delta_vel_contact,
        impulse_unit_velocity,
        desired_vel,
        d_vel,
        contact.friction,
    );
    let impulse_world = contact_to_world * impulse_contact;

    a.set_awake();
    b.set_awake();
    b.apply_impulse(impulse_world, contact.poc);
    a.apply_impulse(-impulse_world, contact.poc);
    b.pos += contact.depth * contact.normal * 0.5;
    a.pos -= contact.depth * contact.normal * 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::{BodyDef, BodyType};
    use crate::physics::shapes::Shape;

    fn resting_sphere(z: f32) -> Body {
        let shapes = [Shape::sphere(0.5)];
        let def = BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(0.0, 0.0, z),
            vel: Vec3::new(0.0, 0.0, -1.0),
            shapes: vec![0],
            ..Default::default()
        };
        let mut body = Body::new(def).unwrap();
        body.recompute_mass_properties(&shapes);
        body.update_inverse_inertia_world();
        body
    }

    #[test]
    fn static_contact_reverses_penetrating_velocity() {
        let mut b = resting_sphere(0.3);
        let contact = ContactInfo {
            body_a: None,
            body_b: 0,
            poc: Vec3::new(0.0, 0.0, 0.0),
            poc_a: Vec3::ZERO,
            poc_b: Vec3::ZERO,
            normal: Vec3::Z,
            depth: 0.2,
            friction: 0.2,
            restitution: 0.2,
        };
        solve_contact_static(&contact, &mut b);
        let vel = b.dynamics.as_ref().unwrap().vel;
        assert!(vel.z >= 0.0);
    }

    #[test]
    fn separating_contact_is_not_solved() {
        let mut b = resting_sphere(0.3);
        b.dynamics.as_mut().unwrap().vel = Vec3::new(0.0, 0.0, 5.0);
        let original_vel = b.dynamics.as_ref().unwrap().vel;
        let contact = ContactInfo {
            body_a: None,
            body_b: 0,
            poc: Vec3::ZERO,
            poc_a: Vec3::ZERO,
            poc_b: Vec3::ZERO,
            normal: Vec3::Z,
            depth: 0.2,
            friction: 0.2,
            restitution: 0.2,
        };
        solve_contact_static(&contact, &mut b);
        assert_eq!(b.dynamics.as_ref().unwrap().vel, original_vel);
    }
}
