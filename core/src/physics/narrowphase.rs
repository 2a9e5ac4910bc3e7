//! Narrow-phase dispatch: fast paths for common shape pairs, falling back to
//! GJK/EPA for everything else.
//!
//! Grounded on the original engine's `checkCollision*` family in
//! `geometry/Collision.h`. The SAT-based box–box path (`checkCollisionBoxBox`,
//! `checkContactBoxBox`, `calculatePenetration`) is kept below, present but
//! never called from dispatch — the original already routed box–box pairs
//! through GJK/EPA and left the SAT path as dead code.

use glam::Vec3;

use super::body::Body;
use super::epa::{epa, ContactInfo};
use super::gjk::gjk;
use super::shapes::Shape;

const GROUND_RESTITUTION: f32 = 0.1;
const GROUND_FRICTION: f32 = 0.8;

/// Tests `body` against the implicit ground plane at `z=0`.
pub fn ground_contact(body_idx: usize, body: &Body, shapes: &[Shape]) -> Option<ContactInfo> {
    let local_down = body.local_vec(Vec3::new(0.0, 0.0, -1.0));
    let shape = &shapes[body.shapes[0]];
    let lowest = body.world_pos(shape.support(local_down));

    if lowest.z < 0.0 {
        Some(ContactInfo {
            body_a: None,
            body_b: body_idx,
            poc: lowest,
            poc_a: lowest,
            poc_b: lowest,
            normal: Vec3::Z,
            depth: -lowest.z,
            restitution: GROUND_RESTITUTION.max(body.restitution),
            friction: GROUND_FRICTION.min(body.friction),
        })
    } else {
        None
    }
}

/// Sphere-sphere fast path; both bodies must carry a single `Shape::Sphere`.
pub fn sphere_sphere(
    a_idx: usize,
    b_idx: usize,
    a: &Body,
    b: &Body,
    shapes: &[Shape],
) -> Option<ContactInfo> {
    let Shape::Sphere { radius: ra, .. } = shapes[a.shapes[0]] else {
        return None;
    };
    let Shape::Sphere { radius: rb, .. } = shapes[b.shapes[0]] else {
        return None;
    };

    let delta = b.pos - a.pos;
    let rad = ra + rb;
    let dist_sq = delta.length_squared();
    if dist_sq >= rad * rad {
        return None;
    }

    let dist = dist_sq.sqrt();
    let dir = if dist > 1e-8 { delta / dist } else { Vec3::X };
    let poc_a = a.pos + dir * ra;
    let poc_b = b.pos - dir * rb;

    Some(ContactInfo {
        body_a: Some(a_idx),
        body_b: b_idx,
        poc: (poc_a + poc_b) * 0.5,
        poc_a,
        poc_b,
        normal: dir,
        depth: rad - dist,
        restitution: a.restitution.max(b.restitution),
        friction: a.friction.min(b.friction),
    })
}

/// Generic convex-convex fallback via GJK/EPA.
pub fn gjk_epa(
    a_idx: usize,
    b_idx: usize,
    a: &Body,
    b: &Body,
    shapes: &[Shape],
) -> Option<ContactInfo> {
    let simplex = gjk(a, b, shapes, Vec3::X)?;
    epa(a_idx, b_idx, a, b, shapes, &simplex)
}

/// Dispatches the appropriate narrow-phase test for a pair of dynamic
/// bodies, based on their primary shape kinds.
pub fn dynamic_dynamic_contact(
    a_idx: usize,
    b_idx: usize,
    a: &Body,
    b: &Body,
    shapes: &[Shape],
) -> Option<ContactInfo> {
    let both_spheres = matches!(shapes[a.shapes[0]], Shape::Sphere { .. })
        && matches!(shapes[b.shapes[0]], Shape::Sphere { .. });
    if both_spheres {
        sphere_sphere(a_idx, b_idx, a, b, shapes)
    } else {
        gjk_epa(a_idx, b_idx, a, b, shapes)
    }
}

/// Dispatches the appropriate narrow-phase test for a dynamic body against
/// a static body.
pub fn dynamic_static_contact(
    dynamic_idx: usize,
    static_idx: usize,
    dynamic: &Body,
    static_body: &Body,
    shapes: &[Shape],
) -> Option<ContactInfo> {
    gjk_epa(static_idx, dynamic_idx, static_body, dynamic, shapes)
}

/// Separating-axis depth of `a`'s vertex set and `b`'s vertex set projected
/// onto `axis`. Positive values mean the projections don't overlap.
#[allow(dead_code)]
fn collision_axis_depth(axis: Vec3, a: &[Vec3], b: &[Vec3]) -> f32 {
    let (mut min_a, mut max_a) = (axis.dot(a[0]), axis.dot(a[0]));
    for &p in &a[1..] {
        let proj = axis.dot(p);
        min_a = min_a.min(proj);
        max_a = max_a.max(proj);
    }
    let (mut min_b, mut max_b) = (axis.dot(b[0]), axis.dot(b[0]));
    for &p in &b[1..] {
        let proj = axis.dot(p);
        min_b = min_b.min(proj);
        max_b = max_b.max(proj);
    }
    (max_a - min_b).min(max_b - min_a)
}

/// Vertex-only SAT box–box test along a single body's three local axes.
/// Present for parity with the original engine's box–box path; never called
/// from `dynamic_dynamic_contact`, which routes box–box pairs through
/// `gjk_epa` instead (as the original did too — its SAT path predates GJK
/// and was left unused once the general path existed).
#[allow(dead_code)]
fn sat_box_box_vertices(a_half_extents: Vec3, b_vertices: &[Vec3]) -> Option<f32> {
    let axes = [Vec3::X, Vec3::Y, Vec3::Z];
    let extents = [a_half_extents.x, a_half_extents.y, a_half_extents.z];
    let mut min_depth = f32::INFINITY;
    for (axis, half_extent) in axes.iter().zip(extents) {
        let a_proj = [*axis * -half_extent, *axis * half_extent];
        let depth = collision_axis_depth(*axis, &a_proj, b_vertices);
        if depth > 0.0 {
            return None;
        }
        min_depth = min_depth.min(-depth);
    }
    Some(min_depth)
}
