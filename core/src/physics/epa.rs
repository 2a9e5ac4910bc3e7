//! EPA penetration-depth and contact-point recovery, run on the terminal
//! GJK simplex.
//!
//! Grounded on the original engine's `Polytope`/`EPA()`. The fixed-size
//! C arrays (`vertices[50]`, `faces[50]`, ...) become growable `Vec`s — there
//! is no reason to cap polytope growth at a compile-time constant once it's
//! heap-backed, so the 40-face cap from the original is kept only as the
//! iteration bound that guards against runaway growth, not an allocation
//! limit.

use glam::{Mat3, Vec3};
use log::warn;

use super::body::Body;
use super::gjk::{support, Simplex};
use super::shapes::Shape;

const MAX_ITERS: u32 = 50;
const MAX_FACES: usize = 40;
const CONVERGENCE_EPS: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    /// `None` for the implicit ground plane; otherwise a static or dynamic
    /// body index.
    pub body_a: Option<usize>,
    /// Always a dynamic body index.
    pub body_b: usize,

    pub poc: Vec3,
    pub poc_a: Vec3,
    pub poc_b: Vec3,
    /// Points from body A towards body B.
    pub normal: Vec3,
    pub depth: f32,

    pub friction: f32,
    pub restitution: f32,
}

/// Persistent-manifold accumulator, deliberately unused: this engine
/// recomputes contacts from scratch every step rather than warm-starting
/// accumulated impulses across frames.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct ContactManifold {
    pub normal: Vec3,
    pub local_a: Vec<Vec3>,
    pub local_b: Vec<Vec3>,
}

#[allow(dead_code)]
impl ContactManifold {
    pub fn add_contact(&mut self, _contact: &ContactInfo) {}
    pub fn update_contacts(&mut self) {}
}

struct Face {
    indices: [usize; 3],
    normal: Vec3,
    dist: f32,
}

struct Polytope {
    vertices: Vec<Vec3>,
    support_a: Vec<Vec3>,
    support_b: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Polytope {
    fn from_simplex(simplex: &Simplex) -> Self {
        let vertices = (0..4).map(|i| simplex.v(i)).collect::<Vec<_>>();
        let support_a = (0..4).map(|i| simplex.support_a(i)).collect::<Vec<_>>();
        let support_b = (0..4).map(|i| simplex.support_b(i)).collect::<Vec<_>>();

        let mut poly = Self {
            vertices,
            support_a,
            support_b,
            faces: Vec::new(),
        };
        for idx in [[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]] {
            poly.push_face(idx);
        }
        poly
    }

    fn face_normal(&self, indices: [usize; 3]) -> Vec3 {
        let a = self.vertices[indices[1]] - self.vertices[indices[0]];
        let b = self.vertices[indices[2]] - self.vertices[indices[0]];
        a.cross(b).normalize()
    }

    fn distance_to_origin(&self, normal: Vec3, indices: [usize; 3]) -> f32 {
        let ao = -self.vertices[indices[0]];
        -normal.dot(ao)
    }

    fn push_face(&mut self, indices: [usize; 3]) {
        let normal = self.face_normal(indices);
        let dist = self.distance_to_origin(normal, indices);
        self.faces.push(Face { indices, normal, dist });
    }

    fn closest_face(&self) -> usize {
        let mut best = 0;
        for (i, face) in self.faces.iter().enumerate() {
            if face.dist < self.faces[best].dist {
                best = i;
            }
        }
        best
    }

    fn distance_to_point(&self, point: Vec3, face: usize) -> f32 {
        let on_face = self.vertices[self.faces[face].indices[0]];
        self.faces[face].normal.dot(point - on_face)
    }

    /// Adds a new vertex, removing every face the point can "see" and
    /// re-triangulating the resulting hole from the silhouette edges.
    fn add_point(&mut self, point: Vec3, a: Vec3, b: Vec3) {
        let new_index = self.vertices.len();
        self.vertices.push(point);
        self.support_a.push(a);
        self.support_b.push(b);

        let mut edges: Vec<[usize; 2]> = Vec::new();
        let mut i = 0;
        while i < self.faces.len() {
            if self.distance_to_point(point, i) > 0.0 {
                let [x, y, z] = self.faces[i].indices;
                for edge in [[x, y], [y, z], [z, x]] {
                    add_unique_edge(&mut edges, edge);
                }
                self.faces.remove(i);
            } else {
                i += 1;
            }
        }

        for [x, y] in edges {
            self.push_face([x, y, new_index]);
        }
    }
}

fn add_unique_edge(edges: &mut Vec<[usize; 2]>, edge: [usize; 2]) {
    if let Some(pos) = edges
        .iter()
        .position(|&e| e == edge || (e[0] == edge[1] && e[1] == edge[0]))
    {
        edges.remove(pos);
    } else {
        edges.push(edge);
    }
}

/// Expands the polytope built from `simplex` until the closest face lies on
/// the Minkowski difference's boundary, returning the resulting contact.
/// Returns `None` if the iteration/face caps are hit before convergence.
pub fn epa(
    a_idx: usize,
    b_idx: usize,
    a: &Body,
    b: &Body,
    shapes: &[Shape],
    simplex: &Simplex,
) -> Option<ContactInfo> {
    let mut polytope = Polytope::from_simplex(simplex);

    for _ in 0..MAX_ITERS {
        if polytope.faces.len() >= MAX_FACES {
            warn!("EPA hit the {MAX_FACES}-face cap without converging");
            break;
        }
        let closest = polytope.closest_face();
        let d = polytope.faces[closest].normal;

        let a_support = support(a, shapes, d);
        let b_support = support(b, shapes, -d);
        let point = a_support - b_support;

        let dist = polytope.distance_to_point(point, closest);
        if dist < CONVERGENCE_EPS {
            return Some(build_contact(a_idx, b_idx, a, b, &polytope, closest));
        }

        polytope.add_point(point, a_support, b_support);
    }
    warn!("EPA hit the {MAX_ITERS}-iteration cap without converging");
    None
}

fn build_contact(
    a_idx: usize,
    b_idx: usize,
    a: &Body,
    b: &Body,
    polytope: &Polytope,
    face: usize,
) -> ContactInfo {
    let normal = polytope.faces[face].normal;
    let depth = polytope.faces[face].dist;

    let [ia, ib, ic] = polytope.faces[face].indices;
    let v_a = polytope.vertices[ia];
    let v_b = polytope.vertices[ib];
    let v_c = polytope.vertices[ic];
    let v_p = normal * depth;

    let (u, v, w) = barycentric(v_p, v_a, v_b, v_c);

    let poc_a = polytope.support_a[ia] * u + polytope.support_a[ib] * v + polytope.support_a[ic] * w;
    let poc_b = polytope.support_b[ia] * u + polytope.support_b[ib] * v + polytope.support_b[ic] * w;

    ContactInfo {
        body_a: Some(a_idx),
        body_b: b_idx,
        poc: (poc_a + poc_b) * 0.5,
        poc_a,
        poc_b,
        normal,
        depth,
        friction: a.friction.min(b.friction),
        restitution: a.restitution.max(b.restitution),
    }
}

fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32, f32) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;
    (u, v, w)
}

/// Symmetric 3x3 skew matrix such that `skew(v) * x == v.cross(x)`.
pub fn skew(v: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    )
}
