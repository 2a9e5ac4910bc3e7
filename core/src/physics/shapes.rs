//! Convex shape library: support functions, AABBs, ray casts and analytic
//! mass properties.
//!
//! Grounded on the original engine's `geometry/Shape.h`: each shape variant
//! below corresponds to one of its concrete `Shape` subclasses. Dispatch is a
//! tagged `enum` rather than a vtable (see the Design Notes on polymorphism),
//! so the GJK/EPA hot loop never pays for dynamic dispatch on `support`.

use glam::{Quat, Vec3};

use super::aabb::{Aabb, Ray};
use super::error::PhysicsError;

/// Volume, local centroid and inertia tensor (about the shape's own local
/// origin, i.e. *before* any recentring), at unit density.
///
/// `inertia_diag` is `(Ixx, Iyy, Izz)` and `inertia_products` is
/// `(Ixy, Iyz, Ixz)`; together they assemble into the tensor
/// `[[Ixx,-Ixy,-Ixz],[-Ixy,Iyy,-Iyz],[-Ixz,-Iyz,Izz]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub volume: f32,
    pub centroid: Vec3,
    pub inertia_diag: Vec3,
    pub inertia_products: Vec3,
}

impl MassProperties {
    pub fn inertia_tensor(&self) -> glam::Mat3 {
        let d = self.inertia_diag;
        let p = self.inertia_products;
        glam::Mat3::from_cols(
            Vec3::new(d.x, -p.x, -p.z),
            Vec3::new(-p.x, d.y, -p.y),
            Vec3::new(-p.z, -p.y, d.z),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        mass: MassProperties,
    },
    Cuboid {
        half_extents: Vec3,
        mass: MassProperties,
    },
    /// Axis-aligned along local Z.
    Cylinder {
        radius: f32,
        half_height: f32,
        mass: MassProperties,
    },
    /// Axis-aligned along local Z; `half_height` is the half-length of the
    /// central cylindrical segment, not counting the hemispherical caps.
    Capsule {
        radius: f32,
        half_height: f32,
        mass: MassProperties,
    },
    Polyhedron {
        vertices: Vec<Vec3>,
        faces: Vec<[u32; 3]>,
        mass: MassProperties,
    },
}

impl Shape {
    pub fn sphere(radius: f32) -> Self {
        let volume = (4.0 / 3.0) * std::f32::consts::PI * radius.powi(3);
        let i = 0.4 * volume * radius * radius;
        Shape::Sphere {
            radius,
            mass: MassProperties {
                volume,
                centroid: Vec3::ZERO,
                inertia_diag: Vec3::splat(i),
                inertia_products: Vec3::ZERO,
            },
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        let volume = half_extents.x * half_extents.y * half_extents.z * 8.0;
        let full = half_extents * 2.0;
        let sq = full * full;
        let ixx = (1.0 / 12.0) * volume * (sq.y + sq.z);
        let iyy = (1.0 / 12.0) * volume * (sq.x + sq.z);
        let izz = (1.0 / 12.0) * volume * (sq.x + sq.y);
        Shape::Cuboid {
            half_extents,
            mass: MassProperties {
                volume,
                centroid: Vec3::ZERO,
                inertia_diag: Vec3::new(ixx, iyy, izz),
                inertia_products: Vec3::ZERO,
            },
        }
    }

    pub fn cylinder(radius: f32, half_height: f32) -> Self {
        let volume = std::f32::consts::PI * radius * radius * (2.0 * half_height);
        let h = 2.0 * half_height;
        let i_xy = (1.0 / 12.0) * volume * (3.0 * radius * radius + h * h);
        let i_z = 0.5 * volume * radius * radius;
        Shape::Cylinder {
            radius,
            half_height,
            mass: MassProperties {
                volume,
                centroid: Vec3::ZERO,
                inertia_diag: Vec3::new(i_xy, i_xy, i_z),
                inertia_products: Vec3::ZERO,
            },
        }
    }

    pub fn capsule(radius: f32, half_height: f32) -> Self {
        let cyl_volume = std::f32::consts::PI * radius * radius * (2.0 * half_height);
        let h = 2.0 * half_height;
        let cyl_ixy = (1.0 / 12.0) * cyl_volume * (3.0 * radius * radius + h * h);
        let cyl_iz = 0.5 * cyl_volume * radius * radius;

        // Each hemisphere cap, via parallel-axis shift from the hemisphere's
        // own centroid out to the capsule's central axis.
        let hemisphere_volume = (2.0 / 3.0) * std::f32::consts::PI * radius.powi(3);
        let hemi_ixy = hemisphere_volume
            * (0.4 * radius * radius + 0.5 * half_height * half_height + 0.375 * half_height * radius);
        let hemi_iz = hemisphere_volume * (0.4 * radius * radius);

        let volume = cyl_volume + 2.0 * hemisphere_volume;
        let i_xy = cyl_ixy + 2.0 * hemi_ixy;
        let i_z = cyl_iz + 2.0 * hemi_iz;

        Shape::Capsule {
            radius,
            half_height,
            mass: MassProperties {
                volume,
                centroid: Vec3::ZERO,
                inertia_diag: Vec3::new(i_xy, i_xy, i_z),
                inertia_products: Vec3::ZERO,
            },
        }
    }

    /// Builds a polyhedron from a vertex list and triangular face indices.
    ///
    /// Computes volume, centroid and inertia via the Mirtich-style triangle
    /// integral, then translates `vertices` so the computed centroid sits at
    /// the local origin (mass properties mutate the shape at most once; see
    /// the ownership/sharing note in the resource-model spec).
    pub fn polyhedron(mut vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, PhysicsError> {
        if vertices.is_empty() {
            return Err(PhysicsError::EmptyPolyhedron);
        }
        for face in &faces {
            for &idx in face {
                if idx as usize >= vertices.len() {
                    return Err(PhysicsError::FaceIndexOutOfBounds(idx, vertices.len()));
                }
            }
        }

        let mass = polyhedron_mass_properties(&vertices, &faces);
        for v in &mut vertices {
            *v -= mass.centroid;
        }
        let mass = MassProperties {
            centroid: Vec3::ZERO,
            ..mass
        };

        Ok(Shape::Polyhedron {
            vertices,
            faces,
            mass,
        })
    }

    /// Builds a `Polyhedron` from a reduced Wavefront OBJ source: `v`
    /// vertex lines and triangular `f` face lines, ignoring `vt`/`vn` and
    /// any other directive. See [`parse_obj`] for the exact grammar.
    pub fn polyhedron_from_obj(src: &str) -> Result<Self, PhysicsError> {
        let (vertices, faces) = parse_obj(src)?;
        Self::polyhedron(vertices, faces)
    }

    pub fn mass_properties(&self) -> &MassProperties {
        match self {
            Shape::Sphere { mass, .. }
            | Shape::Cuboid { mass, .. }
            | Shape::Cylinder { mass, .. }
            | Shape::Capsule { mass, .. }
            | Shape::Polyhedron { mass, .. } => mass,
        }
    }

    /// Furthest point of the shape, in local space, along `axis`.
    pub fn support(&self, axis: Vec3) -> Vec3 {
        match self {
            Shape::Sphere { radius, .. } => {
                let n = safe_normalize(axis, Vec3::Z);
                n * *radius
            }
            Shape::Cuboid { half_extents, .. } => Vec3::new(
                half_extents.x.copysign(axis.x),
                half_extents.y.copysign(axis.y),
                half_extents.z.copysign(axis.z),
            ),
            Shape::Cylinder {
                radius,
                half_height,
                ..
            } => cylinder_support(*radius, *half_height, axis),
            Shape::Capsule {
                radius,
                half_height,
                ..
            } => {
                let n = safe_normalize(axis, Vec3::Z);
                let mut p = n * *radius;
                p.z += half_height.copysign(axis.z);
                p
            }
            Shape::Polyhedron { vertices, .. } => {
                let mut best = vertices[0];
                let mut best_dot = best.dot(axis);
                for &v in &vertices[1..] {
                    let d = v.dot(axis);
                    if d > best_dot {
                        best_dot = d;
                        best = v;
                    }
                }
                best
            }
        }
    }

    pub fn contains(&self, local_point: Vec3) -> bool {
        match self {
            Shape::Sphere { radius, .. } => local_point.length_squared() <= radius * radius,
            Shape::Cuboid { half_extents, .. } => {
                local_point.x.abs() <= half_extents.x
                    && local_point.y.abs() <= half_extents.y
                    && local_point.z.abs() <= half_extents.z
            }
            Shape::Cylinder {
                radius,
                half_height,
                ..
            } => {
                local_point.z.abs() <= *half_height
                    && (local_point.x * local_point.x + local_point.y * local_point.y)
                        <= radius * radius
            }
            Shape::Capsule {
                radius,
                half_height,
                ..
            } => {
                let clamped_z = local_point.z.clamp(-*half_height, *half_height);
                let closest = Vec3::new(0.0, 0.0, clamped_z);
                (local_point - closest).length_squared() <= radius * radius
            }
            Shape::Polyhedron { .. } => false, // not needed by any caller in scope
        }
    }

    /// World-space AABB given the body's position and orientation.
    pub fn world_aabb(&self, pos: Vec3, orientation: Quat) -> Aabb {
        match self {
            Shape::Sphere { radius, .. } => {
                Aabb::new(pos - Vec3::splat(*radius), pos + Vec3::splat(*radius))
            }
            Shape::Cuboid { half_extents, .. } => {
                let r = half_extents.length();
                Aabb::new(pos - Vec3::splat(r), pos + Vec3::splat(r))
            }
            Shape::Cylinder {
                radius,
                half_height,
                ..
            } => {
                let r = (radius * radius + half_height * half_height).sqrt();
                Aabb::new(pos - Vec3::splat(r), pos + Vec3::splat(r))
            }
            Shape::Capsule {
                radius,
                half_height,
                ..
            } => {
                let axis_world = orientation * Vec3::Z;
                let top = pos + axis_world * *half_height;
                let bottom = pos - axis_world * *half_height;
                let mut aabb = Aabb::new(top - Vec3::splat(*radius), top + Vec3::splat(*radius));
                aabb.combine_aabb(&Aabb::new(
                    bottom - Vec3::splat(*radius),
                    bottom + Vec3::splat(*radius),
                ));
                aabb
            }
            Shape::Polyhedron { vertices, .. } => {
                let mut aabb = Aabb::empty();
                for &v in vertices {
                    aabb.combine_point(pos + orientation * v);
                }
                aabb
            }
        }
    }

    /// Ray-cast in the shape's local space; returns the hit parameter `t`
    /// along `ray.dir` (not normalized), or `None` if there is no hit.
    pub fn ray_cast(&self, ray: &Ray) -> Option<f32> {
        match self {
            Shape::Sphere { radius, .. } => ray_cast_sphere(ray, *radius),
            Shape::Cuboid { half_extents, .. } => ray_cast_box(ray, *half_extents),
            Shape::Polyhedron {
                vertices, faces, ..
            } => ray_cast_polyhedron(ray, vertices, faces),
            Shape::Cylinder { .. } | Shape::Capsule { .. } => None,
        }
    }
}

fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq < 1e-12 {
        fallback
    } else {
        v / len_sq.sqrt()
    }
}

fn cylinder_support(radius: f32, half_height: f32, axis: Vec3) -> Vec3 {
    let planar = Vec3::new(axis.x, axis.y, 0.0);
    let planar_len = planar.length();
    let mut p = if planar_len < 1e-6 {
        Vec3::ZERO
    } else {
        planar * (radius / planar_len)
    };
    p.z = half_height.copysign(axis.z);
    p
}

fn ray_cast_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let l = -ray.start;
    let tca = l.dot(ray.dir);
    let d2 = l.dot(l) - tca * tca;
    let r2 = radius * radius;
    if d2 > r2 {
        return None;
    }
    let thc = (r2 - d2).sqrt();
    let t0 = tca - thc;
    let t1 = tca + thc;
    let t = if t0 > 1e-6 { t0 } else { t1 };
    if t > 1e-6 { Some(t) } else { None }
}

fn ray_cast_box(ray: &Ray, half_extents: Vec3) -> Option<f32> {
    let aabb = Aabb::new(-half_extents, half_extents);
    let inv_dir = ray.inv_dir();
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (origin, dir, lo, hi) = match axis {
            0 => (ray.start.x, inv_dir.x, aabb.min.x, aabb.max.x),
            1 => (ray.start.y, inv_dir.y, aabb.min.y, aabb.max.y),
            _ => (ray.start.z, inv_dir.z, aabb.min.z, aabb.max.z),
        };
        let mut t0 = (lo - origin) * dir;
        let mut t1 = (hi - origin) * dir;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    let t = if t_min > 1e-6 { t_min } else { t_max };
    if t > 1e-6 { Some(t) } else { None }
}

fn ray_cast_polyhedron(ray: &Ray, vertices: &[Vec3], faces: &[[u32; 3]]) -> Option<f32> {
    const EPS: f32 = 1e-6;
    let mut closest: Option<f32> = None;
    for face in faces {
        let v0 = vertices[face[0] as usize];
        let v1 = vertices[face[1] as usize];
        let v2 = vertices[face[2] as usize];
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = ray.dir.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPS {
            continue;
        }
        let inv_det = 1.0 / det;
        let s = ray.start - v0;
        let u = s.dot(h) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            continue;
        }
        let q = s.cross(edge1);
        let v = ray.dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            continue;
        }
        let t = edge2.dot(q) * inv_det;
        if t > EPS {
            closest = Some(closest.map_or(t, |c: f32| c.min(t)));
        }
    }
    closest
}

/// Mirtich-style volume integral over triangles, accumulating volume,
/// first moments (centroid) and second moments (inertia) in one pass.
fn polyhedron_mass_properties(vertices: &[Vec3], faces: &[[u32; 3]]) -> MassProperties {
    // mult[i] are the 1/denominator constants for the canonical recurrence
    // order: 1, x, y, z, x^2, y^2, z^2, xy, yz, zx.
    const MULT: [f32; 10] = [
        1.0 / 6.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 120.0,
        1.0 / 120.0,
        1.0 / 120.0,
    ];
    let mut intg = [0.0f32; 10];

    for face in faces {
        let w0 = vertices[face[0] as usize];
        let w1 = vertices[face[1] as usize];
        let w2 = vertices[face[2] as usize];
        let d = (w1 - w0).cross(w2 - w0);

        let (f1x, f2x, f3x, g0x, g1x, g2x) = subexpr(w0.x, w1.x, w2.x);
        let (f1y, f2y, f3y, g0y, g1y, g2y) = subexpr(w0.y, w1.y, w2.y);
        let (f1z, f2z, f3z, g0z, g1z, g2z) = subexpr(w0.z, w1.z, w2.z);

        intg[0] += d.x * f1x;
        intg[1] += d.x * f2x;
        intg[2] += d.y * f2y;
        intg[3] += d.z * f2z;
        intg[4] += d.x * f3x;
        intg[5] += d.y * f3y;
        intg[6] += d.z * f3z;
        intg[7] += d.x * (w0.y * g0x + w1.y * g1x + w2.y * g2x);
        intg[8] += d.y * (w0.z * g0y + w1.z * g1y + w2.z * g2y);
        intg[9] += d.z * (w0.x * g0z + w1.x * g1z + w2.x * g2z);
    }
    for (i, m) in MULT.iter().enumerate() {
        intg[i] *= m;
    }

    let volume = intg[0];
    let centroid = Vec3::new(intg[1], intg[2], intg[3]) / volume;

    let ixx = intg[5] + intg[6] - volume * (centroid.y * centroid.y + centroid.z * centroid.z);
    let iyy = intg[4] + intg[6] - volume * (centroid.z * centroid.z + centroid.x * centroid.x);
    let izz = intg[4] + intg[5] - volume * (centroid.x * centroid.x + centroid.y * centroid.y);
    let ixy = -(intg[7] - volume * centroid.x * centroid.y);
    let iyz = -(intg[8] - volume * centroid.y * centroid.z);
    let izx = -(intg[9] - volume * centroid.z * centroid.x);

    MassProperties {
        volume,
        centroid,
        inertia_diag: Vec3::new(ixx, iyy, izz),
        inertia_products: Vec3::new(ixy, iyz, izx),
    }
}

/// Per-axis recurrence terms shared by volume, first-moment and
/// second-moment accumulation for one triangle.
fn subexpr(w0: f32, w1: f32, w2: f32) -> (f32, f32, f32, f32, f32, f32) {
    let temp0 = w0 + w1;
    let f1 = temp0 + w2;
    let temp1 = w0 * w0;
    let temp2 = temp1 + w1 * temp0;
    let f2 = temp2 + w2 * f1;
    let f3 = w0 * temp1 + w1 * temp2 + w2 * f2;
    let g0 = f2 + w0 * (f1 + w0);
    let g1 = f2 + w1 * (f1 + w1);
    let g2 = f2 + w2 * (f1 + w2);
    (f1, f2, f3, g0, g1, g2)
}

/// Parses a reduced Wavefront OBJ grammar: `v x y z` vertex lines and
/// triangular `f a b c` face lines (vertex indices only — a `v/vt/vn`
/// slash-group keeps only the first field). `vt`/`vn` lines and anything
/// else are skipped. Face indices are 1-based in OBJ and are converted to
/// 0-based here.
fn parse_obj(src: &str) -> Result<(Vec<Vec3>, Vec<[u32; 3]>), PhysicsError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for line in src.lines() {
        let line = line.trim();
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let coords: Vec<f32> = tokens.filter_map(|t| t.parse().ok()).collect();
                if coords.len() < 3 {
                    return Err(PhysicsError::MeshParse(format!("malformed vertex line: {line}")));
                }
                vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let indices: Vec<u32> = tokens
                    .map(|t| t.split('/').next().unwrap_or(""))
                    .map(str::parse::<i64>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| PhysicsError::MeshParse(format!("malformed face line: {line}")))?
                    .into_iter()
                    .map(|i| (i - 1) as u32)
                    .collect();
                if indices.len() != 3 {
                    return Err(PhysicsError::MeshParse(format!(
                        "only triangular faces are supported: {line}"
                    )));
                }
                faces.push([indices[0], indices[1], indices[2]]);
            }
            _ => {}
        }
    }

    Ok((vertices, faces))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_mass_properties() {
        let s = Shape::sphere(1.0);
        let m = s.mass_properties();
        assert!((m.volume - 4.0 / 3.0 * std::f32::consts::PI).abs() < 1e-4);
        assert!((m.inertia_diag.x - 0.4 * m.volume).abs() < 1e-4);
        assert!((m.inertia_diag.y - 0.4 * m.volume).abs() < 1e-4);
        assert!((m.inertia_diag.z - 0.4 * m.volume).abs() < 1e-4);
        assert_eq!(m.inertia_products, Vec3::ZERO);
    }

    #[test]
    fn unit_cube_mass_properties() {
        let b = Shape::cuboid(Vec3::splat(0.5));
        let m = b.mass_properties();
        assert!((m.volume - 1.0).abs() < 1e-6);
        assert!((m.inertia_diag.x - 1.0 / 6.0).abs() < 1e-5);
        assert!((m.inertia_diag.y - 1.0 / 6.0).abs() < 1e-5);
        assert!((m.inertia_diag.z - 1.0 / 6.0).abs() < 1e-5);
    }

    #[test]
    fn box_support_picks_correct_corner() {
        let b = Shape::cuboid(Vec3::new(1.0, 2.0, 3.0));
        let p = b.support(Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(p, Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn sphere_support_is_scale_invariant() {
        let s = Shape::sphere(2.0);
        let a = s.support(Vec3::new(1.0, 2.0, 3.0));
        let b = s.support(Vec3::new(3.0, 6.0, 9.0));
        assert!((a - b).length() < 1e-5);
    }

    #[test]
    fn cylinder_support_handles_vertical_axis() {
        let c = Shape::cylinder(1.0, 2.0);
        let p = c.support(Vec3::new(0.0, 0.0, 1.0));
        assert!((p.x).abs() < 1e-6);
        assert!((p.y).abs() < 1e-6);
        assert!((p.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn polyhedron_recenters_to_centroid() {
        // A tetrahedron offset far from the origin.
        let offset = Vec3::new(10.0, 10.0, 10.0);
        let verts = vec![
            offset + Vec3::new(0.0, 0.0, 0.0),
            offset + Vec3::new(1.0, 0.0, 0.0),
            offset + Vec3::new(0.0, 1.0, 0.0),
            offset + Vec3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]];
        let shape = Shape::polyhedron(verts, faces).unwrap();
        let m = shape.mass_properties();
        assert!(m.volume > 0.0);
        if let Shape::Polyhedron { vertices, .. } = &shape {
            let centroid: Vec3 = vertices.iter().copied().sum::<Vec3>() / vertices.len() as f32;
            // not exactly zero (centroid of vertex list != volume centroid)
            // but recentred relative to the computed mass centroid.
            assert!(centroid.length() < 2.0);
        }
    }

    #[test]
    fn ray_hits_unit_box() {
        let b = Shape::cuboid(Vec3::splat(0.5));
        let ray = Ray::new(Vec3::new(-5.0, 0.1, 0.2), Vec3::new(1.0, 0.0, 0.0));
        let t = b.ray_cast(&ray).unwrap();
        assert!((t - 4.5).abs() < 1e-4);
    }

    #[test]
    fn ray_misses_unit_box() {
        let b = Shape::cuboid(Vec3::splat(0.5));
        let ray = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(b.ray_cast(&ray).is_none());
    }

    #[test]
    fn parse_obj_reads_a_tetrahedron() {
        let src = "\
            # a tetrahedron\n\
            v 0.0 0.0 0.0\n\
            v 1.0 0.0 0.0\n\
            v 0.0 1.0 0.0\n\
            v 0.0 0.0 1.0\n\
            vn 0.0 0.0 1.0\n\
            f 1 2 3\n\
            f 1//1 4 2//1\n\
        ";
        let (vertices, faces) = parse_obj(src).unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces, vec![[0, 1, 2], [0, 3, 1]]);
    }

    #[test]
    fn polyhedron_from_obj_builds_a_shape() {
        let src = "\
            v 0.0 0.0 0.0\n\
            v 1.0 0.0 0.0\n\
            v 0.0 1.0 0.0\n\
            v 0.0 0.0 1.0\n\
            f 1 2 3\n\
            f 1 4 2\n\
            f 2 4 3\n\
            f 3 4 1\n\
        ";
        let shape = Shape::polyhedron_from_obj(src).unwrap();
        assert!(shape.mass_properties().volume > 0.0);
    }

    #[test]
    fn parse_obj_rejects_non_triangular_faces() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3 4\n";
        assert!(matches!(parse_obj(src), Err(PhysicsError::MeshParse(_))));
    }
}
