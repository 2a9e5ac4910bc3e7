//! GJK overlap test on the Minkowski difference of two convex shapes.
//!
//! Grounded on the original engine's `GJK()`/`Simplex`. The simplex here
//! tracks, for every point, the pair of support points on body A and body B
//! that produced it — EPA needs that pair to reconstruct a contact point by
//! barycentric interpolation over the final polytope face.

use glam::Vec3;
use log::warn;

use super::body::Body;
use super::shapes::Shape;

const MAX_ITERS: u32 = 50;

/// Furthest point of `body`'s (single, primary) collision shape along
/// `axis`, in world space.
pub fn support(body: &Body, shapes: &[Shape], axis: Vec3) -> Vec3 {
    let local_axis = body.local_vec(axis);
    let shape = &shapes[body.shapes[0]];
    body.world_vec(shape.support(local_axis)) + body.pos
}

/// Triple product `(a x b) x a`, used to find the direction orthogonal to
/// `a` that still points from `a` towards `b`.
fn trip(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b).cross(a)
}

#[derive(Debug, Clone, Copy)]
struct SimplexPoint {
    v: Vec3,
    support_a: Vec3,
    support_b: Vec3,
}

#[derive(Debug, Clone)]
pub struct Simplex {
    points: Vec<SimplexPoint>,
}

impl Simplex {
    fn new() -> Self {
        Self { points: Vec::with_capacity(4) }
    }

    fn add(&mut self, v: Vec3, support_a: Vec3, support_b: Vec3) {
        self.points.push(SimplexPoint { v, support_a, support_b });
    }

    fn set(&mut self, dst: usize, src: usize) {
        self.points[dst] = self.points[src];
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.points.swap(a, b);
    }

    fn truncate(&mut self, n: usize) {
        self.points.truncate(n);
    }

    pub(super) fn v(&self, i: usize) -> Vec3 {
        self.points[i].v
    }

    pub(super) fn support_a(&self, i: usize) -> Vec3 {
        self.points[i].support_a
    }

    pub(super) fn support_b(&self, i: usize) -> Vec3 {
        self.points[i].support_b
    }

    pub(super) fn len(&self) -> usize {
        self.points.len()
    }
}

/// Runs GJK on bodies `a`/`b` starting from the given search axis. Returns
/// the terminal tetrahedron simplex on overlap, or `None` if the shapes
/// don't intersect (including when the 50-iteration cap is hit first).
pub fn gjk(a: &Body, b: &Body, shapes: &[Shape], axis: Vec3) -> Option<Simplex> {
    let mut simplex = Simplex::new();

    let mut a_support = support(a, shapes, axis);
    let mut b_support = support(b, shapes, -axis);
    let mut point = a_support - b_support;
    simplex.add(point, a_support, b_support);
    let mut d = -point;

    for _ in 0..MAX_ITERS {
        a_support = support(a, shapes, d);
        b_support = support(b, shapes, -d);
        point = a_support - b_support;
        if point.dot(d) < 0.0 {
            return None;
        }
        simplex.add(point, a_support, b_support);

        match simplex.len() {
            2 => {
                let ab = simplex.v(0) - simplex.v(1);
                let ao = -simplex.v(1);
                d = trip(ab, ao);
            }
            3 => {
                let ab = simplex.v(1) - simplex.v(2);
                let ac = simplex.v(0) - simplex.v(2);
                let ao = -simplex.v(2);
                let norm = ab.cross(ac);
                let ab_out = ab.cross(norm);
                if ab_out.dot(ao) > 0.0 {
                    d = trip(ab, ao);
                    simplex.set(0, 1);
                    simplex.set(1, 2);
                    simplex.truncate(2);
                } else {
                    let ac_out = norm.cross(ac);
                    if ac_out.dot(ao) > 0.0 {
                        d = trip(ac, ao);
                        simplex.set(1, 2);
                        simplex.truncate(2);
                    } else if norm.dot(ao) > 0.0 {
                        d = norm;
                    } else {
                        d = -norm;
                        simplex.swap(0, 1);
                    }
                }
            }
            4 => {
                let cd = simplex.v(3) - simplex.v(0);
                let bd = simplex.v(3) - simplex.v(1);
                let ad = simplex.v(3) - simplex.v(2);
                let d_o = -simplex.v(3);
                let cdb = bd.cross(cd);

                if cdb.dot(d_o) > 0.0 {
                    let cdb_cd_out = cd.cross(cdb);
                    let cdb_bd_out = cdb.cross(bd);
                    if cdb_cd_out.dot(d_o) < 0.0 {
                        if cdb_bd_out.dot(d_o) < 0.0 {
                            // CDB face survives: [B, D, C]
                            d = cdb;
                            simplex.set(2, 0);
                            simplex.set(0, 1);
                            simplex.set(1, 3);
                            simplex.truncate(3);
                        } else {
                            d = trip(bd, d_o);
                            simplex.set(0, 1);
                            simplex.set(1, 3);
                            simplex.truncate(2);
                        }
                    } else {
                        d = trip(cd, d_o);
                        simplex.set(1, 3);
                        simplex.truncate(2);
                    }
                } else {
                    let adc = cd.cross(ad);
                    if adc.dot(d_o) > 0.0 {
                        let adc_ad_out = ad.cross(adc);
                        let adc_cd_out = adc.cross(cd);
                        if adc_ad_out.dot(d_o) < 0.0 {
                            if adc_cd_out.dot(d_o) < 0.0 {
                                // ADC face survives: [A, C, D]
                                d = adc;
                                simplex.set(1, 0);
                                simplex.set(0, 2);
                                simplex.set(2, 3);
                                simplex.truncate(3);
                            } else {
                                d = trip(cd, d_o);
                                simplex.set(1, 3);
                                simplex.truncate(2);
                            }
                        } else {
                            d = trip(ad, d_o);
                            simplex.set(0, 2);
                            simplex.set(1, 3);
                            simplex.truncate(2);
                        }
                    } else {
                        let bda = ad.cross(bd);
                        if bda.dot(d_o) > 0.0 {
                            let bda_ad_out = bda.cross(ad);
                            let bda_bd_out = bd.cross(bda);
                            if bda_ad_out.dot(d_o) < 0.0 {
                                if bda_bd_out.dot(d_o) < 0.0 {
                                    // BDA face survives: [B, A, D]
                                    d = bda;
                                    simplex.set(0, 1);
                                    simplex.set(1, 2);
                                    simplex.set(2, 3);
                                    simplex.truncate(3);
                                } else {
                                    d = trip(bd, d_o);
                                    simplex.set(0, 1);
                                    simplex.set(1, 3);
                                    simplex.truncate(2);
                                }
                            } else {
                                d = trip(ad, d_o);
                                simplex.set(0, 2);
                                simplex.set(1, 3);
                                simplex.truncate(2);
                            }
                        } else {
                            // origin enclosed: tetrahedron contains it
                            return Some(simplex);
                        }
                    }
                }
            }
            _ => unreachable!("simplex never exceeds 4 points"),
        }
    }
    warn!("GJK hit the {MAX_ITERS}-iteration cap without resolving overlap");
    None
}
