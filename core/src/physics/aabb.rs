//! Axis-aligned bounding boxes and rays.
//!
//! Grounded on the original engine's `Shape.h` `AABB`/`Ray` types: combine,
//! intersection, longest-extent axis selection, and the slab test used by
//! both shape ray-casts and BVH traversal.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub start: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(start: Vec3, dir: Vec3) -> Self {
        Self { start, dir }
    }

    pub fn inv_dir(&self) -> Vec3 {
        Vec3::new(1.0 / self.dir.x, 1.0 / self.dir.y, 1.0 / self.dir.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An AABB that combines with anything to yield that thing unchanged.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn combine_aabb(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn combine_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn combined(a: &Aabb, b: &Aabb) -> Aabb {
        let mut out = *a;
        out.combine_aabb(b);
        out
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.max.x < other.min.x || self.min.x > other.max.x {
            return false;
        }
        if self.max.y < other.min.y || self.min.y > other.max.y {
            return false;
        }
        if self.max.z < other.min.z || self.min.z > other.max.z {
            return false;
        }
        true
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Axis (0=x, 1=y, 2=z) of the largest extent.
    pub fn max_extent(&self) -> usize {
        let e = self.extent();
        if e.x > e.y && e.x > e.z {
            0
        } else if e.y > e.z {
            1
        } else {
            2
        }
    }

    /// Slab test against a ray; `inv_dir` and `is_neg` are precomputed once
    /// per traversal by the caller (BVH traversal reuses them across nodes).
    pub fn intersects_ray(&self, ray: &Ray, inv_dir: Vec3, is_neg: [bool; 3]) -> bool {
        let bounds = [self.min, self.max];
        let mut t_min = (bounds[is_neg[0] as usize].x - ray.start.x) * inv_dir.x;
        let mut t_max = (bounds[1 - is_neg[0] as usize].x - ray.start.x) * inv_dir.x;
        let ty_min = (bounds[is_neg[1] as usize].y - ray.start.y) * inv_dir.y;
        let ty_max = (bounds[1 - is_neg[1] as usize].y - ray.start.y) * inv_dir.y;
        if t_min > ty_max || ty_min > t_max {
            return false;
        }
        if ty_min > t_min {
            t_min = ty_min;
        }
        if ty_max < t_max {
            t_max = ty_max;
        }
        let tz_min = (bounds[is_neg[2] as usize].z - ray.start.z) * inv_dir.z;
        let tz_max = (bounds[1 - is_neg[2] as usize].z - ray.start.z) * inv_dir.z;
        if t_min > tz_max || tz_min > t_max {
            return false;
        }
        t_max >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_grows_bounds() {
        let mut a = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(3.0, 0.5, 4.0));
        a.combine_aabb(&b);
        assert_eq!(a.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(a.max, Vec3::new(3.0, 1.0, 4.0));
    }

    #[test]
    fn intersects_is_symmetric() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let c = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 6.0, 6.0));
        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert!(a.intersects(&b));
        assert_eq!(a.intersects(&c), c.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn max_extent_picks_longest_axis() {
        let aabb = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 2.0));
        assert_eq!(aabb.max_extent(), 1);
    }

    #[test]
    fn ray_through_box() {
        let aabb = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let ray = Ray::new(Vec3::new(-5.0, 0.1, 0.2), Vec3::new(1.0, 0.0, 0.0));
        let inv_dir = ray.inv_dir();
        let is_neg = [inv_dir.x < 0.0, inv_dir.y < 0.0, inv_dir.z < 0.0];
        assert!(aabb.intersects_ray(&ray, inv_dir, is_neg));
    }

    #[test]
    fn ray_misses_box() {
        let aabb = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let ray = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let inv_dir = ray.inv_dir();
        let is_neg = [inv_dir.x < 0.0, inv_dir.y < 0.0, inv_dir.z < 0.0];
        assert!(!aabb.intersects_ray(&ray, inv_dir, is_neg));
    }
}
