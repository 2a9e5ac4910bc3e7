//! Bounding-volume hierarchy over a fixed set of static primitives.
//!
//! Grounded on the original engine's `acceleration/BVH.h`: primitives are
//! recursively split on their centroid's widest-extent axis (midpoint split,
//! falling back to an equal-count split when midpoint partitioning fails to
//! separate the range), primitives are reordered into contiguous leaf runs,
//! and the resulting tree is flattened into a single `Vec` for traversal
//! with a fixed-depth explicit stack rather than recursion. Unlike the
//! original's raw pointers and `new`-allocated `BVHNode` tree (freed nowhere
//! in the source), the intermediate tree here is built as an in-memory
//! `Vec`-backed arena and dropped once flattened.

use super::aabb::{Aabb, Ray};

const LEAF_SIZE: usize = 4;
const TRAVERSAL_STACK_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhSplitMode {
    Midpoint,
    EqualCounts,
}

pub trait BvhPrimitive {
    fn aabb(&self) -> Aabb;
}

impl BvhPrimitive for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}

struct PrimitiveInfo {
    aabb: Aabb,
    centroid: glam::Vec3,
    index: usize,
}

enum BuildNode {
    Leaf { aabb: Aabb, start: usize, count: usize },
    Interior { aabb: Aabb, axis: usize, left: Box<BuildNode>, right: Box<BuildNode> },
}

impl BuildNode {
    fn aabb(&self) -> Aabb {
        match self {
            BuildNode::Leaf { aabb, .. } => *aabb,
            BuildNode::Interior { aabb, .. } => *aabb,
        }
    }
}

/// One flattened node: a leaf's `primitive_count` is nonzero and `offset`
/// indexes into `Bvh::primitives`; an interior node has `primitive_count ==
/// 0` and `offset` is the index of its right child (the left child always
/// immediately follows its parent).
#[derive(Debug, Clone, Copy)]
pub struct LinearNode {
    pub aabb: Aabb,
    pub offset: usize,
    pub primitive_count: u16,
    pub axis: u8,
}

/// A built hierarchy over `T`'s primitives. Primitives are physically
/// reordered into leaf-contiguous runs during `build`; `order[i]` records
/// which original index now lives at storage position `i`, so query results
/// can be reported against the caller's original indexing.
pub struct Bvh<T> {
    nodes: Vec<LinearNode>,
    primitives: Vec<T>,
    order: Vec<usize>,
}

impl<T: BvhPrimitive> Bvh<T> {
    /// Builds a tree over `primitives` using `mode` to choose how ranges
    /// larger than the leaf threshold are partitioned.
    pub fn build(primitives: Vec<T>, mode: BvhSplitMode) -> Self {
        let mut primitive_info: Vec<PrimitiveInfo> = primitives
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let aabb = p.aabb();
                PrimitiveInfo { aabb, centroid: (aabb.min + aabb.max) * 0.5, index: i }
            })
            .collect();

        let mut order = Vec::with_capacity(primitives.len());
        let root = if primitive_info.is_empty() {
            None
        } else {
            let len = primitive_info.len();
            Some(recursive_build(&mut primitive_info, 0, len, mode, &mut order))
        };

        let mut ordered_primitives: Vec<Option<T>> = primitives.into_iter().map(Some).collect();
        let reordered: Vec<T> = order
            .iter()
            .map(|&original| ordered_primitives[original].take().expect("each original index used once"))
            .collect();

        let mut nodes = Vec::new();
        if let Some(root) = root {
            flatten(&root, &mut nodes);
        }

        Self { nodes, primitives: reordered, order }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The flattened node array, in pre-order. Exposed read-only for callers
    /// (a debug renderer, say) that want to visualize the tree.
    pub fn nodes(&self) -> &[LinearNode] {
        &self.nodes
    }

    pub fn primitives(&self) -> &[T] {
        &self.primitives
    }

    /// Returns the original indices of every primitive whose AABB overlaps
    /// `query`.
    pub fn query(&self, query: &Aabb) -> Vec<usize> {
        let mut hits = Vec::new();
        if self.nodes.is_empty() {
            return hits;
        }

        let mut stack = [0usize; TRAVERSAL_STACK_DEPTH];
        let mut stack_len = 0usize;
        let mut current = 0usize;

        loop {
            let node = &self.nodes[current];
            if query.intersects(&node.aabb) {
                if node.primitive_count > 0 {
                    for i in 0..node.primitive_count as usize {
                        let storage = node.offset + i;
                        if query.intersects(&self.primitives[storage].aabb()) {
                            hits.push(self.order[storage]);
                        }
                    }
                    if stack_len == 0 {
                        break;
                    }
                    stack_len -= 1;
                    current = stack[stack_len];
                } else {
                    stack[stack_len] = current + 1;
                    stack_len += 1;
                    current = node.offset;
                }
            } else {
                if stack_len == 0 {
                    break;
                }
                stack_len -= 1;
                current = stack[stack_len];
            }
        }

        hits
    }

    /// Returns the original indices of every primitive whose AABB the ray
    /// passes through, nearest-node-first. Leaves the exact shape test to
    /// the caller, which holds the geometry the primitives reference.
    pub fn query_ray(&self, ray: &Ray) -> Vec<usize> {
        let mut hits = Vec::new();
        if self.nodes.is_empty() {
            return hits;
        }

        let inv_dir = ray.inv_dir();
        let is_neg = [inv_dir.x < 0.0, inv_dir.y < 0.0, inv_dir.z < 0.0];

        let mut stack = [0usize; TRAVERSAL_STACK_DEPTH];
        let mut stack_len = 0usize;
        let mut current = 0usize;

        loop {
            let node = &self.nodes[current];
            if node.aabb.intersects_ray(ray, inv_dir, is_neg) {
                if node.primitive_count > 0 {
                    for i in 0..node.primitive_count as usize {
                        hits.push(self.order[node.offset + i]);
                    }
                    if stack_len == 0 {
                        break;
                    }
                    stack_len -= 1;
                    current = stack[stack_len];
                } else if is_neg[node.axis as usize] {
                    stack[stack_len] = node.offset;
                    stack_len += 1;
                    current += 1;
                } else {
                    stack[stack_len] = current + 1;
                    stack_len += 1;
                    current = node.offset;
                }
            } else {
                if stack_len == 0 {
                    break;
                }
                stack_len -= 1;
                current = stack[stack_len];
            }
        }

        hits
    }
}

fn recursive_build(
    primitive_info: &mut [PrimitiveInfo],
    start: usize,
    end: usize,
    mode: BvhSplitMode,
    order: &mut Vec<usize>,
) -> BuildNode {
    let mut aabb = primitive_info[start].aabb;
    for info in &primitive_info[start + 1..end] {
        aabb.combine_aabb(&info.aabb);
    }

    let n_primitives = end - start;
    if n_primitives <= LEAF_SIZE {
        let leaf_start = order.len();
        for info in &primitive_info[start..end] {
            order.push(info.index);
        }
        return BuildNode::Leaf { aabb, start: leaf_start, count: n_primitives };
    }

    let mut centroid_min = primitive_info[start].centroid;
    let mut centroid_max = primitive_info[start].centroid;
    for info in &primitive_info[start..end] {
        centroid_min = centroid_min.min(info.centroid);
        centroid_max = centroid_max.max(info.centroid);
    }
    let centroid_bounds = Aabb { min: centroid_min, max: centroid_max };
    let axis = centroid_bounds.max_extent();

    if centroid_bounds.max[axis] == centroid_bounds.min[axis] {
        let leaf_start = order.len();
        for info in &primitive_info[start..end] {
            order.push(info.index);
        }
        return BuildNode::Leaf { aabb, start: leaf_start, count: n_primitives };
    }

    let mut mid = (start + end) / 2;
    let mut split_done = false;
    if mode == BvhSplitMode::Midpoint {
        let pmid = (centroid_bounds.min[axis] + centroid_bounds.max[axis]) * 0.5;
        let split = itertools_partition(&mut primitive_info[start..end], |p| p.centroid[axis] < pmid);
        mid = start + split;
        split_done = mid != start && mid != end;
    }
    if !split_done {
        mid = (start + end) / 2;
        primitive_info[start..end].sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));
    }

    let left = recursive_build(primitive_info, start, mid, mode, order);
    let right = recursive_build(primitive_info, mid, end, mode, order);
    let mut combined = left.aabb();
    combined.combine_aabb(&right.aabb());
    BuildNode::Interior { aabb: combined, axis, left: Box::new(left), right: Box::new(right) }
}

/// In-place partition, returning the count of elements satisfying `pred`
/// (which are moved to the front of the slice).
fn itertools_partition<T>(slice: &mut [T], mut pred: impl FnMut(&T) -> bool) -> usize {
    let mut i = 0;
    for j in 0..slice.len() {
        if pred(&slice[j]) {
            slice.swap(i, j);
            i += 1;
        }
    }
    i
}

fn flatten(node: &BuildNode, nodes: &mut Vec<LinearNode>) -> usize {
    let my_index = nodes.len();
    match node {
        BuildNode::Leaf { aabb, start, count } => {
            nodes.push(LinearNode { aabb: *aabb, offset: *start, primitive_count: *count as u16, axis: 0 });
        }
        BuildNode::Interior { aabb, axis, left, right } => {
            nodes.push(LinearNode { aabb: *aabb, offset: 0, primitive_count: 0, axis: *axis as u8 });
            flatten(left, nodes);
            let right_offset = flatten(right, nodes);
            nodes[my_index].offset = right_offset;
        }
    }
    my_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    struct Sphere {
        center: Vec3,
    }

    impl BvhPrimitive for Sphere {
        fn aabb(&self) -> Aabb {
            Aabb { min: self.center - Vec3::splat(0.4), max: self.center + Vec3::splat(0.4) }
        }
    }

    fn grid() -> Vec<Sphere> {
        let mut spheres = Vec::new();
        for x in 0..10 {
            for y in 0..10 {
                for z in 0..10 {
                    if x == y && y == z {
                        spheres.push(Sphere { center: Vec3::new(x as f32, y as f32, z as f32) });
                    }
                }
            }
        }
        spheres
    }

    #[test]
    fn query_returns_only_overlapping_original_index() {
        let spheres = grid();
        let bvh = Bvh::build(spheres, BvhSplitMode::Midpoint);
        let query = Aabb { min: Vec3::new(2.1, 2.1, 2.1), max: Vec3::new(3.9, 3.9, 3.9) };
        let hits = bvh.query(&query);
        assert_eq!(hits, vec![3]);
    }

    #[test]
    fn empty_bvh_query_returns_nothing() {
        let bvh: Bvh<Sphere> = Bvh::build(Vec::new(), BvhSplitMode::Midpoint);
        assert!(bvh.is_empty());
        assert!(bvh.query(&Aabb { min: Vec3::ZERO, max: Vec3::ONE }).is_empty());
    }

    #[test]
    fn leaf_invariant_every_primitive_reachable() {
        let spheres = grid();
        let n = spheres.len();
        let bvh = Bvh::build(spheres, BvhSplitMode::Midpoint);
        let huge = Aabb { min: Vec3::splat(-100.0), max: Vec3::splat(100.0) };
        let mut hits = bvh.query(&huge);
        hits.sort_unstable();
        assert_eq!(hits, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn ray_query_finds_aligned_primitive() {
        let spheres = grid();
        let bvh = Bvh::build(spheres, BvhSplitMode::Midpoint);
        let ray = Ray { start: Vec3::new(-5.0, 5.0, 5.0), dir: Vec3::X };
        let hits = bvh.query_ray(&ray);
        assert!(hits.contains(&5));
    }
}
