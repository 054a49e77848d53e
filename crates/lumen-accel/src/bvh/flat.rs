//! Array-based BVH with stack traversal.
//!
//! Nodes are plain `#[repr(C)]` records so the whole array can be handed to
//! another backend as bytes.

use bytemuck::{Pod, Zeroable};
use log::debug;

use super::{check_primitive_count, partition, span_bounds, BvhNode, BvhStats, Partition, TraversalStats};
use crate::aabb::{slab_hit, Aabb};
use crate::config::BvhConfig;
use crate::error::Result;
use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::Ray;

/// A node of a [`FlatBvh`].
///
/// Internal nodes have `left`/`right` set and `first == NONE`, `count == 0`.
/// Leaves have `left == right == NONE` and reference
/// `primitives[first..first + count]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatNode {
    /// Minimum corner of the node box.
    pub min: [f64; 3],
    /// Maximum corner of the node box.
    pub max: [f64; 3],
    /// Index of the left child, or [`FlatNode::NONE`].
    pub left: u32,
    /// Index of the right child, or [`FlatNode::NONE`].
    pub right: u32,
    /// First primitive of a leaf, or [`FlatNode::NONE`].
    pub first: u32,
    /// Primitive count of a leaf, 0 for internal nodes.
    pub count: u32,
}

impl FlatNode {
    /// Sentinel for an absent index.
    pub const NONE: u32 = u32::MAX;

    /// Leaf over `count` primitives from `first`.
    pub fn leaf(aabb: &Aabb, first: u32, count: u32) -> Self {
        Self {
            min: corner(aabb, |i| i.min),
            max: corner(aabb, |i| i.max),
            left: Self::NONE,
            right: Self::NONE,
            first,
            count,
        }
    }

    /// Internal node over two child indices.
    pub fn internal(aabb: &Aabb, left: u32, right: u32) -> Self {
        Self {
            min: corner(aabb, |i| i.min),
            max: corner(aabb, |i| i.max),
            left,
            right,
            first: Self::NONE,
            count: 0,
        }
    }

    /// True for leaves.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first != Self::NONE
    }

    /// The node box.
    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: Interval::new(self.min[0], self.max[0]),
            y: Interval::new(self.min[1], self.max[1]),
            z: Interval::new(self.min[2], self.max[2]),
        }
    }
}

fn corner(aabb: &Aabb, pick: impl Fn(&Interval) -> f64) -> [f64; 3] {
    [pick(&aabb.x), pick(&aabb.y), pick(&aabb.z)]
}

/// Flattened BVH: a node array rooted at index 0 plus the primitive table.
#[derive(Debug, Clone)]
pub struct FlatBvh<P> {
    nodes: Vec<FlatNode>,
    primitives: Vec<P>,
}

impl<P> FlatBvh<P> {
    /// Preorder flattening of a tree whose leaves index `primitives`.
    pub(crate) fn from_tree(root: &BvhNode, primitives: Vec<P>) -> Self {
        let mut nodes = Vec::new();
        flatten_node(root, &mut nodes);
        debug!(
            "flattened BVH: {} nodes over {} primitives",
            nodes.len(),
            primitives.len()
        );
        Self { nodes, primitives }
    }

    /// Node array; the root is at index 0.
    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    /// Primitive table referenced by the leaves.
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    /// Node array as raw bytes.
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Split into the node array and the primitive table.
    pub fn into_parts(self) -> (Vec<FlatNode>, Vec<P>) {
        (self.nodes, self.primitives)
    }

    /// Node and leaf counts and depth.
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            primitive_count: self.primitives.len(),
            ..Default::default()
        };
        if self.nodes.is_empty() {
            return stats;
        }

        let mut stack = vec![(0u32, 1usize)];
        while let Some((index, depth)) = stack.pop() {
            let node = &self.nodes[index as usize];
            stats.node_count += 1;
            stats.depth = stats.depth.max(depth);
            if node.is_leaf() {
                stats.leaf_count += 1;
            } else {
                stack.push((node.right, depth + 1));
                stack.push((node.left, depth + 1));
            }
        }
        stats
    }
}

impl<P: Hittable> FlatBvh<P> {
    /// Build the array form directly, without an intermediate tree.
    ///
    /// Produces the same partition of primitives as [`super::Bvh::build_with`];
    /// only the node order differs (children are allocated as adjacent pairs).
    pub fn build(primitives: Vec<P>, config: &BvhConfig) -> Result<Self> {
        check_primitive_count(primitives.len())?;
        config.validate()?;

        let mut primitives = primitives;
        let mut nodes = vec![FlatNode::zeroed()];
        let mut pending = vec![(0usize, 0usize, primitives.len())];

        while let Some((slot, start, end)) = pending.pop() {
            let span = &mut primitives[start..end];
            let bbox = span_bounds(span);

            let node = match partition(span, &bbox, config) {
                Partition::Twin => {
                    let leaf = FlatNode::leaf(&bbox, index(start), 1);
                    let left = push(&mut nodes, leaf);
                    let right = push(&mut nodes, leaf);
                    FlatNode::internal(&bbox, left, right)
                }
                Partition::Pair => {
                    let left = FlatNode::leaf(&span[0].bounding_box(), index(start), 1);
                    let right = FlatNode::leaf(&span[1].bounding_box(), index(start + 1), 1);
                    let left = push(&mut nodes, left);
                    let right = push(&mut nodes, right);
                    FlatNode::internal(&bbox, left, right)
                }
                Partition::Leaf => FlatNode::leaf(&bbox, index(start), index(end - start)),
                Partition::Split(mid) => {
                    let mid = start + mid;
                    let left = push(&mut nodes, FlatNode::zeroed());
                    let right = push(&mut nodes, FlatNode::zeroed());
                    pending.push((right as usize, mid, end));
                    pending.push((left as usize, start, mid));
                    FlatNode::internal(&bbox, left, right)
                }
            };
            nodes[slot] = node;
        }

        let bvh = Self { nodes, primitives };
        let stats = bvh.stats();
        debug!(
            "built flat BVH: {} primitives, {} nodes, {} leaves, depth {}",
            stats.primitive_count, stats.node_count, stats.leaf_count, stats.depth
        );
        Ok(bvh)
    }

    /// Nearest hit, also counting the work done.
    pub fn hit_with_stats(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest = None;
        let mut closest_so_far = t_max;
        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(0);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index as usize];
            stats.nodes_visited += 1;
            if !slab_hit(&node.min, &node.max, ray, t_min, closest_so_far) {
                continue;
            }

            if node.is_leaf() {
                let first = node.first as usize;
                let last = first + node.count as usize;
                for primitive in &self.primitives[first..last] {
                    stats.primitives_tested += 1;
                    if let Some(hit) = primitive.hit(ray, t_min, closest_so_far) {
                        closest_so_far = hit.t;
                        closest = Some(hit);
                    }
                }
            } else {
                // Left is popped first.
                stack.push(node.right);
                stack.push(node.left);
            }
        }

        closest
    }
}

impl<P: Hittable> Hittable for FlatBvh<P> {
    fn bounding_box(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, FlatNode::aabb)
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut stats = TraversalStats::default();
        self.hit_with_stats(ray, t_min, t_max, &mut stats)
    }
}

/// Narrow a node or primitive index. Builds reject tables above
/// [`MAX_PRIMITIVES`](super::MAX_PRIMITIVES), which keeps every index below [`FlatNode::NONE`].
fn index(i: usize) -> u32 {
    debug_assert!(i < FlatNode::NONE as usize);
    i as u32
}

fn push(nodes: &mut Vec<FlatNode>, node: FlatNode) -> u32 {
    let at = index(nodes.len());
    nodes.push(node);
    at
}

/// Append `node` and its subtree in preorder, returning its index.
fn flatten_node(node: &BvhNode, nodes: &mut Vec<FlatNode>) -> u32 {
    match node {
        BvhNode::Leaf { aabb, first, count } => {
            push(nodes, FlatNode::leaf(aabb, index(*first), index(*count)))
        }
        BvhNode::Internal { aabb, left, right } => {
            // Reserve space for this node
            let index = push(nodes, FlatNode::internal(aabb, FlatNode::NONE, FlatNode::NONE));

            let left = flatten_node(left, nodes);
            let right = flatten_node(right, nodes);

            let slot = &mut nodes[index as usize];
            slot.left = left;
            slot.right = right;
            index
        }
    }
}
