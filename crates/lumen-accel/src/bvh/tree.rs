//! Pointer-based BVH with recursive traversal.

use log::debug;

use super::{check_primitive_count, partition, span_bounds, BvhStats, FlatBvh, Partition, TraversalStats};
use crate::aabb::Aabb;
use crate::config::BvhConfig;
use crate::error::{AccelError, Result};
use crate::hittable::{HitRecord, Hittable};
use crate::Ray;

/// A BVH node - either a leaf over a run of primitives or an internal node with children.
#[derive(Debug, Clone, PartialEq)]
pub enum BvhNode {
    /// Leaf node referencing `primitives[first..first + count]`.
    Leaf {
        /// Union of the primitives' boxes.
        aabb: Aabb,
        /// Index of the first primitive.
        first: usize,
        /// Number of primitives.
        count: usize,
    },
    /// Internal node with two children.
    Internal {
        /// Union of the children's boxes.
        aabb: Aabb,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Bounding box of this node.
    pub fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { aabb, .. } | BvhNode::Internal { aabb, .. } => aabb,
        }
    }

    fn leaf(aabb: Aabb, first: usize, count: usize) -> Self {
        BvhNode::Leaf { aabb, first, count }
    }

    fn internal(left: BvhNode, right: BvhNode) -> Self {
        BvhNode::Internal {
            aabb: Aabb::union(left.aabb(), right.aabb()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Bounding volume hierarchy over an owned primitive table.
#[derive(Debug, Clone)]
pub struct Bvh<P> {
    root: BvhNode,
    primitives: Vec<P>,
}

impl<P: Hittable> Bvh<P> {
    /// Build with one primitive per leaf.
    pub fn build(primitives: Vec<P>) -> Result<Self> {
        Self::build_with(primitives, &BvhConfig::default())
    }

    /// Build with the leaf layout of `config`. The backend setting is ignored.
    pub fn build_with(primitives: Vec<P>, config: &BvhConfig) -> Result<Self> {
        check_primitive_count(primitives.len())?;
        config.validate()?;

        let mut primitives = primitives;
        let len = primitives.len();
        let root = build_node(&mut primitives, 0, len, config);
        let bvh = Self { root, primitives };

        let stats = bvh.stats();
        debug!(
            "built BVH: {} primitives, {} nodes, {} leaves, depth {}",
            stats.primitive_count, stats.node_count, stats.leaf_count, stats.depth
        );
        Ok(bvh)
    }

    /// Build over `primitives[start..end]` only. Primitives outside the span are dropped.
    pub fn build_span(
        mut primitives: Vec<P>,
        start: usize,
        end: usize,
        config: &BvhConfig,
    ) -> Result<Self> {
        let len = primitives.len();
        if start >= end || end > len {
            return Err(AccelError::InvalidSpan { start, end, len });
        }
        primitives.truncate(end);
        primitives.drain(..start);
        Self::build_with(primitives, config)
    }

    /// Nearest hit, also counting the work done.
    pub fn hit_with_stats(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord> {
        self.hit_node(&self.root, ray, t_min, t_max, stats)
    }

    fn hit_node(
        &self,
        node: &BvhNode,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord> {
        stats.nodes_visited += 1;
        if !node.aabb().hit(ray, t_min, t_max) {
            return None;
        }

        match node {
            BvhNode::Leaf { first, count, .. } => {
                let mut closest = None;
                let mut closest_so_far = t_max;
                for primitive in &self.primitives[*first..*first + *count] {
                    stats.primitives_tested += 1;
                    if let Some(hit) = primitive.hit(ray, t_min, closest_so_far) {
                        closest_so_far = hit.t;
                        closest = Some(hit);
                    }
                }
                closest
            }
            BvhNode::Internal { left, right, .. } => {
                let hit_left = self.hit_node(left, ray, t_min, t_max, stats);
                let narrowed = hit_left.as_ref().map_or(t_max, |h| h.t);
                let hit_right = self.hit_node(right, ray, t_min, narrowed, stats);
                hit_right.or(hit_left)
            }
        }
    }
}

impl<P> Bvh<P> {
    /// Root node.
    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// Primitive table in build order.
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    /// Node and leaf counts and depth.
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            primitive_count: self.primitives.len(),
            ..Default::default()
        };
        let mut stack = vec![(&self.root, 1)];
        while let Some((node, depth)) = stack.pop() {
            stats.node_count += 1;
            stats.depth = stats.depth.max(depth);
            match node {
                BvhNode::Leaf { .. } => stats.leaf_count += 1,
                BvhNode::Internal { left, right, .. } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }
        stats
    }

    /// Convert to the array form, consuming the tree.
    pub fn into_flat(self) -> FlatBvh<P> {
        FlatBvh::from_tree(&self.root, self.primitives)
    }
}

impl<P: Clone> Bvh<P> {
    /// Flatten into the array form for iterative traversal.
    pub fn flatten(&self) -> FlatBvh<P> {
        FlatBvh::from_tree(&self.root, self.primitives.clone())
    }
}

impl<P: Hittable> Hittable for Bvh<P> {
    fn bounding_box(&self) -> Aabb {
        *self.root.aabb()
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut stats = TraversalStats::default();
        self.hit_node(&self.root, ray, t_min, t_max, &mut stats)
    }
}

/// Build the subtree over `primitives[start..end]`.
fn build_node<P: Hittable>(
    primitives: &mut [P],
    start: usize,
    end: usize,
    config: &BvhConfig,
) -> BvhNode {
    let span = &mut primitives[start..end];
    let bbox = span_bounds(span);

    match partition(span, &bbox, config) {
        Partition::Twin => BvhNode::Internal {
            aabb: bbox,
            left: Box::new(BvhNode::leaf(bbox, start, 1)),
            right: Box::new(BvhNode::leaf(bbox, start, 1)),
        },
        Partition::Pair => BvhNode::internal(
            BvhNode::leaf(span[0].bounding_box(), start, 1),
            BvhNode::leaf(span[1].bounding_box(), start + 1, 1),
        ),
        Partition::Leaf => BvhNode::leaf(bbox, start, end - start),
        Partition::Split(mid) => {
            let mid = start + mid;
            let left = build_node(primitives, start, mid, config);
            let right = build_node(primitives, mid, end, config);
            BvhNode::internal(left, right)
        }
    }
}
