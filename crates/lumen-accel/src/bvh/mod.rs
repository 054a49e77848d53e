//! Bounding volume hierarchies for accelerated ray queries.
//!
//! Two backends share one build rule (longest-axis median split):
//!
//! - [`Bvh`] - pointer tree, traversed recursively
//! - [`FlatBvh`] - index array, traversed with an explicit stack
//!
//! Either backend owns its primitives and reorders them during the build.
//! Leaves reference contiguous runs of that table, so the binary layout's
//! twin leaves share a primitive by index.

mod flat;
mod tree;

pub use flat::{FlatBvh, FlatNode};
pub use tree::{Bvh, BvhNode};

use crate::aabb::Aabb;
use crate::config::{BvhConfig, LeafLayout};
use crate::error::{AccelError, Result};
use crate::hittable::Hittable;

/// Largest primitive table a builder accepts.
///
/// Flat nodes hold `u32` indices with `u32::MAX` reserved, and a binary
/// build can allocate up to four nodes per primitive.
pub const MAX_PRIMITIVES: usize = (u32::MAX / 4) as usize;

/// Reject primitive tables the node format cannot index.
pub(crate) fn check_primitive_count(len: usize) -> Result<()> {
    if len == 0 {
        return Err(AccelError::EmptyPrimitives);
    }
    if len > MAX_PRIMITIVES {
        return Err(AccelError::TooManyPrimitives {
            len,
            max: MAX_PRIMITIVES,
        });
    }
    Ok(())
}

/// Shape of a built hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    /// Internal and leaf nodes.
    pub node_count: usize,
    /// Leaf nodes.
    pub leaf_count: usize,
    /// Levels from the root to the deepest leaf, root included.
    pub depth: usize,
    /// Primitives owned by the hierarchy.
    pub primitive_count: usize,
}

/// Work done by one ray query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose box was tested.
    pub nodes_visited: usize,
    /// Primitives whose exact intersector ran.
    pub primitives_tested: usize,
}

impl std::ops::AddAssign for TraversalStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes_visited += other.nodes_visited;
        self.primitives_tested += other.primitives_tested;
    }
}

/// How a span of primitives becomes a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Partition {
    /// Single primitive in the binary layout: internal node over twin leaves.
    Twin,
    /// Two primitives in the binary layout: one leaf each.
    Pair,
    /// Whole span in one leaf.
    Leaf,
    /// Recurse on `[0, mid)` and `[mid, len)` of the span.
    Split(usize),
}

/// Union of the boxes of every primitive in `span`.
pub(crate) fn span_bounds<P: Hittable>(span: &[P]) -> Aabb {
    span.iter()
        .fold(Aabb::EMPTY, |acc, p| Aabb::union(&acc, &p.bounding_box()))
}

/// Decide how to build `span`, sorting it first when it has to be split.
///
/// `bbox` must be the union box of the span.
pub(crate) fn partition<P: Hittable>(span: &mut [P], bbox: &Aabb, config: &BvhConfig) -> Partition {
    let len = span.len();
    match config.leaf_layout {
        LeafLayout::Binary if len == 1 => return Partition::Twin,
        LeafLayout::Binary if len == 2 => return Partition::Pair,
        LeafLayout::Packed if len <= config.leaf_capacity => return Partition::Leaf,
        _ => {}
    }

    let axis = bbox.longest_axis();
    span.sort_by(|a, b| {
        let a = a.bounding_box().axis_interval(axis).min;
        let b = b.bounding_box().axis_interval(axis).min;
        a.total_cmp(&b)
    });
    Partition::Split(len / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::hittable::MaterialId;
    use crate::primitive::Sphere;
    use lumen_math::Point3;

    fn spheres_along_x(xs: &[f64]) -> Vec<Sphere> {
        xs.iter()
            .map(|&x| Sphere::new(Point3::new(x, 0.0, 0.0), 0.1, MaterialId(x as u32)))
            .collect()
    }

    #[test]
    fn test_partition_small_binary_spans() {
        let config = BvhConfig::default();
        let mut one = spheres_along_x(&[0.0]);
        let b = span_bounds(&one);
        assert_eq!(partition(&mut one, &b, &config), Partition::Twin);

        let mut two = spheres_along_x(&[3.0, 1.0]);
        let b = span_bounds(&two);
        assert_eq!(partition(&mut two, &b, &config), Partition::Pair);
        // Pairs are not reordered.
        assert_eq!(two[0].center.x, 3.0);
    }

    #[test]
    fn test_partition_sorts_by_box_min() {
        let config = BvhConfig::default();
        let mut span = spheres_along_x(&[4.0, 0.0, 3.0, 1.0, 2.0]);
        let b = span_bounds(&span);
        assert_eq!(partition(&mut span, &b, &config), Partition::Split(2));
        let xs: Vec<f64> = span.iter().map(|s| s.center.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_partition_packed_leaf() {
        let config = BvhConfig::packed(Backend::Tree, 4);
        let mut span = spheres_along_x(&[0.0, 1.0, 2.0, 3.0]);
        let b = span_bounds(&span);
        assert_eq!(partition(&mut span, &b, &config), Partition::Leaf);

        let mut span = spheres_along_x(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let b = span_bounds(&span);
        assert_eq!(partition(&mut span, &b, &config), Partition::Split(2));
    }

    #[test]
    fn test_primitive_count_limits() {
        assert!(matches!(
            check_primitive_count(0),
            Err(AccelError::EmptyPrimitives)
        ));
        assert!(check_primitive_count(1).is_ok());
        assert!(check_primitive_count(MAX_PRIMITIVES).is_ok());
        assert!(matches!(
            check_primitive_count(MAX_PRIMITIVES + 1),
            Err(AccelError::TooManyPrimitives { len, .. }) if len == MAX_PRIMITIVES + 1
        ));
        assert!(check_primitive_count(u32::MAX as usize).is_err());
        // The deepest index a maximal binary build can hand out stays below the sentinel.
        assert!(4 * MAX_PRIMITIVES < FlatNode::NONE as usize);
    }

    #[test]
    fn test_span_bounds_empty() {
        let none: [Sphere; 0] = [];
        assert_eq!(span_bounds(&none), Aabb::EMPTY);
    }
}
