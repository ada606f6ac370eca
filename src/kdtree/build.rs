use num_traits::One;

use crate::aabb::{Aabb, BoxBounds, BoxBoundsMut};
use crate::points::PointSet;
use crate::scalar::Scalar;
use crate::util::max_nodes_from_points;

/// A node of the k-d tree arena. Children are arena indices, leaves cover a
/// half-open range of the permuted point indices.
#[derive(Debug, Clone)]
pub(crate) enum KdNode<N> {
    Leaf {
        start: u32,
        end: u32,
    },
    Branch {
        axis: usize,
        value: N,
        left: u32,
        right: u32,
    },
}

/// Accumulates the node arena, the in-place partitioned index permutation and
/// the packed per-node box buffer during recursive construction.
pub(crate) struct KdTreeBuilder<'a, P: PointSet> {
    pub(crate) points: &'a P,
    pub(crate) max_leaf_size: usize,
    pub(crate) indices: Vec<u32>,
    pub(crate) nodes: Vec<KdNode<P::Scalar>>,
    pub(crate) boxes: Vec<P::Scalar>,
}

impl<'a, P: PointSet> KdTreeBuilder<'a, P> {
    pub(crate) fn new(points: &'a P, max_leaf_size: usize) -> Self {
        let num_points = points.len();
        let capacity = max_nodes_from_points(num_points, max_leaf_size);
        Self {
            points,
            max_leaf_size,
            indices: (0..num_points as u32).collect(),
            nodes: Vec::with_capacity(capacity),
            boxes: Vec::with_capacity(capacity * 2 * points.dim()),
        }
    }

    /// Runs the recursive build, starting from the tight box over all points.
    pub(crate) fn build(mut self) -> Self {
        let mut root_bounds = Aabb::empty(self.points.dim_policy());
        for i in 0..self.points.len() {
            root_bounds.update_point(self.points.point(i));
        }
        self.split_node(0, self.points.len(), root_bounds);
        self
    }

    /// Creates the node for `indices[start..end]` bounded by `bounds` and
    /// returns its arena index, recursing when the range is too large for a
    /// leaf.
    fn split_node(
        &mut self,
        start: usize,
        end: usize,
        bounds: Aabb<P::Scalar, P::Dim>,
    ) -> u32 {
        let node_id = self.nodes.len() as u32;
        // Reserve the slot up front so child allocations cannot steal the id;
        // branches overwrite it once both children exist.
        self.nodes.push(KdNode::Leaf {
            start: start as u32,
            end: end as u32,
        });
        self.boxes.extend_from_slice(bounds.min());
        self.boxes.extend_from_slice(bounds.max());

        if end - start <= self.max_leaf_size {
            return node_id;
        }

        let points = self.points;
        let (axis, _) = bounds.longest_axis();
        let two = P::Scalar::one() + P::Scalar::one();
        let mut value = (bounds.min()[axis] + bounds.max()[axis]) / two;

        // Single linear pass; the permutation is partitioned in place, never
        // sorted.
        let mut split = partition_in_place(&mut self.indices[start..end], |id| {
            points.point(id as usize)[axis] < value
        });

        // Sliding midpoint: when one side comes out empty, move the split to
        // the extreme coordinate on that side so both children hold at least
        // one point. This makes progress even on fully duplicated ranges.
        if split == 0 {
            let min_at = extreme_by(&self.indices[start..end], |id| points.point(id as usize)[axis], false);
            self.indices[start..end].swap(0, min_at);
            value = points.point(self.indices[start] as usize)[axis];
            split = 1;
        } else if split == end - start {
            let len = end - start;
            let max_at = extreme_by(&self.indices[start..end], |id| points.point(id as usize)[axis], true);
            self.indices[start..end].swap(max_at, len - 1);
            value = points.point(self.indices[end - 1] as usize)[axis];
            split = len - 1;
        }

        let mut left_bounds = bounds.clone();
        left_bounds.max_mut()[axis] = value;
        let mut right_bounds = bounds;
        right_bounds.min_mut()[axis] = value;

        let mid = start + split;
        let left = self.split_node(start, mid, left_bounds);
        let right = self.split_node(mid, end, right_bounds);
        self.nodes[node_id as usize] = KdNode::Branch {
            axis,
            value,
            left,
            right,
        };
        node_id
    }
}

/// Reorders `ids` so every element satisfying `pred` precedes every element
/// that does not, returning the boundary position. One linear pass.
fn partition_in_place<F: Fn(u32) -> bool>(ids: &mut [u32], pred: F) -> usize {
    let mut left = 0;
    let mut right = ids.len();
    while left < right {
        if pred(ids[left]) {
            left += 1;
        } else {
            right -= 1;
            ids.swap(left, right);
        }
    }
    left
}

/// The position of the minimum (or maximum) keyed element.
fn extreme_by<N: Scalar, F: Fn(u32) -> N>(ids: &[u32], key: F, maximum: bool) -> usize {
    let mut at = 0;
    let mut best = key(ids[0]);
    for (i, &id) in ids.iter().enumerate().skip(1) {
        let k = key(id);
        if (maximum && k > best) || (!maximum && k < best) {
            at = i;
            best = k;
        }
    }
    at
}
