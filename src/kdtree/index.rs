use num_traits::Zero;
use tinyvec::TinyVec;

use crate::aabb::AabbView;
use crate::error::{PointIndexError, Result};
use crate::kdtree::build::{KdNode, KdTreeBuilder};
use crate::metric::{Metric, SquaredEuclidean};
use crate::neighbor::{Neighbor, NeighborQueue};
use crate::points::PointSet;

/// An immutable k-d tree over a [`PointSet`].
///
/// Built once with [`build`][KdTree::build], queried any number of times;
/// queries never mutate the tree, so a built tree can be shared freely across
/// threads. The node arena, the partitioned index permutation and the packed
/// per-node boxes are allocated up front and released together when the tree
/// is dropped.
///
/// The metric defaults to [`SquaredEuclidean`]; distances in results and the
/// radius passed to [`search_radius`][KdTree::search_radius] are in that
/// metric's units.
#[derive(Debug, Clone)]
pub struct KdTree<P: PointSet, M: Metric<P::Scalar> = SquaredEuclidean> {
    pub(crate) points: P,
    pub(crate) indices: Vec<u32>,
    pub(crate) nodes: Vec<KdNode<P::Scalar>>,
    /// Per-node min/max corners, `2 * dim` scalars each, viewed through
    /// [`AabbView`].
    pub(crate) boxes: Vec<P::Scalar>,
    pub(crate) max_leaf_size: usize,
    metric: M,
}

impl<P: PointSet, M: Metric<P::Scalar>> KdTree<P, M> {
    /// Builds a tree over `points` with leaves holding at most
    /// `max_leaf_size` points.
    ///
    /// Fails on an empty point set or a zero leaf size; a failed build never
    /// produces a partially constructed tree.
    pub fn build(points: P, max_leaf_size: usize) -> Result<Self> {
        if max_leaf_size < 1 {
            return Err(PointIndexError::InvalidLeafSize(max_leaf_size));
        }
        if points.is_empty() {
            return Err(PointIndexError::EmptyPointSet);
        }
        assert!(points.len() <= u32::MAX as usize);

        let builder = KdTreeBuilder::new(&points, max_leaf_size).build();
        let KdTreeBuilder {
            indices,
            nodes,
            boxes,
            ..
        } = builder;
        Ok(Self {
            points,
            indices,
            nodes,
            boxes,
            max_leaf_size,
            metric: M::default(),
        })
    }

    /// The point set the tree was built over.
    pub fn points(&self) -> &P {
        &self.points
    }

    /// The number of indexed points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The configured maximum leaf size.
    pub fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    /// The `k` points nearest to `query`, ordered by ascending distance.
    ///
    /// Returns `min(k, len)` neighbors; `k = 0` yields an empty result.
    pub fn search_knn(&self, query: &[P::Scalar], k: usize) -> Vec<Neighbor<P::Scalar>> {
        if k == 0 {
            return Vec::new();
        }
        let mut queue = NeighborQueue::new(k.min(self.points.len()));
        self.search_queue(query, &mut queue);
        queue.into_sorted_vec()
    }

    /// The single point nearest to `query`.
    pub fn search_nearest(&self, query: &[P::Scalar]) -> Option<Neighbor<P::Scalar>> {
        self.search_knn(query, 1).into_iter().next()
    }

    /// Every point within `radius` of `query`, boundary included, in no
    /// particular order.
    ///
    /// The radius is in metric units: a squared radius under
    /// [`SquaredEuclidean`]. A negative radius yields an empty result.
    pub fn search_radius(&self, query: &[P::Scalar], radius: P::Scalar) -> Vec<Neighbor<P::Scalar>> {
        let mut results = Vec::new();
        if radius < P::Scalar::zero() {
            return results;
        }
        debug_assert_eq!(query.len(), self.points.dim());

        let mut stack: TinyVec<[u32; 32]> = TinyVec::new();
        stack.push(0);
        while let Some(node) = stack.pop() {
            match &self.nodes[node as usize] {
                KdNode::Leaf { start, end } => {
                    for &id in &self.indices[*start as usize..*end as usize] {
                        let distance = self.metric.distance(query, self.points.point(id as usize));
                        if distance <= radius {
                            results.push(Neighbor {
                                index: id,
                                distance,
                            });
                        }
                    }
                }
                KdNode::Branch { left, right, .. } => {
                    for child in [*left, *right] {
                        if self.metric.distance_to_box(query, &self.node_box(child)) <= radius {
                            stack.push(child);
                        }
                    }
                }
            }
        }
        results
    }

    /// Runs the k nearest neighbor searches for all of `queries` in parallel.
    #[cfg(feature = "rayon")]
    pub fn search_knn_batch<Q>(&self, queries: &Q, k: usize) -> Vec<Vec<Neighbor<P::Scalar>>>
    where
        Q: PointSet<Scalar = P::Scalar> + Sync,
        P: Sync,
        M: Sync,
    {
        use rayon::prelude::*;

        (0..queries.len())
            .into_par_iter()
            .map(|i| self.search_knn(queries.point(i), k))
            .collect()
    }

    /// Best-first descent: the child nearer to the query is visited first and
    /// the other child is skipped whenever the lower-bound distance to its
    /// box cannot beat the worst retained candidate.
    fn search_queue(&self, query: &[P::Scalar], queue: &mut NeighborQueue<P::Scalar>) {
        debug_assert_eq!(query.len(), self.points.dim());

        let mut stack: TinyVec<[(u32, P::Scalar); 32]> = TinyVec::new();
        stack.push((0, P::Scalar::zero()));
        while let Some((node, lower_bound)) = stack.pop() {
            if queue.is_full() && lower_bound > queue.worst_distance() {
                continue;
            }
            match &self.nodes[node as usize] {
                KdNode::Leaf { start, end } => {
                    for &id in &self.indices[*start as usize..*end as usize] {
                        let distance = self.metric.distance(query, self.points.point(id as usize));
                        queue.push(Neighbor {
                            index: id,
                            distance,
                        });
                    }
                }
                KdNode::Branch {
                    axis,
                    value,
                    left,
                    right,
                } => {
                    let (near, far) = if query[*axis] < *value {
                        (*left, *right)
                    } else {
                        (*right, *left)
                    };
                    let far_bound = self.metric.distance_to_box(query, &self.node_box(far));
                    if !queue.is_full() || far_bound <= queue.worst_distance() {
                        stack.push((far, far_bound));
                    }
                    stack.push((near, lower_bound));
                }
            }
        }
    }

    /// The stored bounding box of a node, viewed inside the packed buffer.
    pub(crate) fn node_box(&self, node: u32) -> AabbView<'_, P::Scalar> {
        let dim = self.points.dim();
        let offset = node as usize * 2 * dim;
        AabbView::new(
            &self.boxes[offset..offset + dim],
            &self.boxes[offset + dim..offset + 2 * dim],
        )
    }
}
