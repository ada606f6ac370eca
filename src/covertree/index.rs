use num_traits::{Float, One, ToPrimitive, Zero};

use crate::error::{PointIndexError, Result};
use crate::metric::{Euclidean, Metric};
use crate::neighbor::{Neighbor, NeighborQueue};
use crate::points::PointSet;

/// A node of the cover tree arena: a point, the level it lives at and its
/// children, created at lower levels as points were inserted.
#[derive(Debug, Clone)]
pub(crate) struct CoverNode {
    pub(crate) point: u32,
    pub(crate) level: i32,
    pub(crate) children: Vec<u32>,
}

/// A cover tree over a [`PointSet`].
///
/// Covering invariant: a node's children lie within its level's cover radius
/// `base^level`, putting its whole subtree within the geometric-series reach
/// of the chained radii. Separation invariant: children of one node sharing a
/// level are pairwise farther apart than that level's radius. Queries rely on
/// the triangle inequality to prune subtrees, so the metric must be a true
/// metric; the default is [`Euclidean`]. No coordinate-axis structure is
/// assumed, which makes this tree usable where the k-d tree is not, e.g.
/// under [`Manhattan`] distance or other non-Euclidean metrics.
///
/// Construction appends nodes point by point; once built, the tree is
/// immutable and safe to query concurrently.
///
/// [`Manhattan`]: crate::metric::Manhattan
#[derive(Debug, Clone)]
pub struct CoverTree<P, M = Euclidean>
where
    P: PointSet,
    P::Scalar: Float,
    M: Metric<P::Scalar>,
{
    pub(crate) points: P,
    pub(crate) nodes: Vec<CoverNode>,
    pub(crate) root: u32,
    pub(crate) root_level: i32,
    pub(crate) base: P::Scalar,
    pub(crate) metric: M,
}

impl<P, M> CoverTree<P, M>
where
    P: PointSet,
    P::Scalar: Float,
    M: Metric<P::Scalar>,
{
    /// Builds a tree over `points` with the given base expansion factor.
    ///
    /// The base controls how fast cover radii shrink per level; values
    /// between 1.2 and 2 are typical. Fails on an empty point set or a base
    /// of at most 1; a failed build never produces a partially constructed
    /// tree.
    pub fn build(points: P, base: P::Scalar) -> Result<Self> {
        if base <= P::Scalar::one() {
            return Err(PointIndexError::InvalidBase(
                base.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if points.is_empty() {
            return Err(PointIndexError::EmptyPointSet);
        }
        assert!(points.len() <= u32::MAX as usize);

        let mut tree = Self {
            nodes: Vec::with_capacity(points.len()),
            root: 0,
            root_level: 0,
            base,
            metric: M::default(),
            points,
        };
        for id in 0..tree.points.len() as u32 {
            tree.insert(id);
        }
        Ok(tree)
    }

    /// The point set the tree was built over.
    pub fn points(&self) -> &P {
        &self.points
    }

    /// The number of indexed points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The base expansion factor.
    pub fn base(&self) -> P::Scalar {
        self.base
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
    /// The radius is in metric units. A negative radius yields an empty
    /// result.
    pub fn search_radius(&self, query: &[P::Scalar], radius: P::Scalar) -> Vec<Neighbor<P::Scalar>> {
        let mut results = Vec::new();
        if radius < P::Scalar::zero() {
            return results;
        }
        debug_assert_eq!(query.len(), self.points.dim());

        let root = &self.nodes[self.root as usize];
        let d_root = self.metric.distance(query, self.points.point(root.point as usize));
        if d_root <= radius {
            results.push(Neighbor {
                index: root.point,
                distance: d_root,
            });
        }

        let mut active: Vec<(u32, P::Scalar)> = vec![(self.root, d_root)];
        let mut level = self.root_level;
        while !active.is_empty() {
            let mut next = Vec::new();
            for &(id, d) in &active {
                let node = &self.nodes[id as usize];
                if node.level == level {
                    for &child_id in &node.children {
                        let child = &self.nodes[child_id as usize];
                        let dc = self
                            .metric
                            .distance(query, self.points.point(child.point as usize));
                        if dc <= radius {
                            results.push(Neighbor {
                                index: child.point,
                                distance: dc,
                            });
                        }
                        if dc <= radius + self.subtree_reach(child.level) {
                            next.push((child_id, dc));
                        }
                    }
                } else if d <= radius + self.subtree_reach(node.level) {
                    next.push((id, d));
                }
            }
            active = next;
            level -= 1;
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

    /// Level-synchronous descent from the root's covering set. Every
    /// discovered node's point is offered to the queue; a subtree survives to
    /// the next level only while its node could still hold a candidate closer
    /// than the worst retained distance, i.e. while
    /// `d <= worst + subtree_reach(node_level)`.
    fn search_queue(&self, query: &[P::Scalar], queue: &mut NeighborQueue<P::Scalar>) {
        debug_assert_eq!(query.len(), self.points.dim());

        let root = &self.nodes[self.root as usize];
        let d_root = self.metric.distance(query, self.points.point(root.point as usize));
        queue.push(Neighbor {
            index: root.point,
            distance: d_root,
        });

        let mut active: Vec<(u32, P::Scalar)> = vec![(self.root, d_root)];
        let mut level = self.root_level;
        while !active.is_empty() {
            let mut next = Vec::new();
            for &(id, d) in &active {
                let node = &self.nodes[id as usize];
                if node.level == level {
                    for &child_id in &node.children {
                        let child = &self.nodes[child_id as usize];
                        let dc = self
                            .metric
                            .distance(query, self.points.point(child.point as usize));
                        queue.push(Neighbor {
                            index: child.point,
                            distance: dc,
                        });
                        if dc <= queue.worst_distance() + self.subtree_reach(child.level) {
                            next.push((child_id, dc));
                        }
                    }
                } else if d <= queue.worst_distance() + self.subtree_reach(node.level) {
                    next.push((id, d));
                }
            }
            active = next;
            level -= 1;
        }
    }

    /// The cover radius of a level, `base^level`.
    pub(crate) fn cover_radius(&self, level: i32) -> P::Scalar {
        self.base.powi(level)
    }

    /// An upper bound on the distance from a node at `level` to any point in
    /// its subtree: the geometric series of the chained child radii,
    /// `base^level * base / (base - 1)`.
    pub(crate) fn subtree_reach(&self, level: i32) -> P::Scalar {
        self.cover_radius(level) * self.base / (self.base - P::Scalar::one())
    }

    /// The metric distance between a node's point and the point with
    /// identifier `target`.
    pub(crate) fn distance_to_node(&self, node: u32, target: u32) -> P::Scalar {
        self.metric.distance(
            self.points.point(self.nodes[node as usize].point as usize),
            self.points.point(target as usize),
        )
    }
}
