use std::cmp::Ordering;

use num_traits::{Float, Zero};

use crate::covertree::index::{CoverNode, CoverTree};
use crate::metric::Metric;
use crate::points::PointSet;

impl<P, M> CoverTree<P, M>
where
    P: PointSet,
    P::Scalar: Float,
    M: Metric<P::Scalar>,
{
    /// Inserts the point with identifier `id`, preserving the covering and
    /// separation invariants.
    ///
    /// The descent keeps a covering set per level: nodes whose subtree may
    /// still cover the new point. Children discovered along the way wait in a
    /// pending pool until the walk reaches their own level, so a node raised
    /// far above its children (after a root promotion) still releases them at
    /// the right depth. When no candidate at the child level covers the
    /// point, it becomes a child of the nearest covering-set node one level
    /// above.
    pub(crate) fn insert(&mut self, id: u32) {
        if self.nodes.is_empty() {
            self.nodes.push(CoverNode {
                point: id,
                level: 0,
                children: Vec::new(),
            });
            return;
        }

        let d_root = self.distance_to_node(self.root, id);
        if d_root == P::Scalar::zero() {
            self.attach_duplicate(self.root, id);
            return;
        }

        // Promote the root until its cover radius reaches the new point.
        while d_root > self.cover_radius(self.root_level) {
            self.root_level += 1;
        }
        self.nodes[self.root as usize].level = self.root_level;

        // Nodes covering the point at the current level, with distances.
        let mut active: Vec<(u32, P::Scalar)> = vec![(self.root, d_root)];
        // Children of expanded nodes, waiting for the walk to reach their
        // stored level.
        let mut pending: Vec<(u32, P::Scalar)> = Vec::new();
        for &child in &self.nodes[self.root as usize].children {
            pending.push((child, self.distance_to_node(child, id)));
        }

        let mut level = self.root_level;
        loop {
            let child_radius = self.cover_radius(level - 1);
            let mut next: Vec<(u32, P::Scalar)> = Vec::new();
            let mut activated: Vec<u32> = Vec::new();

            for &(node, d) in &active {
                if d <= child_radius {
                    next.push((node, d));
                }
            }
            let mut still_pending = Vec::new();
            for &(node, d) in &pending {
                if self.nodes[node as usize].level == level - 1 {
                    if d <= child_radius {
                        next.push((node, d));
                        activated.push(node);
                    }
                } else {
                    still_pending.push((node, d));
                }
            }
            pending = still_pending;

            if next.is_empty() {
                // Not covered one level down: the point is separated from
                // everything at the child level, so it becomes a child of
                // the nearest covering-set node.
                let (parent, _) = nearest(&active);
                self.attach(parent, id, level - 1);
                return;
            }

            if let Some(&(node, _)) = next.iter().find(|(_, d)| *d == P::Scalar::zero()) {
                self.attach_duplicate(node, id);
                return;
            }

            for node in activated {
                for &child in &self.nodes[node as usize].children {
                    pending.push((child, self.distance_to_node(child, id)));
                }
            }

            active = next;
            level -= 1;
        }
    }

    fn attach(&mut self, parent: u32, point: u32, level: i32) {
        let id = self.nodes.len() as u32;
        self.nodes.push(CoverNode {
            point,
            level,
            children: Vec::new(),
        });
        self.nodes[parent as usize].children.push(id);
    }

    /// Nests an exact duplicate of `node`'s point below the end of the chain
    /// of coincident nodes, so duplicates never share a level as siblings.
    fn attach_duplicate(&mut self, mut node: u32, id: u32) {
        loop {
            let coincident = self.nodes[node as usize]
                .children
                .iter()
                .copied()
                .find(|&c| self.distance_to_node(c, id) == P::Scalar::zero());
            match coincident {
                Some(c) => node = c,
                None => break,
            }
        }
        let level = self.nodes[node as usize].level - 1;
        self.attach(node, id, level);
    }
}

/// The element with the smallest distance. The slice is never empty.
fn nearest<N: PartialOrd + Copy>(candidates: &[(u32, N)]) -> (u32, N) {
    let mut best = candidates[0];
    for &c in &candidates[1..] {
        if matches!(c.1.partial_cmp(&best.1), Some(Ordering::Less)) {
            best = c;
        }
    }
    best
}
