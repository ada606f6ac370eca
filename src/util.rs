/// The maximum number of leaves of a tree over `num_points` points whose
/// leaves hold at most `max_leaf_size` points.
///
/// Each doubling of the leaf size removes one level from the tree, halving
/// the leaf count. Rounding up means the last leaf may be partially occupied.
pub(crate) fn max_leaves_from_points(num_points: usize, max_leaf_size: usize) -> usize {
    let levels_removed = (max_leaf_size as f64).log2().floor();
    (num_points as f64 / 2f64.powf(levels_removed)).ceil() as usize
}

/// The maximum number of nodes, internal and leaf, of the same tree. Used to
/// size the node arena ahead of construction.
pub(crate) fn max_nodes_from_points(num_points: usize, max_leaf_size: usize) -> usize {
    max_leaves_from_points(num_points, max_leaf_size) * 2 - 1
}
