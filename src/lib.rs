#![doc = include_str!("../README.md")]

mod aabb;
pub mod covertree;
mod dim;
mod error;
pub mod kdtree;
mod metric;
mod neighbor;
mod points;
mod scalar;
mod util;

pub use aabb::{Aabb, AabbView, BoxBounds, BoxBoundsMut};
pub use dim::{DimPolicy, Dynamic, Fixed};
pub use error::{PointIndexError, Result};
pub use metric::{Euclidean, Manhattan, Metric, SquaredEuclidean};
pub use neighbor::{Neighbor, NeighborQueue};
pub use points::{FlatPoints, PointSet};
pub use scalar::Scalar;

#[cfg(test)]
pub(crate) mod test;
