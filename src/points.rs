//! The point-set contract consumed by the trees, with glue adaptors for
//! common containers.

use crate::dim::{DimPolicy, Dynamic, Fixed};
use crate::error::{PointIndexError, Result};
use crate::scalar::Scalar;

/// An ordered, immutable collection of equal-dimension points.
///
/// A point's position within the set is the identifier reported in search
/// results. Coordinate access must be O(1); storage layout is otherwise up to
/// the implementation. The set must not change for the lifetime of any tree
/// built over it.
pub trait PointSet {
    /// The coordinate scalar type.
    type Scalar: Scalar;

    /// Whether the dimension is a compile-time constant or a run-time value.
    type Dim: DimPolicy;

    /// The dimension policy of this set.
    fn dim_policy(&self) -> Self::Dim;

    /// The number of points.
    fn len(&self) -> usize;

    /// The coordinates of point `index`, `dim()` scalars long.
    fn point(&self, index: usize) -> &[Self::Scalar];

    /// The spatial dimension.
    #[inline]
    fn dim(&self) -> usize {
        self.dim_policy().dim()
    }

    /// Whether the set holds no points.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N: Scalar, const D: usize> PointSet for &[[N; D]] {
    type Scalar = N;
    type Dim = Fixed<D>;

    #[inline]
    fn dim_policy(&self) -> Fixed<D> {
        Fixed
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn point(&self, index: usize) -> &[N] {
        &self[index]
    }
}

impl<N: Scalar, const D: usize> PointSet for Vec<[N; D]> {
    type Scalar = N;
    type Dim = Fixed<D>;

    #[inline]
    fn dim_policy(&self) -> Fixed<D> {
        Fixed
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn point(&self, index: usize) -> &[N] {
        &self[index]
    }
}

/// A row-major packed coordinate buffer with a run-time dimension.
#[derive(Debug, Clone, Copy)]
pub struct FlatPoints<'a, N: Scalar> {
    coords: &'a [N],
    dim: usize,
}

impl<'a, N: Scalar> FlatPoints<'a, N> {
    /// Wraps a packed `len * dim` coordinate slice.
    ///
    /// Fails when `dim` is zero or the buffer length is not a multiple of it.
    pub fn new(coords: &'a [N], dim: usize) -> Result<Self> {
        if dim == 0 || coords.len() % dim != 0 {
            return Err(PointIndexError::DimensionMismatch {
                dim,
                len: coords.len(),
            });
        }
        Ok(Self { coords, dim })
    }
}

impl<N: Scalar> PointSet for FlatPoints<'_, N> {
    type Scalar = N;
    type Dim = Dynamic;

    #[inline]
    fn dim_policy(&self) -> Dynamic {
        Dynamic::new(self.dim)
    }

    #[inline]
    fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    #[inline]
    fn point(&self, index: usize) -> &[N] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_slices_are_point_sets() {
        let points = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let set = &points[..];
        assert_eq!(set.len(), 3);
        assert_eq!(set.dim(), 2);
        assert_eq!(set.point(1), &[3.0, 4.0]);
    }

    #[test]
    fn flat_points_index_rows() {
        let coords = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let set = FlatPoints::new(&coords, 3).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.dim(), 3);
        assert_eq!(set.point(1), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn flat_points_reject_ragged_buffers() {
        let coords = [0.0f64; 7];
        assert_eq!(
            FlatPoints::new(&coords, 3).unwrap_err(),
            PointIndexError::DimensionMismatch { dim: 3, len: 7 }
        );
        assert!(FlatPoints::new(&coords, 0).is_err());
    }
}
