//! Axis-aligned bounding boxes, owned or viewed over external storage.

use crate::dim::DimPolicy;
use crate::scalar::Scalar;

/// Read access to an axis-aligned box plus the operations derived from it.
pub trait BoxBounds<N: Scalar> {
    /// The minimum corner coordinates.
    fn min(&self) -> &[N];

    /// The maximum corner coordinates.
    fn max(&self) -> &[N];

    /// The spatial dimension of the box.
    #[inline]
    fn dim(&self) -> usize {
        self.min().len()
    }

    /// Checks if `point` is contained. A point on the edge is considered
    /// inside the box.
    fn contains_point(&self, point: &[N]) -> bool {
        self.min()
            .iter()
            .zip(self.max())
            .zip(point)
            .all(|((lo, hi), x)| *lo <= *x && *x <= *hi)
    }

    /// Checks if `other` is fully contained, edges included.
    fn contains_box(&self, other: &impl BoxBounds<N>) -> bool {
        self.contains_point(other.min()) && self.contains_point(other.max())
    }

    /// The axis with the largest extent and that extent. The first axis wins
    /// ties.
    fn longest_axis(&self) -> (usize, N) {
        let mut axis = 0;
        let mut extent = N::min_value();
        for (i, (lo, hi)) in self.min().iter().zip(self.max()).enumerate() {
            let delta = *hi - *lo;
            if delta > extent {
                axis = i;
                extent = delta;
            }
        }
        (axis, extent)
    }
}

/// Write access to an axis-aligned box.
pub trait BoxBoundsMut<N: Scalar>: BoxBounds<N> {
    /// The mutable minimum corner coordinates.
    fn min_mut(&mut self) -> &mut [N];

    /// The mutable maximum corner coordinates.
    fn max_mut(&mut self) -> &mut [N];

    /// Resets to the empty-box sentinel: min at the scalar maximum, max at
    /// the scalar lowest. Folding [`update_point`][Self::update_point] over a
    /// point range from this seed yields the tight bounding box of the range.
    fn fill_inverse_max(&mut self) {
        for lo in self.min_mut() {
            *lo = N::max_value();
        }
        for hi in self.max_mut() {
            *hi = N::min_value();
        }
    }

    /// Expands the box to contain `point`. Never shrinks it.
    fn update_point(&mut self, point: &[N]) {
        for (lo, x) in self.min_mut().iter_mut().zip(point) {
            if *x < *lo {
                *lo = *x;
            }
        }
        for (hi, x) in self.max_mut().iter_mut().zip(point) {
            if *x > *hi {
                *hi = *x;
            }
        }
    }

    /// Expands the box to the axis-wise union with `other`.
    fn update_box(&mut self, other: &impl BoxBounds<N>) {
        for (lo, x) in self.min_mut().iter_mut().zip(other.min()) {
            if *x < *lo {
                *lo = *x;
            }
        }
        for (hi, x) in self.max_mut().iter_mut().zip(other.max()) {
            if *x > *hi {
                *hi = *x;
            }
        }
    }
}

/// An axis-aligned box owning its corner storage.
#[derive(Debug, Clone)]
pub struct Aabb<N: Scalar, P: DimPolicy> {
    min: P::Buffer<N>,
    max: P::Buffer<N>,
}

impl<N: Scalar, P: DimPolicy> Aabb<N, P> {
    /// The empty box: every axis starts at the inverted sentinel, so any
    /// update produces a valid box.
    pub fn empty(policy: P) -> Self {
        let mut bounds = Self {
            min: policy.buffer(),
            max: policy.buffer(),
        };
        bounds.fill_inverse_max();
        bounds
    }
}

impl<N: Scalar, P: DimPolicy> BoxBounds<N> for Aabb<N, P> {
    #[inline]
    fn min(&self) -> &[N] {
        self.min.as_ref()
    }

    #[inline]
    fn max(&self) -> &[N] {
        self.max.as_ref()
    }
}

impl<N: Scalar, P: DimPolicy> BoxBoundsMut<N> for Aabb<N, P> {
    #[inline]
    fn min_mut(&mut self) -> &mut [N] {
        self.min.as_mut()
    }

    #[inline]
    fn max_mut(&mut self) -> &mut [N] {
        self.max.as_mut()
    }
}

/// A non-owning box over corner slices stored elsewhere, e.g. inside a packed
/// per-node buffer.
#[derive(Debug, Clone, Copy)]
pub struct AabbView<'a, N: Scalar> {
    min: &'a [N],
    max: &'a [N],
}

impl<'a, N: Scalar> AabbView<'a, N> {
    /// Views `min` and `max` as a box. Both slices must have equal length.
    pub fn new(min: &'a [N], max: &'a [N]) -> Self {
        debug_assert_eq!(min.len(), max.len());
        Self { min, max }
    }
}

impl<N: Scalar> BoxBounds<N> for AabbView<'_, N> {
    #[inline]
    fn min(&self) -> &[N] {
        self.min
    }

    #[inline]
    fn max(&self) -> &[N] {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::{Dynamic, Fixed};

    #[test]
    fn update_computes_tight_bounds() {
        let mut bounds = Aabb::<f64, Fixed<2>>::empty(Fixed);
        for p in [[2.0, -1.0], [0.5, 3.0], [1.0, 0.0]] {
            bounds.update_point(&p);
        }
        assert_eq!(bounds.min(), &[0.5, -1.0]);
        assert_eq!(bounds.max(), &[2.0, 3.0]);
    }

    #[test]
    fn update_never_shrinks() {
        let mut bounds = Aabb::<f64, Fixed<2>>::empty(Fixed);
        bounds.update_point(&[-1.0, -1.0]);
        bounds.update_point(&[1.0, 1.0]);
        bounds.update_point(&[0.0, 0.0]);
        assert_eq!(bounds.min(), &[-1.0, -1.0]);
        assert_eq!(bounds.max(), &[1.0, 1.0]);
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let mut bounds = Aabb::<i32, Dynamic>::empty(Dynamic::new(2));
        bounds.update_point(&[0, 0]);
        bounds.update_point(&[4, 2]);
        assert!(bounds.contains_point(&[0, 2]));
        assert!(bounds.contains_point(&[4, 0]));
        assert!(bounds.contains_point(&[2, 1]));
        assert!(!bounds.contains_point(&[5, 1]));
        assert!(!bounds.contains_point(&[2, -1]));
    }

    #[test]
    fn contains_box_checks_both_corners() {
        let mut outer = Aabb::<f64, Fixed<2>>::empty(Fixed);
        outer.update_point(&[0.0, 0.0]);
        outer.update_point(&[4.0, 4.0]);

        let mut inner = Aabb::<f64, Fixed<2>>::empty(Fixed);
        inner.update_point(&[1.0, 1.0]);
        inner.update_point(&[3.0, 3.0]);
        assert!(outer.contains_box(&inner));
        assert!(!inner.contains_box(&outer));

        inner.update_point(&[5.0, 3.0]);
        assert!(!outer.contains_box(&inner));
    }

    #[test]
    fn union_covers_both_boxes() {
        let mut a = Aabb::<f64, Fixed<2>>::empty(Fixed);
        a.update_point(&[0.0, 0.0]);
        let mut b = Aabb::<f64, Fixed<2>>::empty(Fixed);
        b.update_point(&[-2.0, 3.0]);
        a.update_box(&b);
        assert_eq!(a.min(), &[-2.0, 0.0]);
        assert_eq!(a.max(), &[0.0, 3.0]);
    }

    #[test]
    fn longest_axis_prefers_first_on_ties() {
        let min = [0.0, 0.0, 0.0];
        let max = [2.0, 2.0, 1.0];
        let view = AabbView::new(&min, &max);
        assert_eq!(view.longest_axis(), (0, 2.0));
    }
}
