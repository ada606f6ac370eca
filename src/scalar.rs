use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast};

/// A trait for types that can be used as point coordinates.
///
/// Implemented for every primitive numeric type through the blanket impl; the
/// k-d tree works with any of them, while the cover tree additionally needs
/// [`num_traits::Float`] for its per-level cover radii.
///
/// Coordinates must not be NaN: comparisons against NaN silently discard
/// candidates instead of panicking.
pub trait Scalar:
    Num + NumCast + Bounded + PartialOrd + Copy + Default + Debug + Send + Sync + 'static
{
    /// The absolute difference of two coordinates.
    ///
    /// Stays within the type's domain for unsigned scalars, where `a - b`
    /// would wrap.
    #[inline]
    fn abs_diff(self, other: Self) -> Self {
        if self > other {
            self - other
        } else {
            other - self
        }
    }
}

impl<T> Scalar for T where
    T: Num + NumCast + Bounded + PartialOrd + Copy + Default + Debug + Send + Sync + 'static
{
}
