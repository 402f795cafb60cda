//! The capability that items must have in order to be indexed.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

/// The distance between two items of a metric space.
pub type Distance = u32;

/// Items of a discrete metric space.
///
/// Implementors are expected to uphold the usual metric laws, none of which are verified at runtime:
/// - `a.distance(&a) == 0`;
/// - `a.distance(&b) == b.distance(&a)`;
/// - `a.distance(&c) <= a.distance(&b) + b.distance(&c)` (the triangle inequality).
///
/// Breaking them never causes a panic or undefined behavior, but range searches will silently miss some of the items that should have been found.
///
/// # Example
/// ```rust
/// use burkhard::{Metric, Distance};
///
/// // Hamming distance between bytes.
/// #[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// struct Bits(u8);
/// impl Metric for Bits {
///     fn distance(&self, other: &Self) -> Distance {
///         (self.0 ^ other.0).count_ones()
///     }
/// }
///
/// assert_eq!(Bits(0b1010).distance(&Bits(0b0110)), 2);
/// ```
pub trait Metric {
    /// Returns the distance from `self` to `other`.
    fn distance(&self, other: &Self) -> Distance;
}

impl<T: Metric + ?Sized> Metric for &T {
    #[inline(always)]
    fn distance(&self, other: &Self) -> Distance {
        (**self).distance(*other)
    }
}
#[cfg(feature = "alloc")]
impl<T: Metric + ?Sized> Metric for Box<T> {
    #[inline(always)]
    fn distance(&self, other: &Self) -> Distance {
        (**self).distance(&**other)
    }
}
