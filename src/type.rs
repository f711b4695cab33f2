use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast, ToPrimitive};

use crate::rtree::distance::DistanceMetric;

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Distances are always
/// evaluated in `f64`, so every implementor must convert to `f64` without failing.
pub trait IndexableNum:
    private::Sealed
    + Num
    + NumCast
    + ToPrimitive
    + PartialOrd
    + Debug
    + Copy
    + Send
    + Sync
    + Bounded
{
    /// The number of bytes per element
    const BYTES_PER_ELEMENT: usize;

    /// Widen this coordinate to `f64`.
    fn as_f64(self) -> f64;
}

impl IndexableNum for i32 {
    const BYTES_PER_ELEMENT: usize = 4;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl IndexableNum for u32 {
    const BYTES_PER_ELEMENT: usize = 4;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl IndexableNum for i64 {
    const BYTES_PER_ELEMENT: usize = 8;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl IndexableNum for f32 {
    const BYTES_PER_ELEMENT: usize = 4;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl IndexableNum for f64 {
    const BYTES_PER_ELEMENT: usize = 8;

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

/// A value that can be stored in a [`Forest`][crate::forest::Forest].
///
/// The value is copied into the subtree that owns it and copied out again by queries, so it
/// should be small and cheap to clone.
pub trait Indexable: Clone + Send + Sync {
    /// The coordinate type of this value's position.
    type Coord: IndexableNum;

    /// The metric used to rank this value against a query point.
    type Metric: DistanceMetric<Self::Coord> + Send + Sync;

    /// The x (longitude) coordinate.
    fn x(&self) -> Self::Coord;

    /// The y (latitude) coordinate.
    fn y(&self) -> Self::Coord;

    /// The metric nearest-neighbor queries use unless another one is given.
    fn metric() -> Self::Metric;
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
