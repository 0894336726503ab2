// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry kernel: bounding boxes and the scalar abstraction behind them.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Boxes are plain values: they are combined with [`BoundingBox::union`] rather than
/// mutated in place. Zero-area boxes (points and segments) are valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> BoundingBox<T> {
    /// Create a new box from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy> BoundingBox<T> {
    /// Create a degenerate box covering a single point.
    pub const fn point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }
}

impl<T: Scalar> BoundingBox<T> {
    /// The smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// Area in the scalar's widened accumulator. Inverted boxes have zero area.
    ///
    /// Extents are taken in `T` first, so for `i64` an extent wider than
    /// `i64::MAX` saturates there. That bounds every area below `2^126`, and the
    /// sum of two areas compared by the split step fits in `i128`.
    #[inline]
    pub fn area(&self) -> T::Acc {
        let w = T::max_zero(T::sub(self.max_x, self.min_x));
        let h = T::max_zero(T::sub(self.max_y, self.min_y));
        T::widen(w) * T::widen(h)
    }

    /// How much area `self` must gain to also cover `additional`.
    #[inline]
    pub fn enlargement(&self, additional: &Self) -> T::Acc {
        self.union(additional).area() - self.area()
    }

    /// Whether the boxes intersect. Touching edges and corners count.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// Whether `min <= max` holds on both axes. False if any coordinate is NaN.
    pub fn is_valid(&self) -> bool {
        le(self.min_x, self.max_x) && le(self.min_y, self.max_y)
    }

    /// Midpoint along x.
    pub fn center_x(&self) -> T {
        T::mid(self.min_x, self.max_x)
    }

    /// Midpoint along y.
    pub fn center_y(&self) -> T {
        T::mid(self.min_y, self.max_y)
    }

    /// `min_x + max_x` in the accumulator: twice the centre, without rounding.
    pub(crate) fn center_key_x(&self) -> T::Acc {
        T::widen(self.min_x) + T::widen(self.max_x)
    }

    /// `min_y + max_y` in the accumulator: twice the centre, without rounding.
    pub(crate) fn center_key_y(&self) -> T::Acc {
        T::widen(self.min_y) + T::widen(self.max_y)
    }

    /// Extent along x, clamped to zero.
    pub fn width(&self) -> T {
        T::max_zero(T::sub(self.max_x, self.min_x))
    }

    /// Extent along y, clamped to zero.
    pub fn height(&self) -> T {
        T::max_zero(T::sub(self.max_y, self.min_y))
    }
}

impl BoundingBox<f32> {
    /// Create a box from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl BoundingBox<f64> {
    /// Create a box from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl BoundingBox<i64> {
    /// Create a box from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for BoundingBox<f64> {
    fn from(rect: kurbo::Rect) -> Self {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(feature = "kurbo")]
impl From<BoundingBox<f64>> for kurbo::Rect {
    fn from(b: BoundingBox<f64>) -> Self {
        Self::new(b.min_x, b.min_y, b.max_x, b.max_y)
    }
}

/// Numeric scalar abstraction for bounding box coordinates.
///
/// Areas and enlargements are computed in a widened accumulator type
/// (f32→f64, i64→i128) so that cost comparisons do not overflow for large
/// coordinates. Extents themselves stay in the scalar type; see
/// [`BoundingBox::area`].
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Subtract two scalar values: a - b. Integer scalars saturate.
    fn sub(a: Self, b: Self) -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b (used for centre ordering).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

/// Ordering for sort keys that may be NaN; incomparable values compare equal.
pub(crate) fn cmp_t<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
