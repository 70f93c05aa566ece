//! A ready-made axis-aligned box bound.
//!
//! The hierarchy works with any bound type through [`BoundTraits`]; this module provides the
//! common case of a box with per-axis min/max extents in `D` dimensions.

use std::marker::PhantomData;

use geo_traits::{CoordTrait, RectTrait};

use crate::bvh::{BoundTraits, Boundable};
use crate::r#type::IndexableNum;

/// An axis-aligned box in `D` dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<N: IndexableNum, const D: usize> {
    min: [N; D],
    max: [N; D],
}

impl<N: IndexableNum, const D: usize> Aabb<N, D> {
    /// Create a box from its minimum and maximum corners.
    ///
    /// The corners are normalized per axis, so callers may pass them in any order.
    pub fn new(a: [N; D], b: [N; D]) -> Self {
        let mut min = a;
        let mut max = b;
        for dim in 0..D {
            if max[dim] < min[dim] {
                std::mem::swap(&mut min[dim], &mut max[dim]);
            }
        }
        Self { min, max }
    }

    /// A degenerate box covering a single point.
    pub fn from_point(point: [N; D]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// The minimum corner.
    pub fn min(&self) -> &[N; D] {
        &self.min
    }

    /// The maximum corner.
    pub fn max(&self) -> &[N; D] {
        &self.max
    }

    /// Returns `true` if `other` lies entirely within this box.
    pub fn contains(&self, other: &Self) -> bool {
        (0..D).all(|dim| self.min[dim] <= other.min[dim] && other.max[dim] <= self.max[dim])
    }

    /// Returns `true` if the two boxes share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|dim| self.min[dim] <= other.max[dim] && other.min[dim] <= self.max[dim])
    }

    /// Squared euclidean distance from `point` to the nearest point of this box.
    ///
    /// Zero when the point is inside.
    pub fn distance_squared_to_point(&self, point: &[N; D]) -> f64 {
        let mut dist = 0.0;
        for (dim, value) in point.iter().enumerate() {
            let d = axis_dist(
                value.as_f64(),
                self.min[dim].as_f64(),
                self.max[dim].as_f64(),
            );
            dist += d * d;
        }
        dist
    }
}

impl<N: IndexableNum> Aabb<N, 2> {
    /// Create a 2D box from anything implementing [`RectTrait`].
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Self {
        Self::new(
            [rect.min().x(), rect.min().y()],
            [rect.max().x(), rect.max().y()],
        )
    }
}

impl<N: IndexableNum, const D: usize> Boundable<Aabb<N, D>> for Aabb<N, D> {
    #[inline]
    fn bound(&self) -> Aabb<N, D> {
        *self
    }
}

/// A point in `D` dimensions, stored as an element with a zero-extent bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<N: IndexableNum, const D: usize>(pub [N; D]);

impl<N: IndexableNum, const D: usize> Point<N, D> {
    /// Squared euclidean distance between two points.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| {
                let d = a.as_f64() - b.as_f64();
                d * d
            })
            .sum()
    }
}

impl<N: IndexableNum, const D: usize> Boundable<Aabb<N, D>> for Point<N, D> {
    #[inline]
    fn bound(&self) -> Aabb<N, D> {
        Aabb::from_point(self.0)
    }
}

/// [`BoundTraits`] for [`Aabb`].
pub struct AabbTraits<N: IndexableNum, const D: usize> {
    phantom: PhantomData<N>,
}

impl<N: IndexableNum, const D: usize> AabbTraits<N, D> {
    /// Create the traits object. It carries no state.
    pub const fn new() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<N: IndexableNum, const D: usize> Default for AabbTraits<N, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: IndexableNum, const D: usize> Clone for AabbTraits<N, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: IndexableNum, const D: usize> Copy for AabbTraits<N, D> {}

impl<N: IndexableNum, const D: usize> std::fmt::Debug for AabbTraits<N, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AabbTraits").field("dimensions", &D).finish()
    }
}

impl<N: IndexableNum, const D: usize> BoundTraits for AabbTraits<N, D> {
    type Bound = Aabb<N, D>;
    type Num = N;

    #[inline]
    fn interval_range(&self, bound: &Self::Bound, dim: usize) -> (N, N) {
        (bound.min[dim], bound.max[dim])
    }

    fn union(&self, a: &Self::Bound, b: &Self::Bound) -> Self::Bound {
        let mut out = *a;
        for dim in 0..D {
            if b.min[dim] < out.min[dim] {
                out.min[dim] = b.min[dim];
            }
            if b.max[dim] > out.max[dim] {
                out.max[dim] = b.max[dim];
            }
        }
        out
    }

    #[inline]
    fn dimensions(&self, _bound: &Self::Bound) -> usize {
        D
    }
}

/// 1D distance from a value to a range.
#[inline]
fn axis_dist(k: f64, min: f64, max: f64) -> f64 {
    if k < min {
        min - k
    } else if k <= max {
        0.0
    } else {
        k - max
    }
}
