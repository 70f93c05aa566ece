//! Similarity metric between two bounds.
//!
//! From "Similarity metrics for bounding volumes", SIGGRAPH '07 posters. The L1 form scales well
//! to high dimensions. Minimizing the score maximizes overlap between the two volumes.

use crate::bvh::r#trait::BoundTraits;
use crate::r#type::IndexableNum;

/// Result of comparing two bounds with [`furthest_distance_metric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    /// `true` when at least one axis reports a non-negative gap.
    pub overlaps: bool,
    /// Sum over all axes of the wider of the two candidate gaps. Lower means more similar.
    pub score: f64,
}

/// Compare two bounds.
///
/// For each axis the two candidate gaps are `hi0 - lo1` and `hi1 - lo0`. The smaller one decides
/// overlap on that axis and the larger one is added to the score. Both bounds must have the same
/// dimensionality; the axis count is taken from `first`.
pub fn furthest_distance_metric<Tr: BoundTraits>(
    traits: &Tr,
    first: &Tr::Bound,
    second: &Tr::Bound,
) -> Similarity {
    let mut score = 0.0;
    let mut overlaps = false;
    for dim in 0..traits.dimensions(first) {
        let (lo0, hi0) = traits.interval_range(first, dim);
        let (lo1, hi1) = traits.interval_range(second, dim);

        let a = hi0.as_f64() - lo1.as_f64();
        let b = hi1.as_f64() - lo0.as_f64();

        if a.min(b) >= 0.0 {
            overlaps = true;
        }
        score += a.max(b);
    }
    Similarity { overlaps, score }
}

/// Shorthand for the score part of [`furthest_distance_metric`].
#[inline]
pub(crate) fn score<Tr: BoundTraits>(traits: &Tr, first: &Tr::Bound, second: &Tr::Bound) -> f64 {
    furthest_distance_metric(traits, first, second).score
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aabb::{Aabb, AabbTraits};

    fn boxed(min: [f64; 2], max: [f64; 2]) -> Aabb<f64, 2> {
        Aabb::new(min, max)
    }

    #[test]
    fn identical_points_score_zero() {
        let p = boxed([1., 2.], [1., 2.]);
        let sim = furthest_distance_metric(&AabbTraits::<f64, 2>::new(), &p, &p);
        assert!(sim.overlaps);
        assert_eq!(sim.score, 0.);
    }

    #[test]
    fn score_sums_widest_gap_per_axis() {
        let traits = AabbTraits::<f64, 2>::new();
        let a = boxed([0., 0.], [1., 1.]);
        let b = boxed([3., 0.], [4., 2.]);
        // x: max(1 - 3, 4 - 0) = 4, y: max(1 - 0, 2 - 0) = 2
        let sim = furthest_distance_metric(&traits, &a, &b);
        assert_eq!(sim.score, 6.);
        // y intervals overlap, so the per-axis test reports overlap
        assert!(sim.overlaps);
    }

    #[test]
    fn separated_on_every_axis() {
        let traits = AabbTraits::<f64, 2>::new();
        let a = boxed([0., 0.], [1., 1.]);
        let b = boxed([2., 2.], [3., 3.]);
        let sim = furthest_distance_metric(&traits, &a, &b);
        assert!(!sim.overlaps);
        assert_eq!(sim.score, 6.);
    }

    #[test]
    fn symmetric() {
        let traits = AabbTraits::<i32, 3>::new();
        let a = Aabb::new([0, 5, -2], [3, 9, 1]);
        let b = Aabb::new([7, 1, 0], [8, 2, 4]);
        assert_eq!(
            furthest_distance_metric(&traits, &a, &b),
            furthest_distance_metric(&traits, &b, &a)
        );
    }
}
