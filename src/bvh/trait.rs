//! The contracts between the hierarchy and caller-supplied geometry, elements and queries.

use std::rc::Rc;
use std::sync::Arc;

use crate::r#type::IndexableNum;

/// Glue between the hierarchy and your implementation of a bounding volume.
///
/// It provides the operations the hierarchy needs to maintain itself. Every geometric decision
/// made by the tree goes through these three methods, so the same tree logic serves 2D boxes, 3D
/// boxes or any higher-dimensional volume.
pub trait BoundTraits {
    /// The bounding volume type.
    ///
    /// Bounds are treated as immutable values: [`BoundTraits::union`] returns a new bound and
    /// never modifies its inputs.
    type Bound: Clone;

    /// The scalar type of interval endpoints.
    type Num: IndexableNum;

    /// The minimum and maximum extent of `bound` along axis `dim`, in that order.
    ///
    /// This is also how a non-box volume is projected to an axis-aligned box.
    fn interval_range(&self, bound: &Self::Bound, dim: usize) -> (Self::Num, Self::Num);

    /// The combined bounding volume of two bounds.
    fn union(&self, a: &Self::Bound, b: &Self::Bound) -> Self::Bound;

    /// The number of dimensions of this kind of bound.
    fn dimensions(&self, bound: &Self::Bound) -> usize;
}

/// An element that can be stored in the hierarchy.
///
/// The tree never constructs or destroys elements. Erasure finds elements by equality, not by
/// bound, so two distinct elements may share a bound.
pub trait Boundable<B> {
    /// The bounding volume of this element.
    fn bound(&self) -> B;
}

impl<B, T: Boundable<B> + ?Sized> Boundable<B> for &T {
    #[inline]
    fn bound(&self) -> B {
        (**self).bound()
    }
}

impl<B, T: Boundable<B> + ?Sized> Boundable<B> for Rc<T> {
    #[inline]
    fn bound(&self) -> B {
        (**self).bound()
    }
}

impl<B, T: Boundable<B> + ?Sized> Boundable<B> for Arc<T> {
    #[inline]
    fn bound(&self) -> B {
        (**self).bound()
    }
}

/// A spatial query.
///
/// The searcher will usually hold state between calls. For nearest neighbor search that is the
/// target, the closest element found so far and its distance; [`Searcher::intersects`] then
/// compares against that distance, which shrinks as the search progresses. Such a searcher has to
/// be reset between searches.
///
/// Elements may be handed off to other threads from [`Searcher::evaluate`], but the tree must not
/// be mutated while a search is in flight.
pub trait Searcher<B, T> {
    /// The error type returned by [`Searcher::evaluate`]. It aborts the search and is returned
    /// unchanged to the caller.
    type Error;

    /// Whether the given bound is of interest and its contents should be visited.
    fn intersects(&mut self, bound: &B) -> bool;

    /// Process a single element.
    fn evaluate(&mut self, element: &T) -> Result<(), Self::Error>;
}

/// Iterates over the contents of the hierarchy.
///
/// For every node that directly holds at least one element, [`Crawler::begin_bound`] is called
/// with the node's bound, then [`Crawler::evaluate`] for each of its elements, then
/// [`Crawler::end_bound`].
pub trait Crawler<B, T> {
    /// The error type returned by the callbacks. It aborts the crawl and is returned unchanged to
    /// the caller.
    type Error;

    /// Entering a node that holds elements.
    fn begin_bound(&mut self, bound: &B) -> Result<(), Self::Error>;

    /// All elements of the current node have been evaluated.
    fn end_bound(&mut self, bound: &B) -> Result<(), Self::Error>;

    /// Process a single element of the current node.
    fn evaluate(&mut self, element: &T) -> Result<(), Self::Error>;
}
