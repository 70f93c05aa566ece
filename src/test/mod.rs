//! Shared fixtures for tests: a 2D nearest neighbor searcher and a bound-checking crawler.

use crate::aabb::{Aabb, AabbTraits, Point};
use crate::bvh::{Bvh, Crawler, Searcher};

mod random;

pub(crate) type Point2D = Point<f64, 2>;
pub(crate) type Aabb2D = Aabb<f64, 2>;
pub(crate) type Bvh2D = Bvh<Point2D, AabbTraits<f64, 2>>;

/// Nearest neighbor search over 2D points.
///
/// The accepted radius shrinks as closer points are found, so this has to be reset between
/// searches, which [`NearestNeighbor::new`] does by building a fresh one.
#[derive(Debug)]
pub(crate) struct NearestNeighbor {
    target: [f64; 2],
    found: Option<Point2D>,
    found_distance_sq: f64,
    pub(crate) evaluated: usize,
}

impl NearestNeighbor {
    pub(crate) fn new(target: [f64; 2]) -> Self {
        Self {
            target,
            found: None,
            found_distance_sq: f64::INFINITY,
            evaluated: 0,
        }
    }

    pub(crate) fn found(&self) -> Option<Point2D> {
        self.found
    }

    pub(crate) fn found_distance_sq(&self) -> f64 {
        self.found_distance_sq
    }
}

impl Searcher<Aabb2D, Point2D> for NearestNeighbor {
    type Error = String;

    fn intersects(&mut self, bound: &Aabb2D) -> bool {
        bound.distance_squared_to_point(&self.target) <= self.found_distance_sq
    }

    fn evaluate(&mut self, element: &Point2D) -> Result<(), String> {
        self.evaluated += 1;
        let dist = element.distance_squared(&Point(self.target));
        if self.found.is_none() || self.found_distance_sq > dist {
            self.found_distance_sq = dist;
            self.found = Some(*element);
        }
        Ok(())
    }
}

/// Search with [`Bvh::find_nearest`] (or [`Bvh::find_all`]) and assert the result.
pub(crate) fn nearest(bvh: &Bvh2D, target: [f64; 2], expected: [f64; 2], local: bool) -> Point2D {
    let mut searcher = NearestNeighbor::new(target);
    if local {
        bvh.find_nearest(&mut searcher, &Aabb::from_point(target))
            .unwrap();
    } else {
        bvh.find_all(&mut searcher).unwrap();
    }
    let found = searcher.found().expect("search found nothing");
    assert_eq!(
        found.0, expected,
        "closest point to {target:?} expected {expected:?}"
    );
    found
}

/// Verifies that every element lies in the bound of the node reporting it.
#[derive(Debug, Default)]
pub(crate) struct CheckBound {
    bound: Option<Aabb2D>,
    pub(crate) groups: usize,
    pub(crate) elements: usize,
}

impl Crawler<Aabb2D, Point2D> for CheckBound {
    type Error = String;

    fn begin_bound(&mut self, bound: &Aabb2D) -> Result<(), String> {
        self.bound = Some(*bound);
        self.groups += 1;
        Ok(())
    }

    fn end_bound(&mut self, _bound: &Aabb2D) -> Result<(), String> {
        self.bound = None;
        Ok(())
    }

    fn evaluate(&mut self, element: &Point2D) -> Result<(), String> {
        self.elements += 1;
        match &self.bound {
            Some(bound) if bound.contains(&Aabb::from_point(element.0)) => Ok(()),
            Some(bound) => Err(format!(
                "element {element:?} exceeds bound of container {bound:?}"
            )),
            None => Err(format!("element {element:?} reported outside of a bound")),
        }
    }
}

/// Crawl with [`CheckBound`] and validate the structure.
pub(crate) fn check(bvh: &Bvh2D) {
    let mut crawler = CheckBound::default();
    bvh.for_each(&mut crawler).unwrap();
    assert_eq!(crawler.elements, bvh.len());
    assert_eq!(crawler.groups == 0, bvh.is_empty());
    bvh.validate().unwrap();
}
