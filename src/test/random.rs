use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::primitives::Rectangle;
use rstar::AABB;

use crate::aabb::{Aabb, AabbTraits, Point};
use crate::bvh::{Bvh, Searcher};
use crate::test::{check, Bvh2D, NearestNeighbor};

#[test]
fn interleaved_ops_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut bvh = Bvh2D::new(AabbTraits::new());
    let mut live: Vec<[f64; 2]> = vec![];

    for step in 0..3000 {
        let roll: f64 = rng.gen();
        if roll < 0.6 || live.is_empty() {
            let p = [rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)];
            bvh.insert(Point(p));
            live.push(p);
        } else if roll < 0.85 {
            let p = live.swap_remove(rng.gen_range(0..live.len()));
            assert!(bvh.erase(&Point(p)));
        } else {
            let target = [rng.gen_range(-120.0..120.0), rng.gen_range(-120.0..120.0)];
            let mut searcher = NearestNeighbor::new(target);
            bvh.find_nearest(&mut searcher, &Aabb::from_point(target))
                .unwrap();
            let expected_dist = live
                .iter()
                .map(|p| Point(*p).distance_squared(&Point(target)))
                .fold(f64::INFINITY, f64::min);
            assert_eq!(searcher.found_distance_sq(), expected_dist);
        }

        assert_eq!(bvh.len(), live.len());
        if step % 250 == 0 {
            check(&bvh);
        }
    }
    check(&bvh);

    for p in live.drain(..) {
        assert!(bvh.erase(&Point(p)));
    }
    assert!(bvh.is_empty());
    check(&bvh);
}

/// Collects the 3D boxes intersecting a query box.
struct Overlapping {
    query: Aabb<f64, 3>,
    found: Vec<Aabb<f64, 3>>,
}

impl Searcher<Aabb<f64, 3>, Aabb<f64, 3>> for Overlapping {
    type Error = ();

    fn intersects(&mut self, bound: &Aabb<f64, 3>) -> bool {
        self.query.intersects(bound)
    }

    fn evaluate(&mut self, element: &Aabb<f64, 3>) -> Result<(), ()> {
        if self.query.intersects(element) {
            self.found.push(*element);
        }
        Ok(())
    }
}

fn random_box(rng: &mut StdRng, extent: f64) -> ([f64; 3], [f64; 3]) {
    let min = [
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
    ];
    let max = [
        min[0] + rng.gen_range(0.0..extent),
        min[1] + rng.gen_range(0.0..extent),
        min[2] + rng.gen_range(0.0..extent),
    ];
    (min, max)
}

#[test]
fn box_queries_in_three_dimensions_match_rstar() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut bvh = Bvh::new(AabbTraits::<f64, 3>::new());
    let mut rects = vec![];
    for _ in 0..800 {
        let (min, max) = random_box(&mut rng, 5.0);
        bvh.insert(Aabb::new(min, max));
        rects.push(Rectangle::from_corners(min, max));
    }
    bvh.validate().unwrap();
    let reference = rstar::RTree::bulk_load(rects);

    for _ in 0..50 {
        let (min, max) = random_box(&mut rng, 30.0);
        let mut searcher = Overlapping {
            query: Aabb::new(min, max),
            found: vec![],
        };
        bvh.find_all(&mut searcher).unwrap();

        let query = rstar::RTree::bulk_load(vec![Rectangle::from_aabb(AABB::from_corners(
            min, max,
        ))]);
        let mut expected: Vec<[f64; 3]> = reference
            .intersection_candidates_with_other_tree(&query)
            .map(|(r, _)| r.lower())
            .collect();
        let mut found: Vec<[f64; 3]> = searcher.found.iter().map(|b| *b.min()).collect();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        found.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(found, expected);
    }
}
