use super::*;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Exhaustive minimum over every pair and triple candidate
fn brute_force_circle(points: &[Point2<f64>]) -> Circle {
    if points.is_empty() {
        return Circle::invalid();
    }
    if points.len() == 1 {
        return Circle::new(points[0], 0.0);
    }

    let mut best = Circle::invalid();
    let mut consider = |c: Circle| {
        if c.is_valid() && c.contains_all(points) && (!best.is_valid() || c.radius < best.radius)
        {
            best = c;
        }
    };

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            consider(diameter_circle(&points[i], &points[j]));
            for k in (j + 1)..points.len() {
                consider(circumcircle(&points[i], &points[j], &points[k]));
            }
        }
    }
    best
}

fn random_points(rng: &mut StdRng, count: usize, spread: f64) -> Vec<Point2<f64>> {
    (0..count)
        .map(|_| {
            Point2::new(
                rng.random_range(-spread..spread),
                rng.random_range(-spread..spread),
            )
        })
        .collect()
}

#[test]
fn test_empty_input_is_invalid() {
    let c = smallest_enclosing_circle(&[]);
    assert!(!c.is_valid());
    assert_eq!(c.radius, -1.0);
}

#[test]
fn test_single_point() {
    let p = Point2::new(12.5, -3.0);
    let c = smallest_enclosing_circle(&[p]);
    assert_eq!(c.center, p);
    assert_eq!(c.radius, 0.0);
}

#[test]
fn test_two_points_form_diameter() {
    let a = Point2::new(1.0, 1.0);
    let b = Point2::new(7.0, 9.0);
    let c = smallest_enclosing_circle(&[a, b]);
    assert_relative_eq!(c.center.x, 4.0, epsilon = 1e-12);
    assert_relative_eq!(c.center.y, 5.0, epsilon = 1e-12);
    assert_relative_eq!(c.radius, 5.0, epsilon = 1e-12);
}

#[test]
fn test_duplicate_points() {
    let p = Point2::new(2.0, 2.0);
    let c = smallest_enclosing_circle(&[p, p, p]);
    assert_eq!(c.radius, 0.0);
    assert_eq!(c.center, p);
}

#[test]
fn test_collinear_points_use_outer_pair() {
    let points: Vec<_> = (0..6).map(|i| Point2::new(i as f64, 2.0 * i as f64)).collect();
    let c = smallest_enclosing_circle(&points);
    let expected = diameter_circle(&points[0], &points[5]);
    assert_relative_eq!(c.center.x, expected.center.x, epsilon = 1e-12);
    assert_relative_eq!(c.center.y, expected.center.y, epsilon = 1e-12);
    assert_relative_eq!(c.radius, expected.radius, epsilon = 1e-12);
}

#[test]
fn test_acute_triangle_uses_circumcircle() {
    let points = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(5.0, 8.0),
    ];
    let c = smallest_enclosing_circle(&points);
    let expected = circumcircle(&points[0], &points[1], &points[2]);
    assert_relative_eq!(c.radius, expected.radius, epsilon = 1e-12);
    assert!(c.contains_all(&points));
}

#[test]
fn test_obtuse_triangle_uses_longest_side() {
    let points = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(5.0, 1.0),
    ];
    let c = smallest_enclosing_circle(&points);
    assert_relative_eq!(c.center.x, 5.0, epsilon = 1e-12);
    assert_relative_eq!(c.center.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(c.radius, 5.0, epsilon = 1e-12);
}

#[test]
fn test_points_on_circle() {
    let center = Point2::new(50.0, 40.0);
    let points: Vec<_> = (0..8)
        .map(|i| {
            let a = (i as f64 * 45.0).to_radians();
            Point2::new(center.x + 30.0 * a.cos(), center.y - 30.0 * a.sin())
        })
        .collect();

    let c = smallest_enclosing_circle(&points);
    assert_relative_eq!(c.center.x, center.x, epsilon = 1e-9);
    assert_relative_eq!(c.center.y, center.y, epsilon = 1e-9);
    assert_relative_eq!(c.radius, 30.0, epsilon = 1e-9);
    assert!(c.contains_all(&points));
}

#[test]
fn test_interior_points_do_not_grow_circle() {
    let mut points = vec![
        Point2::new(-10.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(0.0, 10.0),
        Point2::new(0.0, -10.0),
    ];
    points.extend([
        Point2::new(1.0, 1.0),
        Point2::new(-3.0, 2.0),
        Point2::new(5.0, -5.0),
    ]);

    let c = smallest_enclosing_circle(&points);
    assert_relative_eq!(c.radius, 10.0, epsilon = 1e-12);
    assert_relative_eq!(c.center.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(c.center.y, 0.0, epsilon = 1e-12);
}

#[test]
fn test_contains_and_is_minimal_against_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);

    for trial in 0..300 {
        let count = 1 + trial % 12;
        let points = random_points(&mut rng, count, 100.0);

        let c = smallest_enclosing_circle_with_rng(&points, &mut rng);
        let reference = brute_force_circle(&points);

        assert!(c.is_valid(), "trial {trial}: invalid circle");
        assert!(
            c.contains_all(&points),
            "trial {trial}: circle {c:?} misses a point"
        );
        assert_relative_eq!(c.radius, reference.radius, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn test_seeded_rng_is_reproducible() {
    let mut point_rng = StdRng::seed_from_u64(7);
    let points = random_points(&mut point_rng, 40, 25.0);

    let a = smallest_enclosing_circle_with_rng(&points, &mut StdRng::seed_from_u64(99));
    let b = smallest_enclosing_circle_with_rng(&points, &mut StdRng::seed_from_u64(99));
    assert_eq!(a, b);
}

#[test]
fn test_result_independent_of_visiting_order() {
    let mut point_rng = StdRng::seed_from_u64(1234);
    let points = random_points(&mut point_rng, 200, 500.0);

    let reference = smallest_enclosing_circle_with_rng(&points, &mut StdRng::seed_from_u64(0));
    for seed in 1..10 {
        let c = smallest_enclosing_circle_with_rng(&points, &mut StdRng::seed_from_u64(seed));
        assert_relative_eq!(c.radius, reference.radius, epsilon = 1e-9);
        assert_relative_eq!(c.center.x, reference.center.x, epsilon = 1e-9);
        assert_relative_eq!(c.center.y, reference.center.y, epsilon = 1e-9);
    }
}

#[test]
fn test_boundary_point_is_contained() {
    let c = Circle::new(Point2::new(0.1, 0.2), 0.3);
    let angle: f64 = 1.234;
    let p = Point2::new(0.1 + 0.3 * angle.cos(), 0.2 + 0.3 * angle.sin());
    assert!(c.contains(&p));
    assert!(!c.contains(&Point2::new(0.1, 0.2 + 0.3 * 1.000001)));
}

#[test]
fn test_invalid_circle_contains_nothing() {
    assert!(!Circle::invalid().contains(&Point2::origin()));
    assert!(!Circle::default().is_valid());
}
