//! Smallest enclosing circle of a point set
//!
//! Randomized incremental construction: points are visited in shuffled order and
//! the circle is rebuilt whenever a point falls outside it, with that point fixed
//! on the boundary. Expected running time is linear in the number of points.

mod construct;

#[cfg(test)]
mod tests;

use nalgebra::Point2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use construct::{circumcircle, diameter_circle};

/// Multiplicative slack applied to the radius in containment tests.
///
/// Points sitting exactly on the boundary must test as inside even after
/// round-off in the center and radius computations.
pub const MULTIPLICATIVE_EPSILON: f64 = 1.0 + 1e-14;

/// A circle in image pixel space.
///
/// A negative radius marks a circle that has not been computed (empty input or
/// degenerate construction). Check [`Circle::is_valid`] before using one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center in pixel coordinates
    pub center: Point2<f64>,
    /// Radius in pixels, `-1.0` when invalid
    pub radius: f64,
}

impl Circle {
    /// Create a circle from center and radius
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The "no circle computed yet" marker
    pub fn invalid() -> Self {
        Self {
            center: Point2::origin(),
            radius: -1.0,
        }
    }

    /// True unless this is the invalid marker
    pub fn is_valid(&self) -> bool {
        self.radius >= 0.0
    }

    /// Containment test with [`MULTIPLICATIVE_EPSILON`] slack.
    ///
    /// Always false for an invalid circle.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.is_valid()
            && nalgebra::distance(&self.center, point) <= self.radius * MULTIPLICATIVE_EPSILON
    }

    /// True when every point is inside this circle
    pub fn contains_all(&self, points: &[Point2<f64>]) -> bool {
        points.iter().all(|p| self.contains(p))
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Smallest circle containing every point, shuffling with the thread-local RNG.
///
/// Returns [`Circle::invalid`] for an empty slice. The result is geometrically
/// unique, but the last bits of the center and radius may depend on the
/// visiting order; use [`smallest_enclosing_circle_with_rng`] with a seeded RNG
/// when bit-for-bit reproducibility matters.
pub fn smallest_enclosing_circle(points: &[Point2<f64>]) -> Circle {
    smallest_enclosing_circle_with_rng(points, &mut rand::rng())
}

/// Smallest circle containing every point, shuffling with the supplied RNG.
pub fn smallest_enclosing_circle_with_rng<R: Rng + ?Sized>(
    points: &[Point2<f64>],
    rng: &mut R,
) -> Circle {
    let mut shuffled = points.to_vec();
    shuffled.shuffle(rng);

    let mut circle = Circle::invalid();
    for (i, p) in shuffled.iter().enumerate() {
        if !circle.contains(p) {
            circle = circle_with_one_point(&shuffled[..=i], *p);
        }
    }

    if !circle.is_valid() {
        log::debug!("No enclosing circle for an empty point set");
    }
    circle
}

/// Smallest circle enclosing `points` with `p` on its boundary.
fn circle_with_one_point(points: &[Point2<f64>], p: Point2<f64>) -> Circle {
    let mut circle = Circle::new(p, 0.0);
    for (i, q) in points.iter().enumerate() {
        if circle.contains(q) {
            continue;
        }
        circle = if circle.radius == 0.0 {
            diameter_circle(&p, q)
        } else {
            circle_with_two_points(&points[..=i], p, *q)
        };
    }
    circle
}

/// Smallest circle enclosing `points` with both `p` and `q` on its boundary.
///
/// Every candidate passes through `p` and `q`, so its center lies on their
/// perpendicular bisector. Third points left of `p -> q` pull the center
/// further left; the candidate whose center is furthest along that side is the
/// one that contains all of them. Same for the right side. The smaller of the
/// two survivors wins.
fn circle_with_two_points(points: &[Point2<f64>], p: Point2<f64>, q: Point2<f64>) -> Circle {
    let diameter = diameter_circle(&p, &q);
    let mut left: Option<Circle> = None;
    let mut right: Option<Circle> = None;

    for r in points {
        if diameter.contains(r) {
            continue;
        }

        let cross = cross_product(&p, &q, r);
        let candidate = circumcircle(&p, &q, r);
        if !candidate.is_valid() {
            continue;
        }

        let offset = cross_product(&p, &q, &candidate.center);
        if cross > 0.0 {
            if left.is_none_or(|l| offset > cross_product(&p, &q, &l.center)) {
                left = Some(candidate);
            }
        } else if cross < 0.0 && right.is_none_or(|r| offset < cross_product(&p, &q, &r.center)) {
            right = Some(candidate);
        }
    }

    match (left, right) {
        (None, None) => diameter,
        (Some(l), None) => l,
        (None, Some(r)) => r,
        (Some(l), Some(r)) => {
            if l.radius <= r.radius {
                l
            } else {
                r
            }
        }
    }
}

/// z component of `(b - a) x (c - a)`; positive when `c` is left of `a -> b`
fn cross_product(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
