//! Circles through two or three given points

use nalgebra::Point2;

use super::Circle;

/// Circle having `a` and `b` as diameter endpoints.
///
/// The radius is the larger of the two center distances so both endpoints pass
/// the containment test after round-off.
pub fn diameter_circle(a: &Point2<f64>, b: &Point2<f64>) -> Circle {
    let center = nalgebra::center(a, b);
    let radius = nalgebra::distance(&center, a).max(nalgebra::distance(&center, b));
    Circle::new(center, radius)
}

/// Circle passing through `a`, `b` and `c`.
///
/// Uses the determinant form of the circumcenter. Coordinates are shifted to
/// the middle of the bounding box first to keep the products small. Collinear
/// (or coincident) points give [`Circle::invalid`].
pub fn circumcircle(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Circle {
    let ox = (a.x.min(b.x).min(c.x) + a.x.max(b.x).max(c.x)) / 2.0;
    let oy = (a.y.min(b.y).min(c.y) + a.y.max(b.y).max(c.y)) / 2.0;
    let (ax, ay) = (a.x - ox, a.y - oy);
    let (bx, by) = (b.x - ox, b.y - oy);
    let (cx, cy) = (c.x - ox, c.y - oy);

    let d = (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by)) * 2.0;
    if d == 0.0 {
        return Circle::invalid();
    }

    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let x = ox + (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let y = oy + (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

    let center = Point2::new(x, y);
    let radius = nalgebra::distance(&center, a)
        .max(nalgebra::distance(&center, b))
        .max(nalgebra::distance(&center, c));
    Circle::new(center, radius)
}
