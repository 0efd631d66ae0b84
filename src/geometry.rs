//! Planar geometry helpers.

/// A point on the playing field, in metres.
pub type Point = (f64, f64);

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p1.0 - p2.0).hypot(p1.1 - p2.1)
}
