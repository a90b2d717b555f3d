//! Planar vector helpers shared by wheels, scenes and the renderer.

use nalgebra::{Point2, Vector2};

/// A position in world space.
pub type Point = Point2<f64>;

/// A displacement in world space.
pub type Vector = Vector2<f64>;

/// Relative tolerance used when comparing lengths.
pub const TOLERANCE: f64 = 1e-9;

/// Unit vector pointing `angle` radians away from the +x axis
pub fn unit_vector(angle: f64) -> Vector {
    let (sin, cos) = angle.sin_cos();
    Vector::new(cos, sin)
}

/// Point on the circle of `radius` around `center` at `angle` radians
pub fn point_on_circle(center: &Point, radius: f64, angle: f64) -> Point {
    center + unit_vector(angle) * radius
}

/// Direction of travel from `from` to `to`, in radians.
///
/// Returns `None` when the points coincide, where the direction is undefined.
pub fn direction_between(from: &Point, to: &Point) -> Option<f64> {
    let delta = to - from;
    if delta.x == 0.0 && delta.y == 0.0 {
        None
    } else {
        Some(delta.y.atan2(delta.x))
    }
}

/// Whether both coordinates are finite
pub fn is_finite_point(point: &Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Compares two lengths relative to the larger of them
pub fn lengths_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}
