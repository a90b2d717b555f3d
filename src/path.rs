//! Ordered buffer of points traced by a rolling wheel.

use tracing::warn;

use crate::math::{is_finite_point, Point};

/// Append-only sequence of traced rim points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracedPath {
    points: Vec<Point>,
}

impl TracedPath {
    /// An empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point`. Points with NaN or infinite coordinates are dropped.
    ///
    /// Returns whether the point was stored.
    pub fn push(&mut self, point: Point) -> bool {
        if !is_finite_point(&point) {
            warn!(x = point.x, y = point.y, "refusing non-finite path point");
            return false;
        }
        self.points.push(point);
        true
    }

    /// Drops every point
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing has been traced yet
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Stored points, oldest first
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Most recently traced point
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

impl<'a> IntoIterator for &'a TracedPath {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_clear() {
        let mut path = TracedPath::new();
        assert!(path.is_empty());
        assert!(path.push(Point::new(1.0, 2.0)));
        assert!(path.push(Point::new(3.0, 4.0)));
        assert_eq!(path.len(), 2);
        assert_eq!(path.last(), Some(&Point::new(3.0, 4.0)));

        path.clear();
        assert!(path.is_empty());
        assert_eq!(path.bounds(), None);
    }

    #[test]
    fn refuses_non_finite_points() {
        let mut path = TracedPath::new();
        assert!(!path.push(Point::new(f64::NAN, 0.0)));
        assert!(!path.push(Point::new(0.0, f64::INFINITY)));
        assert!(path.is_empty());
    }

    #[test]
    fn bounds_cover_all_points() {
        let mut path = TracedPath::new();
        path.push(Point::new(1.0, -2.0));
        path.push(Point::new(-3.0, 5.0));
        path.push(Point::new(0.5, 0.5));
        let (min, max) = path.bounds().unwrap();
        assert_eq!(min, Point::new(-3.0, -2.0));
        assert_eq!(max, Point::new(1.0, 5.0));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut path = TracedPath::new();
        for i in 0..5 {
            path.push(Point::new(i as f64, 0.0));
        }
        let xs: Vec<f64> = path.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }
}
