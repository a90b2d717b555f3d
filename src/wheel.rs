//! A circle that can spin in place or roll without slipping.

use std::fmt;

use crate::error::{WheelError, WheelResult};
use crate::math::{point_on_circle, unit_vector, Point};

/// Read-only geometry shared by every kind of wheel.
///
/// This is everything a renderer needs to draw a wheel: the circle, a marker
/// at the center and a radius line out to the rim point.
pub trait Wheel {
    /// Center of the wheel.
    fn center(&self) -> Point;

    /// Radius of the wheel, always positive.
    fn radius(&self) -> f64;

    /// Accumulated rotation in radians. Never wrapped.
    fn angle(&self) -> f64;

    /// Where the radius line meets the rim.
    fn rim_point(&self) -> Point {
        point_on_circle(&self.center(), self.radius(), self.angle())
    }

    /// Accumulated rotation in degrees.
    fn angle_degrees(&self) -> f64 {
        self.angle().to_degrees()
    }
}

/// State of a wheel right after it changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelChange {
    /// Angle in radians.
    pub angle: f64,
    /// Center position.
    pub center: Point,
}

/// Handle returned by [`RollingWheel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&WheelChange)>;

/// A wheel defined by its center, radius and rotation angle.
pub struct RollingWheel {
    center: Point,
    radius: f64,
    angle: f64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl RollingWheel {
    /// Creates a wheel. `angle_degrees` is converted to radians.
    pub fn new(center: Point, radius: f64, angle_degrees: f64) -> WheelResult<Self> {
        let radius = WheelError::check_radius(radius)?;
        Ok(RollingWheel {
            center,
            radius,
            angle: angle_degrees.to_radians(),
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Overwrites the angle.
    pub fn set_angle(&mut self, angle_degrees: f64) {
        self.angle = angle_degrees.to_radians();
        self.notify();
    }

    /// Spins the wheel without moving its center.
    pub fn rotate_in_place(&mut self, delta_degrees: f64) {
        self.angle += delta_degrees.to_radians();
        self.notify();
    }

    /// Rolls along the +x axis, sweeping `delta_degrees` of rotation.
    ///
    /// The center travels the arc length swept by the rim, so this is
    /// [`roll_on_path`](Self::roll_on_path) with a direction of zero.
    pub fn rotate(&mut self, delta_degrees: f64) {
        let distance = self.radius * delta_degrees.to_radians();
        self.roll_toward(distance, 0.0);
    }

    /// Rolls `distance` along the direction `direction_degrees` from the +x
    /// axis. The angle advances by `distance / radius`.
    pub fn roll_on_path(&mut self, distance: f64, direction_degrees: f64) {
        self.roll_toward(distance, direction_degrees.to_radians());
    }

    pub(crate) fn roll_toward(&mut self, distance: f64, direction: f64) {
        self.center += unit_vector(direction) * distance;
        self.angle += distance / self.radius;
        self.notify();
    }

    /// Places the center at `center` and turns by the arc `distance`,
    /// notifying observers once.
    pub(crate) fn roll_onto(&mut self, center: Point, distance: f64) {
        self.center = center;
        self.angle += distance / self.radius;
        self.notify();
    }

    /// Moves the center without turning the wheel.
    pub fn move_to(&mut self, center: Point) {
        self.center = center;
        self.notify();
    }

    /// Registers `observer` to run after every mutation.
    ///
    /// Observers run synchronously in subscription order before the mutating
    /// call returns.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&WheelChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let change = WheelChange {
            angle: self.angle,
            center: self.center,
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&change);
        }
    }
}

impl Wheel for RollingWheel {
    fn center(&self) -> Point {
        self.center
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn angle(&self) -> f64 {
        self.angle
    }
}

impl fmt::Debug for RollingWheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingWheel")
            .field("center", &self.center)
            .field("radius", &self.radius)
            .field("angle", &self.angle)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::cell::RefCell;
    use std::f64::consts::{PI, TAU};
    use std::rc::Rc;

    fn wheel(radius: f64) -> RollingWheel {
        RollingWheel::new(Point::origin(), radius, 0.0).unwrap()
    }

    #[test]
    fn test_new_converts_degrees() {
        let w = RollingWheel::new(Point::new(3.0, 4.0), 2.0, 90.0).unwrap();
        assert_relative_eq!(w.angle(), PI / 2.0);
        assert_eq!(w.center(), Point::new(3.0, 4.0));
        assert_relative_eq!(w.radius(), 2.0);
    }

    #[test]
    fn test_new_rejects_non_positive_radius() {
        assert!(RollingWheel::new(Point::origin(), 0.0, 0.0).is_err());
        assert!(RollingWheel::new(Point::origin(), -1.0, 0.0).is_err());
    }

    #[test]
    fn test_rim_point() {
        let w = RollingWheel::new(Point::new(1.0, 1.0), 2.0, 180.0).unwrap();
        let rim = w.rim_point();
        assert_relative_eq!(rim.x, -1.0);
        assert_abs_diff_eq!(rim.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_revolution_in_place() {
        let mut w = wheel(50.0);
        w.rotate_in_place(360.0);
        assert_abs_diff_eq!(w.angle(), TAU, epsilon = 1e-12);
        assert_relative_eq!(w.rim_point().x, 50.0);
        assert_abs_diff_eq!(w.rim_point().y, 0.0, epsilon = 1e-9);
        assert_eq!(w.center(), Point::origin());
    }

    #[test]
    fn test_angle_is_not_wrapped() {
        let mut w = wheel(1.0);
        for _ in 0..4 {
            w.rotate_in_place(360.0);
        }
        assert_relative_eq!(w.angle(), 4.0 * TAU);
    }

    #[test]
    fn test_roll_on_path_half_revolution() {
        let mut w = wheel(10.0);
        w.roll_on_path(10.0 * PI, 0.0);
        assert_relative_eq!(w.center().x, 10.0 * PI);
        assert_abs_diff_eq!(w.center().y, 0.0);
        assert_relative_eq!(w.angle(), PI);
    }

    #[test]
    fn test_roll_on_path_no_slip() {
        let mut w = RollingWheel::new(Point::new(-2.0, 7.0), 3.5, 12.0).unwrap();
        for (distance, direction) in [(1.0, 0.0), (4.25, 135.0), (0.01, -60.0), (12.0, 270.0)] {
            let before = w.angle();
            let center_before = w.center();
            w.roll_on_path(distance, direction);
            assert_relative_eq!((w.angle() - before) * w.radius(), distance, max_relative = 1e-9);
            assert_relative_eq!((w.center() - center_before).norm(), distance, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_rotate_matches_roll_on_path() {
        let mut rotated = wheel(7.0);
        let mut rolled = wheel(7.0);
        rotated.rotate(45.0);
        rolled.roll_on_path(7.0 * 45f64.to_radians(), 0.0);
        assert_relative_eq!(rotated.angle(), rolled.angle());
        assert_relative_eq!(rotated.center().x, rolled.center().x);
        assert_relative_eq!(rotated.center().y, rolled.center().y);
    }

    #[test]
    fn test_rim_stays_on_circle() {
        let mut w = RollingWheel::new(Point::new(5.0, -5.0), 12.0, 33.0).unwrap();
        w.rotate(17.0);
        w.rotate_in_place(-250.0);
        w.roll_on_path(3.0, 77.0);
        w.set_angle(1000.0);
        let distance = (w.rim_point() - w.center()).norm();
        assert_relative_eq!(distance, 12.0, max_relative = 1e-9);
    }

    #[test]
    fn test_observers_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut w = wheel(1.0);

        let first = Rc::clone(&log);
        w.subscribe(move |change| first.borrow_mut().push(("first", change.angle)));
        let second = Rc::clone(&log);
        w.subscribe(move |change| second.borrow_mut().push(("second", change.angle)));

        w.set_angle(180.0);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].0, "first");
        assert_eq!(log[1].0, "second");
        assert_relative_eq!(log[0].1, PI);
    }

    #[test]
    fn test_observer_sees_new_center() {
        let seen = Rc::new(RefCell::new(None));
        let mut w = wheel(2.0);
        let sink = Rc::clone(&seen);
        w.subscribe(move |change| *sink.borrow_mut() = Some(change.center));

        w.roll_on_path(3.0, 90.0);

        let center = seen.borrow().unwrap();
        assert_abs_diff_eq!(center.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(center.y, 3.0);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut w = wheel(1.0);
        let sink = Rc::clone(&count);
        let id = w.subscribe(move |_| *sink.borrow_mut() += 1);

        w.rotate_in_place(10.0);
        assert!(w.unsubscribe(id));
        assert!(!w.unsubscribe(id));
        w.rotate_in_place(10.0);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(w.observer_count(), 0);
    }
}
