//! A wheel that rolls along the rim of another wheel.

use tracing::{debug, trace};

use crate::error::WheelResult;
use crate::math::{direction_between, lengths_match, unit_vector, Point};
use crate::path::TracedPath;
use crate::wheel::{RollingWheel, Wheel};

/// Center that keeps a wheel of `radius` tangent to `parent` at its rim point
fn tangent_center<W: Wheel + ?Sized>(parent: &W, radius: f64) -> Point {
    parent.rim_point() - unit_vector(parent.angle()) * radius
}

/// A wheel rolling on the rim of a parent wheel, tracing its own rim point.
///
/// The parent is never stored here. Whoever owns both wheels passes the
/// parent to [`advance_one_step`](Self::advance_one_step) after moving it.
#[derive(Debug)]
pub struct RollingWheelOnWheel {
    wheel: RollingWheel,
    previous_contact_point: Point,
    path: TracedPath,
}

impl RollingWheelOnWheel {
    /// Creates a child wheel and remembers the parent's current contact point.
    pub fn new<W: Wheel + ?Sized>(
        parent: &W,
        center: Point,
        radius: f64,
        angle_degrees: f64,
    ) -> WheelResult<Self> {
        Ok(RollingWheelOnWheel {
            wheel: RollingWheel::new(center, radius, angle_degrees)?,
            previous_contact_point: parent.rim_point(),
            path: TracedPath::new(),
        })
    }

    /// Creates a child of `radius` tangent to the parent's current rim
    /// point, with angle zero and an empty path.
    pub fn attached_to<W: Wheel + ?Sized>(parent: &W, radius: f64) -> WheelResult<Self> {
        let center = tangent_center(parent, radius);
        let mut child = Self::new(parent, center, radius, 0.0)?;
        child.reset_path();
        Ok(child)
    }

    /// Follows the parent's contact point for one frame and records the new
    /// rim point.
    ///
    /// The roll direction is the direction the contact point travelled since
    /// the previous step, which is exact only for small steps. A parent that
    /// did not move leaves the child untouched.
    pub fn advance_one_step<W: Wheel + ?Sized>(&mut self, parent: &W) {
        let contact = parent.rim_point();
        let target = tangent_center(parent, self.wheel.radius());
        let distance = (target - self.wheel.center()).norm();

        match direction_between(&self.previous_contact_point, &contact) {
            Some(direction) if distance > 0.0 => {
                let rolled = self.wheel.center() + unit_vector(direction) * distance;
                let drift = (target - rolled).norm();
                let center = if lengths_match(drift, 0.0) {
                    rolled
                } else {
                    debug!(drift, "re-seating child wheel on contact point");
                    target
                };
                self.wheel.roll_onto(center, distance);
            }
            _ => trace!(?contact, "contact point did not move, skipping roll"),
        }

        self.previous_contact_point = contact;
        self.path.push(self.wheel.rim_point());
    }

    /// Clears the traced path, keeping the wheel where it is.
    pub fn reset_path(&mut self) {
        self.path.clear();
    }

    /// Rim points recorded since the last reset
    pub fn path(&self) -> &TracedPath {
        &self.path
    }

    /// Parent rim point seen at the end of the last step
    pub fn previous_contact_point(&self) -> Point {
        self.previous_contact_point
    }

    /// The underlying wheel
    pub fn wheel(&self) -> &RollingWheel {
        &self.wheel
    }

    /// Mutable access to the underlying wheel, e.g. to subscribe observers.
    pub fn wheel_mut(&mut self) -> &mut RollingWheel {
        &mut self.wheel
    }
}

impl Wheel for RollingWheelOnWheel {
    fn center(&self) -> Point {
        self.wheel.center()
    }

    fn radius(&self) -> f64 {
        self.wheel.radius()
    }

    fn angle(&self) -> f64 {
        self.wheel.angle()
    }
}
