//! Per-applet contexts that own wheels and advance them one frame at a time.
//!
//! World coordinates follow the canvas convention: `y` grows downwards, so a
//! positive rotation turns clockwise on screen.

use tracing::{debug, warn};

use crate::error::{WheelError, WheelResult};
use crate::math::Point;
use crate::on_wheel::RollingWheelOnWheel;
use crate::path::TracedPath;
use crate::wheel::{RollingWheel, Wheel};

/// Geometry a scene is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Radius of the wheel that rolls on the line, or of the track wheel.
    pub radius: f64,
    /// Radius of the wheel rolling on the track wheel.
    pub child_radius: f64,
    /// Distance the line scene rolls before starting over.
    pub track_length: f64,
    /// Starting angle of the first wheel, in degrees.
    pub initial_angle: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            radius: 50.0,
            child_radius: 15.0,
            track_length: 300.0,
            initial_angle: 0.0,
        }
    }
}

impl SceneConfig {
    /// Default geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the line wheel's or track wheel's radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the radius of the wheel rolling on the track wheel
    pub fn with_child_radius(mut self, child_radius: f64) -> Self {
        self.child_radius = child_radius;
        self
    }

    /// Sets how far the line scene rolls before starting over
    pub fn with_track_length(mut self, track_length: f64) -> Self {
        self.track_length = track_length;
        self
    }

    /// Sets the starting angle in degrees
    pub fn with_initial_angle(mut self, degrees: f64) -> Self {
        self.initial_angle = degrees;
        self
    }
}

/// A self-contained animation driven by an external frame loop.
pub trait Scene {
    /// Short name shown by front ends.
    fn name(&self) -> &'static str;

    /// Advances the animation by one frame turning `degrees`.
    fn step(&mut self, degrees: f64);

    /// Puts every wheel back to its starting position and clears the path.
    fn reset(&mut self);

    /// Wheels to draw, the track wheel first.
    fn wheels(&self) -> Vec<&dyn Wheel>;

    /// The curve traced since the last restart.
    fn path(&self) -> &TracedPath;

    /// Frames stepped since the last reset.
    fn frame(&self) -> u64;

    /// Radius the rolling wheel will have after the next restart.
    fn rolling_radius(&self) -> f64;

    /// Changes the rolling wheel's radius, effective at the next restart.
    fn set_rolling_radius(&mut self, radius: f64) -> WheelResult<()>;

    /// Region of world space the scene can draw into, as `(min, max)`.
    fn extent(&self) -> (Point, Point);
}

/// A wheel rolling along the x axis, tracing a cycloid.
#[derive(Debug)]
pub struct LineScene {
    config: SceneConfig,
    wheel: RollingWheel,
    path: TracedPath,
    frame: u64,
}

impl LineScene {
    /// Builds the scene, rejecting non-positive radii
    pub fn new(config: SceneConfig) -> WheelResult<Self> {
        Ok(LineScene {
            wheel: Self::start_wheel(&config)?,
            config,
            path: TracedPath::new(),
            frame: 0,
        })
    }

    /// The wheel sits on the ground line `y = 0`, touching it at `x = radius`.
    fn start_wheel(config: &SceneConfig) -> WheelResult<RollingWheel> {
        RollingWheel::new(
            Point::new(config.radius, -config.radius),
            config.radius,
            config.initial_angle,
        )
    }

    /// The rolling wheel
    pub fn wheel(&self) -> &RollingWheel {
        &self.wheel
    }

    /// Mutable access to the rolling wheel, e.g. to subscribe observers
    pub fn wheel_mut(&mut self) -> &mut RollingWheel {
        &mut self.wheel
    }
}

impl Scene for LineScene {
    fn name(&self) -> &'static str {
        "line"
    }

    fn step(&mut self, degrees: f64) {
        self.wheel.rotate(degrees);
        self.path.push(self.wheel.rim_point());
        self.frame += 1;

        let left = self.wheel.center().x - self.wheel.radius();
        if left > self.config.track_length || self.wheel.center().x + self.wheel.radius() < 0.0 {
            debug!(frame = self.frame, "wheel left the track, starting over");
            self.reset();
        }
    }

    fn reset(&mut self) {
        match Self::start_wheel(&self.config) {
            Ok(wheel) => self.wheel = wheel,
            Err(err) => warn!(%err, "keeping current wheel"),
        }
        self.path.clear();
        self.frame = 0;
    }

    fn wheels(&self) -> Vec<&dyn Wheel> {
        vec![&self.wheel as &dyn Wheel]
    }

    fn path(&self) -> &TracedPath {
        &self.path
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn rolling_radius(&self) -> f64 {
        self.config.radius
    }

    fn set_rolling_radius(&mut self, radius: f64) -> WheelResult<()> {
        self.config.radius = WheelError::check_radius(radius)?;
        Ok(())
    }

    fn extent(&self) -> (Point, Point) {
        let r = self.config.radius.max(self.wheel.radius());
        (
            Point::new(0.0, -2.0 * r),
            Point::new(self.config.track_length + 2.0 * r, 0.0),
        )
    }
}

/// A wheel rolling on the rim of a track wheel that spins in place.
///
/// Once the track wheel has turned a full revolution the rolling wheel is
/// re-attached, picking up any radius set in the meantime, and its path
/// starts over.
#[derive(Debug)]
pub struct CircleScene {
    config: SceneConfig,
    track: RollingWheel,
    child: RollingWheelOnWheel,
    turned: f64,
    frame: u64,
    revolutions: u64,
}

impl CircleScene {
    /// Builds the track wheel at the origin and attaches the child to it
    pub fn new(config: SceneConfig) -> WheelResult<Self> {
        let track = RollingWheel::new(Point::origin(), config.radius, config.initial_angle)?;
        let child = RollingWheelOnWheel::attached_to(&track, config.child_radius)?;
        Ok(CircleScene {
            config,
            track,
            child,
            turned: 0.0,
            frame: 0,
            revolutions: 0,
        })
    }

    /// The wheel spinning in place
    pub fn track(&self) -> &RollingWheel {
        &self.track
    }

    /// The wheel rolling on the track
    pub fn child(&self) -> &RollingWheelOnWheel {
        &self.child
    }

    /// Mutable access to the rolling wheel
    pub fn child_mut(&mut self) -> &mut RollingWheelOnWheel {
        &mut self.child
    }

    /// Full track revolutions completed since the last reset
    pub fn revolutions(&self) -> u64 {
        self.revolutions
    }

    fn reattach(&mut self) {
        match RollingWheelOnWheel::attached_to(&self.track, self.config.child_radius) {
            Ok(child) => self.child = child,
            Err(err) => warn!(%err, "keeping current child wheel"),
        }
    }
}

impl Scene for CircleScene {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn step(&mut self, degrees: f64) {
        self.track.rotate_in_place(degrees);
        self.child.advance_one_step(&self.track);
        self.frame += 1;

        self.turned += degrees.abs();
        let turns = (self.turned / 360.0).floor();
        if turns >= 1.0 {
            self.turned -= turns * 360.0;
            self.revolutions += turns as u64;
            debug!(
                revolutions = self.revolutions,
                child_radius = self.config.child_radius,
                "track completed a revolution, re-attaching child"
            );
            self.reattach();
        }
    }

    fn reset(&mut self) {
        match RollingWheel::new(Point::origin(), self.config.radius, self.config.initial_angle) {
            Ok(track) => self.track = track,
            Err(err) => warn!(%err, "keeping current track wheel"),
        }
        self.reattach();
        self.turned = 0.0;
        self.frame = 0;
        self.revolutions = 0;
    }

    fn wheels(&self) -> Vec<&dyn Wheel> {
        vec![&self.track as &dyn Wheel, &self.child]
    }

    fn path(&self) -> &TracedPath {
        self.child.path()
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn rolling_radius(&self) -> f64 {
        self.config.child_radius
    }

    fn set_rolling_radius(&mut self, radius: f64) -> WheelResult<()> {
        self.config.child_radius = WheelError::check_radius(radius)?;
        Ok(())
    }

    fn extent(&self) -> (Point, Point) {
        let child = self.config.child_radius.max(self.child.radius());
        let reach = self.track.radius().max((self.track.radius() - 2.0 * child).abs());
        (Point::new(-reach, -reach), Point::new(reach, reach))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_config_builder() {
        let config = SceneConfig::new()
            .with_radius(20.0)
            .with_child_radius(5.0)
            .with_track_length(100.0)
            .with_initial_angle(90.0);
        assert_relative_eq!(config.radius, 20.0);
        assert_relative_eq!(config.child_radius, 5.0);
        assert_relative_eq!(config.track_length, 100.0);
        assert_relative_eq!(config.initial_angle, 90.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SceneConfig::new().with_radius(-1.0);
        assert!(LineScene::new(config).is_err());
        assert!(CircleScene::new(config).is_err());
        assert!(CircleScene::new(SceneConfig::new().with_child_radius(0.0)).is_err());
    }

    #[test]
    fn test_line_scene_traces_cycloid() {
        let config = SceneConfig::new().with_radius(10.0).with_track_length(1000.0);
        let mut scene = LineScene::new(config).unwrap();
        for _ in 0..180 {
            scene.step(1.0);
        }
        // Half a revolution rolls half the circumference.
        let wheel = scene.wheel();
        let expected = 10.0 + 10.0 * std::f64::consts::PI;
        assert_relative_eq!(wheel.center().x, expected, max_relative = 1e-9);
        assert_relative_eq!(wheel.center().y, -10.0);
        assert_eq!(scene.path().len(), 180);
        assert_eq!(scene.frame(), 180);
    }

    #[test]
    fn test_line_scene_wraps_past_track() {
        let config = SceneConfig::new().with_radius(10.0).with_track_length(20.0);
        let mut scene = LineScene::new(config).unwrap();
        let mut wrapped = false;
        for _ in 0..400 {
            scene.step(5.0);
            if scene.frame() == 0 {
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
        assert!(scene.path().is_empty());
        assert_relative_eq!(scene.wheel().center().x, 10.0);
    }

    #[test]
    fn test_line_scene_radius_applies_on_reset() {
        let mut scene = LineScene::new(SceneConfig::new()).unwrap();
        scene.set_rolling_radius(25.0).unwrap();
        assert_relative_eq!(scene.wheel().radius(), 50.0);
        scene.reset();
        assert_relative_eq!(scene.wheel().radius(), 25.0);
        assert!(scene.set_rolling_radius(0.0).is_err());
        assert_relative_eq!(scene.rolling_radius(), 25.0);
    }

    #[test]
    fn test_circle_scene_restarts_each_revolution() {
        let mut scene = CircleScene::new(SceneConfig::new()).unwrap();
        for _ in 0..89 {
            scene.step(4.0);
        }
        assert_eq!(scene.path().len(), 89);
        assert_eq!(scene.revolutions(), 0);

        scene.step(4.0);
        assert_eq!(scene.revolutions(), 1);
        assert!(scene.path().is_empty());
        assert_abs_diff_eq!(scene.child().angle(), 0.0);
    }

    #[test]
    fn test_circle_scene_counts_every_turn_of_fast_steps() {
        let mut scene = CircleScene::new(SceneConfig::new()).unwrap();
        for _ in 0..5 {
            scene.step(720.0);
        }
        assert_eq!(scene.revolutions(), 10);
        assert_eq!(scene.frame(), 5);

        let mut scene = CircleScene::new(SceneConfig::new()).unwrap();
        scene.step(500.0);
        assert_eq!(scene.revolutions(), 1);
        assert!(scene.path().is_empty());
        // 140 degrees left over, so the next 200 degree step stays in this turn.
        scene.step(200.0);
        assert_eq!(scene.revolutions(), 1);
        assert_eq!(scene.path().len(), 1);
        scene.step(20.0);
        assert_eq!(scene.revolutions(), 2);
        assert!(scene.path().is_empty());
    }

    #[test]
    fn test_circle_scene_applies_radius_at_revolution() {
        let mut scene = CircleScene::new(SceneConfig::new()).unwrap();
        scene.step(10.0);
        scene.set_rolling_radius(20.0).unwrap();
        assert_relative_eq!(scene.child().radius(), 15.0);

        for _ in 0..35 {
            scene.step(10.0);
        }
        assert_relative_eq!(scene.child().radius(), 20.0);
        let gap = (scene.child().center() - scene.track().rim_point()).norm();
        assert_relative_eq!(gap, 20.0, max_relative = 1e-9);
    }

    #[test]
    fn test_circle_scene_reset() {
        let mut scene = CircleScene::new(SceneConfig::new()).unwrap();
        for _ in 0..10 {
            scene.step(7.0);
        }
        scene.reset();
        assert_eq!(scene.frame(), 0);
        assert!(scene.path().is_empty());
        assert_abs_diff_eq!(scene.track().angle(), 0.0);
        assert_eq!(scene.wheels().len(), 2);
    }

    #[test]
    fn test_extent_contains_wheels() {
        let mut scene = CircleScene::new(SceneConfig::new()).unwrap();
        scene.step(45.0);
        let (min, max) = scene.extent();
        for wheel in scene.wheels() {
            let c = wheel.center();
            assert!(c.x - wheel.radius() >= min.x - 1e-9 && c.x + wheel.radius() <= max.x + 1e-9);
            assert!(c.y - wheel.radius() >= min.y - 1e-9 && c.y + wheel.radius() <= max.y + 1e-9);
        }
    }
}
