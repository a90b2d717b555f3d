//! Kinematics of wheels rolling without slipping.
//!
//! A [`RollingWheel`] rolls along straight paths; a [`RollingWheelOnWheel`]
//! rolls along the rim of another wheel and traces the curve drawn by its own
//! rim point. The [`scene`] module wraps both into per-applet contexts that a
//! frame driver steps once per frame, and [`export`] writes traced curves to
//! SVG.
//!
//! ```
//! use cycloid::{RollingWheel, RollingWheelOnWheel};
//! use cycloid::math::Point;
//!
//! let mut track = RollingWheel::new(Point::origin(), 50.0, 0.0).unwrap();
//! let mut child = RollingWheelOnWheel::attached_to(&track, 15.0).unwrap();
//!
//! for _ in 0..90 {
//!     track.rotate_in_place(4.0);
//!     child.advance_one_step(&track);
//! }
//! assert_eq!(child.path().len(), 90);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod math;
pub mod on_wheel;
pub mod path;
pub mod scene;
pub mod wheel;

pub use error::{WheelError, WheelResult};
pub use on_wheel::RollingWheelOnWheel;
pub use path::TracedPath;
pub use scene::{CircleScene, LineScene, Scene, SceneConfig};
pub use wheel::{RollingWheel, SubscriptionId, Wheel, WheelChange};
