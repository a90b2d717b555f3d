use clap::ValueEnum;
use cycloid::{CircleScene, LineScene, Scene, SceneConfig, WheelResult};

/// Which animation to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// A wheel rolling along a straight line
    Line,
    /// A wheel rolling on the rim of a spinning wheel
    Circle,
}

impl SceneKind {
    pub fn build(self, config: SceneConfig) -> WheelResult<Box<dyn Scene>> {
        Ok(match self {
            SceneKind::Line => Box::new(LineScene::new(config)?),
            SceneKind::Circle => Box::new(CircleScene::new(config)?),
        })
    }
}

/// Application state
pub struct AppState {
    /// The running animation
    pub scene: Box<dyn Scene>,
    /// Degrees turned per frame
    pub speed: f64,
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
}

impl AppState {
    pub fn new(kind: SceneKind, config: SceneConfig, speed: f64) -> WheelResult<Self> {
        Ok(AppState {
            scene: kind.build(config)?,
            speed,
            debug: false,
            paused: false,
        })
    }

    /// Advances the scene unless paused
    pub fn tick(&mut self) {
        if !self.paused {
            self.scene.step(self.speed);
        }
    }
}
