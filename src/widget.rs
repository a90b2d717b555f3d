use crate::graphics::{draw_circle, draw_line, draw_polyline, Canvas, Viewport};
use crate::state::AppState;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::style::Color;
use cycloid::math::Point;
use std::io::{self, Write};
use std::time::Instant;
use tracing::debug;

/// Step applied by the speed keys, in degrees per frame
const SPEED_STEP: f64 = 0.5;
/// Step applied by the radius keys, in world units
const RADIUS_STEP: f64 = 1.0;

/// What the frame loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Renders a scene into the terminal and reacts to keys
pub struct SceneWidget {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Terminal size in cells
    size: (u16, u16),
}

impl SceneWidget {
    pub fn new(size: (u16, u16)) -> Self {
        SceneWidget {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            size,
        }
    }

    /// Handle events for the scene widget
    pub fn event(&mut self, event: &Event, data: &mut AppState) -> Control {
        match event {
            Event::Resize(width, height) => {
                self.size = (*width, *height);
            }
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    data.debug = !data.debug;
                }
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    data.paused = !data.paused;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Control::Quit;
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    if !data.paused {
                        data.scene.reset();
                    }
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    data.speed += SPEED_STEP;
                }
                KeyCode::Char('-') => {
                    data.speed -= SPEED_STEP;
                }
                KeyCode::Char(']') => adjust_radius(data, RADIUS_STEP),
                KeyCode::Char('[') => adjust_radius(data, -RADIUS_STEP),
                _ => {}
            },
            _ => {}
        }
        Control::Continue
    }

    /// Paint the scene widget
    pub fn paint<W: Write>(&mut self, out: &mut W, data: &AppState) -> io::Result<()> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let canvas = self.render(data);
        canvas.flush_to(out)
    }

    /// Draws the current frame into a fresh canvas
    pub fn render(&self, data: &AppState) -> Canvas {
        let width = self.size.0 as usize;
        let height = self.size.1 as usize;
        let mut canvas = Canvas::new(width, height);

        let (min, max) = data.scene.extent();
        let view = Viewport::fit(min, max, width, height);

        if data.scene.name() == "line" {
            let start = view.project(&Point::new(min.x, 0.0));
            let end = view.project(&Point::new(max.x, 0.0));
            draw_line(&mut canvas, start, end, '_', Color::DarkGrey);
        }

        draw_polyline(&mut canvas, &view, data.scene.path(), '*', Color::Red);

        for wheel in data.scene.wheels() {
            let center = wheel.center();
            let rim = wheel.rim_point();
            draw_circle(&mut canvas, &view, &center, wheel.radius(), Color::White);
            draw_line(&mut canvas, view.project(&center), view.project(&rim), '-', Color::Grey);
            let [cx, cy] = view.project(&center);
            canvas.plot(cx.round() as isize, cy.round() as isize, '+', Color::Yellow);
            let [rx, ry] = view.project(&rim);
            canvas.plot(rx.round() as isize, ry.round() as isize, 'o', Color::Cyan);
        }

        // Add debug info if debug mode is enabled
        if data.debug {
            let mut lines = vec![
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Scene: {}  Frame: {}", data.scene.name(), data.scene.frame()),
            ];
            for (i, wheel) in data.scene.wheels().iter().enumerate() {
                lines.push(format!(
                    "Wheel {}: center ({:.2}, {:.2}) r {:.2} angle {:.2}",
                    i,
                    wheel.center().x,
                    wheel.center().y,
                    wheel.radius(),
                    wheel.angle_degrees()
                ));
            }
            lines.push(format!("Path points: {}", data.scene.path().len()));
            lines.push(format!(
                "Speed: {:.2} deg/frame  Next radius: {:.2}",
                data.speed,
                data.scene.rolling_radius()
            ));
            lines.push(format!("FPS: {:.2}", self.fps));
            for (row, line) in lines.iter().enumerate() {
                canvas.draw_text(1, row as isize, line, Color::White);
            }
        }

        // Display 'Paused' if the simulation is paused
        if data.paused {
            let text = "Paused";
            let x = (width as isize - text.len() as isize) / 2;
            let y = height as isize / 2;
            canvas.draw_text(x, y, text, Color::White);
        }

        canvas
    }
}

/// Changes the radius the scene uses after its next restart
fn adjust_radius(data: &mut AppState, delta: f64) {
    let radius = data.scene.rolling_radius() + delta;
    if let Err(err) = data.scene.set_rolling_radius(radius) {
        debug!(%err, "ignoring radius change");
    }
}
