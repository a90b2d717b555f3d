//! SVG output of traced curves.

use std::path::Path;

use svg::node::element::path::Data;
use svg::node::element::{Circle, Line, Path as SvgPath};
use svg::Document;

use crate::error::WheelResult;
use crate::math::Point;
use crate::path::TracedPath;
use crate::wheel::Wheel;

/// Space left around the drawing, in world units
const MARGIN: f64 = 10.0;

/// Builds a document showing `path` and the outline of every wheel.
///
/// The `viewBox` covers the curve and all wheels. An empty path produces no
/// curve element.
pub fn path_to_svg(path: &TracedPath, wheels: &[&dyn Wheel]) -> Document {
    let (min, max) = drawing_bounds(path, wheels);
    let mut document = Document::new().set(
        "viewBox",
        (
            min.x - MARGIN,
            min.y - MARGIN,
            max.x - min.x + 2.0 * MARGIN,
            max.y - min.y + 2.0 * MARGIN,
        ),
    );

    for wheel in wheels {
        let center = wheel.center();
        let rim = wheel.rim_point();
        document = document
            .add(
                Circle::new()
                    .set("cx", center.x)
                    .set("cy", center.y)
                    .set("r", wheel.radius())
                    .set("fill", "none")
                    .set("stroke", "gray"),
            )
            .add(
                Line::new()
                    .set("x1", center.x)
                    .set("y1", center.y)
                    .set("x2", rim.x)
                    .set("y2", rim.y)
                    .set("stroke", "gray"),
            );
    }

    if let Some((first, rest)) = path.points().split_first() {
        let data = rest.iter().fold(
            Data::new().move_to((first.x as f32, first.y as f32)),
            |data, p| data.line_to((p.x as f32, p.y as f32)),
        );
        document = document.add(
            SvgPath::new()
                .set("d", data)
                .set("fill", "none")
                .set("stroke", "red")
                .set("stroke-width", 1),
        );
    }

    document
}

/// Writes `document` to `file`.
pub fn save(file: impl AsRef<Path>, document: &Document) -> WheelResult<()> {
    svg::save(file, document)?;
    Ok(())
}

fn drawing_bounds(path: &TracedPath, wheels: &[&dyn Wheel]) -> (Point, Point) {
    let mut bounds = path.bounds();
    for wheel in wheels {
        let c = wheel.center();
        let r = wheel.radius();
        let (lo, hi) = (Point::new(c.x - r, c.y - r), Point::new(c.x + r, c.y + r));
        bounds = Some(match bounds {
            None => (lo, hi),
            Some((min, max)) => (
                Point::new(min.x.min(lo.x), min.y.min(lo.y)),
                Point::new(max.x.max(hi.x), max.y.max(hi.y)),
            ),
        });
    }
    bounds.unwrap_or((Point::origin(), Point::origin()))
}
