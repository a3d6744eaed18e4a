//! The compositor: world-unit shapes in, canvas pixels out.
//!
//! The canvas transform is a uniform scale (aspect preserved) plus a
//! translation to the projected bounding box's origin, with the Y axis
//! flipped so north is up.

use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::error::{RenderError, RenderResult};
use super::label::LabelFont;
use super::shape::{GeoKind, Shape, WorldBounds, WorldPoint};
use super::style::{
    self, DARK_GRAY, GRAY, LEISURE_FILL_ALPHA, LIGHT_BLUE, LIGHT_GRAY, Pen, Rgb, THIN_STROKE,
    WHITE,
};
use crate::map::GeometryType;

/// Label glyph size in canvas pixels (12 pt at 96 dpi).
const LABEL_PX: f32 = 16.0;

/// World-units → canvas-pixels mapping for one request.
#[derive(Debug, Clone, Copy)]
struct CanvasTransform {
    scale: f64,
    min_x: f64,
    min_y: f64,
    height: f64,
}

impl CanvasTransform {
    fn new(bounds: &WorldBounds, size: u32) -> Self {
        let side = f64::from(size);
        let scale = (side / (bounds.max_x - bounds.min_x)).min(side / (bounds.max_y - bounds.min_y));
        Self {
            // A single-point extent degenerates to an infinite scale;
            // pin it so the point lands on the canvas instead of at NaN.
            scale: if scale.is_finite() { scale } else { 1.0 },
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            height: side,
        }
    }

    fn apply(&self, (x, y): WorldPoint) -> (f32, f32) {
        let px = (x - self.min_x) * self.scale;
        let py = self.height - (y - self.min_y) * self.scale;
        (px as f32, py as f32)
    }
}

/// Rasterizes the draw-ordered shapes onto a white `size`×`size` canvas.
///
/// Shapes with fewer than two coordinates are degenerate and dropped.
/// An empty shape list yields the plain white canvas.
pub fn rasterize(
    shapes: &[Shape],
    bounds: &WorldBounds,
    size: u32,
    font: Option<&LabelFont>,
) -> RenderResult<Pixmap> {
    let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::InvalidCanvasSize(size))?;
    pixmap.fill(WHITE.opaque());

    if shapes.is_empty() || !bounds.is_bounded() {
        return Ok(pixmap);
    }
    let transform = CanvasTransform::new(bounds, size);

    for shape in shapes {
        draw_shape(&mut pixmap, shape, &transform, font);
    }
    Ok(pixmap)
}

fn draw_shape(
    pixmap: &mut Pixmap,
    shape: &Shape,
    transform: &CanvasTransform,
    font: Option<&LabelFont>,
) {
    if shape.points().len() < 2 {
        return;
    }

    match shape {
        Shape::GeoFeature {
            kind,
            geometry,
            points,
        } => {
            let color = style::geo_color(*kind);
            if *geometry != GeometryType::Polygon {
                stroke(pixmap, points, transform, color, THIN_STROKE, None);
            } else if matches!(kind, GeoKind::Leisure) {
                stroke(pixmap, points, transform, color, THIN_STROKE, None);
                fill(pixmap, points, transform, color.with_alpha(LEISURE_FILL_ALPHA));
            } else {
                fill(pixmap, points, transform, color.opaque());
            }
        }
        Shape::Waterway { geometry, points } => {
            if *geometry == GeometryType::Polygon {
                fill(pixmap, points, transform, LIGHT_BLUE.opaque());
            } else {
                stroke(pixmap, points, transform, LIGHT_BLUE, THIN_STROKE, None);
            }
        }
        Shape::Railway { points } => {
            stroke(pixmap, points, transform, DARK_GRAY, 2.0, None);
            // The odd (2,4,2) pattern is carried doubled; dash arrays
            // must have even length.
            let dash = StrokeDash::new(vec![2.0, 4.0, 2.0, 2.0, 4.0, 2.0], 0.0);
            stroke(pixmap, points, transform, LIGHT_GRAY, THIN_STROKE, dash);
        }
        Shape::Border { points } => {
            stroke(pixmap, points, transform, GRAY, 2.0, None);
        }
        Shape::Road {
            kind,
            geometry,
            points,
        } => {
            // Polygon roads (plazas mapped as areas) are not drawn.
            if *geometry == GeometryType::Polygon {
                return;
            }
            let (fg, bg) = style::road_pens(*kind);
            stroke_pen(pixmap, points, transform, bg);
            stroke_pen(pixmap, points, transform, fg);
        }
        Shape::Label { text, points } => {
            if let Some(font) = font {
                let (x, y) = transform.apply(points[0]);
                font.draw_text(pixmap, text, x, y, LABEL_PX, style::BLACK);
            }
        }
    }
}

fn path_from(points: &[WorldPoint], transform: &CanvasTransform, close: bool) -> Option<Path> {
    let mut builder = PathBuilder::new();
    let (x, y) = transform.apply(points[0]);
    builder.move_to(x, y);
    for &point in &points[1..] {
        let (x, y) = transform.apply(point);
        builder.line_to(x, y);
    }
    if close {
        builder.close();
    }
    builder.finish()
}

fn stroke_pen(pixmap: &mut Pixmap, points: &[WorldPoint], transform: &CanvasTransform, pen: Pen) {
    stroke(pixmap, points, transform, pen.color, pen.width, None);
}

fn stroke(
    pixmap: &mut Pixmap,
    points: &[WorldPoint],
    transform: &CanvasTransform,
    color: Rgb,
    width: f32,
    dash: Option<StrokeDash>,
) {
    let Some(path) = path_from(points, transform, false) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color.opaque());
    paint.anti_alias = true;
    let stroke = Stroke {
        width,
        dash,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn fill(
    pixmap: &mut Pixmap,
    points: &[WorldPoint],
    transform: &CanvasTransform,
    color: tiny_skia::Color,
) {
    let Some(path) = path_from(points, transform, true) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}
