//! Sketch renderer abstraction and its tiny-skia implementation.

use crate::raster::to_skia_color;
use crate::rough::{ROUGH_PASSES, hand_drawn};
use kurbo::{BezPath, PathEl, Point, Shape as KurboShape};
use sketchpad_core::shapes::{Freehand, Polygon, Shape, ShapeTrait};
use sketchpad_core::style::{Color, LineJoin, ToolStyle};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

/// Fraction of the stroke roughness applied to fills.
const FILL_ROUGHNESS: f64 = 0.3;

/// Everything needed to draw one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeOptions {
    pub width: f64,
    pub color: Color,
    /// Fill for closed shapes, opacity already applied.
    pub fill: Option<Color>,
    /// `[dash, gap]`, or `None` for a solid stroke.
    pub dash: Option<[f64; 2]>,
    pub join: LineJoin,
    pub roughness: f64,
    /// Stable per-gesture seed for the hand-drawn effect.
    pub seed: u32,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self::from_style(&ToolStyle::default(), 0)
    }
}

impl StrokeOptions {
    pub fn from_style(style: &ToolStyle, seed: u32) -> Self {
        Self {
            width: style.stroke_width(),
            color: style.stroke_color(),
            fill: style.effective_fill(),
            dash: style.dash_pattern(),
            join: style.line_join(),
            roughness: style.roughness(),
            seed,
        }
    }

    /// Radius of the dot drawn for a zero-length stroke.
    pub fn dot_radius(&self) -> f64 {
        (self.width / 2.0).max(0.5)
    }
}

/// Drawing primitives used by the tools.
pub trait SketchRenderer {
    /// Stroke a path, and fill it first when `closed` and a fill is set.
    fn path(&mut self, path: &BezPath, closed: bool, opts: &StrokeOptions);

    /// Filled dot in the stroke color.
    fn dot(&mut self, at: Point, opts: &StrokeOptions);

    fn line(&mut self, from: Point, to: Point, opts: &StrokeOptions) {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        self.path(&path, false, opts);
    }

    fn polygon(&mut self, vertices: &[Point], opts: &StrokeOptions) {
        let path = Polygon::new(vertices.to_vec()).to_path();
        self.path(&path, true, opts);
    }

    fn circle(&mut self, center: Point, radius: f64, opts: &StrokeOptions) {
        let path = kurbo::Circle::new(center, radius).to_path(0.1);
        self.path(&path, true, opts);
    }

    /// Smooth curve through `points`.
    fn curve(&mut self, points: &[Point], opts: &StrokeOptions) {
        let path = Freehand::from_points(points.to_vec()).to_path();
        self.path(&path, false, opts);
    }
}

/// Draw a tool shape through the renderer primitives.
pub fn draw_shape<R: SketchRenderer + ?Sized>(renderer: &mut R, shape: &Shape, opts: &StrokeOptions) {
    match shape {
        Shape::Line(line) => renderer.line(line.start, line.end, opts),
        Shape::Polygon(polygon) => renderer.polygon(&polygon.vertices, opts),
        Shape::Circle(circle) => renderer.circle(circle.center, circle.radius, opts),
        Shape::Arrow(arrow) => renderer.path(&arrow.to_path(), false, opts),
        Shape::Freehand(freehand) => renderer.curve(&freehand.points, opts),
    }
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

fn skia_stroke(opts: &StrokeOptions) -> Stroke {
    let line_join = match opts.join {
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
    };
    Stroke {
        width: opts.width as f32,
        line_cap: tiny_skia::LineCap::Round,
        line_join,
        dash: opts
            .dash
            .and_then(|[dash, gap]| StrokeDash::new(vec![dash as f32, gap as f32], 0.0)),
        ..Stroke::default()
    }
}

/// Renders onto a tiny-skia pixmap.
pub struct PixmapRenderer<'a> {
    pixmap: &'a mut Pixmap,
}

impl<'a> PixmapRenderer<'a> {
    pub fn new(pixmap: &'a mut Pixmap) -> Self {
        Self { pixmap }
    }

    fn stroke(&mut self, path: &BezPath, paint: &Paint<'_>, stroke: &Stroke) {
        // Degenerate paths (a single point, empty bounds) are skipped.
        if let Some(path) = to_skia_path(path) {
            self.pixmap
                .stroke_path(&path, paint, stroke, Transform::identity(), None);
        }
    }
}

impl SketchRenderer for PixmapRenderer<'_> {
    fn path(&mut self, path: &BezPath, closed: bool, opts: &StrokeOptions) {
        let rough = opts.roughness > 0.0;

        // Fill if present (slightly roughened, single pass)
        if let (true, Some(fill)) = (closed, opts.fill) {
            let fill_path = if rough {
                hand_drawn(path, opts.roughness * FILL_ROUGHNESS, opts.seed, 0)
            } else {
                path.clone()
            };
            if let Some(fill_path) = to_skia_path(&fill_path) {
                self.pixmap.fill_path(
                    &fill_path,
                    &paint_for(fill),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }

        let paint = paint_for(opts.color);
        let stroke = skia_stroke(opts);
        if rough {
            for pass in 0..ROUGH_PASSES {
                let wobbled = hand_drawn(path, opts.roughness, opts.seed, pass);
                self.stroke(&wobbled, &paint, &stroke);
            }
        } else {
            self.stroke(path, &paint, &stroke);
        }
    }

    fn dot(&mut self, at: Point, opts: &StrokeOptions) {
        let radius = opts.dot_radius() as f32;
        if let Some(circle) = PathBuilder::from_circle(at.x as f32, at.y as f32, radius) {
            self.pixmap.fill_path(
                &circle,
                &paint_for(opts.color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchpad_core::style::DashStyle;
    use sketchpad_core::tools::ToolKind;

    fn pixmap() -> Pixmap {
        Pixmap::new(40, 40).unwrap()
    }

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let px = pixmap.pixel(x, y).unwrap().demultiply();
        (px.red(), px.green(), px.blue(), px.alpha())
    }

    /// Records primitive calls instead of drawing.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl SketchRenderer for Recorder {
        fn path(&mut self, _path: &BezPath, closed: bool, _opts: &StrokeOptions) {
            self.calls.push(format!("path closed={closed}"));
        }

        fn dot(&mut self, _at: Point, _opts: &StrokeOptions) {
            self.calls.push("dot".to_string());
        }

        fn circle(&mut self, _center: Point, radius: f64, _opts: &StrokeOptions) {
            self.calls.push(format!("circle r={radius}"));
        }
    }

    #[test]
    fn test_options_from_style() {
        let style = ToolStyle::default()
            .with_stroke_width(4.0)
            .unwrap()
            .with_dash(DashStyle::Big)
            .with_filled(true);
        let opts = StrokeOptions::from_style(&style, 9);
        assert_eq!(opts.dash, Some([5.0, 14.0]));
        assert_eq!(opts.seed, 9);
        assert_eq!(opts.fill, Some(Color::WHITE.with_opacity(0.3)));
        assert!((opts.dot_radius() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dot_radius_floor() {
        let opts = StrokeOptions {
            width: 0.2,
            ..StrokeOptions::default()
        };
        assert!((opts.dot_radius() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_draw_shape_dispatch() {
        let mut recorder = Recorder::default();
        let opts = StrokeOptions::default();
        let a = Point::new(0.0, 0.0);
        let p = Point::new(10.0, 0.0);

        for tool in [ToolKind::Line, ToolKind::Square, ToolKind::Circle, ToolKind::Arrow] {
            draw_shape(&mut recorder, &tool.shape(a, p).unwrap(), &opts);
        }
        assert_eq!(
            recorder.calls,
            vec!["path closed=false", "path closed=true", "circle r=5", "path closed=false"]
        );
    }

    #[test]
    fn test_line_uses_stroke_color() {
        let mut target = pixmap();
        let opts = StrokeOptions {
            width: 4.0,
            color: Color::rgb(0, 0, 255),
            ..StrokeOptions::default()
        };
        PixmapRenderer::new(&mut target).line(Point::new(2.0, 20.0), Point::new(38.0, 20.0), &opts);

        assert_eq!(rgba(&target, 20, 20), (0, 0, 255, 255));
        assert_eq!(rgba(&target, 20, 5).3, 0);
    }

    #[test]
    fn test_fill_only_when_enabled() {
        let square = [
            Point::new(5.0, 5.0),
            Point::new(35.0, 5.0),
            Point::new(35.0, 35.0),
            Point::new(5.0, 35.0),
        ];

        let mut unfilled = pixmap();
        PixmapRenderer::new(&mut unfilled).polygon(&square, &StrokeOptions::default());
        assert_eq!(rgba(&unfilled, 20, 20).3, 0);

        let mut filled = pixmap();
        let opts = StrokeOptions {
            fill: Some(Color::rgb(255, 0, 0)),
            ..StrokeOptions::default()
        };
        PixmapRenderer::new(&mut filled).polygon(&square, &opts);
        assert_eq!(rgba(&filled, 20, 20), (255, 0, 0, 255));
    }

    #[test]
    fn test_open_shapes_are_never_filled() {
        let mut target = pixmap();
        let opts = StrokeOptions {
            fill: Some(Color::rgb(255, 0, 0)),
            ..StrokeOptions::default()
        };
        PixmapRenderer::new(&mut target).curve(
            &[Point::new(5.0, 5.0), Point::new(35.0, 5.0), Point::new(20.0, 35.0)],
            &opts,
        );
        assert_eq!(rgba(&target, 20, 12).3, 0);
    }

    #[test]
    fn test_dot() {
        let mut target = pixmap();
        let opts = StrokeOptions {
            width: 6.0,
            ..StrokeOptions::default()
        };
        PixmapRenderer::new(&mut target).dot(Point::new(20.0, 20.0), &opts);
        assert_eq!(rgba(&target, 20, 20), (0, 0, 0, 255));
        assert_eq!(rgba(&target, 30, 30).3, 0);
    }

    #[test]
    fn test_rough_stroke_is_deterministic() {
        let opts = StrokeOptions {
            width: 2.0,
            roughness: 3.0,
            seed: 77,
            ..StrokeOptions::default()
        };
        let mut first = pixmap();
        let mut second = pixmap();
        PixmapRenderer::new(&mut first).line(Point::new(2.0, 2.0), Point::new(38.0, 38.0), &opts);
        PixmapRenderer::new(&mut second).line(Point::new(2.0, 2.0), Point::new(38.0, 38.0), &opts);
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn test_zero_length_line_does_not_panic() {
        let mut target = pixmap();
        let p = Point::new(10.0, 10.0);
        let mut renderer = PixmapRenderer::new(&mut target);
        renderer.line(p, p, &StrokeOptions::default());
        renderer.circle(p, 0.0, &StrokeOptions::default());
        renderer.curve(&[p], &StrokeOptions::default());
    }
}
