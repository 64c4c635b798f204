//! Drawing primitives → `kurbo` paths.
//!
//! Every drawing kind the host can produce is turned into a `BezPath` in the
//! drawing's local space. Returned paths are owned by the caller.

use fog_core::model::{AuthoritativeItem, ItemKind, PathCmd, ShapeType};
use kurbo::{BezPath, Ellipse, PathEl, Point, Rect, Shape, Vec2};

/// Tolerance used when converting analytic shapes (ellipses) to Béziers.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Build the local-space outline of a drawing. Returns `None` for items
/// that are not drawings.
pub fn drawing_to_path(item: &AuthoritativeItem) -> Option<BezPath> {
    match &item.kind {
        ItemKind::Shape {
            shape_type,
            width,
            height,
        } => Some(shape_to_path(*shape_type, *width, *height)),
        ItemKind::Curve {
            points,
            tension,
            closed,
        } => {
            let closed = *closed || item.style.fill_opacity > 0.0;
            Some(cardinal_spline(points, *tension, closed))
        }
        ItemKind::Path { commands, .. } => Some(commands_to_path(commands)),
        ItemKind::Line { start, end } => {
            let mut path = BezPath::new();
            path.move_to(*start);
            path.line_to(*end);
            Some(path)
        }
        ItemKind::Image | ItemKind::Other => None,
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

fn shape_to_path(shape_type: ShapeType, width: f64, height: f64) -> BezPath {
    match shape_type {
        ShapeType::Rectangle => {
            let mut path = BezPath::new();
            path.move_to((0.0, 0.0));
            path.line_to((width, 0.0));
            path.line_to((width, height));
            path.line_to((0.0, height));
            path.close_path();
            path
        }
        ShapeType::Circle => {
            let bounds = Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0);
            Ellipse::from_rect(bounds).to_path(SHAPE_TOLERANCE)
        }
        ShapeType::Triangle => {
            let mut path = BezPath::new();
            path.move_to((0.0, 0.0));
            path.line_to((width / 2.0, height));
            path.line_to((-width / 2.0, height));
            path.close_path();
            path
        }
        ShapeType::Hexagon => regular_polygon(width.min(height) / 2.0, 6),
    }
}

/// A closed regular polygon centred on the origin with its first vertex
/// straight up.
pub fn regular_polygon(radius: f64, subdivisions: usize) -> BezPath {
    let mut path = BezPath::new();
    if subdivisions < 2 {
        return path;
    }
    let top = Vec2::new(0.0, -radius);
    for division in 0..subdivisions {
        let angle = (360.0 / subdivisions as f64 * division as f64).to_radians();
        let p = rotate(top, angle).to_point();
        if division == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

fn rotate(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

// ─── Curves ──────────────────────────────────────────────────────────────

/// Cardinal spline through `points` as cubic Béziers. `tension` 0 gives
/// straight segments; 0.5 is a Catmull-Rom spline.
pub fn cardinal_spline(points: &[Point], tension: f64, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let n = points.len();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    if n == 1 {
        return path;
    }

    let at = |i: isize| -> Point {
        if closed {
            points[i.rem_euclid(n as isize) as usize]
        } else {
            points[i.clamp(0, n as isize - 1) as usize]
        }
    };

    let segment_count = if closed { n } else { n - 1 };
    for i in 0..segment_count as isize {
        let p0 = at(i - 1);
        let p1 = at(i);
        let p2 = at(i + 1);
        let p3 = at(i + 2);
        let c1 = p1 + (p2 - p0) * (tension / 3.0);
        let c2 = p2 - (p3 - p1) * (tension / 3.0);
        path.curve_to(c1, c2, p2);
    }
    if closed {
        path.close_path();
    }
    path
}

// ─── Commands ────────────────────────────────────────────────────────────

/// Host path commands → `BezPath`. Conics are approximated by a single
/// cubic per segment.
pub fn commands_to_path(commands: &[PathCmd]) -> BezPath {
    let mut path = BezPath::new();
    let mut current = Point::ORIGIN;
    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo(x, y) => path.move_to((x, y)),
            PathCmd::LineTo(x, y) => path.line_to((x, y)),
            PathCmd::QuadTo(cx, cy, x, y) => path.quad_to((cx, cy), (x, y)),
            PathCmd::ConicTo(cx, cy, x, y, w) => {
                let (c1, c2) = conic_to_cubic(current, Point::new(cx, cy), Point::new(x, y), w);
                path.curve_to(c1, c2, Point::new(x, y));
            }
            PathCmd::CubicTo(c1x, c1y, c2x, c2y, x, y) => {
                path.curve_to((c1x, c1y), (c2x, c2y), (x, y))
            }
            PathCmd::Close => path.close_path(),
        }
        if let Some(anchor) = cmd.anchor() {
            current = anchor;
        }
    }
    path
}

/// `BezPath` → host path commands.
pub fn path_to_commands(path: &BezPath) -> Vec<PathCmd> {
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => PathCmd::MoveTo(p.x, p.y),
            PathEl::LineTo(p) => PathCmd::LineTo(p.x, p.y),
            PathEl::QuadTo(c, p) => PathCmd::QuadTo(c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c1, c2, p) => PathCmd::CubicTo(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathEl::ClosePath => PathCmd::Close,
        })
        .collect()
}

/// Control points of the cubic approximating a rational quadratic with
/// weight `w`. Exact for `w == 1`.
fn conic_to_cubic(p0: Point, p1: Point, p2: Point, w: f64) -> (Point, Point) {
    let k = if w.is_finite() && w > 0.0 {
        4.0 * w / (3.0 * (1.0 + w))
    } else {
        2.0 / 3.0
    };
    (p0 + (p1 - p0) * k, p2 + (p1 - p2) * k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_core::id::ItemId;
    use kurbo::ParamCurve;

    fn shape(shape_type: ShapeType, w: f64, h: f64) -> AuthoritativeItem {
        AuthoritativeItem::new(
            ItemId::intern("shape"),
            ItemKind::Shape {
                shape_type,
                width: w,
                height: h,
            },
        )
    }

    #[test]
    fn rectangle_starts_top_left_clockwise() {
        let path = drawing_to_path(&shape(ShapeType::Rectangle, 100.0, 50.0)).unwrap();
        let cmds = path_to_commands(&path);
        assert_eq!(cmds[0], PathCmd::MoveTo(0.0, 0.0));
        assert_eq!(cmds[1], PathCmd::LineTo(100.0, 0.0));
        assert_eq!(cmds[2], PathCmd::LineTo(100.0, 50.0));
        assert_eq!(cmds.last(), Some(&PathCmd::Close));
    }

    #[test]
    fn circle_is_centred() {
        let path = drawing_to_path(&shape(ShapeType::Circle, 40.0, 20.0)).unwrap();
        let bbox = path.bounding_box();
        assert!((bbox.x0 + 20.0).abs() < 1e-6);
        assert!((bbox.y1 - 10.0).abs() < 1e-6);
    }

    #[test]
    fn hexagon_has_six_vertices_on_radius() {
        let path = regular_polygon(10.0, 6);
        let vertices: Vec<Point> = path.elements().iter().filter_map(|el| el.end_point()).collect();
        assert_eq!(vertices.len(), 6);
        assert!((vertices[0].y + 10.0).abs() < 1e-9);
        for v in vertices {
            assert!((v.to_vec2().hypot() - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_tension_spline_is_straight() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let path = cardinal_spline(&points, 0.0, false);
        for el in path.elements() {
            if let PathEl::CurveTo(c1, c2, _) = el {
                assert!(points.contains(c1));
                assert!(points.contains(c2));
            }
        }
    }

    #[test]
    fn closed_spline_wraps() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)];
        let path = cardinal_spline(&points, 0.5, true);
        let curves = path.elements().iter().filter(|el| matches!(el, PathEl::CurveTo(..))).count();
        assert_eq!(curves, 3);
        assert_eq!(path.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn unit_weight_conic_matches_quad() {
        let cmds = [PathCmd::MoveTo(0.0, 0.0), PathCmd::ConicTo(5.0, 10.0, 10.0, 0.0, 1.0)];
        let conic = commands_to_path(&cmds);
        let mut quad = BezPath::new();
        quad.move_to((0.0, 0.0));
        quad.quad_to((5.0, 10.0), (10.0, 0.0));
        let a = conic.segments().next().unwrap().eval(0.5);
        let b = quad.segments().next().unwrap().eval(0.5);
        assert!((a - b).hypot() < 1e-9);
    }

    #[test]
    fn images_have_no_path() {
        let item = AuthoritativeItem::new(ItemId::intern("img"), ItemKind::Image);
        assert!(drawing_to_path(&item).is_none());
    }
}
