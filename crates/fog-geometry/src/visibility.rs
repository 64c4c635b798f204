//! Light visibility polygons.
//!
//! Walls arrive as world-space polylines. They are cut into segments,
//! crossings between segments are broken, and everything is clipped to the
//! light's square `[P − R, P + R]` together with that square's border. An
//! angular sweep around `P` then yields the region the light can reach.

use crate::boolean::{BoolOp, Ring, cross, crossing, ring_op, winding};
use crate::contour::Polyline;
use fog_core::config::FogConfig;
use fog_core::light::LightConfig;
use kurbo::{Point, Rect, Vec2};
use std::f64::consts::SQRT_2;

/// Angular offset of the side rays cast past every segment end point.
const RAY_EPSILON: f64 = 1e-6;

/// Parameter slack for sight-line blocking.
const SIGHT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }
}

/// Consecutive point pairs of every polyline; zero-length pairs are skipped.
pub fn segments_from_polylines(polylines: &[Polyline]) -> Vec<Segment> {
    polylines
        .iter()
        .flat_map(|line| line.windows(2))
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect()
}

/// Split every segment where it crosses another, so that segments only meet
/// at end points.
pub fn break_intersections(segments: &[Segment]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for (i, seg) in segments.iter().enumerate() {
        let mut splits: Vec<(f64, Point)> = Vec::new();
        for (j, other) in segments.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some((t, _, at)) = crossing(seg.a, seg.b, other.a, other.b)
                && t > SIGHT_EPSILON
                && t < 1.0 - SIGHT_EPSILON
            {
                splits.push((t, at));
            }
        }
        splits.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut from = seg.a;
        for (_, at) in splits {
            if at != from {
                out.push(Segment::new(from, at));
                from = at;
            }
        }
        if from != seg.b {
            out.push(Segment::new(from, seg.b));
        }
    }
    out
}

/// The light's square bounds.
pub fn light_bounds(origin: Point, radius: f64) -> Rect {
    Rect::new(
        origin.x - radius,
        origin.y - radius,
        origin.x + radius,
        origin.y + radius,
    )
}

/// Liang–Barsky clip of `seg` against `rect`.
pub fn clip_segment(seg: Segment, rect: Rect) -> Option<Segment> {
    let d = seg.b - seg.a;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let checks = [
        (-d.x, seg.a.x - rect.x0),
        (d.x, rect.x1 - seg.a.x),
        (-d.y, seg.a.y - rect.y0),
        (d.y, rect.y1 - seg.a.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    let a = if t0 > 0.0 { seg.a + d * t0 } else { seg.a };
    let b = if t1 < 1.0 { seg.a + d * t1 } else { seg.b };
    (a != b).then(|| Segment::new(a, b))
}

/// Visibility polygon of `origin` among `segments`, bounded by the square
/// of half-size `radius`.
pub fn compute_viewport(origin: Point, segments: &[Segment], radius: f64) -> Vec<Point> {
    let bounds = light_bounds(origin, radius);
    let mut clipped: Vec<Segment> = segments
        .iter()
        .filter_map(|&seg| clip_segment(seg, bounds))
        .collect();
    let corners = [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        Point::new(bounds.x0, bounds.y1),
    ];
    for i in 0..4 {
        clipped.push(Segment::new(corners[i], corners[(i + 1) % 4]));
    }
    sweep(origin, &clipped)
}

/// Cast rays at every segment end point (and just either side of it),
/// keeping the nearest hit of each, in angular order.
fn sweep(origin: Point, segments: &[Segment]) -> Vec<Point> {
    let mut angles: Vec<f64> = Vec::with_capacity(segments.len() * 6);
    for seg in segments {
        for p in [seg.a, seg.b] {
            let d = p - origin;
            let angle = d.y.atan2(d.x);
            angles.extend([angle - RAY_EPSILON, angle, angle + RAY_EPSILON]);
        }
    }
    angles.sort_by(f64::total_cmp);
    angles.dedup();

    let mut polygon: Vec<Point> = Vec::with_capacity(angles.len());
    for angle in angles {
        let dir = Vec2::new(angle.cos(), angle.sin());
        let Some(t) = nearest_hit(origin, dir, segments) else {
            continue;
        };
        let hit = origin + dir * t;
        if polygon.last().is_none_or(|last| last.distance(hit) > 1e-9) {
            polygon.push(hit);
        }
    }
    if polygon.len() > 1 && polygon[0].distance(polygon[polygon.len() - 1]) <= 1e-9 {
        polygon.pop();
    }
    polygon
}

fn nearest_hit(origin: Point, dir: Vec2, segments: &[Segment]) -> Option<f64> {
    let mut nearest: Option<f64> = None;
    for seg in segments {
        let s = seg.b - seg.a;
        let denom = cross(dir, s);
        if denom.abs() <= f64::EPSILON * s.hypot() {
            continue;
        }
        let ao = seg.a - origin;
        let t = cross(ao, s) / denom;
        let u = cross(ao, dir) / denom;
        if t > 0.0 && (0.0..=1.0).contains(&u) && nearest.is_none_or(|n| t < n) {
            nearest = Some(t);
        }
    }
    nearest
}

// ─── Cones ───────────────────────────────────────────────────────────────

/// Pie slice approximating a light cone of `outer_angle` degrees.
///
/// `facing` is in degrees: 0 faces up (−y) and angles grow clockwise. The
/// arc sits at `radius · √2` so the slice covers the light's square.
pub fn cone_polygon(origin: Point, radius: f64, outer_angle: f64, facing: f64, samples: usize) -> Ring {
    let samples = samples.max(1);
    let reach = radius * SQRT_2;
    let half = outer_angle.clamp(0.0, 360.0) / 2.0;
    let mut ring = vec![origin];
    for k in 0..=(2 * samples) {
        let degrees = facing - half + half * k as f64 / samples as f64;
        let radians = (degrees - 90.0).to_radians();
        ring.push(origin + Vec2::new(radians.cos(), radians.sin()) * reach);
    }
    ring
}

/// Visibility polygon for a light at `origin` in world space.
///
/// `rotation` is the light item's own rotation; the light's configured
/// rotation is added on top when aiming a cone.
pub fn light_polygon(
    origin: Point,
    walls: &[Polyline],
    light: &LightConfig,
    rotation: f64,
    config: &FogConfig,
) -> Vec<Point> {
    let radius = light.radius();
    let segments = break_intersections(&segments_from_polylines(walls));
    let polygon = compute_viewport(origin, &segments, radius);
    if !light.is_coned() {
        return polygon;
    }
    let facing = rotation + light.rotation.unwrap_or(0.0);
    let cone = cone_polygon(origin, radius, light.outer_angle(), facing, config.cone_samples);
    ring_op(&[polygon], &[cone], BoolOp::Intersection)
        .into_iter()
        .max_by(|a, b| ring_area(a).total_cmp(&ring_area(b)))
        .unwrap_or_default()
}

fn ring_area(ring: &Ring) -> f64 {
    let n = ring.len();
    ((0..n)
        .map(|i| cross(ring[i].to_vec2(), ring[(i + 1) % n].to_vec2()))
        .sum::<f64>()
        / 2.0)
        .abs()
}

// ─── Line of sight ───────────────────────────────────────────────────────

/// Whether a light at `from` reaches `to`: `to` lies inside the light's
/// square and no segment crosses the sight line between them. Classifies
/// points the same way as [`compute_viewport`]'s polygon.
pub fn line_of_sight(from: Point, to: Point, segments: &[Segment], radius: f64) -> bool {
    let d = to - from;
    if d.x.abs() > radius || d.y.abs() > radius {
        return false;
    }
    !segments.iter().any(|seg| {
        crossing(from, to, seg.a, seg.b)
            .is_some_and(|(t, _, _)| t > SIGHT_EPSILON && t < 1.0 - SIGHT_EPSILON)
    })
}

/// Nonzero containment test for a visibility polygon.
pub fn polygon_contains(polygon: &[Point], p: Point) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    winding(&[polygon.to_vec()], p) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_are_broken() {
        let segments = [
            Segment::new(Point::new(-10.0, 0.0), Point::new(10.0, 0.0)),
            Segment::new(Point::new(0.0, -10.0), Point::new(0.0, 10.0)),
        ];
        let broken = break_intersections(&segments);
        assert_eq!(broken.len(), 4);
        assert!(broken.iter().all(|s| s.a == Point::ORIGIN || s.b == Point::ORIGIN));
    }

    #[test]
    fn clip_trims_to_bounds() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let seg = clip_segment(Segment::new(Point::new(-5.0, 5.0), Point::new(15.0, 5.0)), rect).unwrap();
        assert_eq!(seg, Segment::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0)));
        assert!(clip_segment(Segment::new(Point::new(-5.0, -5.0), Point::new(-1.0, -1.0)), rect).is_none());
    }

    #[test]
    fn open_space_is_the_square() {
        let polygon = compute_viewport(Point::ORIGIN, &[], 10.0);
        assert!(polygon_contains(&polygon, Point::new(9.0, 9.0)));
        assert!(polygon_contains(&polygon, Point::new(-9.0, 3.0)));
        assert!(!polygon_contains(&polygon, Point::new(11.0, 0.0)));
    }

    #[test]
    fn wall_casts_a_shadow() {
        let wall = vec![vec![Point::new(50.0, -200.0), Point::new(50.0, 200.0)]];
        let light = LightConfig {
            attenuation_radius: Some(100.0),
            ..LightConfig::default()
        };
        let polygon = light_polygon(Point::ORIGIN, &wall, &light, 0.0, &FogConfig::default());
        assert!(polygon_contains(&polygon, Point::new(25.0, 0.0)));
        assert!(polygon_contains(&polygon, Point::new(-75.0, 0.0)));
        assert!(!polygon_contains(&polygon, Point::new(75.0, 0.0)));
    }

    #[test]
    fn cone_faces_up_by_default() {
        let light = LightConfig {
            attenuation_radius: Some(100.0),
            outer_angle: Some(90.0),
            ..LightConfig::default()
        };
        let polygon = light_polygon(Point::ORIGIN, &[], &light, 0.0, &FogConfig::default());
        assert!(polygon_contains(&polygon, Point::new(0.0, -50.0)));
        assert!(!polygon_contains(&polygon, Point::new(0.0, 50.0)));
        assert!(!polygon_contains(&polygon, Point::new(50.0, -10.0)));

        let turned = light_polygon(Point::ORIGIN, &[], &light, 90.0, &FogConfig::default());
        assert!(polygon_contains(&turned, Point::new(50.0, 0.0)));
    }

    #[test]
    fn sight_line_is_blocked_by_walls() {
        let segments = [Segment::new(Point::new(50.0, -200.0), Point::new(50.0, 200.0))];
        assert!(line_of_sight(Point::ORIGIN, Point::new(25.0, 10.0), &segments, 100.0));
        assert!(!line_of_sight(Point::ORIGIN, Point::new(75.0, 10.0), &segments, 100.0));
        assert!(!line_of_sight(Point::ORIGIN, Point::new(0.0, 150.0), &segments, 100.0));
    }
}
