//! Drawing → wall polylines, and door geometry on a drawing's outline.

use crate::boolean::{BoolOp, Ring, flatten_rings, ring_op};
use crate::intersect::{path_between, path_point};
use crate::path::drawing_to_path;
use crate::sample::sample_segment;
use crate::stroke::{StrokeStyle, stroke_path};
use fog_core::config::FogConfig;
use fog_core::door::Door;
use fog_core::model::AuthoritativeItem;
use kurbo::{Affine, BezPath, CubicBez, PathEl, PathSeg, Point, QuadBez};

/// A closed contour ends where it started; an open one does not.
pub type Polyline = Vec<Point>;

/// Local → world matrix of an item, `None` when it cannot be inverted.
pub fn item_affine(item: &AuthoritativeItem) -> Option<Affine> {
    let affine = item.transform.to_affine();
    if affine.determinant().abs() <= f64::EPSILON {
        log::warn!("item {} has a degenerate transform", item.id);
        return None;
    }
    Some(affine)
}

/// Wall polylines of a drawing, in the drawing's local space.
///
/// The outline is stroked and flattened: lines are copied as-is, curves are
/// sampled every `config.sample_distance`. Every path in `open_doors`
/// (world space) is then cut out of the sampled outline in world space, so
/// cut walls keep the same sample spacing as uncut ones.
pub fn drawing_to_contours(
    item: &AuthoritativeItem,
    open_doors: &[&BezPath],
    config: &FogConfig,
) -> Vec<Polyline> {
    let Some(path) = drawing_to_path(item) else {
        return Vec::new();
    };
    let style = if item.is_shape() {
        StrokeStyle::Sharp
    } else {
        StrokeStyle::Round
    };
    let outline = stroke_path(&path, item.style.stroke_width, style, config.flatten_tolerance);
    let walls = path_to_polylines(&outline, config.sample_distance);
    if open_doors.is_empty() {
        return walls;
    }

    let Some(affine) = item_affine(item) else {
        return Vec::new();
    };
    let mut rings: Vec<Ring> = walls.iter().filter_map(|line| world_ring(line, affine)).collect();
    for door in open_doors {
        let cut = flatten_rings(door, config.flatten_tolerance);
        rings = ring_op(&rings, &cut, BoolOp::Difference);
    }

    let local = affine.inverse();
    rings
        .into_iter()
        .map(|ring| {
            let mut line: Polyline = ring.iter().map(|&p| local * p).collect();
            if let Some(&first) = line.first() {
                line.push(first);
            }
            line
        })
        .collect()
}

/// A wall polyline as a world-space ring without its repeated end point.
fn world_ring(line: &[Point], affine: Affine) -> Option<Ring> {
    let mut ring: Ring = line.iter().map(|&p| affine * p).collect();
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    (ring.len() >= 3).then_some(ring)
}

/// Walk a path's elements into polylines. A close appends the contour's
/// first point; a contour that ends where it started without a close is
/// closed on that exact point, anything else stays open.
pub fn path_to_polylines(path: &BezPath, sample_distance: f64) -> Vec<Polyline> {
    let mut contours = Vec::new();
    let mut points: Polyline = Vec::new();
    let mut start: Option<Point> = None;
    let mut previous: Option<Point> = None;
    // Curve samples stop short of the curve's end point.
    let mut curve_end: Option<Point> = None;

    for el in path.elements() {
        if let Some(end) = curve_end.take() {
            push_point(&mut points, end);
        }
        match *el {
            PathEl::MoveTo(p) => {
                match start {
                    Some(first) => finish_open(&mut contours, &mut points, first),
                    None if !points.is_empty() => contours.push(std::mem::take(&mut points)),
                    None => {}
                }
                push_point(&mut points, p);
                start = Some(p);
                previous = Some(p);
            }
            PathEl::LineTo(p) => {
                push_point(&mut points, p);
                previous = Some(p);
            }
            PathEl::QuadTo(c, p) => {
                if let Some(from) = previous {
                    let seg = PathSeg::Quad(QuadBez::new(from, c, p));
                    for sample in sample_segment(seg, sample_distance) {
                        push_point(&mut points, sample);
                    }
                }
                curve_end = Some(p);
                previous = Some(p);
            }
            PathEl::CurveTo(c1, c2, p) => {
                if let Some(from) = previous {
                    let seg = PathSeg::Cubic(CubicBez::new(from, c1, c2, p));
                    for sample in sample_segment(seg, sample_distance) {
                        push_point(&mut points, sample);
                    }
                }
                curve_end = Some(p);
                previous = Some(p);
            }
            PathEl::ClosePath => {
                if let Some(first) = start {
                    push_point(&mut points, first);
                }
                if !points.is_empty() {
                    contours.push(std::mem::take(&mut points));
                }
                previous = start;
                start = None;
            }
        }
    }
    if let Some(end) = curve_end {
        push_point(&mut points, end);
    }
    if let Some(first) = start {
        finish_open(&mut contours, &mut points, first);
    } else if !points.is_empty() {
        contours.push(points);
    }
    contours
}

/// Distance under which an unclosed contour counts as returning to its start.
const CLOSE_EPSILON: f64 = 1e-6;

fn finish_open(contours: &mut Vec<Polyline>, points: &mut Polyline, first: Point) {
    let mut line = std::mem::take(points);
    if line.len() > 2 {
        if let Some(last) = line.last_mut() {
            if (*last - first).hypot() <= CLOSE_EPSILON {
                *last = first;
            }
        }
    }
    if line.len() >= 2 {
        contours.push(line);
    }
}

fn push_point(points: &mut Polyline, p: Point) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}

// ─── Doors ───────────────────────────────────────────────────────────────

/// The world-space region a door removes from its wall: the sub-path between
/// the door's markers, stroked slightly wider than the wall itself.
pub fn door_path(item: &AuthoritativeItem, door: &Door, config: &FogConfig) -> Option<BezPath> {
    let path = drawing_to_path(item)?;
    let sub = path_between(&path, door.start, door.end)?;
    let width = item.style.stroke_width + config.door_stroke_buffer;
    let mut cut = stroke_path(&sub, width, StrokeStyle::Butt, config.flatten_tolerance);
    cut.apply_affine(item_affine(item)?);
    Some(cut)
}

/// Where a door is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorOverlay {
    /// Arc-length midpoint of the door, in world space.
    pub center: Point,
    /// The door's sub-path in the drawing's local space.
    pub path: BezPath,
}

pub fn door_overlay(item: &AuthoritativeItem, door: &Door) -> Option<DoorOverlay> {
    let path = drawing_to_path(item)?;
    let sub = path_between(&path, door.start, door.end)?;
    let center = item_affine(item)? * path_point(&sub)?;
    Some(DoorOverlay { center, path: sub })
}

/// Polylines carried into world space with the item's transform.
pub fn polylines_to_world(item: &AuthoritativeItem, polylines: &[Polyline]) -> Vec<Polyline> {
    let affine = item.transform.to_affine();
    polylines
        .iter()
        .map(|line| line.iter().map(|&p| affine * p).collect())
        .collect()
}
