//! Nearest-point search on paths and marker-addressed sub-paths.

use crate::measure::{ContourMeasure, contours};
use crate::path::path_to_commands;
use fog_core::config::FogConfig;
use fog_core::door::ContourMarker;
use fog_core::model::PathCmd;
use kurbo::{BezPath, Point};

/// The point on a path closest to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathIntersection {
    pub point: Point,
    /// Euclidean distance from the query point to `point`.
    pub distance: f64,
    pub contour: ContourMarker,
}

/// Search tuning for [`path_intersection`].
#[derive(Debug, Clone, Copy)]
pub struct ScanParams {
    pub step: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl ScanParams {
    pub fn from_config(config: &FogConfig) -> Self {
        Self {
            step: config.scan_step,
            tolerance: config.refine_tolerance,
            max_iterations: config.max_refine_iterations,
        }
    }
}

impl Default for ScanParams {
    fn default() -> Self {
        Self::from_config(&FogConfig::default())
    }
}

/// Closest point on any contour of `path` to `query`.
///
/// Every contour is scanned coarsely every `params.step` units; a contour
/// that produced a new best is refined by halving the step around that
/// best. Returns `None` for paths without measurable contours.
pub fn path_intersection(path: &BezPath, query: Point, params: ScanParams) -> Option<PathIntersection> {
    let mut best: Option<PathIntersection> = None;
    for (index, measure) in contours(path).iter().enumerate() {
        scan_contour(measure, index, query, params, &mut best);
    }
    best
}

/// Closest point on the contour at `index` only. Used while dragging, where
/// the end marker must stay on the start marker's contour.
pub fn path_intersection_on(
    path: &BezPath,
    index: usize,
    query: Point,
    params: ScanParams,
) -> Option<PathIntersection> {
    let measures = contours(path);
    let measure = measures.get(index)?;
    let mut best = None;
    scan_contour(measure, index, query, params, &mut best);
    best
}

fn scan_contour(
    measure: &ContourMeasure,
    index: usize,
    query: Point,
    params: ScanParams,
    best: &mut Option<PathIntersection>,
) {
    let length = measure.length();
    let step = if params.step > 0.0 { params.step } else { length.max(1.0) };
    let mut best_distance = best.map_or(f64::INFINITY, |b| b.distance);
    let mut best_length = 0.0;
    let mut improved = false;

    let offer = |at: f64, best: &mut Option<PathIntersection>, best_distance: &mut f64| -> bool {
        let point = measure.position_at(at);
        let distance = point.distance(query);
        if distance < *best_distance {
            *best_distance = distance;
            *best = Some(PathIntersection {
                point,
                distance,
                contour: ContourMarker::new(index, at),
            });
            true
        } else {
            false
        }
    };

    let mut scan = 0.0;
    while scan <= length {
        if offer(scan, best, &mut best_distance) {
            best_length = scan;
            improved = true;
        }
        scan += step;
    }

    if !improved {
        return;
    }

    let mut precision = step / 2.0;
    let mut iterations = 0;
    while precision > params.tolerance && iterations < params.max_iterations {
        iterations += 1;
        let before = best_length - precision;
        let after = best_length + precision;
        if before >= 0.0 && offer(before, best, &mut best_distance) {
            best_length = before;
        } else if after <= length && offer(after, best, &mut best_distance) {
            best_length = after;
        } else {
            precision /= 2.0;
        }
    }
}

/// The sub-path between two markers on the same contour, from the smaller
/// distance to the larger. Markers on different contours yield `None`.
pub fn path_between(path: &BezPath, start: ContourMarker, end: ContourMarker) -> Option<BezPath> {
    if start.index != end.index {
        log::warn!(
            "unable to take a sub-path across contours ({} and {})",
            start.index,
            end.index
        );
        return None;
    }
    let measures = contours(path);
    let Some(measure) = measures.get(start.index) else {
        log::warn!("no contour {} on path ({} contours)", start.index, measures.len());
        return None;
    };
    measure.segment(start.distance.min(end.distance), start.distance.max(end.distance))
}

/// [`path_between`] as host path commands.
pub fn commands_between(path: &BezPath, start: ContourMarker, end: ContourMarker) -> Option<Vec<PathCmd>> {
    path_between(path, start, end).map(|sub| path_to_commands(&sub))
}

/// Arc-length midpoint of the first contour.
pub fn path_point(path: &BezPath) -> Option<Point> {
    let measures = contours(path);
    let measure = measures.first()?;
    Some(measure.position_at(measure.length() / 2.0))
}
