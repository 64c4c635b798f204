//! Arc-length measurement of path contours.
//!
//! A contour is one sub-path of a `BezPath`. Contours with zero length are
//! skipped, so contour indices only count contours that have extent; door
//! markers store those indices.

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point};

/// Accuracy passed to kurbo's arc-length routines.
const ARCLEN_ACCURACY: f64 = 1e-4;

/// Segments shorter than this are dropped while measuring.
const DEGENERATE_LENGTH: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct ContourMeasure {
    segments: Vec<PathSeg>,
    /// Cumulative length at the end of each segment.
    ends: Vec<f64>,
    closed: bool,
}

impl ContourMeasure {
    pub fn length(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(|seg| seg.start())
    }

    /// Position at `distance` along the contour, clamped to `[0, length]`.
    pub fn position_at(&self, distance: f64) -> Point {
        let (index, local) = self.locate(distance);
        let seg = self.segments[index];
        seg.eval(seg.inv_arclen(local, ARCLEN_ACCURACY))
    }

    /// The piece of this contour between two distances, as a path starting
    /// with a move. Distances are clamped; `None` when `start > end`.
    pub fn segment(&self, start: f64, end: f64) -> Option<BezPath> {
        let length = self.length();
        let start = start.clamp(0.0, length);
        let end = end.clamp(0.0, length);
        if start > end || self.segments.is_empty() {
            return None;
        }

        let mut out = BezPath::new();
        let (first, first_local) = self.locate(start);
        let (last, last_local) = self.locate(end);
        for index in first..=last {
            let seg = self.segments[index];
            let seg_length = self.segment_length(index);
            let from = if index == first { first_local } else { 0.0 };
            let to = if index == last { last_local } else { seg_length };
            let t0 = seg.inv_arclen(from, ARCLEN_ACCURACY);
            let t1 = seg.inv_arclen(to, ARCLEN_ACCURACY);
            let piece = seg.subsegment(t0..t1);
            if index == first {
                out.move_to(piece.start());
            }
            if to > from {
                out.push(piece.as_path_el());
            }
        }
        Some(out)
    }

    fn segment_length(&self, index: usize) -> f64 {
        let begin = if index == 0 { 0.0 } else { self.ends[index - 1] };
        self.ends[index] - begin
    }

    /// Segment index and local distance into it for a contour distance.
    fn locate(&self, distance: f64) -> (usize, f64) {
        let distance = distance.clamp(0.0, self.length());
        let last = self.segments.len().saturating_sub(1);
        let index = self.ends.partition_point(|&end| end < distance).min(last);
        let begin = if index == 0 { 0.0 } else { self.ends[index - 1] };
        (index, (distance - begin).max(0.0))
    }
}

/// Measure every non-empty contour of `path`, in path order.
pub fn contours(path: &BezPath) -> Vec<ContourMeasure> {
    let mut out = Vec::new();
    let mut builder = Builder::default();
    let mut start = Point::ORIGIN;
    let mut current = Point::ORIGIN;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                builder.finish(false, &mut out);
                start = p;
                current = p;
            }
            PathEl::LineTo(p) => {
                builder.push(PathSeg::Line(kurbo::Line::new(current, p)));
                current = p;
            }
            PathEl::QuadTo(c, p) => {
                builder.push(PathSeg::Quad(kurbo::QuadBez::new(current, c, p)));
                current = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                builder.push(PathSeg::Cubic(kurbo::CubicBez::new(current, c1, c2, p)));
                current = p;
            }
            PathEl::ClosePath => {
                if current != start {
                    builder.push(PathSeg::Line(kurbo::Line::new(current, start)));
                }
                builder.finish(true, &mut out);
                current = start;
            }
        }
    }
    builder.finish(false, &mut out);
    out
}

#[derive(Default)]
struct Builder {
    segments: Vec<PathSeg>,
    ends: Vec<f64>,
}

impl Builder {
    fn push(&mut self, seg: PathSeg) {
        let length = seg.arclen(ARCLEN_ACCURACY);
        if length < DEGENERATE_LENGTH {
            return;
        }
        let total = self.ends.last().copied().unwrap_or(0.0) + length;
        self.segments.push(seg);
        self.ends.push(total);
    }

    fn finish(&mut self, closed: bool, out: &mut Vec<ContourMeasure>) {
        if self.segments.is_empty() {
            return;
        }
        out.push(ContourMeasure {
            segments: std::mem::take(&mut self.segments),
            ends: std::mem::take(&mut self.ends),
            closed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn close_adds_the_return_edge() {
        let measures = contours(&square());
        assert_eq!(measures.len(), 1);
        assert!(measures[0].is_closed());
        assert!((measures[0].length() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn empty_contours_are_skipped() {
        let mut path = BezPath::new();
        path.move_to((5.0, 5.0));
        path.move_to((0.0, 0.0));
        path.line_to((0.0, 0.0));
        path.move_to((0.0, 0.0));
        path.line_to((3.0, 4.0));
        let measures = contours(&path);
        assert_eq!(measures.len(), 1);
        assert!((measures[0].length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn position_is_clamped() {
        let measure = &contours(&square())[0];
        assert_eq!(measure.position_at(-5.0), Point::new(0.0, 0.0));
        let p = measure.position_at(15.0);
        assert!((p - Point::new(10.0, 5.0)).hypot() < 1e-6);
        let end = measure.position_at(100.0);
        assert!((end - Point::new(0.0, 0.0)).hypot() < 1e-6);
    }

    #[test]
    fn segment_spans_corners() {
        let measure = &contours(&square())[0];
        let piece = measure.segment(5.0, 15.0).unwrap();
        let sub = contours(&piece);
        assert_eq!(sub.len(), 1);
        assert!((sub[0].length() - 10.0).abs() < 1e-6);
        assert!((sub[0].start().unwrap() - Point::new(5.0, 0.0)).hypot() < 1e-6);
        assert!(measure.segment(20.0, 10.0).is_none());
    }

    #[test]
    fn curve_length_is_measured() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((5.0, 0.0), (10.0, 0.0));
        let measure = &contours(&path)[0];
        assert!((measure.length() - 10.0).abs() < 1e-3);
        let mid = measure.position_at(5.0);
        assert!((mid.x - 5.0).abs() < 1e-3);
    }
}
