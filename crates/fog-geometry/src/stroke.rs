//! Stroke outlines for walls and door cut-outs.

use kurbo::{BezPath, Cap, Join, Stroke, StrokeOpts};

/// How a drawing's outline is stroked into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    /// Shapes keep their corners: square caps, miter joins.
    Sharp,
    /// Freehand drawings: round caps and joins.
    Round,
    /// Door cut-outs: butt caps so the cut ends exactly at the markers.
    Butt,
}

/// Outline of `path` stroked at `width`, approximated to `tolerance`.
/// Zero or negative widths produce an empty path.
pub fn stroke_path(path: &BezPath, width: f64, style: StrokeStyle, tolerance: f64) -> BezPath {
    if width.is_nan() || width <= 0.0 {
        return BezPath::new();
    }
    let stroke = match style {
        StrokeStyle::Sharp => Stroke::new(width).with_caps(Cap::Square).with_join(Join::Miter),
        StrokeStyle::Round => Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round),
        StrokeStyle::Butt => Stroke::new(width).with_caps(Cap::Butt).with_join(Join::Miter),
    };
    kurbo::stroke(path.iter(), &stroke, &StrokeOpts::default(), tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn segment() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0));
        path
    }

    #[test]
    fn butt_stroke_stays_within_segment() {
        let outline = stroke_path(&segment(), 10.0, StrokeStyle::Butt, 0.1);
        let bbox = outline.bounding_box();
        assert!(bbox.x0 > -1e-6 && bbox.x1 < 100.0 + 1e-6);
        assert!((bbox.height() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn square_caps_extend_by_half_width() {
        let outline = stroke_path(&segment(), 10.0, StrokeStyle::Sharp, 0.1);
        let bbox = outline.bounding_box();
        assert!((bbox.x0 + 5.0).abs() < 1e-6);
        assert!((bbox.x1 - 105.0).abs() < 1e-6);
    }

    #[test]
    fn zero_width_is_empty() {
        assert!(stroke_path(&segment(), 0.0, StrokeStyle::Round, 0.1).is_empty());
    }
}
