//! Fixed-distance sampling of curved segments.

use kurbo::{ParamCurve, ParamCurveArclen, PathSeg, Point};

const ARCLEN_ACCURACY: f64 = 1e-4;

/// Points every `distance` units along `seg`, starting at its start point
/// and stopping short of its end.
pub fn sample_segment(seg: PathSeg, distance: f64) -> Vec<Point> {
    let length = seg.arclen(ARCLEN_ACCURACY);
    if distance.is_nan() || distance <= 0.0 || length <= 0.0 {
        return vec![seg.start()];
    }
    let count = (length / distance).ceil() as usize;
    (0..count)
        .map(|k| {
            if k == 0 {
                return seg.start();
            }
            let at = (k as f64 * distance).min(length);
            seg.eval(seg.inv_arclen(at, ARCLEN_ACCURACY))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::QuadBez;

    #[test]
    fn samples_are_evenly_spaced() {
        let seg = PathSeg::Quad(QuadBez::new((0.0, 0.0), (15.0, 0.0), (30.0, 0.0)));
        let samples = sample_segment(seg, 10.0);
        assert_eq!(samples.len(), 3);
        assert!((samples[1].x - 10.0).abs() < 1e-3);
        assert!((samples[2].x - 20.0).abs() < 1e-3);
    }
}
