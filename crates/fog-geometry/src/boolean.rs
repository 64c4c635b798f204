//! Boolean operations on polygons.
//!
//! Operands are sets of rings filled with the nonzero rule; curved paths
//! are brought into ring form with [`flatten_rings`]. Every edge is split
//! where it crosses any other edge; each piece is then tested on both sides
//! and kept when exactly one side lies in the result region, oriented with
//! the region on its left. The kept pieces are chained back into closed
//! rings.

use kurbo::{BezPath, PathEl, Point, Rect, Vec2, flatten};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Subject minus clip.
    Difference,
    /// Region covered by both.
    Intersection,
}

/// A closed polygon, without a repeated end point.
pub type Ring = Vec<Point>;

/// Parameter slack when deciding whether a crossing hits an edge end.
const PARAM_EPSILON: f64 = 1e-9;

/// `subject op clip` for polygons given as rings.
pub fn ring_op(subject: &[Ring], clip: &[Ring], op: BoolOp) -> Vec<Ring> {
    if !overlaps(subject, clip) {
        return match op {
            BoolOp::Difference => subject.to_vec(),
            BoolOp::Intersection => Vec::new(),
        };
    }

    let mut edges: Vec<Edge> = subject
        .iter()
        .chain(clip.iter())
        .flat_map(|ring| ring_edges(ring))
        .collect();
    split_edges(&mut edges);

    let bounds = bounds_of(subject.iter().chain(clip.iter()));
    let nudge = 1e-7 * (1.0 + bounds.width().max(bounds.height()));
    let inside = |p: Point| -> bool {
        let in_subject = winding(subject, p) != 0;
        let in_clip = winding(clip, p) != 0;
        match op {
            BoolOp::Difference => in_subject && !in_clip,
            BoolOp::Intersection => in_subject && in_clip,
        }
    };

    let mut seen = HashSet::new();
    let mut pieces: Vec<(Point, Point)> = Vec::new();
    for edge in &edges {
        for pair in edge.points().windows(2) {
            let (p, q) = (pair[0], pair[1]);
            let d = q - p;
            let length = d.hypot();
            if length <= f64::EPSILON {
                continue;
            }
            let normal = Vec2::new(-d.y, d.x) / length;
            let mid = p.midpoint(q);
            let left = inside(mid + normal * nudge);
            let right = inside(mid - normal * nudge);
            if left == right {
                continue;
            }
            let piece = if left { (p, q) } else { (q, p) };
            if seen.insert((key(piece.0), key(piece.1))) {
                pieces.push(piece);
            }
        }
    }

    chain(&pieces)
}

// ─── Flattening ──────────────────────────────────────────────────────────

/// Every sub-path of `path` as a closed ring; rings with fewer than three
/// distinct points are dropped.
pub fn flatten_rings(path: &BezPath, tolerance: f64) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut ring: Ring = Vec::new();
    flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            push_ring(&mut rings, std::mem::take(&mut ring));
            ring.push(p);
        }
        PathEl::LineTo(p) => {
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }
        PathEl::ClosePath => push_ring(&mut rings, std::mem::take(&mut ring)),
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    push_ring(&mut rings, ring);
    rings
}

fn push_ring(rings: &mut Vec<Ring>, mut ring: Ring) {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() >= 3 {
        rings.push(ring);
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

struct Edge {
    a: Point,
    b: Point,
    splits: SmallVec<[(f64, Point); 2]>,
}

impl Edge {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.a, self.b)
    }

    /// End points with split points in between, in order along the edge.
    fn points(&self) -> Vec<Point> {
        let mut splits = self.splits.clone();
        splits.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut out = Vec::with_capacity(splits.len() + 2);
        out.push(self.a);
        for (_, p) in splits {
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
        if out.last() != Some(&self.b) {
            out.push(self.b);
        }
        out
    }
}

fn ring_edges(ring: &Ring) -> impl Iterator<Item = Edge> + '_ {
    let n = ring.len();
    (0..n).map(move |i| Edge {
        a: ring[i],
        b: ring[(i + 1) % n],
        splits: SmallVec::new(),
    })
}

fn split_edges(edges: &mut [Edge]) {
    let bounds: Vec<Rect> = edges.iter().map(Edge::bounds).collect();
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if !touches(bounds[i], bounds[j]) {
                continue;
            }
            let Some((t, u, at)) = crossing(edges[i].a, edges[i].b, edges[j].a, edges[j].b) else {
                continue;
            };
            if t > PARAM_EPSILON && t < 1.0 - PARAM_EPSILON {
                edges[i].splits.push((t, at));
            }
            if u > PARAM_EPSILON && u < 1.0 - PARAM_EPSILON {
                edges[j].splits.push((u, at));
            }
        }
    }
}

/// Crossing of segments `p→p2` and `q→q2` as (param on first, param on
/// second, point). Parallel segments never cross. When the crossing lands
/// on an end point that end point is returned exactly.
pub(crate) fn crossing(p: Point, p2: Point, q: Point, q2: Point) -> Option<(f64, f64, Point)> {
    let r = p2 - p;
    let s = q2 - q;
    let denom = cross(r, s);
    if denom.abs() <= f64::EPSILON * r.hypot() * s.hypot() {
        return None;
    }
    let qp = q - p;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    let range = -PARAM_EPSILON..=1.0 + PARAM_EPSILON;
    if !range.contains(&t) || !range.contains(&u) {
        return None;
    }
    let at = if t <= PARAM_EPSILON {
        p
    } else if t >= 1.0 - PARAM_EPSILON {
        p2
    } else if u <= PARAM_EPSILON {
        q
    } else if u >= 1.0 - PARAM_EPSILON {
        q2
    } else {
        p + r * t
    };
    Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0), at))
}

pub(crate) fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

// ─── Regions ─────────────────────────────────────────────────────────────

/// Nonzero winding number of `p` with respect to `rings`.
pub fn winding(rings: &[Ring], p: Point) -> i32 {
    let mut winding = 0;
    for ring in rings {
        let n = ring.len();
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            let side = cross(b - a, p - a);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
    }
    winding
}

fn bounds_of<'a>(rings: impl Iterator<Item = &'a Ring>) -> Rect {
    let mut bounds: Option<Rect> = None;
    for &p in rings.flatten() {
        let point = Rect::from_points(p, p);
        bounds = Some(bounds.map_or(point, |b| b.union(point)));
    }
    bounds.unwrap_or(Rect::ZERO)
}

fn overlaps(a: &[Ring], b: &[Ring]) -> bool {
    !a.is_empty() && !b.is_empty() && touches(bounds_of(a.iter()), bounds_of(b.iter()))
}

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

// ─── Chaining ────────────────────────────────────────────────────────────

type Key = (i64, i64);

fn key(p: Point) -> Key {
    const QUANTUM: f64 = 1e-7;
    ((p.x / QUANTUM).round() as i64, (p.y / QUANTUM).round() as i64)
}

fn chain(pieces: &[(Point, Point)]) -> Vec<Ring> {
    let mut by_start: HashMap<Key, SmallVec<[usize; 2]>> = HashMap::new();
    for (i, piece) in pieces.iter().enumerate() {
        by_start.entry(key(piece.0)).or_default().push(i);
    }

    let mut used = vec![false; pieces.len()];
    let mut rings = Vec::new();
    for first in 0..pieces.len() {
        if used[first] {
            continue;
        }
        let origin = key(pieces[first].0);
        let mut ring = vec![pieces[first].0];
        let mut current = first;
        loop {
            used[current] = true;
            let end = pieces[current].1;
            if key(end) == origin {
                break;
            }
            ring.push(end);
            let next = by_start
                .get(&key(end))
                .and_then(|candidates| candidates.iter().copied().find(|&c| !used[c]));
            match next {
                Some(next) => current = next,
                None => {
                    log::trace!("boolean result left an open chain of {} points", ring.len());
                    break;
                }
            }
        }
        push_ring(&mut rings, ring);
    }
    rings
}
