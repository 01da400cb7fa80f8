//! Line and segment intersection.
//!
//! - `line_from_points`: standard-form coefficients through two points.
//! - `intersect`: Cramer's rule on the 2×2 system; `None` when parallel or coincident.
//! - `segments_cross`: orientation-test predicate, no arithmetic beyond products.
//! - `segment_intersection`: crossing point or collinear overlap of two closed segments.

use nalgebra::Vector2;

use super::types::{cross, GeomCfg, Line};

/// Line through `p1` and `p2` as `a·x + b·y = c`.
#[inline]
pub fn line_from_points(p1: Vector2<f64>, p2: Vector2<f64>) -> Line {
    let a = p1.y - p2.y;
    let b = p2.x - p1.x;
    let c = -(p1.x * p2.y - p2.x * p1.y);
    Line { a, b, c }
}

/// Intersection of two lines, `None` if the determinant vanishes.
#[inline]
pub fn intersect(l1: &Line, l2: &Line) -> Option<Vector2<f64>> {
    intersect_eps(l1, l2, GeomCfg::default().eps_det)
}

/// `intersect` with an explicit relative determinant threshold.
pub fn intersect_eps(l1: &Line, l2: &Line, eps_det: f64) -> Option<Vector2<f64>> {
    let d = l1.a * l2.b - l1.b * l2.a;
    let scale = (l1.a.abs() + l1.b.abs()) * (l2.a.abs() + l2.b.abs());
    if scale == 0.0 || d.abs() <= eps_det * scale {
        return None;
    }
    let dx = l1.c * l2.b - l1.b * l2.c;
    let dy = l1.a * l2.c - l1.c * l2.a;
    Some(Vector2::new(dx / d, dy / d))
}

/// True iff segment `a1–a2` and segment `b1–b2` properly cross.
///
/// Each segment's endpoints must lie strictly on opposite sides of the other's
/// supporting line; touching and collinear configurations report `false`.
pub fn segments_cross(
    a1: Vector2<f64>,
    a2: Vector2<f64>,
    b1: Vector2<f64>,
    b2: Vector2<f64>,
) -> bool {
    fn ccw(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> bool {
        (c.x - a.x) * (b.y - a.y) > (b.x - a.x) * (c.y - a.y)
    }
    ccw(a1, b1, b2) != ccw(a2, b1, b2) && ccw(a1, a2, b1) != ccw(a1, a2, b2)
}

/// Element of a segment/segment intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentHit {
    Point(Vector2<f64>),
    Overlap(Vector2<f64>, Vector2<f64>),
}

/// Parameter of `x` projected on `a → b` (0 at `a`, 1 at `b`).
#[inline]
fn param_on(x: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let r = b - a;
    (x - a).dot(&r) / r.norm_squared()
}

/// Whether `x` lies on the closed segment `a–b` within tolerances.
pub fn on_segment(x: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>, cfg: &GeomCfg) -> bool {
    let r = b - a;
    let len = r.norm();
    if len <= cfg.eps_dist {
        return (x - a).norm() <= cfg.eps_dist;
    }
    if cross(a, b, x).abs() / len > cfg.eps_dist {
        return false;
    }
    let t = param_on(x, a, b);
    (-cfg.eps_param..=1.0 + cfg.eps_param).contains(&t)
}

/// Intersection of the closed segments `p1–p2` and `q1–q2`.
pub fn segment_intersection(
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    q1: Vector2<f64>,
    q2: Vector2<f64>,
    cfg: &GeomCfg,
) -> Option<SegmentHit> {
    let rp = p2 - p1;
    let rq = q2 - q1;
    if rp.norm() <= cfg.eps_dist {
        return on_segment(p1, q1, q2, cfg).then_some(SegmentHit::Point(p1));
    }
    if rq.norm() <= cfg.eps_dist {
        return on_segment(q1, p1, p2, cfg).then_some(SegmentHit::Point(q1));
    }
    let lp = line_from_points(p1, p2);
    let lq = line_from_points(q1, q2);
    if let Some(x) = intersect_eps(&lp, &lq, cfg.eps_det) {
        let tp = param_on(x, p1, p2);
        let tq = param_on(x, q1, q2);
        let range = -cfg.eps_param..=1.0 + cfg.eps_param;
        if !(range.contains(&tp) && range.contains(&tq)) {
            return None;
        }
        // hits on an endpoint return that endpoint exactly
        let snapped = [(tp, p1, p2), (tq, q1, q2)]
            .into_iter()
            .find_map(|(t, a, b)| {
                if t.abs() <= cfg.eps_param {
                    Some(a)
                } else if (t - 1.0).abs() <= cfg.eps_param {
                    Some(b)
                } else {
                    None
                }
            })
            .unwrap_or(x);
        return Some(SegmentHit::Point(snapped));
    }
    // parallel: only collinear segments can share points
    if cross(p1, p2, q1).abs() / rp.norm() > cfg.eps_dist {
        return None;
    }
    let t0 = param_on(q1, p1, p2);
    let t1 = param_on(q2, p1, p2);
    let (lo, lo_pt) = if t0.min(t1) <= 0.0 {
        (0.0, p1)
    } else if t0 <= t1 {
        (t0, q1)
    } else {
        (t1, q2)
    };
    let (hi, hi_pt) = if t0.max(t1) >= 1.0 {
        (1.0, p2)
    } else if t0 >= t1 {
        (t0, q1)
    } else {
        (t1, q2)
    };
    if lo > hi + cfg.eps_param {
        return None;
    }
    if (hi_pt - lo_pt).norm() <= cfg.eps_dist || hi <= lo {
        Some(SegmentHit::Point(lo_pt))
    } else {
        Some(SegmentHit::Overlap(lo_pt, hi_pt))
    }
}
