//! Ring ordering, simplicity/convexity predicates, and shoelace area.
//!
//! `order_ring` sorts an unordered vertex set radially around its extreme
//! vertex, which yields a simple ring for convex sets such as the LOB
//! trapezoid. Intersection vertex sets go through `merge_close` and
//! `convex_hull` instead, since near-duplicate vertices give the radial sort
//! noise-driven angles. `area_acres` converts degrees to metres with one fixed factor on
//! both axes before the shoelace sum.

use std::f64::consts::PI;

use nalgebra::Vector2;

use super::lines::segments_cross;
use super::types::cross;
use crate::geodesy::Coordinate;

/// Fixed metres-per-degree factor applied to latitude and longitude alike.
pub const METERS_PER_DEGREE: f64 = 111_139.0;

/// Square metres per acre.
pub const SQ_METERS_PER_ACRE: f64 = 4_046.856422;

/// Radial sort key of `p` around `origin` against the reference direction +y.
///
/// Returns `(angle in [0, 2π), distance)`; a point coincident with the origin
/// gets `(-π, 0)` so it sorts first.
fn angle_and_distance(p: Vector2<f64>, origin: Vector2<f64>) -> (f64, f64) {
    let v = p - origin;
    let len = v.x.hypot(v.y);
    if len == 0.0 {
        return (-PI, 0.0);
    }
    let n = v / len;
    let refvec = Vector2::new(0.0, 1.0);
    let dot = n.dot(&refvec);
    let diff = refvec.y * n.x - refvec.x * n.y;
    let angle = diff.atan2(dot);
    if angle < 0.0 {
        (2.0 * PI + angle, len)
    } else {
        (angle, len)
    }
}

/// Order an unordered vertex set into a cyclic ring.
///
/// Origin is the vertex with the largest y (longitude), ties broken by the
/// largest x (latitude). Remaining vertices sort by (angle, distance).
pub fn order_ring(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let Some(origin) = points.iter().copied().max_by(|a, b| {
        a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x))
    }) else {
        return Vec::new();
    };
    let mut keyed: Vec<((f64, f64), Vector2<f64>)> = points
        .iter()
        .map(|&p| (angle_and_distance(p, origin), p))
        .collect();
    keyed.sort_by(|(ka, _), (kb, _)| ka.0.total_cmp(&kb.0).then_with(|| ka.1.total_cmp(&kb.1)));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// `order_ring` over geographic coordinates.
pub fn order_coordinates(coords: &[Coordinate]) -> Vec<Coordinate> {
    let pts: Vec<Vector2<f64>> = coords.iter().map(|c| c.to_vec2()).collect();
    order_ring(&pts).into_iter().map(Coordinate::from_vec2).collect()
}

/// Drop points within `eps` of an earlier kept point; kept points stay in first-seen order.
pub fn merge_close(points: &[Vector2<f64>], eps: f64) -> Vec<Vector2<f64>> {
    let mut kept: Vec<Vector2<f64>> = Vec::with_capacity(points.len());
    for &p in points {
        if kept.iter().all(|q| (p - *q).norm() > eps) {
            kept.push(p);
        }
    }
    kept
}

/// Andrew's monotone chain convex hull, counterclockwise, collinear points dropped.
///
/// Fewer than three distinct points come back sorted; a collinear set
/// reduces to its two extremes.
pub fn convex_hull(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// `convex_hull` over geographic coordinates after merging vertices closer than `eps`.
pub fn hull_coordinates(coords: &[Coordinate], eps: f64) -> Vec<Coordinate> {
    let pts: Vec<Vector2<f64>> = coords.iter().map(|c| c.to_vec2()).collect();
    convex_hull(&merge_close(&pts, eps))
        .into_iter()
        .map(Coordinate::from_vec2)
        .collect()
}

/// True iff no two non-adjacent edges of the closed ring cross.
pub fn is_simple(ring: &[Vector2<f64>]) -> bool {
    let n = ring.len();
    if n < 4 {
        return true;
    }
    for i in 0..n {
        let (a1, a2) = (ring[i], ring[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue; // shares vertex 0
            }
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if segments_cross(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

/// True iff all turns of the ring share one orientation (collinear turns allowed).
pub fn is_convex(ring: &[Vector2<f64>], eps: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut pos = false;
    let mut neg = false;
    for i in 0..n {
        let (a, b, c) = (ring[i], ring[(i + 1) % n], ring[(i + 2) % n]);
        let scale = (b - a).norm() * (c - b).norm();
        let z = cross(a, b, c);
        if z > eps * scale {
            pos = true;
        } else if z < -eps * scale {
            neg = true;
        }
    }
    pos != neg
}

/// Signed shoelace area in the ring's own units; positive for counterclockwise.
pub fn signed_area(ring: &[Vector2<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let p = ring[i];
            let q = ring[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    0.5 * twice
}

/// Planar area of an ordered ring in acres.
///
/// Both axes use [`METERS_PER_DEGREE`]; longitude is not scaled by
/// cos(latitude), so areas away from the equator come out inflated by
/// 1/cos(lat).
pub fn area_acres(ring: &[Coordinate]) -> f64 {
    let meters: Vec<Vector2<f64>> = ring
        .iter()
        .map(|c| Vector2::new(c.lat * METERS_PER_DEGREE, c.lon * METERS_PER_DEGREE))
        .collect();
    signed_area(&meters).abs() / SQ_METERS_PER_ACRE
}
