//! Convex regions and their pairwise intersection.
//!
//! A `Region` is a convex polygon that may have degenerated to a segment, a
//! single point, or nothing. Intersecting two regions produces a list of
//! elements (points and collinear-overlap segments); `vertices_of` flattens
//! them into a deduplicated vertex set keyed on 13-decimal rounding. Callers
//! that rebuild a region from such a set also merge vertices within
//! `GeomCfg::eps_merge`, which the rounding alone does not catch.
//!
//! Elements come from three sources:
//! - boundary crossings of the two rings (points),
//! - collinear edge overlaps (segments),
//! - vertices of either region lying inside the other (points).
//!
//! Together they are exactly the vertices of the convex intersection.

use std::collections::HashSet;

use nalgebra::Vector2;
use serde::Serialize;

use super::lines::{on_segment, segment_intersection, SegmentHit};
use super::ring::{convex_hull, is_convex, is_simple, merge_close, signed_area};
use super::types::{GeomCfg, Hs2};

/// Convex region in degree space (x = latitude, y = longitude).
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    Empty,
    Point(Vector2<f64>),
    Segment(Vector2<f64>, Vector2<f64>),
    /// Counterclockwise convex ring with at least three vertices.
    Polygon(Vec<Vector2<f64>>),
}

/// One element of a region/region intersection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum IntersectionElement {
    Point([f64; 2]),
    Segment([f64; 2], [f64; 2]),
}

impl Region {
    /// Build a region from an unordered vertex set.
    ///
    /// Vertices closer than `cfg.eps_merge` merge first; the region is the
    /// convex hull of what remains.
    pub fn from_vertices(points: &[Vector2<f64>], cfg: &GeomCfg) -> Region {
        let pts = merge_close(points, cfg.eps_merge);
        match pts.len() {
            0 => Region::Empty,
            1 => Region::Point(pts[0]),
            _ => {
                let hull = convex_hull(&pts);
                match hull.len() {
                    0 => Region::Empty,
                    1 => Region::Point(hull[0]),
                    2 => Region::Segment(hull[0], hull[1]),
                    _ => Region::from_ring(hull, cfg),
                }
            }
        }
    }

    /// Build a region from a ring whose order is already meaningful, such as
    /// the ordered corners of a LOB.
    ///
    /// A self-intersecting ring falls back to the triangle of its first three
    /// vertices. A simple but non-convex ring is replaced by its hull.
    pub fn from_ordered(ring: &[Vector2<f64>], cfg: &GeomCfg) -> Region {
        let pts = merge_close(ring, cfg.eps_merge);
        if pts.len() < 3 {
            return Region::from_vertices(&pts, cfg);
        }
        if !is_simple(&pts) {
            tracing::debug!(
                vertices = pts.len(),
                "ring self-intersects; falling back to triangle"
            );
            return Region::from_ring(pts[..3].to_vec(), cfg);
        }
        if is_convex(&pts, cfg.eps_det) {
            Region::from_ring(pts, cfg)
        } else {
            Region::from_vertices(&pts, cfg)
        }
    }

    /// Normalize an ordered ring: orient counterclockwise, collapse flat rings to segments.
    fn from_ring(mut ring: Vec<Vector2<f64>>, cfg: &GeomCfg) -> Region {
        let area = signed_area(&ring);
        let extent = ring
            .iter()
            .map(|p| (p - ring[0]).norm())
            .fold(0.0, f64::max);
        if area.abs() <= cfg.eps_dist * extent.max(cfg.eps_dist) {
            return collinear_extent(&ring);
        }
        if area < 0.0 {
            ring.reverse();
        }
        Region::Polygon(ring)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Region::Empty)
    }

    /// Vertices in ring order.
    pub fn vertices(&self) -> Vec<Vector2<f64>> {
        match self {
            Region::Empty => Vec::new(),
            Region::Point(p) => vec![*p],
            Region::Segment(a, b) => vec![*a, *b],
            Region::Polygon(ring) => ring.clone(),
        }
    }

    /// Boundary edges; a segment has one, a point none.
    pub fn edges(&self) -> Vec<(Vector2<f64>, Vector2<f64>)> {
        match self {
            Region::Empty | Region::Point(_) => Vec::new(),
            Region::Segment(a, b) => vec![(*a, *b)],
            Region::Polygon(ring) => (0..ring.len())
                .map(|i| (ring[i], ring[(i + 1) % ring.len()]))
                .collect(),
        }
    }

    /// Closed containment with `cfg.eps_dist` slack.
    pub fn contains(&self, p: Vector2<f64>, cfg: &GeomCfg) -> bool {
        match self {
            Region::Empty => false,
            Region::Point(q) => (p - q).norm() <= cfg.eps_dist,
            Region::Segment(a, b) => on_segment(p, *a, *b, cfg),
            Region::Polygon(ring) => (0..ring.len())
                .filter_map(|i| Hs2::from_ccw_edge(ring[i], ring[(i + 1) % ring.len()]))
                .all(|h| h.satisfies_eps(p, cfg.eps_dist)),
        }
    }

    /// Intersection elements of `self ∩ other`.
    pub fn intersection(&self, other: &Region, cfg: &GeomCfg) -> Vec<IntersectionElement> {
        let mut out = Vec::new();
        for (p1, p2) in self.edges() {
            for (q1, q2) in other.edges() {
                match segment_intersection(p1, p2, q1, q2, cfg) {
                    Some(SegmentHit::Point(x)) => out.push(IntersectionElement::Point(arr(x))),
                    Some(SegmentHit::Overlap(a, b)) => {
                        out.push(IntersectionElement::Segment(arr(a), arr(b)))
                    }
                    None => {}
                }
            }
        }
        for v in self.vertices() {
            if other.contains(v, cfg) {
                out.push(IntersectionElement::Point(arr(v)));
            }
        }
        for v in other.vertices() {
            if self.contains(v, cfg) {
                out.push(IntersectionElement::Point(arr(v)));
            }
        }
        out
    }
}

#[inline]
fn arr(v: Vector2<f64>) -> [f64; 2] {
    [v.x, v.y]
}

/// Farthest-apart pair of a (numerically) collinear point set.
fn collinear_extent(points: &[Vector2<f64>]) -> Region {
    let mut best = (points[0], points[0], 0.0);
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            let d = (b - a).norm();
            if d > best.2 {
                best = (a, b, d);
            }
        }
    }
    if best.2 == 0.0 {
        Region::Point(best.0)
    } else {
        Region::Segment(best.0, best.1)
    }
}

/// Round to 13 decimal places.
#[inline]
pub fn round13(x: f64) -> f64 {
    (x * 1e13).round() / 1e13
}

/// Flatten intersection elements into a deduplicated vertex set.
///
/// Points contribute themselves, segments both endpoints. Vertices are
/// rounded to 13 decimals and deduplicated on the rounded pair, keeping
/// first-seen order.
pub fn vertices_of(elements: &[IntersectionElement]) -> Vec<Vector2<f64>> {
    let raw = elements.iter().flat_map(|e| match *e {
        IntersectionElement::Point(p) => vec![p],
        IntersectionElement::Segment(a, b) => vec![a, b],
    });
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    let mut out = Vec::new();
    for p in raw {
        let v = Vector2::new(round13(p[0]), round13(p[1]));
        // +0.0 and -0.0 must share a key
        let key = ((v.x + 0.0).to_bits(), (v.y + 0.0).to_bits());
        if seen.insert(key) {
            out.push(v);
        }
    }
    out
}
