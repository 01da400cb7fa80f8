//! Cut and fix solving.
//!
//! Purpose
//! - Intersect two LOB polygons into a cut, three into a fix, and rate how
//!   much the combination shrinks the uncertainty area.
//!
//! Composition
//! - `FixComposition::ReferenceFirst` (default) treats sensor 1 as the
//!   reference: the fix is `(P1 ∩ P2) ∩ (P1 ∩ P3)`, each cut rebuilt as a
//!   polygon from its vertex set before the final intersection.
//! - `FixComposition::AllPairs` additionally folds in `P2 ∩ P3`.
//!
//! Vertex sets are merged within `GeomCfg::eps_merge` and rebuilt as convex
//! hulls, so cuts sharing an edge of P1 do not leave near-twin vertices in
//! the fix.
//!
//! Empty intersections are not errors: they propagate as empty vertex lists
//! and mean "no feasible fix".

mod metrics;

pub use metrics::{accuracy_improvement_of_cut, accuracy_improvement_of_fix};

use serde::Serialize;

use crate::error::{LobError, LobResult};
use crate::geodesy::{centroid, Coordinate};
use crate::geom2::{
    area_acres, hull_coordinates, intersect_eps, line_from_points, merge_close, segments_cross,
    vertices_of, GeomCfg, Region,
};
use crate::lob::{LobCfg, LobPolygon, SensorReading};

/// Most bearings a single solve accepts.
pub const MAX_LOBS: usize = 3;

/// How a three-LOB fix composes its pairwise intersections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixComposition {
    #[default]
    ReferenceFirst,
    AllPairs,
}

/// Solver configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverCfg {
    pub geom: GeomCfg,
    pub lob: LobCfg,
    pub composition: FixComposition,
    /// Return an empty cut without polygon work when the two center lines do not cross.
    pub skip_if_bearings_miss: bool,
}

/// Intersection of exactly two LOB polygons.
#[derive(Clone, Debug, Serialize)]
pub struct Cut {
    /// Deduplicated intersection vertices, unordered.
    pub vertices: Vec<Coordinate>,
    /// Counterclockwise hull of the vertices for rendering; collinear vertices are dropped.
    pub ring: Vec<Coordinate>,
    pub area_acres: f64,
    /// Whether the two center lines cross.
    pub bearings_cross: bool,
    /// Crossing point of the center lines, when they cross.
    pub bearing_intersection: Option<Coordinate>,
    pub accuracy_improvement: Option<f64>,
}

/// Intersection of three LOB polygons.
#[derive(Clone, Debug, Serialize)]
pub struct Fix {
    pub vertices: Vec<Coordinate>,
    pub ring: Vec<Coordinate>,
    pub area_acres: f64,
    pub composition: FixComposition,
    /// Cuts 1∩2, 1∩3 and 2∩3.
    pub cuts: [Cut; 3],
    pub accuracy_improvement: Option<f64>,
}

/// Result of solving one to three readings.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Solution {
    Lob { lob: LobPolygon },
    Cut { lobs: Vec<LobPolygon>, cut: Cut },
    Fix { lobs: Vec<LobPolygon>, fix: Fix },
}

impl Cut {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Mean of the cut vertices, `None` for an empty cut.
    pub fn centroid(&self) -> Option<Coordinate> {
        centroid(&self.vertices).ok()
    }
}

impl Fix {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn centroid(&self) -> Option<Coordinate> {
        centroid(&self.vertices).ok()
    }
}

/// Vertex set of `a ∩ b`; no two vertices lie within `cfg.eps_merge`.
pub fn intersect_regions(a: &Region, b: &Region, cfg: &GeomCfg) -> Vec<Coordinate> {
    merge_close(&vertices_of(&a.intersection(b, cfg)), cfg.eps_merge)
        .into_iter()
        .map(Coordinate::from_vec2)
        .collect()
}

/// Vertex set of the intersection of the polygons spanned by two vertex sets.
pub fn intersect_vertex_sets(a: &[Coordinate], b: &[Coordinate], cfg: &GeomCfg) -> Vec<Coordinate> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    intersect_regions(&region_of(a, cfg), &region_of(b, cfg), cfg)
}

fn region_of(coords: &[Coordinate], cfg: &GeomCfg) -> Region {
    let pts: Vec<_> = coords.iter().map(|c| c.to_vec2()).collect();
    Region::from_vertices(&pts, cfg)
}

/// Fix vertex set from three polygon vertex sets.
pub fn fix_vertices(
    polygons: [&[Coordinate]; 3],
    composition: FixComposition,
    cfg: &GeomCfg,
) -> Vec<Coordinate> {
    let [p1, p2, p3] = polygons;
    let v12 = intersect_vertex_sets(p1, p2, cfg);
    let v13 = intersect_vertex_sets(p1, p3, cfg);
    match composition {
        FixComposition::ReferenceFirst => compose(&[v12, v13], cfg),
        FixComposition::AllPairs => {
            let v23 = intersect_vertex_sets(p2, p3, cfg);
            compose(&[v12, v13, v23], cfg)
        }
    }
}

/// Left fold of vertex-set intersections; empty as soon as any part is empty.
fn compose(parts: &[Vec<Coordinate>], cfg: &GeomCfg) -> Vec<Coordinate> {
    let Some((first, rest)) = parts.split_first() else {
        return Vec::new();
    };
    rest.iter()
        .fold(first.clone(), |acc, next| intersect_vertex_sets(&acc, next, cfg))
}

fn ring_area(vertices: &[Coordinate], cfg: &GeomCfg) -> (Vec<Coordinate>, f64) {
    let ring = hull_coordinates(vertices, cfg.eps_merge);
    let area = if ring.len() >= 3 { area_acres(&ring) } else { 0.0 };
    (ring, area)
}

/// Crossing of the two center lines, if any.
fn bearing_crossing(a: &LobPolygon, b: &LobPolygon, cfg: &GeomCfg) -> (bool, Option<Coordinate>) {
    let (a1, a2) = a.center_line();
    let (b1, b2) = b.center_line();
    let (a1, a2, b1, b2) = (a1.to_vec2(), a2.to_vec2(), b1.to_vec2(), b2.to_vec2());
    if !segments_cross(a1, a2, b1, b2) {
        return (false, None);
    }
    let point = intersect_eps(
        &line_from_points(a1, a2),
        &line_from_points(b1, b2),
        cfg.eps_det,
    )
    .map(Coordinate::from_vec2);
    (true, point)
}

/// Intersect two LOB polygons.
pub fn solve_cut(a: &LobPolygon, b: &LobPolygon, cfg: &SolverCfg) -> LobResult<Cut> {
    let (bearings_cross, bearing_intersection) = bearing_crossing(a, b, &cfg.geom);
    let vertices = if cfg.skip_if_bearings_miss && !bearings_cross {
        Vec::new()
    } else {
        intersect_regions(&a.region(&cfg.geom), &b.region(&cfg.geom), &cfg.geom)
    };
    let (ring, area) = ring_area(&vertices, &cfg.geom);
    let accuracy_improvement = if vertices.is_empty() {
        tracing::debug!(bearings_cross, "LOB polygons do not overlap; empty cut");
        None
    } else {
        Some(accuracy_improvement_of_cut(a.area_acres, b.area_acres, area)?)
    };
    Ok(Cut {
        vertices,
        ring,
        area_acres: area,
        bearings_cross,
        bearing_intersection,
        accuracy_improvement,
    })
}

/// Intersect three LOB polygons; the first is the reference under `ReferenceFirst`.
pub fn solve_fix(lobs: &[LobPolygon; 3], cfg: &SolverCfg) -> LobResult<Fix> {
    let [l1, l2, l3] = lobs;
    let cuts = [
        solve_cut(l1, l2, cfg)?,
        solve_cut(l1, l3, cfg)?,
        solve_cut(l2, l3, cfg)?,
    ];
    let vertices = match cfg.composition {
        FixComposition::ReferenceFirst => compose(
            &[cuts[0].vertices.clone(), cuts[1].vertices.clone()],
            &cfg.geom,
        ),
        FixComposition::AllPairs => compose(
            &[
                cuts[0].vertices.clone(),
                cuts[1].vertices.clone(),
                cuts[2].vertices.clone(),
            ],
            &cfg.geom,
        ),
    };
    let (ring, area) = ring_area(&vertices, &cfg.geom);
    let accuracy_improvement = if vertices.is_empty() {
        tracing::debug!(composition = ?cfg.composition, "no feasible fix");
        None
    } else {
        let cut_areas = [cuts[0].area_acres, cuts[1].area_acres, cuts[2].area_acres];
        Some(accuracy_improvement_of_fix(area, cut_areas)?)
    };
    Ok(Fix {
        vertices,
        ring,
        area_acres: area,
        composition: cfg.composition,
        cuts,
        accuracy_improvement,
    })
}

/// Build LOB polygons for one to three readings and solve them.
pub fn solve(readings: &[SensorReading], cfg: &SolverCfg) -> LobResult<Solution> {
    if readings.is_empty() || readings.len() > MAX_LOBS {
        return Err(LobError::invalid(format!(
            "expected 1 to {MAX_LOBS} readings, got {}",
            readings.len()
        )));
    }
    let mut lobs = readings
        .iter()
        .map(|r| LobPolygon::build(r, &cfg.lob))
        .collect::<LobResult<Vec<_>>>()?;
    match lobs.len() {
        1 => Ok(Solution::Lob { lob: lobs.remove(0) }),
        2 => {
            let cut = solve_cut(&lobs[0], &lobs[1], cfg)?;
            Ok(Solution::Cut { lobs, cut })
        }
        _ => {
            let trio = [lobs[0].clone(), lobs[1].clone(), lobs[2].clone()];
            let fix = solve_fix(&trio, cfg)?;
            Ok(Solution::Fix { lobs, fix })
        }
    }
}

#[cfg(test)]
mod tests;
