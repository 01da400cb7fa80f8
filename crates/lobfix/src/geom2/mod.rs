//! Planar geometry in degree space.
//!
//! Purpose
//! - Line/segment intersection, ring ordering, shoelace area, and convex
//!   region intersection for LOB polygons, cuts and fixes.
//! - Keep predicates numerically explicit: every tolerance lives in `GeomCfg`.
//!
//! Points are `Vector2<f64>` with x = latitude and y = longitude, matching
//! `Coordinate::to_vec2`.

pub mod lines;
pub mod region;
pub mod ring;
mod types;

pub use lines::{
    intersect, intersect_eps, line_from_points, on_segment, segment_intersection, segments_cross,
    SegmentHit,
};
pub use region::{round13, vertices_of, IntersectionElement, Region};
pub use ring::{
    area_acres, convex_hull, hull_coordinates, is_convex, is_simple, merge_close,
    order_coordinates, order_ring, signed_area, METERS_PER_DEGREE, SQ_METERS_PER_ACRE,
};
pub use types::{cross, GeomCfg, Hs2, Line};
