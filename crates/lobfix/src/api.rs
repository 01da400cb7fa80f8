//! Curated API surface.
//!
//! Important
//! - Grouped re-exports for callers such as the CLI and benchmarks. Module
//!   paths behind them may change; these names are the ones to import.

// Geodesy
pub use crate::geodesy::{
    centroid, distance, normalize_azimuth, shift, Coordinate, EARTH_RADIUS_M, MIN_SHIFT_M,
};
// Planar geometry
pub use crate::geom2::{
    area_acres, intersect, line_from_points, order_coordinates, order_ring, segments_cross,
    vertices_of, GeomCfg, IntersectionElement, Line, Region,
};
// LOB polygons
pub use crate::lob::{LobCfg, LobPolygon, SensorReading};
// Cuts and fixes
pub use crate::fix::{
    accuracy_improvement_of_cut, accuracy_improvement_of_fix, fix_vertices, intersect_vertex_sets,
    solve, solve_cut, solve_fix, Cut, Fix, FixComposition, Solution, SolverCfg, MAX_LOBS,
};
// Collaborator seams
pub use crate::grid::{
    grid_lines, grid_walk, snap_to_km, step_grid, GridCfg, GridConverter, GridDirection, GridLine,
};
pub use crate::profile::{elevation_profile, lob_profile, ElevationProfile, ElevationSource};
// Scenarios
pub use crate::scenario::{draw_scenario, ReplayToken, Scenario, ScenarioCfg};
// Errors
pub use crate::error::{GridError, LobError, LobResult};
