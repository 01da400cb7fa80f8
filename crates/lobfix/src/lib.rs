//! Line-of-bearing geometry and fix solving.
//!
//! A sensor reading (position, bearing, angular error, range window) becomes
//! a trapezoidal LOB polygon. Two polygons intersect into a cut, three into a
//! fix, and each combination is rated by how much it shrinks the area of
//! uncertainty.
//!
//! Layout
//! - `geodesy`: coordinates, flat-Earth shifts, haversine distance, centroids.
//! - `geom2`: planar lines, ring ordering, shoelace area, convex intersection.
//! - `lob`: polygon construction from a reading.
//! - `fix`: cuts, fixes and accuracy ratios.
//! - `profile`, `grid`: seams for elevation and grid-notation collaborators.
//! - `scenario`: replayable random layouts for tests and benchmarks.
//!
//! API Policy
//! - Prefer the curated surface in `api` or the `prelude`; module paths may move.

pub mod api;
pub mod error;
pub mod fix;
pub mod geodesy;
pub mod geom2;
pub mod grid;
pub mod lob;
pub mod profile;
pub mod scenario;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GridError, LobError, LobResult};
pub use geodesy::Coordinate;
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{GridError, LobError, LobResult};
    pub use crate::fix::{solve, solve_cut, solve_fix, Cut, Fix, FixComposition, Solution, SolverCfg};
    pub use crate::geodesy::{centroid, distance, shift, Coordinate};
    pub use crate::geom2::{area_acres, intersect, line_from_points, segments_cross, GeomCfg};
    pub use crate::lob::{LobCfg, LobPolygon, SensorReading};
    pub use nalgebra::Vector2 as Vec2;
}
