//! Basic 2D types and tolerances used by the planar predicates.
//!
//! - `GeomCfg`: centralizes epsilons for determinant, segment-parameter, distance
//!   and vertex-merge checks.
//! - `Line`: standard form `A·x + B·y = C` through two points.
//! - `Hs2`: closed half-space `n·x <= c`, used for convex containment.
//!
//! Planar points are `Vector2<f64>` in degree space (x = latitude, y = longitude).

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Relative determinant threshold below which two lines count as parallel.
    pub eps_det: f64,
    /// Slack on segment parameters in [0, 1].
    pub eps_param: f64,
    /// Absolute distance slack in degrees (1e-10° is ~10 µm).
    pub eps_dist: f64,
    /// Vertices closer than this (degrees, ~0.1 mm) are one vertex.
    pub eps_merge: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_param: 1e-9,
            eps_dist: 1e-10,
            eps_merge: 1e-9,
        }
    }
}

/// Line in standard form `a·x + b·y = c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// Direction vector along the line.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        Vector2::new(self.b, -self.a)
    }
}

/// Closed half-space `n · x <= c`.
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }

    /// Outward half-space of the directed edge `p → q` of a counterclockwise ring,
    /// with a unit normal so that `eps` is a distance. `None` for a zero-length edge.
    pub fn from_ccw_edge(p: Vector2<f64>, q: Vector2<f64>) -> Option<Self> {
        let edge = q - p;
        // For CCW order, outward normal is 90° CW: (edge.y, -edge.x)
        let n = Vector2::new(edge.y, -edge.x);
        let norm = n.norm();
        if !norm.is_finite() || norm <= 0.0 {
            return None;
        }
        let n = n / norm;
        Some(Self::new(n, n.dot(&p)))
    }

    #[inline]
    pub fn satisfies_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.n.dot(&p) <= self.c + eps
    }
}

/// z-component of `(b - a) × (c - a)`; positive for a counterclockwise turn.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
