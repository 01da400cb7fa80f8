//! Line-of-bearing polygons.
//!
//! A sensor reading (position, azimuth, RMS error, range window) becomes a
//! trapezoidal error cone: near edge at the minimum range, far edge at the
//! maximum range, sides along `azimuth ± error`.
//!
//! The builder walks three rays outward in fixed steps. Every center-ray
//! sample lands in `center_path` (consumed by elevation profiling); the first
//! side-ray samples strictly past the minimum range become the near corners,
//! the last samples (first past the maximum range) the far corners.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LobError, LobResult};
use crate::geodesy::{centroid, normalize_azimuth, shift, Coordinate};
use crate::geom2::{area_acres, order_coordinates, GeomCfg, Region};

/// One bearing measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub position: Coordinate,
    /// Compass bearing in [0, 360).
    pub azimuth_deg: f64,
    /// Angular RMS error in (0, 90).
    pub rms_error_deg: f64,
    pub min_range_m: f64,
    pub max_range_m: f64,
}

impl SensorReading {
    /// Validated constructor.
    pub fn new(
        position: Coordinate,
        azimuth_deg: f64,
        rms_error_deg: f64,
        min_range_m: f64,
        max_range_m: f64,
    ) -> LobResult<Self> {
        let r = Self {
            position,
            azimuth_deg,
            rms_error_deg,
            min_range_m,
            max_range_m,
        };
        r.validate()?;
        Ok(r)
    }

    pub fn validate(&self) -> LobResult<()> {
        Coordinate::try_new(self.position.lat, self.position.lon)?;
        if !(0.0..360.0).contains(&self.azimuth_deg) {
            return Err(LobError::invalid(format!(
                "azimuth {} outside [0, 360)",
                self.azimuth_deg
            )));
        }
        if !(self.rms_error_deg > 0.0 && self.rms_error_deg < 90.0) {
            return Err(LobError::invalid(format!(
                "angular error {} outside (0, 90)",
                self.rms_error_deg
            )));
        }
        if !(self.min_range_m >= 0.0 && self.min_range_m.is_finite()) {
            return Err(LobError::invalid(format!(
                "minimum range {} must be finite and >= 0",
                self.min_range_m
            )));
        }
        if !(self.max_range_m > self.min_range_m && self.max_range_m.is_finite()) {
            return Err(LobError::invalid(format!(
                "maximum range {} must exceed minimum range {}",
                self.max_range_m, self.min_range_m
            )));
        }
        Ok(())
    }

    /// Bearing of the counterclockwise error bound.
    #[inline]
    pub fn left_azimuth(&self) -> f64 {
        normalize_azimuth(self.azimuth_deg - self.rms_error_deg)
    }

    /// Bearing of the clockwise error bound.
    #[inline]
    pub fn right_azimuth(&self) -> f64 {
        normalize_azimuth(self.azimuth_deg + self.rms_error_deg)
    }
}

/// Sampling configuration for the ray walk.
#[derive(Clone, Copy, Debug)]
pub struct LobCfg {
    pub initial_step_m: f64,
    pub step_decrement_m: f64,
    pub min_step_m: f64,
}

impl Default for LobCfg {
    fn default() -> Self {
        Self {
            initial_step_m: 30.0,
            step_decrement_m: 10.0,
            min_step_m: 10.0,
        }
    }
}

impl LobCfg {
    /// Largest step not exceeding `max_range_m`, reduced in decrements and floored at `min_step_m`.
    pub fn step_for(&self, max_range_m: f64) -> f64 {
        let mut step = self.initial_step_m;
        while step > max_range_m && step > self.min_step_m {
            step -= self.step_decrement_m;
        }
        step.max(self.min_step_m)
    }
}

/// Trapezoidal error cone of one reading plus its characteristic points.
#[derive(Clone, Debug, Serialize)]
pub struct LobPolygon {
    pub reading: SensorReading,
    pub step_m: f64,
    pub near_left: Coordinate,
    pub near_right: Coordinate,
    pub far_left: Coordinate,
    pub far_right: Coordinate,
    /// Mean of the four corners.
    pub centroid: Coordinate,
    /// Mean of the two near corners.
    pub near_centroid: Coordinate,
    /// Last sample on the center ray.
    pub far_center: Coordinate,
    /// Center-ray samples from the first step outward.
    pub center_path: Vec<Coordinate>,
    /// The four corners ordered into a simple ring.
    pub ring: Vec<Coordinate>,
    pub area_acres: f64,
}

impl LobPolygon {
    /// Walk the three rays of `reading` and assemble the cone.
    pub fn build(reading: &SensorReading, cfg: &LobCfg) -> LobResult<Self> {
        reading.validate()?;
        let step = cfg.step_for(reading.max_range_m);
        let (left_az, right_az) = (reading.left_azimuth(), reading.right_azimuth());
        tracing::trace!(step, left_az, right_az, "walking LOB rays");

        let mut left = reading.position;
        let mut center = reading.position;
        let mut right = reading.position;
        let mut walked = 0.0;
        let mut near: Option<(Coordinate, Coordinate, usize)> = None;
        let mut center_path = Vec::new();
        while walked <= reading.max_range_m {
            left = shift(left, left_az, step)?;
            center = shift(center, reading.azimuth_deg, step)?;
            right = shift(right, right_az, step)?;
            walked += step;
            center_path.push(center);
            if near.is_none() && walked > reading.min_range_m {
                near = Some((left, right, center_path.len()));
                tracing::trace!(walked, "near corners captured");
            }
        }
        let degenerate = LobError::DegenerateLob {
            min_range_m: reading.min_range_m,
            max_range_m: reading.max_range_m,
            step_m: step,
        };
        let Some((near_left, near_right, near_sample)) = near else {
            return Err(degenerate);
        };
        if near_sample == center_path.len() {
            return Err(degenerate);
        }

        let (far_left, far_right) = (left, right);
        let corners = [near_left, near_right, far_right, far_left];
        let ring = order_coordinates(&corners);
        let area = area_acres(&ring);
        tracing::debug!(
            azimuth = reading.azimuth_deg,
            samples = center_path.len(),
            acres = area,
            "built LOB polygon"
        );
        Ok(Self {
            reading: *reading,
            step_m: step,
            near_left,
            near_right,
            far_left,
            far_right,
            centroid: centroid(&corners)?,
            near_centroid: centroid(&[near_right, near_left])?,
            far_center: center,
            center_path,
            ring,
            area_acres: area,
        })
    }

    /// Corners in construction order (not a ring order).
    #[inline]
    pub fn corners(&self) -> [Coordinate; 4] {
        [self.near_left, self.near_right, self.far_right, self.far_left]
    }

    /// Center line from the sensor to the far end of the walk.
    #[inline]
    pub fn center_line(&self) -> (Coordinate, Coordinate) {
        (self.reading.position, self.far_center)
    }

    /// Planar region of the cone, from the ordered ring.
    pub fn region(&self, cfg: &GeomCfg) -> Region {
        let pts: Vec<_> = self.ring.iter().map(|c| c.to_vec2()).collect();
        Region::from_ordered(&pts, cfg)
    }
}

/// Tooltip text handed to the map renderer.
impl fmt::Display for LobPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.reading;
        write!(
            f,
            "{}° with {}° RMS error from {:.1} to {:.1}km ({} acres of error)",
            r.azimuth_deg,
            r.rms_error_deg,
            r.min_range_m / 1000.0,
            r.max_range_m / 1000.0,
            group_thousands(self.area_acres.round())
        )
    }
}

/// Integer rendering with comma thousands separators.
fn group_thousands(x: f64) -> String {
    let digits = format!("{:.0}", x.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if x < 0.0 {
        out.insert(0, '-');
    }
    out
}
