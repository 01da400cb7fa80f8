//! Geodesy primitives: coordinates, flat-Earth shifts, great-circle distance.
//!
//! Purpose
//! - Move a coordinate by (azimuth, distance) with a planar approximation that
//!   is good at regional scale (tens of kilometres) away from the poles.
//! - Measure great-circle distance with the haversine formula.
//!
//! Conventions
//! - `Coordinate` is (latitude, longitude) in decimal degrees.
//! - Azimuths are compass bearings: 0 = north, increasing clockwise.
//! - The planar view used by `geom2` maps latitude to x and longitude to y.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{LobError, LobResult};

/// Mean Earth radius used by `shift` and `distance` (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Smallest distance `shift` accepts (m).
pub const MIN_SHIFT_M: f64 = 10.0;

/// Geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Checked constructor: both components finite, latitude within ±90°.
    pub fn try_new(lat: f64, lon: f64) -> LobResult<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(LobError::invalid(format!(
                "coordinate ({lat}, {lon}) is not finite"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LobError::invalid(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Planar view: x = latitude, y = longitude.
    #[inline]
    pub fn to_vec2(self) -> Vector2<f64> {
        Vector2::new(self.lat, self.lon)
    }

    #[inline]
    pub fn from_vec2(v: Vector2<f64>) -> Self {
        Self { lat: v.x, lon: v.y }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Wrap any finite bearing into [0, 360).
#[inline]
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Move `coord` by `distance_m` metres along compass bearing `azimuth_deg`.
///
/// Flat-Earth approximation on a sphere of radius [`EARTH_RADIUS_M`]. The
/// longitude scale is taken at the mean latitude of the move, so shifting by
/// `(a, d)` and then `(a + 180, d)` lands back on the start.
///
/// Pre: `distance_m >= 10`, `azimuth_deg ∈ [0, 360]`.
pub fn shift(coord: Coordinate, azimuth_deg: f64, distance_m: f64) -> LobResult<Coordinate> {
    if !(distance_m.is_finite() && distance_m >= MIN_SHIFT_M) {
        return Err(LobError::invalid(format!(
            "shift distance {distance_m} m below the {MIN_SHIFT_M} m minimum"
        )));
    }
    if !(0.0..=360.0).contains(&azimuth_deg) {
        return Err(LobError::invalid(format!(
            "azimuth {azimuth_deg} outside [0, 360]"
        )));
    }
    let theta = azimuth_deg.to_radians();
    let north_m = distance_m * theta.cos();
    let east_m = distance_m * theta.sin();
    let dlat = (north_m / EARTH_RADIUS_M).to_degrees();
    let lat = coord.lat + dlat;
    let mean_lat = 0.5 * (coord.lat + lat);
    let dlon = (east_m / EARTH_RADIUS_M).to_degrees() / mean_lat.to_radians().cos();
    Ok(Coordinate::new(lat, coord.lon + dlon))
}

/// Great-circle (haversine) distance in metres.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Component-wise mean of latitude and longitude.
pub fn centroid(coords: &[Coordinate]) -> LobResult<Coordinate> {
    if coords.is_empty() {
        return Err(LobError::invalid("centroid of an empty coordinate set"));
    }
    let n = coords.len() as f64;
    let (lat, lon) = coords
        .iter()
        .fold((0.0, 0.0), |(la, lo), c| (la + c.lat, lo + c.lon));
    Ok(Coordinate::new(lat / n, lon / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ORIGIN: Coordinate = Coordinate::new(33.80, 42.44);

    #[test]
    fn shift_north_moves_latitude_only() {
        let c = shift(ORIGIN, 0.0, 1000.0).unwrap();
        assert!((c.lon - ORIGIN.lon).abs() < 1e-12);
        assert!((distance(ORIGIN, c) - 1000.0).abs() < 0.5);
    }

    #[test]
    fn shift_east_keeps_latitude() {
        let c = shift(ORIGIN, 90.0, 2500.0).unwrap();
        assert!((c.lat - ORIGIN.lat).abs() < 1e-12);
        assert!(c.lon > ORIGIN.lon);
        assert!((distance(ORIGIN, c) - 2500.0).abs() < 1.0);
    }

    #[test]
    fn shift_rejects_short_distance_and_bad_azimuth() {
        assert!(matches!(
            shift(ORIGIN, 10.0, 9.99),
            Err(LobError::InvalidArgument(_))
        ));
        assert!(shift(ORIGIN, 360.5, 100.0).is_err());
        assert!(shift(ORIGIN, -1.0, 100.0).is_err());
        assert!(shift(ORIGIN, 360.0, 100.0).is_ok());
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn centroid_averages_components() {
        let c = centroid(&[
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 4.0),
            Coordinate::new(4.0, 2.0),
        ])
        .unwrap();
        assert_eq!(c, Coordinate::new(2.0, 2.0));
        assert!(centroid(&[]).is_err());
    }

    #[test]
    fn azimuth_normalization() {
        assert_eq!(normalize_azimuth(-5.0), 355.0);
        assert_eq!(normalize_azimuth(365.0), 5.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert!(normalize_azimuth(-1e-18) < 360.0);
    }

    #[test]
    fn try_new_rejects_non_finite() {
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::try_new(91.0, 0.0).is_err());
        assert!(Coordinate::try_new(45.0, 190.0).is_ok());
    }

    proptest! {
        #[test]
        fn shift_round_trip(
            lat in -70.0f64..70.0,
            lon in -179.0f64..179.0,
            az in 0.0f64..360.0,
            d in 10.0f64..50_000.0,
        ) {
            let start = Coordinate::new(lat, lon);
            let there = shift(start, az, d).unwrap();
            let back = shift(there, normalize_azimuth(az + 180.0), d).unwrap();
            prop_assert!((back.lat - start.lat).abs() < 1e-6);
            prop_assert!((back.lon - start.lon).abs() < 1e-6);
        }
    }
}
