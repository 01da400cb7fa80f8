//! Elevation profiles along a LOB center line.
//!
//! Elevations come from an external collaborator behind [`ElevationSource`];
//! the core never performs I/O. Distances are great-circle metres from the
//! first point of the path.

use serde::Serialize;

use crate::geodesy::{distance, Coordinate};
use crate::lob::LobPolygon;

/// Terrain elevation lookup (metres above sea level).
///
/// `None` marks a point the source could not resolve; it stays in the
/// profile as a gap.
pub trait ElevationSource {
    fn elevation(&self, at: Coordinate) -> Option<f64>;
}

impl<F> ElevationSource for F
where
    F: Fn(Coordinate) -> Option<f64>,
{
    #[inline]
    fn elevation(&self, at: Coordinate) -> Option<f64> {
        self(at)
    }
}

/// One point of a profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProfileSample {
    pub coordinate: Coordinate,
    /// Distance from the first point of the path (m).
    pub distance_m: f64,
    pub elevation_m: Option<f64>,
}

/// Samples ordered by increasing distance along a path.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ElevationProfile {
    pub samples: Vec<ProfileSample>,
}

/// Look up every point of `path`.
pub fn elevation_profile<S: ElevationSource + ?Sized>(
    path: &[Coordinate],
    source: &S,
) -> ElevationProfile {
    let Some(&origin) = path.first() else {
        return ElevationProfile::default();
    };
    let samples = path
        .iter()
        .map(|&c| ProfileSample {
            coordinate: c,
            distance_m: distance(origin, c),
            elevation_m: source.elevation(c),
        })
        .collect::<Vec<_>>();
    let gaps = samples.iter().filter(|s| s.elevation_m.is_none()).count();
    if gaps > 0 {
        tracing::debug!(gaps, total = samples.len(), "elevation profile has gaps");
    }
    ElevationProfile { samples }
}

/// Profile from the sensor out along the center ray of `lob`.
pub fn lob_profile<S: ElevationSource + ?Sized>(lob: &LobPolygon, source: &S) -> ElevationProfile {
    let path: Vec<Coordinate> = std::iter::once(lob.reading.position)
        .chain(lob.center_path.iter().copied())
        .collect();
    elevation_profile(&path, source)
}

impl ElevationProfile {
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn elevations(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(|s| s.elevation_m)
    }

    /// Lowest resolved elevation.
    pub fn min_elevation(&self) -> Option<f64> {
        self.elevations().reduce(f64::min)
    }

    /// Highest resolved elevation.
    pub fn max_elevation(&self) -> Option<f64> {
        self.elevations().reduce(f64::max)
    }

    /// Index `i` of the bin with `d[i] <= target_m < d[i + 1]`.
    ///
    /// Targets before the first sample or at/after the last one have no bin.
    pub fn bin_of(&self, target_m: f64) -> Option<usize> {
        self.samples
            .windows(2)
            .position(|w| w[0].distance_m <= target_m && target_m < w[1].distance_m)
    }

    /// Bin of a coordinate, by its distance from the first sample.
    pub fn bin_at(&self, at: Coordinate) -> Option<usize> {
        let origin = self.samples.first()?.coordinate;
        self.bin_of(distance(origin, at))
    }

    /// Total path length (m).
    pub fn length_m(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.distance_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::shift;
    use crate::lob::{LobCfg, SensorReading};

    fn straight_path(n: usize, step_m: f64) -> Vec<Coordinate> {
        let start = Coordinate::new(33.8, 42.4);
        let mut path = vec![start];
        for i in 1..n {
            path.push(shift(start, 90.0, step_m * i as f64).unwrap());
        }
        path
    }

    #[test]
    fn samples_measure_distance_from_first_point() {
        let path = straight_path(5, 100.0);
        let slope = |c: Coordinate| Some((c.lon - 42.4) * 1e4);
        let p = elevation_profile(&path, &slope);
        assert_eq!(p.len(), 5);
        assert_eq!(p.samples[0].distance_m, 0.0);
        for (i, s) in p.samples.iter().enumerate() {
            assert!((s.distance_m - 100.0 * i as f64).abs() < 0.5, "{s:?}");
        }
        assert!((p.length_m() - 400.0).abs() < 0.5);
        assert_eq!(p.min_elevation(), p.samples[0].elevation_m);
        assert_eq!(p.max_elevation(), p.samples[4].elevation_m);
    }

    #[test]
    fn gaps_are_kept_and_skipped_by_extrema() {
        let path = straight_path(4, 50.0);
        let first = path[0];
        let holes = move |c: Coordinate| (c != first).then_some(120.0);
        let p = elevation_profile(&path, &holes);
        assert_eq!(p.samples[0].elevation_m, None);
        assert_eq!(p.min_elevation(), Some(120.0));
        assert_eq!(p.max_elevation(), Some(120.0));

        let none = |_: Coordinate| None::<f64>;
        let empty = elevation_profile(&path, &none);
        assert_eq!(empty.min_elevation(), None);
    }

    #[test]
    fn bins_are_half_open() {
        let p = elevation_profile(&straight_path(4, 100.0), &|_: Coordinate| Some(0.0));
        assert_eq!(p.bin_of(-1.0), None);
        assert_eq!(p.bin_of(0.0), Some(0));
        assert_eq!(p.bin_of(150.0), Some(1));
        assert_eq!(p.bin_of(250.0), Some(2));
        assert_eq!(p.bin_of(1000.0), None);
        let mid = shift(p.samples[0].coordinate, 90.0, 120.0).unwrap();
        assert_eq!(p.bin_at(mid), Some(1));
    }

    #[test]
    fn empty_path_gives_empty_profile() {
        let p = elevation_profile(&[], &|_: Coordinate| Some(1.0));
        assert!(p.is_empty());
        assert_eq!(p.bin_of(0.0), None);
        assert_eq!(p.length_m(), 0.0);
    }

    #[test]
    fn lob_profile_starts_at_the_sensor() {
        let r = SensorReading::new(Coordinate::new(33.8, 42.4), 45.0, 5.0, 500.0, 3000.0).unwrap();
        let lob = LobPolygon::build(&r, &LobCfg::default()).unwrap();
        let p = lob_profile(&lob, &|_: Coordinate| Some(10.0));
        assert_eq!(p.len(), lob.center_path.len() + 1);
        assert_eq!(p.samples[0].coordinate, r.position);
        assert!((p.length_m() - distance(r.position, lob.far_center)).abs() < 1e-9);
        // the minimum range falls in the bin just before the near corners
        assert_eq!(p.bin_of(500.0), Some(16));
    }
}
