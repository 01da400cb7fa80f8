//! Random sensor layouts around a known emitter (replay tokens).
//!
//! Purpose
//! - Deterministic, indexable scenarios for tests and benchmarks: an emitter
//!   near a centre point and one to three sensors aimed at it with bounded
//!   bearing noise.
//!
//! Model
//! - The emitter is drawn uniformly in a square box around `center`.
//! - Sensors sit on evenly spaced bearings from the emitter (random global
//!   phase plus angular jitter) at a uniform standoff distance, and report
//!   the back-bearing plus uniform noise.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::{LobError, LobResult};
use crate::fix::MAX_LOBS;
use crate::geodesy::{normalize_azimuth, shift, Coordinate, MIN_SHIFT_M};
use crate::lob::SensorReading;

/// Scenario sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScenarioCfg {
    pub center: Coordinate,
    /// Half-width of the emitter box around `center` (m).
    pub emitter_spread_m: f64,
    /// Number of sensors, 1..=3.
    pub sensors: usize,
    /// Sensor standoff from the emitter (m), drawn uniformly.
    pub standoff_min_m: f64,
    pub standoff_max_m: f64,
    /// Angular jitter as a fraction of the base spacing 360°/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Reported bearings deviate from the truth by at most this much (degrees).
    pub bearing_noise_deg: f64,
    pub rms_error_deg: f64,
    pub min_range_m: f64,
    pub max_range_m: f64,
}

impl Default for ScenarioCfg {
    fn default() -> Self {
        Self {
            center: Coordinate::new(33.8, 42.4),
            emitter_spread_m: 5000.0,
            sensors: 3,
            standoff_min_m: 1000.0,
            standoff_max_m: 2500.0,
            angle_jitter_frac: 0.25,
            bearing_noise_deg: 1.0,
            rms_error_deg: 5.0,
            min_range_m: 500.0,
            max_range_m: 3000.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Ground truth plus the readings it produced.
#[derive(Clone, Debug, Serialize)]
pub struct Scenario {
    pub emitter: Coordinate,
    pub readings: Vec<SensorReading>,
}

/// Uniform draw in `[-half, half]`.
#[inline]
fn symmetric<R: Rng>(rng: &mut R, half: f64) -> f64 {
    (rng.gen::<f64>() * 2.0 - 1.0) * half
}

/// Offset `from` by signed north and east distances; moves under the minimum are skipped.
fn offset(from: Coordinate, north_m: f64, east_m: f64) -> LobResult<Coordinate> {
    let mut at = from;
    if north_m.abs() >= MIN_SHIFT_M {
        at = shift(at, if north_m > 0.0 { 0.0 } else { 180.0 }, north_m.abs())?;
    }
    if east_m.abs() >= MIN_SHIFT_M {
        at = shift(at, if east_m > 0.0 { 90.0 } else { 270.0 }, east_m.abs())?;
    }
    Ok(at)
}

/// Draw one scenario.
pub fn draw_scenario(cfg: &ScenarioCfg, tok: ReplayToken) -> LobResult<Scenario> {
    if !(1..=MAX_LOBS).contains(&cfg.sensors) {
        return Err(LobError::invalid(format!(
            "scenario needs 1 to {MAX_LOBS} sensors, got {}",
            cfg.sensors
        )));
    }
    if !(cfg.standoff_min_m >= MIN_SHIFT_M && cfg.standoff_max_m >= cfg.standoff_min_m) {
        return Err(LobError::invalid(format!(
            "standoff window {}..{} m is invalid",
            cfg.standoff_min_m, cfg.standoff_max_m
        )));
    }
    let mut rng = tok.to_std_rng();
    let spread = cfg.emitter_spread_m.max(0.0);
    let emitter = offset(
        cfg.center,
        symmetric(&mut rng, spread),
        symmetric(&mut rng, spread),
    )?;

    let n = cfg.sensors;
    let delta = 360.0 / n as f64;
    let jitter = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let phase = rng.gen::<f64>() * 360.0;
    let mut readings = Vec::with_capacity(n);
    for k in 0..n {
        let from = normalize_azimuth(phase + k as f64 * delta + symmetric(&mut rng, jitter * delta));
        let standoff = rng.gen_range(cfg.standoff_min_m..=cfg.standoff_max_m);
        let position = shift(emitter, from, standoff)?;
        let noise = symmetric(&mut rng, cfg.bearing_noise_deg.max(0.0));
        let azimuth = normalize_azimuth(from + 180.0 + noise);
        readings.push(SensorReading::new(
            position,
            azimuth,
            cfg.rms_error_deg,
            cfg.min_range_m,
            cfg.max_range_m,
        )?);
    }
    tracing::trace!(seed = tok.seed, index = tok.index, sensors = n, "scenario drawn");
    Ok(Scenario { emitter, readings })
}
