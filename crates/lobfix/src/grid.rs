//! Kilometre grid overlay in an external grid notation.
//!
//! Purpose
//! - Snap grid references to whole kilometres, walk the grid one increment
//!   at a time, and lay out labelled easting/northing lines around a centre
//!   for the map renderer.
//!
//! Notation
//! - A reference at precision `p` ends in `2p` digits: `p` of easting then
//!   `p` of northing, each in units of `10^(5-p)` m inside a 100 km square.
//!   Whatever precedes them (zone, band, square letters) is the preamble and
//!   is carried through untouched.
//! - Conversion itself lives behind [`GridConverter`]; this module is pure.
//!
//! Walking
//! - A step shifts the reference's coordinate by the increment and re-snaps.
//!   When rounding lands back in the starting cell the walk keeps shifting
//!   from the unsnapped point, up to `GridCfg::max_snap_iterations` times,
//!   then fails with `GridError::SnapExhausted`.

use serde::Serialize;

use crate::error::{GridError, LobResult};
use crate::geodesy::{shift, Coordinate};

/// Bidirectional grid-notation conversion.
pub trait GridConverter {
    /// Grid reference of `at` with `precision` digits per axis (1..=5).
    fn to_grid(&self, at: Coordinate, precision: usize) -> Result<String, GridError>;
    /// Coordinate of the south-west corner of the cell `reference` names.
    fn to_coordinate(&self, reference: &str) -> Result<Coordinate, GridError>;
}

/// Grid overlay configuration.
#[derive(Clone, Copy, Debug)]
pub struct GridCfg {
    /// Digits per axis in generated references.
    pub precision: usize,
    /// Re-snap attempts per step before giving up.
    pub max_snap_iterations: usize,
    /// Distance of one grid step (m).
    pub increment_m: f64,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            precision: 5,
            max_snap_iterations: 8,
            increment_m: 1000.0,
        }
    }
}

/// Cardinal walking direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridDirection {
    North,
    East,
    South,
    West,
}

impl GridDirection {
    #[inline]
    pub fn azimuth_deg(self) -> f64 {
        match self {
            GridDirection::North => 0.0,
            GridDirection::East => 90.0,
            GridDirection::South => 180.0,
            GridDirection::West => 270.0,
        }
    }
}

/// A snapped reference and the coordinate of its cell corner.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridPoint {
    pub coordinate: Coordinate,
    pub reference: String,
}

/// Labelled line segment of the overlay.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridLine {
    pub from: Coordinate,
    pub to: Coordinate,
    pub label: String,
}

/// Split a reference into (preamble, easting, northing) digit strings.
fn split_reference(reference: &str, precision: usize) -> Result<(&str, &str, &str), GridError> {
    if !(1..=5).contains(&precision) {
        return Err(GridError::Malformed(format!(
            "{reference}: precision {precision} outside 1..=5"
        )));
    }
    let digits = 2 * precision;
    if reference.len() < digits || !reference.is_char_boundary(reference.len() - digits) {
        return Err(GridError::Malformed(reference.to_string()));
    }
    let (preamble, tail) = reference.split_at(reference.len() - digits);
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GridError::Malformed(reference.to_string()));
    }
    let (easting, northing) = tail.split_at(precision);
    Ok((preamble, easting, northing))
}

/// Easting digits of a reference.
pub fn easting_of(reference: &str, precision: usize) -> Result<&str, GridError> {
    split_reference(reference, precision).map(|(_, e, _)| e)
}

/// Northing digits of a reference.
pub fn northing_of(reference: &str, precision: usize) -> Result<&str, GridError> {
    split_reference(reference, precision).map(|(_, _, n)| n)
}

fn round_digits_to_km(
    digits: &str,
    precision: usize,
    reference: &str,
) -> Result<String, GridError> {
    let value: u64 = digits
        .parse()
        .map_err(|_| GridError::Malformed(reference.to_string()))?;
    // one kilometre in units of the last digit
    let unit = 10u64.pow(precision.saturating_sub(2) as u32);
    let cell = 10u64.pow(precision as u32);
    let rounded = (value + unit / 2) / unit * unit;
    if rounded >= cell {
        return Err(GridError::CellOverflow(reference.to_string()));
    }
    Ok(format!("{rounded:0width$}", width = precision))
}

/// Round easting and northing of `reference` to the nearest kilometre.
///
/// Rounds half up. Precision 1 (10 km digits) is returned unchanged.
pub fn snap_to_km(reference: &str, precision: usize) -> Result<String, GridError> {
    let (preamble, easting, northing) = split_reference(reference, precision)?;
    if precision < 2 {
        return Ok(reference.to_string());
    }
    let e = round_digits_to_km(easting, precision, reference)?;
    let n = round_digits_to_km(northing, precision, reference)?;
    Ok(format!("{preamble}{e}{n}"))
}

/// Snapped reference of a coordinate.
pub fn snap_coordinate<C: GridConverter + ?Sized>(
    conv: &C,
    at: Coordinate,
    precision: usize,
) -> LobResult<String> {
    Ok(snap_to_km(&conv.to_grid(at, precision)?, precision)?)
}

fn grid_point<C: GridConverter + ?Sized>(conv: &C, reference: String) -> LobResult<GridPoint> {
    Ok(GridPoint {
        coordinate: conv.to_coordinate(&reference)?,
        reference,
    })
}

/// Move one increment from `start` and re-snap into a different cell.
pub fn step_grid<C: GridConverter + ?Sized>(
    conv: &C,
    start: &str,
    direction: GridDirection,
    cfg: &GridCfg,
) -> LobResult<GridPoint> {
    let mut at = conv.to_coordinate(start)?;
    for iteration in 1..=cfg.max_snap_iterations {
        at = shift(at, direction.azimuth_deg(), cfg.increment_m)?;
        let snapped = snap_coordinate(conv, at, cfg.precision)?;
        if snapped != start {
            if iteration > 1 {
                tracing::trace!(start, iteration, "grid step needed extra shifts");
            }
            return grid_point(conv, snapped);
        }
    }
    Err(GridError::SnapExhausted {
        reference: start.to_string(),
        iterations: cfg.max_snap_iterations,
    }
    .into())
}

/// `start` followed by `count` successive steps in `direction`.
pub fn grid_walk<C: GridConverter + ?Sized>(
    conv: &C,
    start: &str,
    direction: GridDirection,
    count: usize,
    cfg: &GridCfg,
) -> LobResult<Vec<GridPoint>> {
    let mut points = Vec::with_capacity(count + 1);
    points.push(grid_point(conv, start.to_string())?);
    for _ in 0..count {
        let last = &points[points.len() - 1].reference;
        let next = step_grid(conv, last, direction, cfg)?;
        points.push(next);
    }
    Ok(points)
}

/// Walk `count` steps both ways along an axis from `start`.
fn walk_both<C: GridConverter + ?Sized>(
    conv: &C,
    start: &str,
    forward: GridDirection,
    backward: GridDirection,
    count: usize,
    cfg: &GridCfg,
) -> LobResult<Vec<GridPoint>> {
    let mut points = grid_walk(conv, start, forward, count, cfg)?;
    points.extend(grid_walk(conv, start, backward, count, cfg)?);
    Ok(points)
}

/// Sort by one coordinate axis and drop repeated references.
fn sorted_unique(mut points: Vec<GridPoint>, key: fn(&Coordinate) -> f64) -> Vec<GridPoint> {
    points.sort_by(|a, b| key(&a.coordinate).total_cmp(&key(&b.coordinate)));
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(points.len());
    for p in points {
        if seen.insert(p.reference.clone()) {
            unique.push(p);
        }
    }
    unique
}

fn lat(c: &Coordinate) -> f64 {
    c.lat
}

fn lon(c: &Coordinate) -> f64 {
    c.lon
}

/// Pair each point of `from` with the unused point of `to` closest in `key`.
fn pair_nearest(
    from: &[GridPoint],
    to: &[GridPoint],
    key: fn(&Coordinate) -> f64,
) -> Vec<(usize, usize)> {
    let mut used = vec![false; to.len()];
    let mut pairs = Vec::with_capacity(from.len());
    for (i, p) in from.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (j, q) in to.iter().enumerate() {
            if used[j] {
                continue;
            }
            let diff = (key(&p.coordinate) - key(&q.coordinate)).abs();
            if best.map_or(true, |(_, d)| diff < d) {
                best = Some((j, diff));
            }
        }
        if let Some((j, _)) = best {
            used[j] = true;
            pairs.push((i, j));
        }
    }
    pairs
}

/// Kilometre grid lines within `count` increments of `center`.
///
/// Easting lines run from the southern boundary to the northern one and are
/// labelled with their easting; northing lines run from the eastern boundary
/// to the western one and are labelled with their northing.
pub fn grid_lines<C: GridConverter + ?Sized>(
    conv: &C,
    center: Coordinate,
    count: usize,
    cfg: &GridCfg,
) -> LobResult<Vec<GridLine>> {
    use GridDirection::{East, North, South, West};

    let center_ref = snap_coordinate(conv, center, cfg.precision)?;
    let across = sorted_unique(walk_both(conv, &center_ref, East, West, count, cfg)?, lon);
    let along = sorted_unique(walk_both(conv, &center_ref, North, South, count, cfg)?, lat);
    let (Some(west), Some(east)) = (across.first(), across.last()) else {
        return Ok(Vec::new());
    };
    let (Some(south), Some(north)) = (along.first(), along.last()) else {
        return Ok(Vec::new());
    };

    let boundary = |start: &GridPoint,
                    fwd: GridDirection,
                    back: GridDirection,
                    key: fn(&Coordinate) -> f64|
     -> LobResult<Vec<GridPoint>> {
        Ok(sorted_unique(
            walk_both(conv, &start.reference, fwd, back, count, cfg)?,
            key,
        ))
    };
    let south_pts = boundary(south, East, West, lon)?;
    let north_pts = boundary(north, East, West, lon)?;
    let east_pts = boundary(east, North, South, lat)?;
    let west_pts = boundary(west, North, South, lat)?;

    let mut lines = Vec::with_capacity(south_pts.len() + east_pts.len());
    for (i, j) in pair_nearest(&south_pts, &north_pts, lon) {
        let s = &south_pts[i];
        lines.push(GridLine {
            from: s.coordinate,
            to: north_pts[j].coordinate,
            label: format!("Easting: {}", easting_of(&s.reference, cfg.precision)?),
        });
    }
    for (i, j) in pair_nearest(&east_pts, &west_pts, lat) {
        let e = &east_pts[i];
        lines.push(GridLine {
            from: e.coordinate,
            to: west_pts[j].coordinate,
            label: format!("Northing: {}", northing_of(&e.reference, cfg.precision)?),
        });
    }
    tracing::debug!(center = %center_ref, lines = lines.len(), "grid overlay built");
    Ok(lines)
}
