//! Sensor readings from CSV (via polars) or JSON files.
//!
//! CSV files carry one reading per row with the columns
//! `lat, lon, azimuth, error, min_range, max_range`; any extra columns are
//! ignored. JSON files hold an array of `SensorReading` records.

use anyhow::{bail, Context, Result};
use lobfix::api::{Coordinate, SensorReading};
use polars::prelude::*;
use std::path::Path;

/// Required CSV columns, in `SensorReading` field order.
pub const COLUMNS: [&str; 6] = ["lat", "lon", "azimuth", "error", "min_range", "max_range"];

/// Load readings, choosing the format by file extension.
pub fn load(path: &Path) -> Result<Vec<SensorReading>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => from_csv(path),
        Some("json") => from_json(path),
        _ => bail!(
            "unsupported readings file {} (expected .csv or .json)",
            path.display()
        ),
    }
}

pub fn from_csv(path: &Path) -> Result<Vec<SensorReading>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select(
            COLUMNS
                .iter()
                .map(|name| col(*name).cast(DataType::Float64))
                .collect::<Vec<_>>(),
        )
        .collect()
        .with_context(|| format!("reading columns {COLUMNS:?} from {}", path.display()))?;

    let mut columns = Vec::with_capacity(COLUMNS.len());
    for name in COLUMNS {
        let values: Vec<Option<f64>> = df.column(name)?.f64()?.into_iter().collect();
        columns.push(values);
    }
    tracing::info!(rows = df.height(), path = %path.display(), "readings_csv");

    let mut readings = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut v = [0.0; 6];
        for (slot, (name, values)) in v.iter_mut().zip(COLUMNS.iter().zip(&columns)) {
            let Some(x) = values[row] else {
                bail!("row {}: missing {name}", row + 1);
            };
            *slot = x;
        }
        let [lat, lon, azimuth, error, min_range, max_range] = v;
        let reading = Coordinate::try_new(lat, lon)
            .and_then(|pos| SensorReading::new(pos, azimuth, error, min_range, max_range))
            .with_context(|| format!("row {}", row + 1))?;
        readings.push(reading);
    }
    Ok(readings)
}

pub fn from_json(path: &Path) -> Result<Vec<SensorReading>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let readings: Vec<SensorReading> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    for (i, r) in readings.iter().enumerate() {
        r.validate().with_context(|| format!("reading {}", i + 1))?;
    }
    tracing::info!(rows = readings.len(), path = %path.display(), "readings_json");
    Ok(readings)
}
