use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lobfix::api::{
    draw_scenario, solve, Coordinate, FixComposition, LobCfg, LobPolygon, ReplayToken,
    ScenarioCfg, SensorReading, Solution, SolverCfg,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod readings;

#[derive(Parser)]
#[command(name = "lobfix")]
#[command(about = "Line-of-bearing polygons, cuts and fixes")]
struct Cmd {
    /// Optional run label; propagated to provenance and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build one LOB polygon and print it as JSON
    Lob {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Compass bearing in degrees, [0, 360)
        #[arg(long)]
        azimuth: f64,
        /// Angular RMS error in degrees
        #[arg(long)]
        error: f64,
        #[arg(long, default_value_t = 0.0)]
        min_range: f64,
        #[arg(long)]
        max_range: f64,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Solve one to three readings (.csv or .json) into a LOB, cut or fix
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = Composition::ReferenceFirst)]
        composition: Composition,
        /// Skip polygon intersection when the center lines miss
        #[arg(long)]
        skip_if_bearings_miss: bool,
    },
    /// Draw a replayable scenario and write its readings as JSON
    Scenario {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 3)]
        sensors: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Composition {
    ReferenceFirst,
    AllPairs,
}

impl From<Composition> for FixComposition {
    fn from(c: Composition) -> Self {
        match c {
            Composition::ReferenceFirst => FixComposition::ReferenceFirst,
            Composition::AllPairs => FixComposition::AllPairs,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Lob {
            lat,
            lon,
            azimuth,
            error,
            min_range,
            max_range,
            out,
        } => {
            let position = Coordinate::try_new(lat, lon)?;
            let reading = SensorReading::new(position, azimuth, error, min_range, max_range)?;
            lob(&reading, out.as_deref())
        }
        Action::Solve {
            input,
            out,
            composition,
            skip_if_bearings_miss,
        } => {
            let cfg = SolverCfg {
                composition: composition.into(),
                skip_if_bearings_miss,
                ..SolverCfg::default()
            };
            run_solve(&input, &out, &cfg, cmd.tag).map(|_| ())
        }
        Action::Scenario {
            seed,
            index,
            sensors,
            out,
        } => scenario(seed, index, sensors, &out, cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

/// Write pretty JSON to `out`, creating parent directories, or to stdout.
fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
    }
}

fn lob(reading: &SensorReading, out: Option<&Path>) -> Result<()> {
    let lob = LobPolygon::build(reading, &LobCfg::default())?;
    tracing::info!(tooltip = %lob, "lob");
    let doc = serde_json::json!({ "tooltip": lob.to_string(), "lob": lob });
    write_json(&doc, out)
}

fn run_solve(input: &Path, out: &Path, cfg: &SolverCfg, tag: Option<String>) -> Result<Solution> {
    tracing::info!(input = %input.display(), out = %out.display(), tag = ?tag, "solve");
    let readings = readings::load(input)?;
    let solution = solve(&readings, cfg).context("solving readings")?;
    match &solution {
        Solution::Lob { lob } => tracing::info!(acres = lob.area_acres, "single LOB"),
        Solution::Cut { cut, .. } => tracing::info!(
            acres = cut.area_acres,
            improvement = ?cut.accuracy_improvement,
            "cut"
        ),
        Solution::Fix { fix, .. } => tracing::info!(
            acres = fix.area_acres,
            improvement = ?fix.accuracy_improvement,
            "fix"
        ),
    }
    write_json(&solution, Some(out))?;

    let params = serde_json::json!({
        "composition": cfg.composition,
        "skip_if_bearings_miss": cfg.skip_if_bearings_miss,
        "readings": readings.len(),
    });
    let payload = provenance::Payload::new(params)
        .with_input(input)
        .with_tag(tag);
    provenance::write_sidecar(out, payload)?;
    Ok(solution)
}

fn scenario(seed: u64, index: u64, sensors: usize, out: &Path, tag: Option<String>) -> Result<()> {
    let cfg = ScenarioCfg {
        sensors,
        ..ScenarioCfg::default()
    };
    let s = draw_scenario(&cfg, ReplayToken { seed, index })?;
    tracing::info!(seed, index, emitter = ?s.emitter, "scenario");
    write_json(&s.readings, Some(out))?;
    let params = serde_json::json!({
        "seed": seed,
        "index": index,
        "sensors": sensors,
        "emitter": s.emitter,
    });
    provenance::write_sidecar(out, provenance::Payload::new(params).with_tag(tag))?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = provenance::block(tag.as_deref());
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
