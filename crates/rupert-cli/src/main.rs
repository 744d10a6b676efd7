//! CLI entry point: parses run configuration, builds the hole/plug
//! polyhedra from vertex files, and drives the pipeline to completion.
//!
//! Ported from `original_source/cpp/main.cpp`'s shape (hardcoded
//! `Config`/`Pipeline` construction plus a `SIGINT`/`SIGTERM` handler that
//! calls `pipeline.stop()`) — generalized into a real argument parser since
//! spec's external-interfaces section scopes configuration as CLI input,
//! not a recompiled constant.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use rupert::geom::{Polyhedron, Vector3};
use rupert::interval::{ArbInterval, FastInterval, HwInterval, Interval};
use rupert::{Config, ExitCode, Pipeline};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// Hand-rolled `f64` outward rounding, no external crate.
    Fast,
    /// `inari`-backed hardware directed rounding.
    Hw,
    /// `rug`/MPFR-backed arbitrary precision.
    Arb,
}

/// Rigorous branch-and-bound search for a Rupert-pass orientation.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to a JSON file holding the hole polyhedron's vertices, each a
    /// `[x, y, z]` triple of f64.
    #[arg(long)]
    hole: PathBuf,

    /// Path to a JSON file holding the plug polyhedron's vertices, in the
    /// same format as `--hole`.
    #[arg(long)]
    plug: PathBuf,

    /// Short run name; used verbatim in output filenames.
    #[arg(long)]
    description: String,

    /// Directory the polyhedra header, certificate log, and checkpoint are
    /// written under. Must already exist.
    #[arg(long, default_value = ".")]
    directory: PathBuf,

    /// Interval arithmetic backend.
    #[arg(long, value_enum, default_value_t = Backend::Fast)]
    backend: Backend,

    #[arg(long, default_value_t = 1)]
    threads: u8,

    /// Soft cap on total 3-boxes processed before self-stop. 0 = unlimited.
    #[arg(long, default_value_t = 0)]
    box_iteration_limit: u32,

    /// Per-3-box inner 2-box iteration cap. 0 = unlimited.
    #[arg(long, default_value_t = 0)]
    rectangle_iteration_limit: u32,

    #[arg(long, default_value_t = 1)]
    projection_resolution: u32,

    #[arg(long, default_value_t = 1)]
    rotation_resolution: u32,

    /// Certificate queue size at which the exporter drains.
    #[arg(long, default_value_t = 1024)]
    export_size_threshold: usize,

    /// Enables the symmetry-skip shortcut in the box processor.
    #[arg(long, default_value_t = false)]
    symmetry_skip: bool,

    /// Angular-distance budget (as `1 - cos(angle)`) for the symmetry-skip
    /// shortcut.
    #[arg(long, default_value_t = 1e-6)]
    symmetry_epsilon: f64,

    /// Divisor applied to the hole-shadow hull's merge tolerance.
    #[arg(long, default_value_t = 1.0 / 16.0)]
    hull_epsilon_factor: f64,
}

#[derive(Deserialize)]
struct VertexFile(Vec<[f64; 3]>);

fn load_vertices(path: &PathBuf) -> Result<Vec<(f64, f64, f64)>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let VertexFile(raw) =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {} as a vertex list", path.display()))?;
    Ok(raw.into_iter().map(|[x, y, z]| (x, y, z)).collect())
}

fn build_polyhedron<I: Interval>(vertices: &[(f64, f64, f64)]) -> Polyhedron<I> {
    Polyhedron::new(
        vertices
            .iter()
            .map(|&(x, y, z)| Vector3::from_f64(x, y, z))
            .collect(),
    )
}

fn build_config<I: Interval>(cli: &Cli, hole: &[(f64, f64, f64)], plug: &[(f64, f64, f64)]) -> Config<I> {
    let mut config = Config::new(
        cli.description.clone(),
        build_polyhedron(hole),
        build_polyhedron(plug),
        &cli.directory,
    );
    config.thread_count = cli.threads;
    config.box_iteration_limit = cli.box_iteration_limit;
    config.rectangle_iteration_limit = cli.rectangle_iteration_limit;
    config.projection_resolution = cli.projection_resolution;
    config.rotation_resolution = cli.rotation_resolution;
    config.export_size_threshold = cli.export_size_threshold;
    config.symmetry_skip = cli.symmetry_skip;
    config.symmetry_epsilon = cli.symmetry_epsilon;
    config.hull_epsilon_factor = cli.hull_epsilon_factor;
    config
}

/// Builds the pipeline for a concrete interval backend, installs the
/// Ctrl-C/SIGTERM handler, and runs it to completion — generic over `I` so
/// the backend choice is resolved once, here, rather than threaded through
/// every call site.
fn run_with_backend<I: Interval + Send + Sync + 'static>(cli: &Cli, hole: &[(f64, f64, f64)], plug: &[(f64, f64, f64)]) -> Result<ExitCode> {
    let config = build_config::<I>(cli, hole, plug);
    let pipeline = Pipeline::new(config).context("building pipeline")?;
    let stop = pipeline.stop_handle();
    ctrlc::set_handler(move || {
        tracing::info!("received interrupt, stopping pipeline");
        stop.store(true, Ordering::Relaxed);
    })
    .context("installing signal handler")?;
    pipeline.run().context("running pipeline")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let hole = load_vertices(&cli.hole)?;
    let plug = load_vertices(&cli.plug)?;

    let exit_code = match cli.backend {
        Backend::Fast => run_with_backend::<FastInterval>(&cli, &hole, &plug)?,
        Backend::Hw => run_with_backend::<HwInterval>(&cli, &hole, &plug)?,
        Backend::Arb => run_with_backend::<ArbInterval>(&cli, &hole, &plug)?,
    };

    match exit_code {
        ExitCode::CompletedCover => {
            tracing::info!("cover complete: every orientation was eliminated or witnessed non-terminal");
            Ok(())
        }
        ExitCode::StoppedCheckpointed => {
            tracing::info!("run stopped with a checkpoint written; restart with the same --directory/--description to resume");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_vertices_parses_a_triple_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]").unwrap();

        let vertices = load_vertices(&file.path().to_path_buf()).unwrap();
        assert_eq!(vertices, vec![(1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]);
    }

    #[test]
    fn missing_vertex_file_is_a_readable_error() {
        let err = load_vertices(&PathBuf::from("/nonexistent/rupert_does_not_exist.json")).unwrap_err();
        assert!(err.to_string().contains("opening"));
    }
}
