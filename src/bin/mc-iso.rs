//! CLI entry point (spec §6). Thin: parse args, resolve a [`RenderRequest`],
//! hand off to the library, map failures to the exit codes of §6/§7.

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;

use mc_iso::cli::{CliArgs, RenderRequest};
use mc_iso::error::Error as LibError;
use mc_iso::geometry::Coordinates;
use mc_iso::world::Terrain;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(exit_code_for(&err));
        }
    }
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    if (args.from.is_some()) != (args.to.is_some()) {
        bail!("-from and -to must both be given, or neither");
    }
    let region_dir = args.region_dir();
    let coords = build_coords(args, &region_dir)?;

    let colors_overlay = match &args.colors {
        Some(path) => Some(std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?),
        None => None,
    };

    let request = RenderRequest {
        region_dir,
        coords,
        output: args.file.clone(),
        colors_overlay,
        nowater: args.nowater,
        shading: true,
        markers: Vec::new(),
    };

    mc_iso::render_request(&request, mc_iso::default_shard_count())?;
    tracing::info!(file = %args.file.display(), "wrote PNG");
    Ok(())
}

fn build_coords(args: &CliArgs, region_dir: &Path) -> anyhow::Result<Coordinates> {
    let (min_x, max_x, min_z, max_z) = match (&args.from, &args.to) {
        (Some(from), Some(to)) => (
            from[0].min(to[0]),
            from[0].max(to[0]),
            from[1].min(to[1]),
            from[1].max(to[1]),
        ),
        _ => {
            let bounds = Terrain::scan_bounds(region_dir).context("scanning region directory for bounds")?;
            if bounds.is_undefined() {
                bail!("no chunks found under {}", region_dir.display());
            }
            (bounds.min_x, bounds.max_x, bounds.min_z, bounds.max_z)
        }
    };

    let min_y = args.min.unwrap_or(0);
    let max_y = args.max.unwrap_or(255);
    if min_y > max_y {
        bail!("-min ({min_y}) must be <= -max ({max_y})");
    }

    Ok(Coordinates::new(min_x, max_x, min_z, max_z, min_y, max_y).with_orientation(args.orientation()))
}

/// Usage-shaped failures exit 1 (spec §6); everything else that reaches
/// here is a fatal render error (§7) and exits 2.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LibError>() {
        Some(LibError::InvalidPalette(_)) => 1,
        Some(_) => 2,
        None => 1,
    }
}
