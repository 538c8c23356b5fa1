//! CLI surface (spec §6) and its translation into a [`RenderRequest`].
//!
//! Argument parsing itself is out of scope per spec.md §1 ("explicitly out
//! of scope ... delegated ... specified only at their interfaces"); this
//! module is that interface, built with `clap` derive the way the
//! retrieval pack's CLI tools do (SPEC_FULL.md §A). The spec's dash
//! notation (`-from`, `-nw`, ...) is rendered with clap's idiomatic
//! double-dash long flags rather than hand-rolling a single-dash parser;
//! that's a cosmetic interface choice, not a behavior change (see
//! DESIGN.md).

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::geometry::Orientation;
use crate::render::Marker;

#[derive(Parser, Debug)]
#[command(
    name = "mc-iso",
    about = "Renders an isometric PNG of a Minecraft Anvil world save",
    group(ArgGroup::new("orientation").args(["nw", "ne", "se", "sw"])),
    group(ArgGroup::new("dimension").args(["nether", "end"]))
)]
pub struct CliArgs {
    /// Path to the world save directory.
    pub world_path: PathBuf,

    /// Inclusive lower bound, in blocks.
    #[arg(long = "from", num_args = 2, allow_negative_numbers = true, value_names = ["X", "Z"])]
    pub from: Option<Vec<i32>>,

    /// Inclusive upper bound, in blocks.
    #[arg(long = "to", num_args = 2, allow_negative_numbers = true, value_names = ["X", "Z"])]
    pub to: Option<Vec<i32>>,

    /// Lower Y bound, 0..=255.
    #[arg(long = "min")]
    pub min: Option<u8>,

    /// Upper Y bound, 0..=255.
    #[arg(long = "max")]
    pub max: Option<u8>,

    /// Output PNG path.
    #[arg(long = "file", default_value = "output.png")]
    pub file: PathBuf,

    /// Palette JSON overlay path.
    #[arg(long = "colors")]
    pub colors: Option<PathBuf>,

    #[arg(long = "nw")]
    pub nw: bool,
    #[arg(long = "ne")]
    pub ne: bool,
    #[arg(long = "sw")]
    pub sw: bool,
    #[arg(long = "se")]
    pub se: bool,

    /// Render `minecraft:water` as an empty (transparent) recipe.
    #[arg(long = "nowater")]
    pub nowater: bool,

    /// Render the Nether (`DIM-1`) instead of the overworld.
    #[arg(long = "nether")]
    pub nether: bool,
    /// Render the End (`DIM1`) instead of the overworld.
    #[arg(long = "end")]
    pub end: bool,
}

impl CliArgs {
    pub fn orientation(&self) -> Orientation {
        if self.ne {
            Orientation::NE
        } else if self.sw {
            Orientation::SW
        } else if self.se {
            Orientation::SE
        } else {
            Orientation::NW
        }
    }

    /// The region directory for the selected (sub-)dimension (SPEC_FULL.md
    /// §B.1).
    pub fn region_dir(&self) -> PathBuf {
        if self.nether {
            self.world_path.join("DIM-1").join("region")
        } else if self.end {
            self.world_path.join("DIM1").join("region")
        } else {
            self.world_path.join("region")
        }
    }
}

/// A fully resolved render job, independent of how it was parsed (library
/// consumers can build one directly without going through [`CliArgs`]).
pub struct RenderRequest {
    pub region_dir: PathBuf,
    pub coords: crate::geometry::Coordinates,
    pub output: PathBuf,
    pub colors_overlay: Option<String>,
    pub nowater: bool,
    pub shading: bool,
    pub markers: Vec<Marker>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_defaults_to_nw() {
        let args = CliArgs::parse_from(["mc-iso", "/tmp/world"]);
        assert_eq!(args.orientation(), Orientation::NW);
    }

    #[test]
    fn orientation_flag_selects_corner() {
        let args = CliArgs::parse_from(["mc-iso", "/tmp/world", "--se"]);
        assert_eq!(args.orientation(), Orientation::SE);
    }

    #[test]
    fn region_dir_picks_sub_dimension() {
        let args = CliArgs::parse_from(["mc-iso", "/tmp/world", "--nether"]);
        assert_eq!(args.region_dir(), PathBuf::from("/tmp/world/DIM-1/region"));
        let args = CliArgs::parse_from(["mc-iso", "/tmp/world", "--end"]);
        assert_eq!(args.region_dir(), PathBuf::from("/tmp/world/DIM1/region"));
        let args = CliArgs::parse_from(["mc-iso", "/tmp/world"]);
        assert_eq!(args.region_dir(), PathBuf::from("/tmp/world/region"));
    }

    #[test]
    fn from_to_parse_as_coordinate_pairs() {
        let args = CliArgs::parse_from(["mc-iso", "/tmp/world", "--from", "-10", "5", "--to", "20", "30"]);
        assert_eq!(args.from, Some(vec![-10, 5]));
        assert_eq!(args.to, Some(vec![20, 30]));
    }
}
