//! `mc-iso`: renders an isometric PNG of a Minecraft Anvil world save.
//!
//! The pipeline (spec.md §2): [`world`] decodes region files into a
//! [`world::Terrain`]; [`palette`] maps block names to [`palette::BlockRecipe`]s;
//! [`render`] walks the terrain in orientation-aware order onto a
//! [`render::Canvas`] (via [`render::sprite`]), shards render independently
//! and [`render::merge`] composites them back together, and
//! [`render::png_writer`] streams the result to disk.

pub mod cli;
pub mod color;
pub mod error;
pub mod geometry;
pub mod nbt_adapter;
pub mod palette;
pub mod render;
pub mod world;

use std::path::Path;

use rayon::prelude::*;

use cli::RenderRequest;
use error::Error;
use geometry::Coordinates;
use palette::Palette;
use render::{Canvas, Marker};
use world::Terrain;

/// Default shard count for a CLI-driven render: one shard per available
/// thread, since each shard is a CPU-bound decode+rasterize unit (spec §5).
pub fn default_shard_count() -> usize {
    rayon::current_num_threads().max(1)
}

/// Runs the full pipeline for `request` (spec §5's two-stage scheduling
/// model) and writes the resulting PNG. `shard_count` is the number of
/// independent sub-canvases to render in parallel before the serialized
/// merge.
pub fn render_request(request: &RenderRequest, shard_count: usize) -> Result<(), Error> {
    let region_dir = &request.region_dir;
    if !region_dir.is_dir() {
        return Err(Error::MissingRegionDir(region_dir.clone()));
    }

    let mut palette =
        Palette::load(request.colors_overlay.as_deref()).map_err(|err| Error::InvalidPalette(err.to_string()))?;
    if request.nowater {
        palette.override_with_empty("minecraft:water");
    }

    let coords = cap_to_world_height(region_dir, request.coords);

    let canvas = render_sharded(region_dir, &palette, coords, request.shading, &request.markers, shard_count)?;

    render::png_writer::write_png(&canvas, &request.output)
}

/// Caps the requested Y range down to the world's own observed height
/// bounds (spec §4.1 step 3's "global `heightBounds`"; grounded on
/// `examples/original_source/main.cpp`'s `coords.minY = max(coords.minY,
/// world.minHeight())` / `coords.maxY = min(coords.maxY, world.maxHeight())`
/// "cap the height to avoid having a ridiculous image height") — without it
/// a caller who doesn't pass `-min`/`-max` always gets the full `0..=255`
/// canvas height (spec §4.5) even for a world whose content occupies a
/// narrow band.
///
/// This probes the whole requested box once, single-pass, before sharding,
/// rather than letting each shard cap independently the way the original
/// does per-shard: every shard and the final canvas must agree on one Y
/// range, since the shard merge (§4.6) anchors sub-canvases by their X/Z
/// offset only and assumes uniform canvas height across shards.
fn cap_to_world_height(region_dir: &Path, coords: Coordinates) -> Coordinates {
    let probe = Terrain::load(region_dir, &coords);
    clamp_to_height_range(coords, probe.height_range_blocks())
}

/// The pure clamp step of [`cap_to_world_height`], split out so it's
/// testable without touching disk.
fn clamp_to_height_range(coords: Coordinates, world_range: Option<(u8, u8)>) -> Coordinates {
    let Some((world_min, world_max)) = world_range else {
        return coords;
    };
    let min_y = coords.min_y.max(world_min);
    let max_y = coords.max_y.min(world_max);
    if min_y > max_y {
        return coords;
    }
    Coordinates { min_y, max_y, ..coords }
}

/// Stage 1 (parallel shard rendering) + stage 2 (serialized merge) of
/// spec.md §5. Each shard loads its own [`Terrain`] slice, filters its own
/// palette, and renders its own canvas; shards never share mutable state.
/// The merge step runs after every shard has completed, in shard order,
/// which is the only thing that makes composing them correct (spec §4.6).
fn render_sharded(
    region_dir: &Path,
    palette: &Palette,
    coords: Coordinates,
    shading: bool,
    markers: &[Marker],
    shard_count: usize,
) -> Result<Canvas, Error> {
    let shards = coords.split_shards(shard_count);

    let rendered: Vec<Result<(Coordinates, Canvas), Error>> = shards
        .par_iter()
        .map(|&shard_coords| {
            let terrain = Terrain::load(region_dir, &shard_coords);
            let filtered = palette.filter(&terrain.seen);
            let canvas = render::render(&terrain, &filtered, shard_coords, shading, markers)?;
            Ok((shard_coords, canvas))
        })
        .collect();

    let mut shard_canvases = Vec::with_capacity(rendered.len());
    for result in rendered {
        shard_canvases.push(result?);
    }

    let mut main = Canvas::new(coords, shading);
    render::merge::merge_all(&mut main, &shard_canvases);
    Ok(main)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_region_dir_is_reported() {
        let request = RenderRequest {
            region_dir: std::path::PathBuf::from("/does/not/exist/region"),
            coords: Coordinates::new(0, 15, 0, 15, 0, 255),
            output: std::path::PathBuf::from("/tmp/mc-iso-test-output.png"),
            colors_overlay: None,
            nowater: false,
            shading: false,
            markers: Vec::new(),
        };
        let err = render_request(&request, 1);
        assert!(matches!(err, Err(Error::MissingRegionDir(_))));
    }

    #[test]
    fn clamp_narrows_an_uncapped_request_to_world_height() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let capped = clamp_to_height_range(coords, Some((60, 80)));
        assert_eq!((capped.min_y, capped.max_y), (60, 80));
    }

    #[test]
    fn clamp_never_widens_a_narrower_request() {
        let coords = Coordinates::new(0, 15, 0, 15, 70, 90);
        let capped = clamp_to_height_range(coords, Some((0, 255)));
        assert_eq!((capped.min_y, capped.max_y), (70, 90));
    }

    #[test]
    fn clamp_is_a_no_op_when_world_range_is_unknown() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let capped = clamp_to_height_range(coords, None);
        assert_eq!((capped.min_y, capped.max_y), (0, 255));
    }

    #[test]
    fn clamp_falls_back_when_ranges_do_not_overlap() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 10);
        let capped = clamp_to_height_range(coords, Some((200, 255)));
        assert_eq!((capped.min_y, capped.max_y), (0, 10));
    }
}
