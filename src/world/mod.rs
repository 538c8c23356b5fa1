//! World decoder (spec §4.1, component C4): turns a region directory plus a
//! requested block box into an in-memory [`Terrain`] — the set of decoded,
//! normalized chunks plus the set of block names observed, used to filter
//! the color palette before rendering.

pub mod bits;
pub mod chunk;
pub mod region;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::geometry::Coordinates;
use chunk::Chunk;
use region::{parse_region_filename, RegionFile};

pub use chunk::{Axis, Chunk, PaletteEntry, SlabType};

pub struct Terrain {
    chunks: HashMap<(i32, i32), Chunk>,
    pub seen: HashSet<String>,
    /// Global `(min_section, max_section_exclusive)` across every chunk
    /// loaded (spec §4.1 step 3's "global `heightBounds`"; grounded on
    /// `examples/original_source/src/worldloader.cpp`'s
    /// `Terrain::Data::importHeight`, which folds each chunk's own height
    /// nibble into a world-wide `heightBounds` byte the same way). `None`
    /// if no chunk was loaded at all.
    pub height_bounds: Option<(u8, u8)>,
}

impl Terrain {
    pub fn get(&self, cx: i32, cz: i32) -> Option<&Chunk> {
        self.chunks.get(&(cx, cz))
    }

    /// The world's observed Y range in block units, or `None` if no chunk
    /// was loaded. Used to cap a requested box to what the world actually
    /// contains (spec §4.1 step 3; `examples/original_source/main.cpp`'s
    /// `coords.minY = max(coords.minY, world.minHeight())` /
    /// `coords.maxY = min(coords.maxY, world.maxHeight())`).
    pub fn height_range_blocks(&self) -> Option<(u8, u8)> {
        self.height_bounds.map(|(min_section, max_section_exclusive)| {
            let min_y = min_section * 16;
            let max_y = ((max_section_exclusive as u16) * 16).saturating_sub(1).min(255) as u8;
            (min_y, max_y)
        })
    }

    /// Scans every `r.<rx>.<rz>.mca` under `region_dir` and returns the
    /// world's bounding block box (spec §4.1 "region scan"). Used as the
    /// default request box when the caller doesn't provide `-from`/`-to`.
    pub fn scan_bounds(region_dir: &Path) -> std::io::Result<Coordinates> {
        let mut bounds = Coordinates::undefined();
        for entry in fs::read_dir(region_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some((rx, rz)) = parse_region_filename(&path) else {
                continue;
            };
            let Ok(region) = RegionFile::open(&path) else {
                tracing::warn!(region = %path.display(), "could not open region file, skipping");
                continue;
            };
            for (lx, lz) in region.present_chunks() {
                let cx = rx * 32 + lx;
                let cz = rz * 32 + lz;
                bounds.union_point(cx * 16, cz * 16);
                bounds.union_point(cx * 16 + 15, cz * 16 + 15);
            }
        }
        Ok(bounds)
    }

    /// Loads every chunk whose block position intersects `request`, one
    /// region file at a time. Region files entirely outside `request` are
    /// never opened.
    pub fn load(region_dir: &Path, request: &Coordinates) -> Self {
        let min_rx = request.min_cx().div_euclid(32);
        let max_rx = request.max_cx().div_euclid(32);
        let min_rz = request.min_cz().div_euclid(32);
        let max_rz = request.max_cz().div_euclid(32);

        let region_coords: Vec<(i32, i32)> = (min_rz..=max_rz)
            .flat_map(|rz| (min_rx..=max_rx).map(move |rx| (rx, rz)))
            .collect();

        let partials: Vec<(HashMap<(i32, i32), Chunk>, HashSet<String>, Option<(u8, u8)>)> = region_coords
            .par_iter()
            .map(|&(rx, rz)| load_region(region_dir, rx, rz, request))
            .collect();

        let mut chunks = HashMap::new();
        let mut seen = HashSet::new();
        let mut height_bounds: Option<(u8, u8)> = None;
        for (region_chunks, region_seen, region_height) in partials {
            chunks.extend(region_chunks);
            seen.extend(region_seen);
            height_bounds = union_height_bounds(height_bounds, region_height);
        }

        Terrain {
            chunks,
            seen,
            height_bounds,
        }
    }

    /// Builds a `Terrain` directly from already-decoded chunks, bypassing
    /// region-file I/O — used by render-pipeline tests that need a
    /// multi-chunk world without a fixture region directory.
    #[cfg(test)]
    pub(crate) fn from_chunks_for_test(chunks: HashMap<(i32, i32), Chunk>, seen: HashSet<String>) -> Self {
        Terrain {
            chunks,
            seen,
            height_bounds: None,
        }
    }
}

fn union_height_bounds(a: Option<(u8, u8)>, b: Option<(u8, u8)>) -> Option<(u8, u8)> {
    match (a, b) {
        (None, other) | (other, None) => other,
        (Some((a_min, a_max)), Some((b_min, b_max))) => Some((a_min.min(b_min), a_max.max(b_max))),
    }
}

fn load_region(
    region_dir: &Path,
    rx: i32,
    rz: i32,
    request: &Coordinates,
) -> (HashMap<(i32, i32), Chunk>, HashSet<String>, Option<(u8, u8)>) {
    let mut chunks = HashMap::new();
    let mut seen = HashSet::new();
    let mut height_bounds: Option<(u8, u8)> = None;

    let path = region_dir.join(format!("r.{rx}.{rz}.mca"));
    if !path.exists() {
        tracing::warn!(region = %path.display(), "missing region file, skipping");
        return (chunks, seen, height_bounds);
    }
    let mut region = match RegionFile::open(&path) {
        Ok(r) => r,
        Err(err) => {
            tracing::warn!(region = %path.display(), error = %err, "could not open region file, skipping");
            return (chunks, seen, height_bounds);
        }
    };

    for lz in 0..32 {
        for lx in 0..32 {
            let cx = rx * 32 + lx;
            let cz = rz * 32 + lz;
            if !request.contains_block(cx * 16, cz * 16) && !chunk_overlaps(request, cx, cz) {
                continue;
            }
            match region.read_chunk(lx, lz) {
                Ok(Some(bytes)) => match nbt::decode::read_compound_tag(&mut &bytes[..]) {
                    Ok(root) => {
                        if let Some(chunk) = Chunk::from_nbt(&root, &mut seen) {
                            height_bounds =
                                union_height_bounds(height_bounds, Some((chunk.min_section(), chunk.max_section_exclusive())));
                            chunks.insert((cx, cz), chunk);
                        } else {
                            tracing::warn!(x = cx, z = cz, "chunk missing Level/Sections, skipping");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(x = cx, z = cz, error = %err, "malformed chunk NBT, skipping");
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(x = cx, z = cz, error = %err, "corrupt chunk, skipping");
                }
            }
        }
    }

    (chunks, seen, height_bounds)
}

fn chunk_overlaps(request: &Coordinates, cx: i32, cz: i32) -> bool {
    let (min_x, max_x) = (cx * 16, cx * 16 + 15);
    let (min_z, max_z) = (cz * 16, cz * 16 + 15);
    min_x <= request.max_x && max_x >= request.min_x && min_z <= request.max_z && max_z >= request.min_z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_overlap_rejects_disjoint_chunks() {
        let request = Coordinates::new(0, 15, 0, 15, 0, 255);
        assert!(chunk_overlaps(&request, 0, 0));
        assert!(!chunk_overlaps(&request, 5, 5));
    }

    #[test]
    fn union_height_bounds_widens_the_range() {
        assert_eq!(union_height_bounds(None, None), None);
        assert_eq!(union_height_bounds(None, Some((3, 5))), Some((3, 5)));
        assert_eq!(union_height_bounds(Some((3, 5)), Some((1, 4))), Some((1, 5)));
    }

    #[test]
    fn height_range_blocks_converts_sections_to_blocks() {
        let terrain = Terrain {
            chunks: HashMap::new(),
            seen: HashSet::new(),
            height_bounds: Some((4, 6)),
        };
        assert_eq!(terrain.height_range_blocks(), Some((64, 95)));
    }

    #[test]
    fn height_range_blocks_is_none_for_empty_terrain() {
        let terrain = Terrain {
            chunks: HashMap::new(),
            seen: HashSet::new(),
            height_bounds: None,
        };
        assert_eq!(terrain.height_range_blocks(), None);
    }
}
