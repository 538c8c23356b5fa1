//! Isometric RGBA canvas (spec §4.5, component C6): projection of world
//! blocks onto pixels, per-chunk/per-section draw order, beacon/marker beam
//! tracking, shading, and row-wise auto-crop.

use std::collections::HashMap;

use crate::color::Color;
use crate::error::Error;
use crate::geometry::Coordinates;
use crate::palette::{BlockRecipe, Palette};
use crate::world::{Chunk, PaletteEntry, Terrain};

use super::sprite::{self, SpriteContext};

/// Image padding in pixels (spec §4.5).
pub const PADDING: i64 = 5;
/// Per-layer (per block-Y) height offset in pixels (spec §4.5).
pub const LAYER_HEIGHT: i64 = 3;

const BEACON_BEAM_NAME: &str = "mcmap:beacon_beam";

/// A world-space marker point: a named-color beam drawn from the top of the
/// world down to `y` (spec §3). Not wired to a CLI flag — spec.md's CLI
/// surface (§6) names no `-marker` option, so this is a library-level
/// capability only (see DESIGN.md).
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub x: i32,
    pub z: i32,
    pub y: u8,
    pub color: Color,
}

/// Approximates the original's precomputed per-Y brightness curve (spec
/// §4.3): the retrieved `original_source` only shows the use site
/// (`canvas.cpp`'s `brightnessLookup[y]`), not the table's construction, so
/// this reconstructs a monotonic stand-in — darker underground, brighter
/// near the top — rather than inventing exact historical constants.
fn brightness_lookup(y: u8) -> f32 {
    (y as f32 - 64.0) * (20.0 / 255.0)
}

fn shade(recipe: &BlockRecipe, y: u8) -> BlockRecipe {
    let delta = brightness_lookup(y) * (recipe.primary.luminance / 323.0 + 0.21);
    let delta = delta.round() as i32;
    BlockRecipe {
        sprite: recipe.sprite,
        primary: recipe.primary.modulate(delta),
        secondary: recipe.secondary.map(|c| c.modulate(delta)),
        light: recipe.light.modulate(delta),
        dark: recipe.dark.modulate(delta),
    }
}

/// An RGBA pixel buffer plus the [`Coordinates`] box it was rendered from.
pub struct Canvas {
    pub coords: Coordinates,
    pub width: i64,
    pub height: i64,
    pub shading: bool,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(coords: Coordinates, shading: bool) -> Self {
        let (size_x, size_z) = coords.size();
        let width = (size_x + size_z + 5) * 2;
        let height = size_x + size_z + (coords.max_y as i64 - coords.min_y as i64) * 3 + 10;
        Canvas {
            coords,
            width,
            height,
            shading,
            pixels: vec![Color::TRANSPARENT; (width * height) as usize],
        }
    }

    fn index(&self, u: i64, v: i64) -> Option<usize> {
        if u < 0 || v < 0 || u >= self.width || v >= self.height {
            return None;
        }
        Some((v * self.width + u) as usize)
    }

    /// Blends `color` onto the pixel at `(u, v)`. Out-of-bounds is a
    /// programming error (spec §4.5/§7): projection math is expected to
    /// only ever target in-bounds pixels.
    pub fn put(&mut self, u: i64, v: i64, color: Color) -> Result<(), Error> {
        let idx = self.index(u, v).ok_or(Error::OutOfCanvasBounds {
            u,
            v,
            width: self.width as u32,
            height: self.height as u32,
        })?;
        self.pixels[idx] = crate::color::blend(self.pixels[idx], color);
        Ok(())
    }

    /// Reads back the current pixel at `(u, v)`, for sprites (e.g.
    /// underwater plants) that tint what was already drawn rather than
    /// overwrite it.
    pub fn peek(&self, u: i64, v: i64) -> Option<Color> {
        self.index(u, v).map(|idx| self.pixels[idx])
    }

    /// Writes `color` directly, bypassing blending — used only by the
    /// shard merger (spec §4.6), which implements its own over/under rules.
    pub fn set_raw(&mut self, u: i64, v: i64, color: Color) {
        if let Some(idx) = self.index(u, v) {
            self.pixels[idx] = color;
        }
    }

    pub fn get_raw(&self, u: i64, v: i64) -> Color {
        self.index(u, v).map(|idx| self.pixels[idx]).unwrap_or(Color::TRANSPARENT)
    }

    /// Projects a canvas-local oriented block position to its sprite
    /// anchor pixel (spec §4.5).
    fn project(&self, local_x: i64, local_z: i64, y: i64) -> (i64, i64) {
        let (size_x, size_z) = self.coords.size();
        let u = 2 * (size_z - 1) + (local_x - local_z) * 2 + PADDING;
        let v = self.height - 2 + local_x + local_z - size_x - size_z
            - (y - self.coords.min_y as i64) * LAYER_HEIGHT
            - PADDING;
        (u, v)
    }

    /// First/last non-transparent row, padded per spec §4.5's crop rule,
    /// clamped to `[0, height)` (spec §9 open question on underflow).
    fn crop_rows(&self) -> Option<(i64, i64)> {
        let row_has_content = |row: i64| -> bool {
            (0..self.width).any(|u| self.get_raw(u, row).a != 0)
        };
        let first = (0..self.height).find(|&r| row_has_content(r))?;
        let last = (0..self.height).rev().find(|&r| row_has_content(r))?;
        let top = (first - (PADDING - 2)).max(0);
        let bottom = (last + (PADDING - 2)).min(self.height - 1);
        Some((top, bottom))
    }

    /// Returns the cropped `(offset_row, height)`; an empty canvas reports
    /// height 0 (spec §4.5).
    pub fn cropped_bounds(&self) -> (i64, i64) {
        match self.crop_rows() {
            Some((top, bottom)) => (top, bottom - top + 1),
            None => (0, 0),
        }
    }

    /// RGBA8 bytes of the rows `[offset, offset + height)`, in row-major
    /// order, ready for the PNG encoder (spec §4.7).
    pub fn rows_rgba8(&self, offset: i64, rows: i64) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width * rows * 4) as usize);
        for row in offset..offset + rows {
            for u in 0..self.width {
                out.extend_from_slice(&self.get_raw(u, row).to_bytes());
            }
        }
        out
    }
}

/// Renders `terrain` onto a fresh canvas for `coords` (spec §4.5/§4.1).
/// `markers` is checked against every chunk for columns to beam.
pub fn render(
    terrain: &Terrain,
    palette: &Palette,
    coords: Coordinates,
    shading: bool,
    markers: &[Marker],
) -> Result<Canvas, Error> {
    let mut canvas = Canvas::new(coords, shading);
    let (n_cx, n_cz) = coords.chunk_counts();
    for cz in 0..n_cz {
        for cx in 0..n_cx {
            let (wcx, wcz) = coords.world_chunk(cx, cz);
            let Some(chunk) = terrain.get(wcx as i32, wcz as i32) else {
                continue;
            };
            draw_chunk(&mut canvas, chunk, wcx, wcz, cx, cz, palette, markers)?;
        }
    }
    Ok(canvas)
}

fn recipe_for(palette: &Palette, entry: &PaletteEntry, y: u8, shading: bool) -> Option<BlockRecipe> {
    if entry.name == "minecraft:air" {
        return None;
    }
    let recipe = palette.get(&entry.name);
    Some(if shading { shade(&recipe, y) } else { recipe })
}

#[allow(clippy::too_many_arguments)]
fn draw_chunk(
    canvas: &mut Canvas,
    chunk: &Chunk,
    wcx: i64,
    wcz: i64,
    cx: i64,
    cz: i64,
    palette: &Palette,
    markers: &[Marker],
) -> Result<(), Error> {
    let coords = canvas.coords;
    let min_section = (coords.min_y >> 4).max(chunk.min_section());
    let max_section = (((coords.max_y as u16) / 16 + 1) as u8).min(chunk.max_section_exclusive());
    debug_assert!(min_section <= 15);
    debug_assert!(max_section <= 16);

    // Per-chunk scratch (spec §9 design note: not canvas-level state).
    let mut beacon_columns: HashMap<(u8, u8), i32> = HashMap::new();
    let marker_columns: Vec<(u8, u8, i32, Color)> = markers
        .iter()
        .filter_map(|m| {
            let local_x = m.x as i64 - wcx * 16;
            let local_z = m.z as i64 - wcz * 16;
            if (0..16).contains(&local_x) && (0..16).contains(&local_z) {
                Some((local_x as u8, local_z as u8, m.y as i32, m.color))
            } else {
                None
            }
        })
        .collect();

    if min_section < max_section {
        for section_idx in min_section..max_section {
            for z in 0u8..16 {
                for x in 0u8..16 {
                    let world_x = wcx * 16 + x as i64;
                    let world_z = wcz * 16 + z as i64;
                    if !coords.contains_block(world_x, world_z) {
                        continue;
                    }
                    for y_local in 0u8..16 {
                        let y_abs = section_idx as i32 * 16 + y_local as i32;
                        if y_abs < coords.min_y as i32 || y_abs > coords.max_y as i32 {
                            continue;
                        }
                        draw_column_block(
                            canvas,
                            chunk,
                            palette,
                            &mut beacon_columns,
                            coords,
                            cx,
                            cz,
                            x,
                            z,
                            y_abs,
                        )?;
                    }
                }
            }
        }
    }

    // Beacon/marker beam extension above the chunk's own populated range,
    // up to the requested box's top (spec §4.5 "marker & beam extension").
    if !beacon_columns.is_empty() || !marker_columns.is_empty() {
        let extension_bottom = max_section as i32 * 16;
        for y_abs in extension_bottom..=coords.max_y as i32 {
            for z in 0u8..16 {
                for x in 0u8..16 {
                    let world_x = wcx * 16 + x as i64;
                    let world_z = wcz * 16 + z as i64;
                    if !coords.contains_block(world_x, world_z) {
                        continue;
                    }
                    let (ox, oz) = coords.orient_block(x, z);
                    let local_x = cx * 16 + ox as i64;
                    let local_z = cz * 16 + oz as i64;
                    if let Some(&beacon_y) = beacon_columns.get(&(x, z)) {
                        if y_abs > beacon_y {
                            draw_beam(canvas, palette, local_x, local_z, y_abs)?;
                        }
                    }
                    for &(mx, mz, target_y, color) in &marker_columns {
                        if mx == x && mz == z && y_abs > target_y {
                            draw_marker_beam(canvas, local_x, local_z, y_abs, color)?;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_column_block(
    canvas: &mut Canvas,
    chunk: &Chunk,
    palette: &Palette,
    beacon_columns: &mut HashMap<(u8, u8), i32>,
    coords: Coordinates,
    cx: i64,
    cz: i64,
    x: u8,
    z: u8,
    y_abs: i32,
) -> Result<(), Error> {
    let (ox, oz) = coords.orient_block(x, z);
    let local_x = cx * 16 + ox as i64;
    let local_z = cz * 16 + oz as i64;

    let Some(entry) = chunk.block_at(x as usize, z as usize, y_abs) else {
        return Ok(());
    };
    if entry.name == "minecraft:beacon" {
        beacon_columns.entry((x, z)).or_insert(y_abs);
    }
    let Some(recipe) = recipe_for(palette, entry, y_abs as u8, canvas.shading) else {
        return Ok(());
    };
    let above_entry = chunk.block_at(x as usize, z as usize, y_abs + 1);
    let above_recipe = above_entry.and_then(|a| recipe_for(palette, a, (y_abs + 1) as u8, canvas.shading));

    let ctx = SpriteContext {
        metadata: entry,
        orientation: coords.orientation,
        above: above_recipe.as_ref(),
    };
    let (u, v) = canvas.project(local_x, local_z, y_abs as i64);
    sprite::draw(canvas, u, v, &recipe, &ctx)
}

fn beam_palette_entry() -> PaletteEntry {
    PaletteEntry {
        name: BEACON_BEAM_NAME.to_string(),
        axis: None,
        slab_type: None,
    }
}

fn draw_beam(canvas: &mut Canvas, palette: &Palette, local_x: i64, local_z: i64, y_abs: i32) -> Result<(), Error> {
    let recipe = palette.get(BEACON_BEAM_NAME);
    let recipe = if canvas.shading {
        shade(&recipe, y_abs.clamp(0, 255) as u8)
    } else {
        recipe
    };
    let metadata = beam_palette_entry();
    let ctx = SpriteContext {
        metadata: &metadata,
        orientation: canvas.coords.orientation,
        above: None,
    };
    let (u, v) = canvas.project(local_x, local_z, y_abs as i64);
    sprite::draw(canvas, u, v, &recipe, &ctx)
}

fn draw_marker_beam(canvas: &mut Canvas, local_x: i64, local_z: i64, y_abs: i32, color: Color) -> Result<(), Error> {
    let recipe = BlockRecipe::new(crate::palette::SpriteType::Beam, color, None);
    let metadata = beam_palette_entry();
    let ctx = SpriteContext {
        metadata: &metadata,
        orientation: canvas.coords.orientation,
        above: None,
    };
    let (u, v) = canvas.project(local_x, local_z, y_abs as i64);
    sprite::draw(canvas, u, v, &recipe, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    #[test]
    fn canvas_dimensions_match_spec_formula() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let canvas = Canvas::new(coords, false);
        assert_eq!(canvas.width, (16 + 16 + 5) * 2);
        assert_eq!(canvas.height, 16 + 16 + 255 * 3 + 10);
    }

    #[test]
    fn dimensions_invariant_under_orientation() {
        let coords = Coordinates::new(0, 31, 0, 15, 0, 255);
        let w1 = Canvas::new(coords, false).width;
        let h1 = Canvas::new(coords, false).height;
        let w2 = Canvas::new(coords.with_orientation(Orientation::NE), false).width;
        let h2 = Canvas::new(coords.with_orientation(Orientation::NE), false).height;
        assert_eq!(w1, w2);
        assert_eq!(h1, h2);
    }

    #[test]
    fn corners_project_in_bounds() {
        let coords = Coordinates::new(0, 31, 0, 15, 0, 255);
        for orientation in crate::geometry::Orientation::ALL {
            let coords = coords.with_orientation(orientation);
            let canvas = Canvas::new(coords, false);
            let (size_x, size_z) = coords.size();
            for &(x, z) in &[(0, 0), (size_x - 1, 0), (0, size_z - 1), (size_x - 1, size_z - 1)] {
                for &y in &[coords.min_y as i64, coords.max_y as i64] {
                    let (u, v) = canvas.project(x, z, y);
                    assert!(u >= 0 && u < canvas.width, "u={u} out of bounds for {orientation:?}");
                    assert!(v >= 0 && v < canvas.height, "v={v} out of bounds for {orientation:?}");
                }
            }
        }
    }

    #[test]
    fn empty_canvas_crops_to_zero_height() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let canvas = Canvas::new(coords, false);
        assert_eq!(canvas.cropped_bounds().1, 0);
    }

    #[test]
    fn put_blends_and_peek_reads_back() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let mut canvas = Canvas::new(coords, false);
        canvas.put(0, 0, Color::new(10, 20, 30, 255)).unwrap();
        assert_eq!(canvas.peek(0, 0), Some(Color::new(10, 20, 30, 255)));
    }

    #[test]
    fn put_out_of_bounds_is_programming_error() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let mut canvas = Canvas::new(coords, false);
        let err = canvas.put(-1, 0, Color::new(1, 2, 3, 255));
        assert!(matches!(err, Err(Error::OutOfCanvasBounds { .. })));
    }
}
