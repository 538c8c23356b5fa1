//! The closed set of block-type sprites (spec §4.3). Each is a stateless
//! function writing into a small footprint anchored at a canvas pixel;
//! dispatch is a flat `match` on [`SpriteType`], per the "no deep class
//! hierarchies, the set is closed and flat" design note.

use crate::color::{add_color, Color};
use crate::geometry::Orientation;
use crate::palette::{BlockRecipe, SpriteType};
use crate::world::{Axis, PaletteEntry, SlabType};

use super::canvas::Canvas;

/// Everything a sprite routine needs beyond the (shaded) recipe itself.
pub struct SpriteContext<'a> {
    pub metadata: &'a PaletteEntry,
    pub orientation: Orientation,
    /// The recipe of the block directly above this one, if any — used by
    /// `full`/`transparent` to decide whether their top row is visible.
    pub above: Option<&'a BlockRecipe>,
}

/// Dispatches to the sprite named by `recipe.sprite`, writing into `canvas`
/// with its top-left footprint corner at `(u, v)`.
pub fn draw(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe, ctx: &SpriteContext) -> Result<(), crate::error::Error> {
    if recipe.primary.is_empty() && recipe.sprite != SpriteType::Transparent {
        return Ok(());
    }
    match recipe.sprite {
        SpriteType::Full => draw_full(canvas, u, v, recipe, ctx),
        SpriteType::Slab => draw_slab(canvas, u, v, recipe, ctx),
        SpriteType::Log => draw_log(canvas, u, v, recipe, ctx),
        SpriteType::Torch => draw_torch(canvas, u, v, recipe),
        SpriteType::Wire => draw_wire(canvas, u, v, recipe),
        SpriteType::Fire => draw_fire(canvas, u, v, recipe),
        SpriteType::Plant => draw_plant(canvas, u, v, recipe),
        SpriteType::UnderwaterPlant => draw_underwater_plant(canvas, u, v, recipe),
        SpriteType::Ore => draw_ore(canvas, u, v, recipe),
        SpriteType::Grown => draw_grown(canvas, u, v, recipe),
        SpriteType::Rod => draw_rod(canvas, u, v, recipe),
        SpriteType::Beam => draw_beam(canvas, u, v, recipe),
        SpriteType::Thin => draw_thin(canvas, u, v, recipe),
        SpriteType::Head => draw_head(canvas, u, v, recipe),
        SpriteType::Hidden => Ok(()),
        SpriteType::Transparent => draw_transparent(canvas, u, v, recipe, ctx),
    }
}

fn above_is_opaque(ctx: &SpriteContext) -> bool {
    ctx.above.map(|a| a.primary.a == 255).unwrap_or(false)
}

/// 4x4: top row primary (elided when the block above is fully opaque), the
/// three rows below split left-half `dark` / right-half `light`.
fn draw_full(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe, ctx: &SpriteContext) -> Result<(), crate::error::Error> {
    if !above_is_opaque(ctx) {
        for dx in 0..4 {
            canvas.put(u + dx, v, recipe.primary)?;
        }
    }
    for dy in 1..4 {
        for dx in 0..2 {
            canvas.put(u + dx, v + dy, recipe.dark)?;
        }
        for dx in 2..4 {
            canvas.put(u + dx, v + dy, recipe.light)?;
        }
    }
    Ok(())
}

fn draw_slab(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe, ctx: &SpriteContext) -> Result<(), crate::error::Error> {
    match ctx.metadata.slab_type {
        Some(SlabType::Double) | None => draw_full(canvas, u, v, recipe, ctx),
        Some(SlabType::Top) => draw_full(canvas, u, v, recipe, ctx),
        Some(SlabType::Bottom) => {
            // Occupies only the lower half of the block's footprint.
            for dx in 0..2 {
                canvas.put(u + dx, v + 2, recipe.dark)?;
            }
            for dx in 2..4 {
                canvas.put(u + dx, v + 2, recipe.light)?;
            }
            for dx in 0..2 {
                canvas.put(u + dx, v + 3, recipe.dark)?;
            }
            for dx in 2..4 {
                canvas.put(u + dx, v + 3, recipe.light)?;
            }
            Ok(())
        }
    }
}

/// Picks which of the three visual log variants (end-grain visible along X,
/// along Z, or vertical Y) to draw given the block's actual axis and the
/// canvas orientation — see spec scenario S5 and geometry's chunk swap table.
fn log_sprite_axis(axis: Axis, orientation: Orientation) -> Axis {
    match axis {
        Axis::Y => Axis::Y,
        _ if orientation.swaps_axes() => axis,
        Axis::X => Axis::Z,
        Axis::Z => Axis::X,
    }
}

fn draw_log(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe, ctx: &SpriteContext) -> Result<(), crate::error::Error> {
    let axis = ctx.metadata.axis.unwrap_or(Axis::Y);
    let secondary = recipe.secondary.unwrap_or(recipe.primary);
    match log_sprite_axis(axis, ctx.orientation) {
        Axis::Y => {
            // End grain visible from above.
            for dx in 0..4 {
                canvas.put(u + dx, v, secondary)?;
            }
            for dy in 1..4 {
                for dx in 0..2 {
                    canvas.put(u + dx, v + dy, recipe.dark)?;
                }
                for dx in 2..4 {
                    canvas.put(u + dx, v + dy, recipe.light)?;
                }
            }
        }
        Axis::Z => {
            for dx in 0..4 {
                canvas.put(u + dx, v, recipe.primary)?;
            }
            for dy in 1..4 {
                for dx in 0..2 {
                    canvas.put(u + dx, v + dy, secondary)?;
                }
                for dx in 2..4 {
                    canvas.put(u + dx, v + dy, recipe.light)?;
                }
            }
        }
        Axis::X => {
            for dx in 0..4 {
                canvas.put(u + dx, v, recipe.primary)?;
            }
            for dy in 1..4 {
                for dx in 0..2 {
                    canvas.put(u + dx, v + dy, recipe.dark)?;
                }
                for dx in 2..4 {
                    canvas.put(u + dx, v + dy, secondary)?;
                }
            }
        }
    }
    Ok(())
}

fn draw_torch(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    let flame = recipe.secondary.unwrap_or(recipe.primary);
    canvas.put(u + 2, v + 1, flame)?;
    canvas.put(u + 2, v + 2, recipe.primary)?;
    canvas.put(u + 2, v + 3, recipe.primary)?;
    Ok(())
}

fn draw_wire(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    canvas.put(u + 1, v + 3, recipe.primary)?;
    canvas.put(u + 2, v + 3, recipe.primary)?;
    Ok(())
}

fn draw_fire(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    let accent = recipe.secondary.unwrap_or(recipe.light);
    canvas.put(u, v + 1, recipe.dark)?;
    canvas.put(u + 3, v + 1, recipe.light)?;
    canvas.put(u + 1, v + 2, accent)?;
    canvas.put(u + 2, v + 2, recipe.primary)?;
    canvas.put(u, v + 3, recipe.primary)?;
    canvas.put(u + 3, v + 3, accent)?;
    Ok(())
}

fn draw_plant(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    canvas.put(u, v + 1, recipe.primary)?;
    canvas.put(u + 3, v + 2, recipe.primary)?;
    canvas.put(u + 1, v + 3, recipe.primary)?;
    canvas.put(u + 2, v + 1, recipe.primary)?;
    Ok(())
}

fn draw_underwater_plant(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    draw_plant(canvas, u, v, recipe)?;
    let water = Color::new(63, 118, 228, 140);
    for dy in 1..4 {
        for dx in 0..4 {
            let idx_color = canvas.peek(u + dx, v + dy);
            if let Some(existing) = idx_color {
                canvas.put(u + dx, v + dy, add_color(existing, water))?;
            }
        }
    }
    Ok(())
}

fn draw_ore(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    let secondary = recipe.secondary.unwrap_or(recipe.primary);
    let secondary_light = secondary.modulate(-15);
    let secondary_dark = secondary.modulate(-25);
    let grid = [
        [recipe.primary, recipe.dark, secondary, recipe.light],
        [recipe.dark, secondary_dark, recipe.dark, secondary],
        [secondary, recipe.light, secondary_light, recipe.dark],
        [recipe.dark, secondary, recipe.light, recipe.light],
    ];
    for (dy, row) in grid.iter().enumerate() {
        for (dx, color) in row.iter().enumerate() {
            canvas.put(u + dx as i64, v + dy as i64, *color)?;
        }
    }
    Ok(())
}

fn draw_grown(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    let accent = recipe.secondary.unwrap_or(recipe.primary);
    for dx in 0..4 {
        canvas.put(u + dx, v, accent)?;
    }
    for dy in 1..4 {
        for dx in 0..2 {
            canvas.put(u + dx, v + dy, recipe.dark)?;
        }
        for dx in 2..4 {
            canvas.put(u + dx, v + dy, recipe.light)?;
        }
    }
    Ok(())
}

fn draw_rod(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    for dy in 0..4 {
        canvas.put(u + 1, v + dy, recipe.dark)?;
        canvas.put(u + 2, v + dy, recipe.light)?;
    }
    Ok(())
}

fn draw_beam(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    for dy in 0..4 {
        canvas.put(u + 1, v + dy, recipe.dark)?;
        canvas.put(u + 2, v + dy, recipe.light)?;
    }
    Ok(())
}

fn draw_thin(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    for dx in 0..4 {
        canvas.put(u + dx, v + 3, recipe.primary)?;
    }
    for dx in 0..2 {
        canvas.put(u + dx, v + 4, recipe.dark)?;
    }
    for dx in 2..4 {
        canvas.put(u + dx, v + 4, recipe.light)?;
    }
    Ok(())
}

fn draw_head(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe) -> Result<(), crate::error::Error> {
    for dx in 1..3 {
        canvas.put(u + dx, v, recipe.primary)?;
    }
    canvas.put(u + 1, v + 2, recipe.dark)?;
    canvas.put(u + 2, v + 2, recipe.light)?;
    Ok(())
}

fn draw_transparent(canvas: &mut Canvas, u: i64, v: i64, recipe: &BlockRecipe, ctx: &SpriteContext) -> Result<(), crate::error::Error> {
    for dy in 1..4 {
        for dx in 0..2 {
            canvas.put(u + dx, v + dy, recipe.dark)?;
        }
        for dx in 2..4 {
            canvas.put(u + dx, v + dy, recipe.light)?;
        }
    }
    let draw_top = match ctx.above {
        Some(above) => above.primary != recipe.primary,
        None => true,
    };
    if draw_top {
        for dx in 0..4 {
            canvas.put(u + dx, v, recipe.primary)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_axis_selection_matches_orientation_table() {
        // S5: axis "x" rendered NW selects the Z sprite, SW selects the X sprite.
        assert_eq!(log_sprite_axis(Axis::X, Orientation::NW), Axis::Z);
        assert_eq!(log_sprite_axis(Axis::X, Orientation::SW), Axis::X);
        assert_eq!(log_sprite_axis(Axis::Y, Orientation::NE), Axis::Y);
    }
}
