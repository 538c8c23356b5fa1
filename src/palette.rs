//! Block recipes and the named-color palette: loading the built-in default,
//! overlaying a user JSON file, and filtering down to what a loaded world
//! actually uses.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::color::Color;

/// The closed set of block-type sprites (spec §4.3 / §9: a flat dispatch
/// table, never a class hierarchy).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpriteType {
    Full,
    Slab,
    Log,
    Torch,
    Wire,
    Fire,
    Plant,
    UnderwaterPlant,
    Ore,
    Grown,
    Rod,
    Beam,
    Thin,
    Head,
    Hidden,
    Transparent,
}

/// A block's rendering recipe: the sprite that draws it, its base colors,
/// and the two shades derived from `primary` at load time.
#[derive(Debug, Copy, Clone)]
pub struct BlockRecipe {
    pub sprite: SpriteType,
    pub primary: Color,
    pub secondary: Option<Color>,
    pub light: Color,
    pub dark: Color,
}

impl BlockRecipe {
    pub fn new(sprite: SpriteType, primary: Color, secondary: Option<Color>) -> Self {
        BlockRecipe {
            sprite,
            primary,
            secondary,
            light: primary.modulate(-17),
            dark: primary.modulate(-27),
        }
    }

    /// The always-empty recipe unknown block names resolve to.
    pub fn empty() -> Self {
        BlockRecipe::new(SpriteType::Hidden, Color::TRANSPARENT, None)
    }
}

/// `block name -> recipe`.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    recipes: HashMap<String, BlockRecipe>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonBlock {
    Shorthand([u8; 4]),
    Full {
        #[serde(default)]
        r#type: Option<String>,
        color: [u8; 4],
        accent: Option<[u8; 4]>,
    },
}

const DEFAULT_PALETTE_JSON: &str = include_str!("../assets/default_palette.json");

impl Palette {
    /// Loads the embedded default palette, then overlays `overlay_json` on
    /// top of it entry-wise if present (spec §6: "the file, when present,
    /// overlays it entry-wise").
    pub fn load(overlay_json: Option<&str>) -> anyhow::Result<Self> {
        let mut palette = Self::from_json(DEFAULT_PALETTE_JSON)?;
        if let Some(json) = overlay_json {
            let overlay = Self::from_json(json)?;
            palette.recipes.extend(overlay.recipes);
        }
        Ok(palette)
    }

    fn from_json(json: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, JsonBlock> = serde_json::from_str(json)?;
        let mut recipes = HashMap::with_capacity(raw.len());
        let mut warned_types = HashSet::new();
        for (name, block) in raw {
            let recipe = match block {
                JsonBlock::Shorthand(rgba) => {
                    BlockRecipe::new(SpriteType::Full, Color::from_rgba(rgba), None)
                }
                JsonBlock::Full {
                    r#type,
                    color,
                    accent,
                } => {
                    let sprite = match r#type.as_deref() {
                        None => SpriteType::Full,
                        Some(name) => parse_sprite_type(name).unwrap_or_else(|| {
                            if warned_types.insert(name.to_string()) {
                                tracing::warn!(sprite_type = name, "unknown sprite type in palette JSON, rendering as full");
                            }
                            SpriteType::Full
                        }),
                    };
                    BlockRecipe::new(
                        sprite,
                        Color::from_rgba(color),
                        accent.map(Color::from_rgba),
                    )
                }
            };
            recipes.insert(name, recipe);
        }
        Ok(Palette { recipes })
    }

    /// Builds the subset of this palette referenced by `seen` block names,
    /// always including the built-in sentinel names regardless of whether
    /// they were observed in the world.
    pub fn filter(&self, seen: &HashSet<String>) -> Palette {
        let mut recipes = HashMap::new();
        for name in seen.iter().chain(["mcmap:beacon_beam".to_string()].iter()) {
            if let Some(recipe) = self.recipes.get(name) {
                recipes.insert(name.clone(), *recipe);
            }
        }
        Palette { recipes }
    }

    pub fn get(&self, name: &str) -> BlockRecipe {
        self.recipes.get(name).copied().unwrap_or_else(BlockRecipe::empty)
    }

    /// Overrides a single entry, used by `-nowater` (spec §6).
    pub fn override_with_empty(&mut self, name: &str) {
        self.recipes.insert(name.to_string(), BlockRecipe::empty());
    }
}

fn parse_sprite_type(name: &str) -> Option<SpriteType> {
    Some(match name {
        "full" => SpriteType::Full,
        "slab" => SpriteType::Slab,
        "log" => SpriteType::Log,
        "torch" => SpriteType::Torch,
        "wire" => SpriteType::Wire,
        "fire" => SpriteType::Fire,
        "plant" => SpriteType::Plant,
        "underwater-plant" => SpriteType::UnderwaterPlant,
        "ore" => SpriteType::Ore,
        "grown" => SpriteType::Grown,
        "rod" => SpriteType::Rod,
        "beam" => SpriteType::Beam,
        "thin" => SpriteType::Thin,
        "head" => SpriteType::Head,
        "hidden" => SpriteType::Hidden,
        "transparent" => SpriteType::Transparent,
        _ => return None,
    })
}

/// Marker colors known to the renderer, carried over from the original's
/// fixed four-entry table (white/red/green/blue at alpha 70).
pub fn marker_color(name: &str) -> Option<Color> {
    Some(match name {
        "white" => Color::new(250, 250, 250, 70),
        "red" => Color::new(250, 0, 0, 70),
        "green" => Color::new(0, 250, 0, 70),
        "blue" => Color::new(0, 0, 250, 70),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_palette() {
        let palette = Palette::load(None).unwrap();
        let stone = palette.get("minecraft:stone");
        assert_eq!(stone.sprite, SpriteType::Full);
        assert_eq!(stone.primary.r, 125);
    }

    #[test]
    fn unknown_name_is_empty() {
        let palette = Palette::load(None).unwrap();
        let unknown = palette.get("minecraft:does_not_exist");
        assert!(unknown.primary.is_empty());
    }

    #[test]
    fn overlay_replaces_entries() {
        let overlay = r#"{"minecraft:stone": [1, 2, 3, 255]}"#;
        let palette = Palette::load(Some(overlay)).unwrap();
        assert_eq!(palette.get("minecraft:stone").primary.r, 1);
        // untouched entries survive the overlay
        assert_eq!(palette.get("minecraft:dirt").primary.r, 134);
    }

    #[test]
    fn filter_keeps_builtin_beam_even_if_unseen() {
        let palette = Palette::load(None).unwrap();
        let filtered = palette.filter(&HashSet::new());
        assert_eq!(filtered.get("mcmap:beacon_beam").sprite, SpriteType::Beam);
    }

    #[test]
    fn nowater_override_empties_water() {
        let mut palette = Palette::load(None).unwrap();
        palette.override_with_empty("minecraft:water");
        assert!(palette.get("minecraft:water").primary.is_empty());
    }
}
