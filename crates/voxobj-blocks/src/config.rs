use serde::Deserialize;

use super::types::{Face, Opacity};

// Top-level block table file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    // Name of a block whose appearance is borrowed by ids missing from the
    // table. If absent or not found, a built-in solid placeholder is used.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub id: u8,
    pub name: String,
    #[serde(default)]
    pub opacity: Option<Opacity>,
    // RGBA, used for the `Kd`/`d` lines of the material library
    #[serde(default)]
    pub color: Option<[u8; 4]>,
    #[serde(flatten)]
    pub textures: TexturesDef,
    // Metadata-specific overrides; unspecified fields inherit from the block
    #[serde(default)]
    pub variants: Vec<VariantDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VariantDef {
    pub data: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub opacity: Option<Opacity>,
    #[serde(default)]
    pub color: Option<[u8; 4]>,
    #[serde(flatten)]
    pub textures: TexturesDef,
}

// Atlas positions are `[column, row]` in the 16x16 terrain atlas.
// `all` fills whichever of top/bottom/side is left unset.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TexturesDef {
    #[serde(default)]
    pub all: Option<[u8; 2]>,
    #[serde(default)]
    pub top: Option<[u8; 2]>,
    #[serde(default)]
    pub bottom: Option<[u8; 2]>,
    #[serde(default)]
    pub side: Option<[u8; 2]>,
    #[serde(default)]
    pub front: Option<FrontDef>,
    // Column in the 64-wide repeating strip used by merged side runs
    #[serde(default)]
    pub repeating_side: Option<u8>,
    #[serde(default)]
    pub repeating_front: Option<u8>,
    #[serde(default)]
    pub repeating_texture: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct FrontDef {
    pub face: Face,
    pub tile: [u8; 2],
}
