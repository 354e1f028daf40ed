use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig, TexturesDef, VariantDef};
use super::types::{Block, BlockData, BlockId, Face, Opacity, PatternPos, TexRect};

/// Number of repeating-strip columns addressable by a material.
pub const REPEATING_COLUMNS: u8 = 64;
/// Number of pattern cells per atlas axis.
pub const ATLAS_PATTERNS: u8 = 16;

const DEFAULT_TABLE: &str = include_str!("../assets/blocks.toml");
const DEFAULT_REPEATING_TEXTURE: &str = "repeating.png";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceTextures {
    pub top: PatternPos,
    pub bottom: PatternPos,
    pub side: PatternPos,
    pub front: Option<(Face, PatternPos)>,
    pub repeating_side: Option<u8>,
    pub repeating_front: Option<u8>,
}

/// One renderable appearance of a block id. Metadata variants carry their
/// own copy with overrides applied.
#[derive(Clone, Debug)]
pub struct Variant {
    pub id: BlockId,
    pub data: Option<BlockData>,
    pub name: String,
    pub opacity: Opacity,
    pub color: [u8; 4],
    pub textures: FaceTextures,
    pub repeating_texture: String,
}

impl Variant {
    fn placeholder(id: BlockId) -> Self {
        Self {
            id,
            data: None,
            name: "unknown".into(),
            opacity: Opacity::Solid,
            color: [0xff, 0x00, 0xff, 0xff],
            textures: FaceTextures {
                top: PatternPos::default(),
                bottom: PatternPos::default(),
                side: PatternPos::default(),
                front: None,
                repeating_side: None,
                repeating_front: None,
            },
            repeating_texture: DEFAULT_REPEATING_TEXTURE.into(),
        }
    }

    /// Texture rectangle for one face of this variant covering a run of
    /// `reps` cells.
    pub fn texture_for(&self, face: Face, reps: u32) -> TexRect {
        let t = &self.textures;
        match face {
            Face::PosY => TexRect::tile(t.top),
            Face::NegY => TexRect::tile(t.bottom),
            _ => {
                let (tile, column) = match t.front {
                    Some((front, pos)) if front == face => (pos, t.repeating_front),
                    _ => (t.side, t.repeating_side),
                };
                match column {
                    Some(c) if reps > 1 => TexRect::strip(c),
                    _ => TexRect::tile(tile),
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub base: Variant,
    pub variants: Vec<Variant>,
}

impl BlockType {
    #[inline]
    pub fn variant(&self, data: BlockData) -> &Variant {
        self.variants
            .iter()
            .find(|v| v.data == Some(data))
            .unwrap_or(&self.base)
    }

    #[inline]
    pub fn has_variant(&self, data: BlockData) -> bool {
        self.variants.iter().any(|v| v.data == Some(data))
    }

    /// Base appearance followed by every metadata variant.
    pub fn appearances(&self) -> impl Iterator<Item = &Variant> {
        std::iter::once(&self.base).chain(self.variants.iter())
    }
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<Option<BlockType>>,
    pub unknown: Variant,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: vec![None; 256],
            unknown: Variant::placeholder(0),
        }
    }

    /// Registry built from the embedded default table.
    ///
    /// Panics if the embedded table is malformed; it is fixed at build time
    /// and covered by the crate's tests.
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_TABLE).expect("embedded block table must parse")
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks[id as usize].as_ref()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.iter().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().flatten()
    }

    /// Appearance of a cell: exact metadata variant, else the block's base
    /// entry, else the unknown placeholder.
    #[inline]
    pub fn variant(&self, block: Block) -> &Variant {
        match self.get(block.id) {
            Some(ty) => ty.variant(block.data),
            None => &self.unknown,
        }
    }

    #[inline]
    pub fn opacity(&self, block: Block) -> Opacity {
        if block.is_air() {
            return Opacity::Empty;
        }
        self.variant(block).opacity
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks {
            if reg.blocks[def.id as usize].is_some() {
                return Err(format!("duplicate block id {} ({})", def.id, def.name).into());
            }
            let ty = compile_block(def)?;
            let id = ty.id as usize;
            reg.blocks[id] = Some(ty);
        }
        if let Some(name) = cfg.unknown_block {
            match reg.id_by_name(&name).and_then(|id| reg.get(id)) {
                Some(ty) => reg.unknown = ty.base.clone(),
                None => log::warn!("unknown_block '{}' not in table; using placeholder", name),
            }
        }
        Ok(reg)
    }
}

fn compile_block(def: BlockDef) -> Result<BlockType, Box<dyn Error>> {
    let opacity = def.opacity.unwrap_or(if def.id == 0 {
        Opacity::Empty
    } else {
        Opacity::Solid
    });
    let base_textures = compile_textures(&def.textures, None, &def.name)?;
    let base = Variant {
        id: def.id,
        data: None,
        name: def.name.clone(),
        opacity,
        color: def.color.unwrap_or([0xff, 0xff, 0xff, 0xff]),
        textures: base_textures,
        repeating_texture: def
            .textures
            .repeating_texture
            .clone()
            .unwrap_or_else(|| DEFAULT_REPEATING_TEXTURE.into()),
    };
    let mut variants = Vec::with_capacity(def.variants.len());
    for vd in def.variants {
        variants.push(compile_variant(&base, &def.textures, vd)?);
    }
    Ok(BlockType {
        id: def.id,
        name: def.name,
        base,
        variants,
    })
}

fn compile_variant(
    base: &Variant,
    base_def: &TexturesDef,
    vd: VariantDef,
) -> Result<Variant, Box<dyn Error>> {
    if vd.data > 0x0f {
        return Err(format!("{}: metadata {} does not fit a nibble", base.name, vd.data).into());
    }
    let name = vd
        .name
        .unwrap_or_else(|| format!("{}_{}", base.name, vd.data));
    // Variant fields fall back to the block's own definition
    let merged = TexturesDef {
        all: vd.textures.all.or(base_def.all),
        top: vd.textures.top.or(if vd.textures.all.is_some() { None } else { base_def.top }),
        bottom: vd
            .textures
            .bottom
            .or(if vd.textures.all.is_some() { None } else { base_def.bottom }),
        side: vd.textures.side.or(if vd.textures.all.is_some() { None } else { base_def.side }),
        front: vd.textures.front.or(base_def.front),
        repeating_side: vd.textures.repeating_side.or(base_def.repeating_side),
        repeating_front: vd.textures.repeating_front.or(base_def.repeating_front),
        repeating_texture: vd
            .textures
            .repeating_texture
            .clone()
            .or_else(|| base_def.repeating_texture.clone()),
    };
    Ok(Variant {
        id: base.id,
        data: Some(vd.data),
        textures: compile_textures(&merged, Some(&base.textures), &name)?,
        opacity: vd.opacity.unwrap_or(base.opacity),
        color: vd.color.unwrap_or(base.color),
        repeating_texture: merged
            .repeating_texture
            .unwrap_or_else(|| base.repeating_texture.clone()),
        name,
    })
}

fn compile_textures(
    def: &TexturesDef,
    inherit: Option<&FaceTextures>,
    name: &str,
) -> Result<FaceTextures, Box<dyn Error>> {
    let pick = |own: Option<[u8; 2]>, inherited: Option<PatternPos>| -> Result<PatternPos, Box<dyn Error>> {
        let p = own
            .or(def.all)
            .map(PatternPos::from)
            .or(inherited)
            .unwrap_or_default();
        check_pattern(name, p)?;
        Ok(p)
    };
    let front = match def.front {
        Some(f) => {
            if !f.face.is_side() {
                return Err(format!("{}: front face must be a side face", name).into());
            }
            let p = PatternPos::from(f.tile);
            check_pattern(name, p)?;
            Some((f.face, p))
        }
        None => inherit.and_then(|t| t.front),
    };
    for column in [def.repeating_side, def.repeating_front].into_iter().flatten() {
        if column >= REPEATING_COLUMNS {
            return Err(format!("{}: repeating column {} out of range", name, column).into());
        }
    }
    Ok(FaceTextures {
        top: pick(def.top, inherit.map(|t| t.top))?,
        bottom: pick(def.bottom, inherit.map(|t| t.bottom))?,
        side: pick(def.side, inherit.map(|t| t.side))?,
        front,
        repeating_side: def.repeating_side.or(inherit.and_then(|t| t.repeating_side)),
        repeating_front: def.repeating_front.or(inherit.and_then(|t| t.repeating_front)),
    })
}

fn check_pattern(name: &str, p: PatternPos) -> Result<(), Box<dyn Error>> {
    if p.x >= ATLAS_PATTERNS || p.y >= ATLAS_PATTERNS {
        return Err(format!("{}: atlas position [{}, {}] outside 16x16", name, p.x, p.y).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        [[blocks]]
        id = 0
        name = "air"
        opacity = "empty"

        [[blocks]]
        id = 17
        name = "log"
        top = [5, 1]
        bottom = [5, 1]
        side = [4, 1]
        repeating_side = 9

        [[blocks.variants]]
        data = 1
        name = "spruce_log"
        side = [4, 7]

        [[blocks]]
        id = 61
        name = "furnace"
        all = [13, 2]
        top = [14, 3]
        front = { face = "neg_z", tile = [12, 2] }
        repeating_side = 20
        repeating_front = 21
    "#;

    #[test]
    fn variant_inherits_unset_fields() {
        let reg = BlockRegistry::from_toml_str(TABLE).unwrap();
        let spruce = reg.variant(Block::new(17, 1));
        assert_eq!(spruce.name, "spruce_log");
        assert_eq!(spruce.textures.side, PatternPos::new(4, 7));
        assert_eq!(spruce.textures.top, PatternPos::new(5, 1));
        assert_eq!(spruce.textures.repeating_side, Some(9));
        // unlisted metadata falls back to the base entry
        assert_eq!(reg.variant(Block::new(17, 5)).name, "log");
    }

    #[test]
    fn all_fills_unset_faces_only() {
        let reg = BlockRegistry::from_toml_str(TABLE).unwrap();
        let furnace = reg.variant(Block::new(61, 0));
        assert_eq!(furnace.textures.top, PatternPos::new(14, 3));
        assert_eq!(furnace.textures.bottom, PatternPos::new(13, 2));
        assert_eq!(furnace.textures.side, PatternPos::new(13, 2));
    }

    #[test]
    fn front_face_and_repeating_columns() {
        let reg = BlockRegistry::from_toml_str(TABLE).unwrap();
        let furnace = reg.variant(Block::new(61, 0));
        assert_eq!(
            furnace.texture_for(Face::NegZ, 1),
            TexRect::tile(PatternPos::new(12, 2))
        );
        assert_eq!(furnace.texture_for(Face::NegZ, 3), TexRect::strip(21));
        assert_eq!(furnace.texture_for(Face::PosX, 3), TexRect::strip(20));
        assert_eq!(
            furnace.texture_for(Face::PosX, 1),
            TexRect::tile(PatternPos::new(13, 2))
        );
        // top/bottom never use the strip
        assert_eq!(
            furnace.texture_for(Face::PosY, 7),
            TexRect::tile(PatternPos::new(14, 3))
        );
    }

    #[test]
    fn unknown_ids_use_placeholder() {
        let reg = BlockRegistry::from_toml_str(TABLE).unwrap();
        let v = reg.variant(Block::new(200, 0));
        assert_eq!(v.name, "unknown");
        assert_eq!(reg.opacity(Block::new(200, 0)), Opacity::Solid);
        assert_eq!(reg.opacity(Block::AIR), Opacity::Empty);
    }

    #[test]
    fn rejects_bad_tables() {
        let dup = r#"
            [[blocks]]
            id = 1
            name = "a"
            [[blocks]]
            id = 1
            name = "b"
        "#;
        assert!(BlockRegistry::from_toml_str(dup).is_err());
        let off_atlas = r#"
            [[blocks]]
            id = 1
            name = "a"
            all = [16, 0]
        "#;
        assert!(BlockRegistry::from_toml_str(off_atlas).is_err());
        let top_front = r#"
            [[blocks]]
            id = 1
            name = "a"
            front = { face = "pos_y", tile = [0, 0] }
        "#;
        assert!(BlockRegistry::from_toml_str(top_front).is_err());
    }

    #[test]
    fn blocks_land_in_their_id_slots() {
        let reg = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            id = 200
            name = "late"

            [[blocks]]
            id = 5
            name = "early"
            "#,
        )
        .unwrap();
        assert_eq!(reg.get(200).map(|t| t.name.as_str()), Some("late"));
        assert_eq!(reg.get(5).map(|t| t.name.as_str()), Some("early"));
        assert!(reg.get(6).is_none());
        let names: Vec<&str> = reg.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["early", "late"]);
    }

    #[test]
    fn builtin_table_parses() {
        let reg = BlockRegistry::builtin();
        assert_eq!(reg.opacity(Block::new(1, 0)), Opacity::Solid);
        assert_eq!(reg.opacity(Block::new(20, 0)), Opacity::Transparent);
        assert_eq!(reg.id_by_name("stone"), Some(1));
    }
}
