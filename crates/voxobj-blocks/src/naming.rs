use std::str::FromStr;

use serde::Deserialize;

use super::registry::BlockRegistry;
use super::types::Block;

pub const DEFAULT_MATERIAL: &str = "Default";
const REPEATING_PREFIX: &str = "repeating_";

/// Names the material used for faces of `block`. `repeating` selects the
/// variant bound to the repeating strip texture.
pub trait MaterialNamer: Send + Sync {
    fn name(&self, block: Block, repeating: bool) -> String;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    Number,
    #[default]
    Name,
    Repetition,
}

impl FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(NamingPolicy::Number),
            "name" => Ok(NamingPolicy::Name),
            "repetition" => Ok(NamingPolicy::Repetition),
            other => Err(format!(
                "unknown naming policy '{}' (expected number, name or repetition)",
                other
            )),
        }
    }
}

impl NamingPolicy {
    pub fn namer<'a>(self, reg: &'a BlockRegistry) -> Box<dyn MaterialNamer + 'a> {
        match self {
            NamingPolicy::Number => Box::new(NumberNamer { reg }),
            NamingPolicy::Name => Box::new(NameNamer { reg }),
            NamingPolicy::Repetition => Box::new(RepetitionNamer { reg }),
        }
    }
}

/// `"<id>"`, or `"<id>_<data>"` when the table has a variant for the metadata.
pub struct NumberNamer<'a> {
    pub reg: &'a BlockRegistry,
}

impl MaterialNamer for NumberNamer<'_> {
    fn name(&self, block: Block, repeating: bool) -> String {
        let prefix = if repeating { REPEATING_PREFIX } else { "" };
        match self.reg.get(block.id) {
            Some(ty) if ty.has_variant(block.data) => {
                format!("{}{}_{}", prefix, block.id, block.data)
            }
            _ => format!("{}{}", prefix, block.id),
        }
    }
}

/// Variant name from the table, `Unknown.<id>` otherwise.
pub struct NameNamer<'a> {
    pub reg: &'a BlockRegistry,
}

impl MaterialNamer for NameNamer<'_> {
    fn name(&self, block: Block, repeating: bool) -> String {
        let prefix = if repeating { REPEATING_PREFIX } else { "" };
        match self.reg.get(block.id) {
            Some(ty) => format!("{}{}", prefix, ty.variant(block.data).name),
            None => format!("{}Unknown.{}", prefix, block.id),
        }
    }
}

/// One material per texture image: the atlas for single tiles, the
/// repeating texture (alphanumerics only) for strips.
pub struct RepetitionNamer<'a> {
    pub reg: &'a BlockRegistry,
}

impl MaterialNamer for RepetitionNamer<'_> {
    fn name(&self, block: Block, repeating: bool) -> String {
        if !repeating {
            return DEFAULT_MATERIAL.into();
        }
        match self.reg.get(block.id) {
            Some(ty) => repeating_material_name(&ty.variant(block.data).repeating_texture),
            None => DEFAULT_MATERIAL.into(),
        }
    }
}

/// Strips everything but letters and digits from a texture file name.
pub fn repeating_material_name(texture: &str) -> String {
    texture.chars().filter(|c| c.is_alphanumeric()).collect()
}
