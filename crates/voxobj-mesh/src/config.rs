use serde::Deserialize;

use crate::texcoord_pool::AtlasLayout;

/// Mesher settings. Deserializes from the `[mesh]` table of an export
/// config; every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Merge vertical runs of identical side faces into single quads.
    pub run_merging: bool,
    /// Cells below this height are not meshed.
    pub min_y: usize,
    pub atlas_width: u32,
    pub atlas_height: u32,
    // Derived from the atlas pattern size when unset
    pub repeating_width: Option<u32>,
    pub repeating_height: Option<u32>,
    /// When false no texture coordinates are pooled or written.
    pub textures: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            run_merging: true,
            min_y: 0,
            atlas_width: 256,
            atlas_height: 256,
            repeating_width: None,
            repeating_height: None,
            textures: true,
        }
    }
}

impl MeshConfig {
    pub fn layout(&self) -> AtlasLayout {
        let mut layout = AtlasLayout::from_atlas(self.atlas_width, self.atlas_height);
        if let Some(w) = self.repeating_width {
            layout.repeating_width = w;
        }
        if let Some(h) = self.repeating_height {
            layout.repeating_height = h;
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_size_follows_atlas() {
        let cfg = MeshConfig {
            atlas_width: 512,
            atlas_height: 256,
            ..MeshConfig::default()
        };
        let l = cfg.layout();
        assert_eq!((l.repeating_width, l.repeating_height), (2048, 2048));
        let cfg = MeshConfig {
            repeating_height: Some(100),
            ..cfg
        };
        assert_eq!(cfg.layout().repeating_height, 100);
    }
}
