use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use voxobj_blocks::NamingPolicy;
use voxobj_mesh::MeshConfig;

use crate::cli::CliArgs;

pub const DEFAULT_ATLAS: &str = "terrain.png";
pub const DEFAULT_BATCH: usize = 64;

/// Export settings: built-in defaults, then an optional TOML file, then
/// command-line flags.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub mesh: MeshConfig,
    pub naming: NamingPolicy,
    // Block table; the embedded default when unset
    pub blocks: Option<PathBuf>,
    pub atlas: String,
    /// Treat the space under the world as solid so the floor is not drawn.
    pub hide_bottom: bool,
    pub jobs: Option<usize>,
    /// Chunks decoded and meshed together before being written.
    pub batch: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mesh: MeshConfig::default(),
            naming: NamingPolicy::default(),
            blocks: None,
            atlas: DEFAULT_ATLAS.to_string(),
            hide_bottom: false,
            jobs: None,
            batch: DEFAULT_BATCH,
        }
    }
}

impl ExportConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a config file. A relative `blocks` path resolves against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let mut cfg = Self::from_toml_str(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
        if let (Some(blocks), Some(dir)) = (cfg.blocks.as_mut(), path.parent()) {
            if blocks.is_relative() {
                *blocks = dir.join(&*blocks);
            }
        }
        Ok(cfg)
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(min_y) = args.min_y {
            self.mesh.min_y = min_y;
        }
        if args.no_merge {
            self.mesh.run_merging = false;
        }
        if args.no_textures {
            self.mesh.textures = false;
        }
        if args.hide_bottom {
            self.hide_bottom = true;
        }
        if let Some(naming) = args.naming {
            self.naming = naming;
        }
        if let Some(ref blocks) = args.blocks {
            self.blocks = Some(blocks.clone());
        }
        if let Some(ref atlas) = args.atlas {
            self.atlas = atlas.clone();
        }
        if let Some(jobs) = args.jobs {
            self.jobs = Some(jobs);
        }
        if let Some(batch) = args.batch {
            self.batch = batch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn file_values_override_defaults() {
        let cfg = ExportConfig::from_toml_str(
            r#"
            naming = "number"
            hide_bottom = true
            [mesh]
            run_merging = false
            atlas_width = 512
            "#,
        )
        .unwrap();
        assert_eq!(cfg.naming, NamingPolicy::Number);
        assert!(cfg.hide_bottom);
        assert!(!cfg.mesh.run_merging);
        assert_eq!(cfg.mesh.atlas_width, 512);
        // untouched keys keep their defaults
        assert_eq!(cfg.mesh.atlas_height, 256);
        assert!(cfg.mesh.textures);
        assert_eq!(cfg.atlas, DEFAULT_ATLAS);
        assert_eq!(cfg.batch, DEFAULT_BATCH);
    }

    #[test]
    fn cli_overrides_file() {
        let mut cfg = ExportConfig::from_toml_str("naming = \"number\"\n[mesh]\nmin_y = 3\n").unwrap();
        let args = CliArgs::parse_from([
            "voxobj",
            "world",
            "--naming",
            "repetition",
            "--no-textures",
            "--atlas",
            "gui.png",
        ]);
        cfg.apply_cli_overrides(&args);
        assert_eq!(cfg.naming, NamingPolicy::Repetition);
        assert!(!cfg.mesh.textures);
        assert_eq!(cfg.atlas, "gui.png");
        assert_eq!(cfg.mesh.min_y, 3);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(ExportConfig::from_toml_str("naming = \"colour\"").is_err());
        assert!(ExportConfig::from_toml_str("[mesh]\nmin_y = \"low\"").is_err());
    }

    #[test]
    fn relative_block_table_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.toml");
        fs::write(&path, "blocks = \"tables/blocks.toml\"\n").unwrap();
        let cfg = ExportConfig::load(&path).unwrap();
        assert_eq!(cfg.blocks, Some(dir.path().join("tables/blocks.toml")));
    }
}
