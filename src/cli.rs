//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use voxobj_blocks::NamingPolicy;
use voxobj_chunk::ChunkCoord;

/// Converts a world's chunk files into a single OBJ mesh with a material
/// library next to it.
///
/// CLI values override settings loaded from `--config`.
#[derive(Parser, Debug)]
#[command(name = "voxobj", version, about)]
pub struct CliArgs {
    /// World directory holding `c.<x>.<z>.dat` chunk files.
    pub world: PathBuf,

    /// Output OBJ file; the material library is written beside it.
    #[arg(short, long, default_value = "world.obj")]
    pub output: PathBuf,

    /// Export config (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Block table (TOML) replacing the built-in one.
    #[arg(long)]
    pub blocks: Option<PathBuf>,

    /// Lowest cell height meshed.
    #[arg(long)]
    pub min_y: Option<usize>,

    /// Emit one side face per cell instead of merging vertical runs.
    #[arg(long)]
    pub no_merge: bool,

    /// Skip texture coordinates and texture maps.
    #[arg(long)]
    pub no_textures: bool,

    /// Do not draw the underside of the world.
    #[arg(long)]
    pub hide_bottom: bool,

    /// Material naming: number, name or repetition.
    #[arg(long)]
    pub naming: Option<NamingPolicy>,

    /// Center of the exported window, as `X,Z` chunk coordinates.
    #[arg(long, value_parser = parse_coord, allow_hyphen_values = true)]
    pub center: Option<ChunkCoord>,

    /// Half-width of the exported window, in chunks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Worker threads (defaults to one per core).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Chunks per batch.
    #[arg(long)]
    pub batch: Option<usize>,

    /// Texture atlas file referenced by the materials.
    #[arg(long)]
    pub atlas: Option<String>,
}

pub const DEFAULT_RADIUS: u32 = 8;

impl CliArgs {
    /// The square window to export, if one was asked for.
    pub fn selection(&self) -> Option<(ChunkCoord, u32)> {
        match (self.center, self.radius) {
            (None, None) => None,
            (center, radius) => Some((center.unwrap_or_default(), radius.unwrap_or(DEFAULT_RADIUS))),
        }
    }
}

fn parse_coord(s: &str) -> Result<ChunkCoord, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Z but got '{}'", s))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad X '{}': {}", x, e))?;
    let z = z.trim().parse::<i32>().map_err(|e| format!("bad Z '{}': {}", z, e))?;
    Ok(ChunkCoord::new(x, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window() {
        let args = CliArgs::parse_from(["voxobj", "w", "--center", "-4,12", "--radius", "2"]);
        assert_eq!(args.selection(), Some((ChunkCoord::new(-4, 12), 2)));
        let args = CliArgs::parse_from(["voxobj", "w", "--radius", "3"]);
        assert_eq!(args.selection(), Some((ChunkCoord::new(0, 0), 3)));
        let args = CliArgs::parse_from(["voxobj", "w"]);
        assert_eq!(args.selection(), None);
        assert_eq!(args.output, PathBuf::from("world.obj"));
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(parse_coord("3").is_err());
        assert!(parse_coord("a,1").is_err());
        assert_eq!(parse_coord(" 1, -2"), Ok(ChunkCoord::new(1, -2)));
        assert!(CliArgs::try_parse_from(["voxobj", "w", "--naming", "colour"]).is_err());
    }
}
