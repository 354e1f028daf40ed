use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use voxobj_chunk::ChunkCoord;
use walkdir::WalkDir;

use crate::IoError;

/// Signed base-36, lowercase, as used in chunk file names.
pub fn to_base36(n: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut v = n.unsigned_abs();
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(v % 36) as usize]);
        v /= 36;
        if v == 0 {
            break;
        }
    }
    if n < 0 {
        out.push(b'-');
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// `c.<x>.<z>.dat` with base-36 coordinates.
pub fn chunk_file_name(coord: ChunkCoord) -> String {
    format!("c.{}.{}.dat", to_base36(coord.cx), to_base36(coord.cz))
}

pub fn parse_chunk_file_name(name: &str) -> Option<ChunkCoord> {
    let rest = name.strip_prefix("c.")?.strip_suffix(".dat")?;
    let (x, z) = rest.split_once('.')?;
    let cx = i32::from_str_radix(x, 36).ok()?;
    let cz = i32::from_str_radix(z, 36).ok()?;
    Some(ChunkCoord::new(cx, cz))
}

/// Where a world stores a chunk: two levels of folders named by the
/// coordinates modulo 64.
pub fn chunk_path(world: &Path, coord: ChunkCoord) -> PathBuf {
    world
        .join(to_base36(coord.cx.rem_euclid(64)))
        .join(to_base36(coord.cz.rem_euclid(64)))
        .join(chunk_file_name(coord))
}

/// Chunk files found under a world directory, in coordinate order.
#[derive(Clone, Debug, Default)]
pub struct WorldIndex {
    chunks: BTreeMap<ChunkCoord, PathBuf>,
}

impl WorldIndex {
    /// Recursively collects every chunk file under `dir`.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self, IoError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(format!("{} is not a directory", dir.display()).into());
        }
        let mut chunks = BTreeMap::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(coord) = entry.file_name().to_str().and_then(parse_chunk_file_name) else {
                continue;
            };
            if let Some(prev) = chunks.insert(coord, entry.path().to_path_buf()) {
                log::warn!(
                    "chunk {} found twice; using {} over {}",
                    coord,
                    entry.path().display(),
                    prev.display()
                );
            }
        }
        log::debug!("indexed {} chunk files under {}", chunks.len(), dir.display());
        Ok(Self { chunks })
    }

    pub fn from_paths(paths: impl IntoIterator<Item = (ChunkCoord, PathBuf)>) -> Self {
        Self {
            chunks: paths.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn path(&self, coord: ChunkCoord) -> Option<&Path> {
        self.chunks.get(&coord).map(PathBuf::as_path)
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Keeps only chunks within `radius` of `center` on both axes.
    pub fn select(&self, center: ChunkCoord, radius: u32) -> Self {
        Self {
            chunks: self
                .chunks
                .iter()
                .filter(|(c, _)| c.chebyshev(center) <= radius)
                .map(|(c, p)| (*c, p.clone()))
                .collect(),
        }
    }
}
