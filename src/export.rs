//! World to OBJ pipeline: batches of chunks are decoded and meshed on the
//! rayon pool, then appended to the output in coordinate order.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use voxobj_blocks::mtl::{MtlOptions, write_mtl};
use voxobj_blocks::{Block, BlockRegistry};
use voxobj_chunk::{ChunkBuf, ChunkCoord, EnclosedChunk, Neighbors};
use voxobj_io::{IoError, WorldIndex, read_chunk_file};
use voxobj_mesh::{ChunkMesher, ChunkObj, MeshStats, ObjWriter};

use crate::config::ExportConfig;

/// Stands in for everything below the world when `hide_bottom` is set.
pub const FLOOR_SENTINEL: Block = Block::new(7, 0);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub chunks: usize,
    /// Decoded chunks holding nothing but air; not meshed.
    pub empty: usize,
    pub skipped: usize,
    pub stats: MeshStats,
}

/// `out.obj` pairs with `out.mtl` in the same directory.
pub fn mtl_path(obj: &Path) -> PathBuf {
    obj.with_extension("mtl")
}

pub fn export(
    index: &WorldIndex,
    registry: &BlockRegistry,
    cfg: &ExportConfig,
    obj_path: &Path,
) -> Result<ExportSummary, IoError> {
    match cfg.jobs {
        Some(n) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("voxobj-mesh-{i}"))
                .build()?;
            pool.install(|| export_on_pool(index, registry, cfg, obj_path))
        }
        None => export_on_pool(index, registry, cfg, obj_path),
    }
}

fn export_on_pool(
    index: &WorldIndex,
    registry: &BlockRegistry,
    cfg: &ExportConfig,
    obj_path: &Path,
) -> Result<ExportSummary, IoError> {
    let mtl = mtl_path(obj_path);
    let namer = cfg.naming.namer(registry);
    let floor = if cfg.hide_bottom { FLOOR_SENTINEL } else { Block::AIR };

    let file = File::create(obj_path).map_err(|e| format!("{}: {}", obj_path.display(), e))?;
    let mut writer = ObjWriter::new(BufWriter::new(file), namer.as_ref());
    let mtl_name = mtl.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    writer.write_mtllib(&mtl_name)?;

    let coords: Vec<ChunkCoord> = index.coords().collect();
    let batch_size = cfg.batch.max(1);
    let batches = coords.len().div_ceil(batch_size);
    let mut summary = ExportSummary::default();

    for (bi, batch) in coords.chunks(batch_size).enumerate() {
        let loaded = load_batch(index, batch);
        let missing = batch.iter().filter(|c| !loaded.contains_key(*c)).count();
        summary.skipped += missing;
        let empty = batch
            .iter()
            .filter_map(|c| loaded.get(c))
            .filter(|chunk| chunk.is_all_air())
            .count();
        summary.empty += empty;

        let objs: Vec<ChunkObj> = batch
            .par_iter()
            .filter_map(|c| loaded.get(c))
            .filter(|chunk| !chunk.is_all_air())
            .map_init(
                || ChunkMesher::new(cfg.mesh.clone()),
                |mesher, chunk| {
                    let neighbors = chunk.coord.neighbors().map(|n| n.and_then(|n| loaded.get(&n)));
                    let enclosed = EnclosedChunk::new(chunk, Neighbors::from_array(neighbors)).with_floor(floor);
                    mesher.process(&enclosed, registry, registry)
                },
            )
            .collect();

        for obj in &objs {
            let stats = writer.write_chunk(obj)?;
            log::debug!(
                "chunk {}: {} faces, {} vertices, {} texcoords",
                obj.coord,
                stats.faces,
                stats.vertices,
                stats.texcoords
            );
            summary.chunks += 1;
        }
        log::info!(
            "batch {}/{}: {} chunks meshed, {} empty, {} skipped, {} faces so far",
            bi + 1,
            batches,
            objs.len(),
            empty,
            missing,
            writer.totals().faces
        );
    }

    let (mut out, stats) = writer.finish()?;
    out.flush()?;
    summary.stats = stats;

    let file = File::create(&mtl).map_err(|e| format!("{}: {}", mtl.display(), e))?;
    let mut mtl_out = BufWriter::new(file);
    let materials = write_mtl(
        &mut mtl_out,
        registry,
        namer.as_ref(),
        &MtlOptions {
            atlas: &cfg.atlas,
            textures: cfg.mesh.textures,
        },
    )?;
    mtl_out.flush()?;
    log::debug!("{} materials written to {}", materials, mtl.display());
    Ok(summary)
}

/// Decodes a batch plus every indexed lateral neighbor. Chunks that fail to
/// decode are logged and left out.
fn load_batch(index: &WorldIndex, batch: &[ChunkCoord]) -> HashMap<ChunkCoord, ChunkBuf> {
    let wanted: BTreeSet<ChunkCoord> = batch
        .iter()
        .flat_map(|c| std::iter::once(*c).chain(c.neighbors().into_iter().flatten()))
        .filter(|c| index.contains(*c))
        .collect();
    wanted
        .into_par_iter()
        .filter_map(|c| {
            let path = index.path(c)?;
            match read_chunk_file(path) {
                Ok(chunk) if chunk.coord != c => {
                    log::warn!("{} claims to be chunk {}; skipping", path.display(), chunk.coord);
                    None
                }
                Ok(chunk) => Some((c, chunk)),
                Err(e) => {
                    log::warn!("skipping chunk {}: {}", c, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use voxobj_blocks::NamingPolicy;
    use voxobj_io::encode_chunk;
    use voxobj_io::world::chunk_path;

    const STONE: Block = Block::new(1, 0);

    fn write_world(dir: &Path, chunks: &[ChunkBuf]) -> WorldIndex {
        for c in chunks {
            let path = chunk_path(dir, c.coord);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, encode_chunk(c).unwrap()).unwrap();
        }
        WorldIndex::scan(dir).unwrap()
    }

    fn cell(coord: ChunkCoord, x: usize, y: usize, z: usize) -> ChunkBuf {
        let mut buf = ChunkBuf::filled(coord, Block::AIR);
        buf.set_local(x, y, z, STONE);
        buf
    }

    #[test]
    fn exports_obj_and_mtl() {
        let world = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let index = write_world(
            world.path(),
            &[cell(ChunkCoord::new(0, 0), 1, 1, 1), cell(ChunkCoord::new(4, 4), 1, 1, 1)],
        );
        let obj_path = out.path().join("scene.obj");
        let reg = BlockRegistry::builtin();
        let summary = export(&index, &reg, &ExportConfig::default(), &obj_path).unwrap();
        assert_eq!(summary.chunks, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.stats.faces, 12);
        assert_eq!(summary.stats.vertices, 16);

        let text = fs::read_to_string(&obj_path).unwrap();
        assert!(text.starts_with("mtllib scene.mtl\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 16);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
        assert_eq!(text.matches("usemtl stone\n").count(), 1);
        // the second chunk's faces point past the first chunk's vertices
        assert!(text.lines().filter(|l| l.starts_with("f ")).skip(6).all(|l| {
            l[2..].split(' ').all(|i| i.split('/').next().unwrap().parse::<u32>().unwrap() > 8)
        }));

        let mtl = fs::read_to_string(out.path().join("scene.mtl")).unwrap();
        assert!(mtl.contains("newmtl stone\n"));
        assert!(mtl.contains("map_Kd terrain.png\n"));
    }

    #[test]
    fn neighbors_across_batches_cull_shared_walls() {
        let world = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let index = write_world(
            world.path(),
            &[cell(ChunkCoord::new(0, 0), 15, 0, 0), cell(ChunkCoord::new(1, 0), 0, 0, 0)],
        );
        let cfg = ExportConfig {
            batch: 1,
            jobs: Some(2),
            ..ExportConfig::default()
        };
        let summary = export(&index, &BlockRegistry::builtin(), &cfg, &out.path().join("a.obj")).unwrap();
        assert_eq!(summary.stats.faces, 10);
    }

    #[test]
    fn broken_chunks_are_skipped() {
        let world = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(world.path().join("c.1.0.dat"), b"\x1f\x8bnope").unwrap();
        let index = write_world(world.path(), &[cell(ChunkCoord::new(0, 0), 0, 0, 0)]);
        assert_eq!(index.len(), 2);
        let obj_path = out.path().join("b.obj");
        let summary = export(&index, &BlockRegistry::builtin(), &ExportConfig::default(), &obj_path).unwrap();
        assert_eq!((summary.chunks, summary.skipped), (1, 1));
        assert_eq!(summary.stats.faces, 6);
    }

    #[test]
    fn air_chunks_are_not_meshed() {
        let world = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let index = write_world(
            world.path(),
            &[
                cell(ChunkCoord::new(0, 0), 0, 0, 0),
                ChunkBuf::filled(ChunkCoord::new(0, 1), Block::AIR),
            ],
        );
        let obj_path = out.path().join("d.obj");
        let summary = export(&index, &BlockRegistry::builtin(), &ExportConfig::default(), &obj_path).unwrap();
        assert_eq!((summary.chunks, summary.empty, summary.skipped), (1, 1, 0));
        assert_eq!(summary.stats.faces, 6);
    }

    #[test]
    fn chunks_at_the_coordinate_limit_export() {
        let world = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let edge = ChunkCoord::new(i32::MAX, i32::MIN);
        let index = write_world(
            world.path(),
            &[cell(edge, 15, 0, 0), cell(ChunkCoord::new(i32::MAX - 1, i32::MIN), 0, 0, 0)],
        );
        let obj_path = out.path().join("e.obj");
        let summary = export(&index, &BlockRegistry::builtin(), &ExportConfig::default(), &obj_path).unwrap();
        assert_eq!(summary.chunks, 2);
        assert_eq!(summary.stats.faces, 12);
    }

    #[test]
    fn options_reach_the_output() {
        let world = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut tall = ChunkBuf::filled(ChunkCoord::new(0, 0), Block::AIR);
        for y in 0..4 {
            tall.set_local(0, y, 0, STONE);
        }
        let index = write_world(world.path(), &[tall]);
        let cfg = ExportConfig {
            naming: NamingPolicy::Number,
            hide_bottom: true,
            mesh: voxobj_mesh::MeshConfig {
                run_merging: false,
                textures: false,
                ..Default::default()
            },
            ..ExportConfig::default()
        };
        let obj_path = out.path().join("c.obj");
        let summary = export(&index, &BlockRegistry::builtin(), &cfg, &obj_path).unwrap();
        // four sides per cell, a top, and no bottom
        assert_eq!(summary.stats.faces, 17);
        assert_eq!(summary.stats.texcoords, 0);
        let text = fs::read_to_string(&obj_path).unwrap();
        assert!(!text.contains("vt "));
        assert!(text.contains("usemtl 1\n"));
        assert!(!text.contains('/'));
        let mtl = fs::read_to_string(out.path().join("c.mtl")).unwrap();
        assert!(!mtl.contains("map_Kd"));
    }
}
