use std::hint::black_box;
use std::io;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};

use voxobj_blocks::{Block, BlockRegistry, NamingPolicy};
use voxobj_chunk::{ChunkBuf, ChunkCoord, EnclosedChunk, Neighbors};
use voxobj_mesh::{ChunkMesher, MeshConfig, ObjWriter};

// Rolling terrain: stone core, dirt band, grass cap, scattered ore.
fn terrain(coord: ChunkCoord) -> ChunkBuf {
    let mut buf = ChunkBuf::filled(coord, Block::AIR);
    for x in 0..16 {
        for z in 0..16 {
            let wx = (coord.cx * 16 + x as i32) as f32;
            let wz = (coord.cz * 16 + z as i32) as f32;
            let h = 60.0 + 8.0 * (wx * 0.21).sin() + 6.0 * (wz * 0.17).cos();
            let h = h as usize;
            for y in 0..h {
                let id = if y + 1 == h {
                    2
                } else if y + 4 >= h {
                    3
                } else if (x * 7 + y * 3 + z * 5) % 41 == 0 {
                    16
                } else {
                    1
                };
                buf.set_local(x, y, z, Block::new(id, 0));
            }
        }
    }
    buf
}

fn bench_mesh_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_terrain");
    let reg = BlockRegistry::builtin();
    let center = terrain(ChunkCoord::new(0, 0));
    let n = ChunkCoord::new(0, 0).neighbors().map(|c| terrain(c.unwrap_or_default()));
    let neighbors = Neighbors::from_array([Some(&n[0]), Some(&n[1]), Some(&n[2]), Some(&n[3])]);
    let enclosed = EnclosedChunk::new(&center, neighbors);

    for (label, run_merging) in [("merged", true), ("unmerged", false)] {
        let mut mesher = ChunkMesher::new(MeshConfig {
            run_merging,
            ..MeshConfig::default()
        });
        group.bench_function(label, |b| {
            b.iter(|| {
                let obj = mesher.process(&enclosed, &reg, &reg);
                black_box(obj);
            })
        });
    }

    let namer = NamingPolicy::Name.namer(&reg);
    let mut mesher = ChunkMesher::new(MeshConfig::default());
    let obj = mesher.process(&enclosed, &reg, &reg);
    group.bench_function("write", |b| {
        b.iter(|| {
            let mut w = ObjWriter::new(io::sink(), namer.as_ref());
            black_box(w.write_chunk(&obj).ok());
        })
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_mesh_terrain
}
criterion_main!(benches);
