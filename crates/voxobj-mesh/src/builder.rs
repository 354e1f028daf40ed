use std::collections::HashMap;

use voxobj_blocks::{Block, BoundaryLocator, Face, MaterialResolver};
use voxobj_chunk::{CHUNK_SX, CHUNK_SY, CHUNK_SZ, ChunkCoord, EnclosedChunk};

use crate::config::MeshConfig;
use crate::face::{Quad, SIDE_FACES, cell_quad, tex_corners};
use crate::run::{PendingRun, Run};
use crate::texcoord_pool::TexCoordPool;
use crate::vertex_pool::VertexPool;
use crate::writer::{ChunkObj, FaceGroup, NumberedFace};

/// A committed quad, still in pool slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshFace {
    pub block: Block,
    pub face: Face,
    /// Whether the texture is the repeating strip; selects the material.
    pub repeating: bool,
    pub reps: u32,
    pub vertices: [usize; 4],
    pub texcoords: Option<[usize; 4]>,
}

/// Per-worker mesher. Owns both pools and the face list; all three are
/// reset, not reallocated, between chunks.
pub struct ChunkMesher {
    config: MeshConfig,
    vertices: VertexPool,
    texcoords: TexCoordPool,
    faces: Vec<MeshFace>,
}

impl ChunkMesher {
    pub fn new(config: MeshConfig) -> Self {
        Self {
            config,
            vertices: VertexPool::new(),
            texcoords: TexCoordPool::new(),
            faces: Vec::with_capacity(8192),
        }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }

    pub fn vertex_pool(&self) -> &VertexPool {
        &self.vertices
    }

    pub fn texcoord_pool(&self) -> &TexCoordPool {
        &self.texcoords
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.texcoords.clear();
        self.faces.clear();
    }

    /// Scans the chunk one column at a time, bottom up. Top and bottom
    /// faces are committed as found; side faces go through one run per
    /// direction, and every run ends with its column.
    pub fn build<B, M>(&mut self, chunk: &EnclosedChunk<'_>, boundary: &B, materials: &M)
    where
        B: BoundaryLocator + ?Sized,
        M: MaterialResolver + ?Sized,
    {
        let merge = self.config.run_merging;
        let min_y = self.config.min_y.min(CHUNK_SY);
        for x in 0..CHUNK_SX {
            for z in 0..CHUNK_SZ {
                let mut runs: [Run; 4] = Default::default();
                for (y, &block) in chunk.chunk.column(x, z).iter().enumerate().skip(min_y) {
                    let (xi, yi, zi) = (x as i32, y as i32, z as i32);
                    if boundary.is_boundary(block, chunk.get(xi, yi - 1, zi)) {
                        self.commit(block, Face::NegY, cell_quad(Face::NegY, x, y, z), 1, materials);
                    }
                    if boundary.is_boundary(block, chunk.get(xi, yi + 1, zi)) {
                        self.commit(block, Face::PosY, cell_quad(Face::PosY, x, y, z), 1, materials);
                    }
                    for (run, face) in runs.iter_mut().zip(SIDE_FACES) {
                        let (dx, _, dz) = face.delta();
                        let done = if boundary.is_boundary(block, chunk.get(xi + dx, yi, zi + dz)) {
                            run.push(PendingRun::cell(block, face, x, y, z), merge)
                        } else {
                            run.take()
                        };
                        if let Some(done) = done {
                            self.commit_run(done, materials);
                        }
                    }
                }
                for run in runs.iter_mut() {
                    if let Some(done) = run.take() {
                        self.commit_run(done, materials);
                    }
                }
            }
        }
    }

    fn commit_run<M: MaterialResolver + ?Sized>(&mut self, run: PendingRun, materials: &M) {
        self.commit(run.block, run.face, run.quad, run.reps, materials);
    }

    fn commit<M: MaterialResolver + ?Sized>(
        &mut self,
        block: Block,
        face: Face,
        quad: Quad,
        reps: u32,
        materials: &M,
    ) {
        let rect = materials.texture(block, face, reps);
        let vertices = quad.map(|v| self.vertices.use_vertex(v));
        let texcoords = self.config.textures.then(|| {
            tex_corners(face, &quad).map(|(x_right, y_bottom)| {
                self.texcoords.use_corner(rect, x_right, y_bottom, reps)
            })
        });
        self.faces.push(MeshFace {
            block,
            face,
            repeating: rect.repeating,
            reps,
            vertices,
            texcoords,
        });
    }

    /// Numbers both pools, prints them, and resolves every face to
    /// chunk-local 1-based numbers grouped by material.
    pub fn finish(&mut self, coord: ChunkCoord) -> ChunkObj {
        let vertex_count = self.vertices.number();
        let mut vertex_text = String::with_capacity(vertex_count * 24);
        self.vertices.print(&mut vertex_text, coord);

        let mut texcoord_text = String::new();
        let mut texcoord_count = 0;
        if self.config.textures {
            texcoord_count = self.texcoords.number();
            texcoord_text.reserve(texcoord_count * 24);
            self.texcoords.print(&mut texcoord_text, &self.config.layout());
        }

        let mut groups: Vec<FaceGroup> = Vec::new();
        let mut slots: HashMap<(Block, bool), usize> = HashMap::new();
        for f in &self.faces {
            let gi = *slots.entry((f.block, f.repeating)).or_insert_with(|| {
                groups.push(FaceGroup {
                    block: f.block,
                    repeating: f.repeating,
                    faces: Vec::new(),
                });
                groups.len() - 1
            });
            let numbered = NumberedFace {
                vertices: f.vertices.map(|s| output_number(self.vertices.get(s))),
                texcoords: f
                    .texcoords
                    .map(|t| t.map(|s| output_number(self.texcoords.get(s)))),
            };
            groups[gi].faces.push(numbered);
        }

        ChunkObj {
            coord,
            vertex_text,
            vertex_count,
            texcoord_text,
            texcoord_count,
            groups,
        }
    }

    /// Clear, scan, number and print one chunk.
    pub fn process<B, M>(&mut self, chunk: &EnclosedChunk<'_>, boundary: &B, materials: &M) -> ChunkObj
    where
        B: BoundaryLocator + ?Sized,
        M: MaterialResolver + ?Sized,
    {
        self.clear();
        self.build(chunk, boundary, materials);
        let obj = self.finish(chunk.coord());
        log::trace!(
            "chunk {}: {} faces, {} vertices, {} texcoords",
            obj.coord,
            obj.face_count(),
            obj.vertex_count,
            obj.texcoord_count
        );
        obj
    }
}

#[inline]
fn output_number(n: i32) -> u32 {
    debug_assert!(n > 0, "face references an unnumbered slot");
    n as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxobj_blocks::{BlockRegistry, SolidAir};
    use voxobj_chunk::ChunkBuf;

    const STONE: Block = Block::new(1, 0);

    fn mesh(buf: &ChunkBuf, config: MeshConfig) -> ChunkMesher {
        let reg = BlockRegistry::builtin();
        let mut m = ChunkMesher::new(config);
        m.build(&EnclosedChunk::isolated(buf), &reg, &reg);
        m
    }

    #[test]
    fn lone_cell_gets_six_faces() {
        let mut buf = ChunkBuf::filled(ChunkCoord::new(0, 0), Block::AIR);
        buf.set_local(4, 9, 4, STONE);
        let m = mesh(&buf, MeshConfig::default());
        assert_eq!(m.faces().len(), 6);
        let mut faces: Vec<Face> = m.faces().iter().map(|f| f.face).collect();
        faces.sort_by_key(|f| f.index());
        assert_eq!(faces, Face::ALL.to_vec());
    }

    #[test]
    fn stacked_cells_merge_sides() {
        let mut buf = ChunkBuf::filled(ChunkCoord::new(0, 0), Block::AIR);
        for y in 10..15 {
            buf.set_local(0, y, 0, STONE);
        }
        let m = mesh(&buf, MeshConfig::default());
        // one top, one bottom, four merged sides
        assert_eq!(m.faces().len(), 6);
        for f in m.faces().iter().filter(|f| f.face.is_side()) {
            assert_eq!(f.reps, 5);
            assert!(f.repeating);
        }
    }

    #[test]
    fn min_y_skips_low_cells() {
        let mut buf = ChunkBuf::filled(ChunkCoord::new(0, 0), Block::AIR);
        buf.set_local(0, 2, 0, STONE);
        buf.set_local(5, 20, 5, STONE);
        let m = mesh(
            &buf,
            MeshConfig {
                min_y: 10,
                ..MeshConfig::default()
            },
        );
        assert_eq!(m.faces().len(), 6);
        assert!(m.faces().iter().all(|f| VertexPool::vertex(f.vertices[0]).y >= 20));
    }

    #[test]
    fn textures_off_leaves_texcoord_pool_empty() {
        let mut buf = ChunkBuf::filled(ChunkCoord::new(0, 0), Block::AIR);
        buf.set_local(0, 0, 0, STONE);
        let mut m = ChunkMesher::new(MeshConfig {
            textures: false,
            ..MeshConfig::default()
        });
        let obj = m.process(&EnclosedChunk::isolated(&buf), &SolidAir, &BlockRegistry::builtin());
        assert!(m.faces().iter().all(|f| f.texcoords.is_none()));
        assert_eq!(obj.texcoord_count, 0);
        assert!(obj.texcoord_text.is_empty());
    }
}
