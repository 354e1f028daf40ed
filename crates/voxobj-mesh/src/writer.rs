use std::io::{self, Write};
use std::ops::AddAssign;

use voxobj_blocks::{Block, MaterialNamer};
use voxobj_chunk::ChunkCoord;

use crate::fixed::push_uint;

/// Pool numbers of one face, 1-based within its chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NumberedFace {
    pub vertices: [u32; 4],
    pub texcoords: Option<[u32; 4]>,
}

/// Faces of one block and texture kind, in first-seen order. Groups whose
/// material names coincide are merged when written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceGroup {
    pub block: Block,
    pub repeating: bool,
    pub faces: Vec<NumberedFace>,
}

/// A meshed chunk, ready to be appended to an OBJ stream. Numbering is
/// chunk-local; the writer applies the running offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkObj {
    pub coord: ChunkCoord,
    pub vertex_text: String,
    pub vertex_count: usize,
    pub texcoord_text: String,
    pub texcoord_count: usize,
    pub groups: Vec<FaceGroup>,
}

impl ChunkObj {
    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub chunks: u64,
    pub vertices: u64,
    pub texcoords: u64,
    pub faces: u64,
}

impl AddAssign for MeshStats {
    fn add_assign(&mut self, rhs: Self) {
        self.chunks += rhs.chunks;
        self.vertices += rhs.vertices;
        self.texcoords += rhs.texcoords;
        self.faces += rhs.faces;
    }
}

/// Serial OBJ sink. Chunks are appended in the order given; face indices
/// are made absolute by adding the counts already written.
pub struct ObjWriter<'a, W: Write> {
    out: W,
    namer: &'a dyn MaterialNamer,
    vertex_offset: u64,
    texcoord_offset: u64,
    last_material: Option<String>,
    totals: MeshStats,
    line: String,
}

impl<'a, W: Write> ObjWriter<'a, W> {
    pub fn new(out: W, namer: &'a dyn MaterialNamer) -> Self {
        Self {
            out,
            namer,
            vertex_offset: 0,
            texcoord_offset: 0,
            last_material: None,
            totals: MeshStats::default(),
            line: String::with_capacity(1 << 16),
        }
    }

    pub fn write_mtllib(&mut self, file: &str) -> io::Result<()> {
        writeln!(self.out, "mtllib {}", file)
    }

    pub fn write_chunk(&mut self, obj: &ChunkObj) -> io::Result<MeshStats> {
        if obj.is_empty() {
            return Ok(MeshStats::default());
        }
        self.out.write_all(obj.vertex_text.as_bytes())?;
        self.out.write_all(obj.texcoord_text.as_bytes())?;

        let mut faces = 0u64;
        for (name, groups) in self.by_material(&obj.groups) {
            if self.last_material.as_deref() != Some(name.as_str()) {
                writeln!(self.out, "usemtl {}", name)?;
                self.last_material = Some(name);
            }
            self.line.clear();
            for face in groups.iter().flat_map(|g| &g.faces) {
                self.push_face(face);
                faces += 1;
            }
            self.out.write_all(self.line.as_bytes())?;
        }

        let stats = MeshStats {
            chunks: 1,
            vertices: obj.vertex_count as u64,
            texcoords: obj.texcoord_count as u64,
            faces,
        };
        self.vertex_offset += stats.vertices;
        self.texcoord_offset += stats.texcoords;
        self.totals += stats;
        Ok(stats)
    }

    /// Merges groups that resolve to the same material name, keeping
    /// first-seen order, and moves the material still open from the previous
    /// chunk to the front.
    fn by_material<'g>(&self, groups: &'g [FaceGroup]) -> Vec<(String, Vec<&'g FaceGroup>)> {
        let mut named: Vec<(String, Vec<&FaceGroup>)> = Vec::with_capacity(groups.len());
        for group in groups {
            let name = self.namer.name(group.block, group.repeating);
            match named.iter_mut().find(|(n, _)| *n == name) {
                Some((_, members)) => members.push(group),
                None => named.push((name, vec![group])),
            }
        }
        let open = self.last_material.as_deref();
        if let Some(pos) = named.iter().position(|(n, _)| Some(n.as_str()) == open) {
            named[..=pos].rotate_right(1);
        }
        named
    }

    fn push_face(&mut self, face: &NumberedFace) {
        let buf = &mut self.line;
        buf.push('f');
        for i in 0..4 {
            buf.push(' ');
            push_uint(buf, self.vertex_offset + face.vertices[i] as u64);
            if let Some(t) = &face.texcoords {
                buf.push('/');
                push_uint(buf, self.texcoord_offset + t[i] as u64);
            }
        }
        buf.push('\n');
    }

    pub fn totals(&self) -> MeshStats {
        self.totals
    }

    /// Flushes and hands back the sink with the running totals.
    pub fn finish(mut self) -> io::Result<(W, MeshStats)> {
        self.out.flush()?;
        Ok((self.out, self.totals))
    }
}
