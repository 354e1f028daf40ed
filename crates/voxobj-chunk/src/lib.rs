//! Dense chunk buffers and neighbor-aware cell lookup.
#![forbid(unsafe_code)]

use voxobj_blocks::Block;

pub mod coord;

pub use coord::ChunkCoord;

pub const CHUNK_SX: usize = 16;
pub const CHUNK_SY: usize = 128;
pub const CHUNK_SZ: usize = 16;
pub const CHUNK_CELLS: usize = CHUNK_SX * CHUNK_SY * CHUNK_SZ;

/// One chunk of cells, stored column by column: index `i` is
/// `(x, z) = (i / 128 / 16, i / 128 % 16)`, `y = i % 128`.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        (x * CHUNK_SZ + z) * CHUNK_SY + y
    }

    /// Inverse of [`ChunkBuf::idx`].
    #[inline]
    pub fn pos(i: usize) -> (usize, usize, usize) {
        let column = i / CHUNK_SY;
        (column / CHUNK_SZ, i % CHUNK_SY, column % CHUNK_SZ)
    }

    /// Wraps decoded cells. The length is a format invariant; callers
    /// validate external data before constructing a buffer.
    pub fn from_blocks(coord: ChunkCoord, blocks: Vec<Block>) -> Self {
        assert_eq!(
            blocks.len(),
            CHUNK_CELLS,
            "chunk {} must hold exactly {} cells",
            coord,
            CHUNK_CELLS
        );
        ChunkBuf { coord, blocks }
    }

    pub fn filled(coord: ChunkCoord, block: Block) -> Self {
        ChunkBuf {
            coord,
            blocks: vec![block; CHUNK_CELLS],
        }
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.blocks[Self::idx(x, y, z)] = block;
    }

    /// The vertical run of cells at `(x, z)`, bottom first.
    #[inline]
    pub fn column(&self, x: usize, z: usize) -> &[Block] {
        let start = Self::idx(x, 0, z);
        &self.blocks[start..start + CHUNK_SY]
    }

    /// True when there is nothing to mesh.
    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }
}

/// Lateral neighbor slots, in the order [`ChunkCoord::neighbors`] returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct Neighbors<'a> {
    pub neg_x: Option<&'a ChunkBuf>,
    pub pos_x: Option<&'a ChunkBuf>,
    pub neg_z: Option<&'a ChunkBuf>,
    pub pos_z: Option<&'a ChunkBuf>,
}

impl<'a> Neighbors<'a> {
    pub fn from_array(n: [Option<&'a ChunkBuf>; 4]) -> Self {
        let [neg_x, pos_x, neg_z, pos_z] = n;
        Self {
            neg_x,
            pos_x,
            neg_z,
            pos_z,
        }
    }
}

/// A chunk plus a one-cell halo. Unloaded lateral neighbors and the space
/// above the chunk read as air; the space below reads as `floor`.
#[derive(Clone, Copy, Debug)]
pub struct EnclosedChunk<'a> {
    pub chunk: &'a ChunkBuf,
    pub neighbors: Neighbors<'a>,
    pub floor: Block,
}

impl<'a> EnclosedChunk<'a> {
    pub fn new(chunk: &'a ChunkBuf, neighbors: Neighbors<'a>) -> Self {
        Self {
            chunk,
            neighbors,
            floor: Block::AIR,
        }
    }

    /// A chunk with no loaded neighbors: every edge renders.
    pub fn isolated(chunk: &'a ChunkBuf) -> Self {
        Self::new(chunk, Neighbors::default())
    }

    pub fn with_floor(mut self, floor: Block) -> Self {
        self.floor = floor;
        self
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.chunk.coord
    }

    /// Cell lookup over `x, z` in `[-1, 16]` and `y` in `[-1, 128]`.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Block {
        const SX: i32 = CHUNK_SX as i32;
        const SY: i32 = CHUNK_SY as i32;
        const SZ: i32 = CHUNK_SZ as i32;
        if y < 0 {
            return self.floor;
        }
        if y >= SY {
            return Block::AIR;
        }
        let y = y as usize;
        let edge = |n: Option<&ChunkBuf>, x: usize, z: usize| n.map_or(Block::AIR, |c| c.get_local(x, y, z));
        match (x, z) {
            (x, z) if (0..SX).contains(&x) && (0..SZ).contains(&z) => {
                self.chunk.get_local(x as usize, y, z as usize)
            }
            (-1, z) if (0..SZ).contains(&z) => edge(self.neighbors.neg_x, CHUNK_SX - 1, z as usize),
            (SX, z) if (0..SZ).contains(&z) => edge(self.neighbors.pos_x, 0, z as usize),
            (x, -1) if (0..SX).contains(&x) => edge(self.neighbors.neg_z, x as usize, CHUNK_SZ - 1),
            (x, SZ) if (0..SX).contains(&x) => edge(self.neighbors.pos_z, x as usize, 0),
            _ => Block::AIR,
        }
    }
}
