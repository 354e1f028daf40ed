use voxobj_chunk::{CHUNK_SX, CHUNK_SZ, ChunkCoord};

use crate::constants::{LATTICE_Y, LATTICE_Z, VERTEX_SLOTS, Y_CENTER};
use crate::fixed::push_fixed2;
use crate::pool::RefPool;

/// Integer lattice point in chunk-local coordinates, `x, z` in `[0, 16]`
/// and `y` in `[0, 128]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Vertex {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// World lattice position: chunk offset applied and `y` centered.
    #[inline]
    pub fn world(self, coord: ChunkCoord) -> (i64, i64, i64) {
        (
            self.x as i64 + coord.cx as i64 * CHUNK_SX as i64,
            self.y as i64 - Y_CENTER,
            self.z as i64 + coord.cz as i64 * CHUNK_SZ as i64,
        )
    }
}

/// Reference-counted positions for one chunk. Slot order runs fastest over
/// `y`, then `z`, then `x`, and is the order vertices are written in.
#[derive(Clone, Debug)]
pub struct VertexPool {
    pool: RefPool,
}

impl Default for VertexPool {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexPool {
    pub fn new() -> Self {
        Self {
            pool: RefPool::new(VERTEX_SLOTS),
        }
    }

    #[inline]
    pub fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(y < LATTICE_Y && z < LATTICE_Z);
        y + z * LATTICE_Y + x * LATTICE_Y * LATTICE_Z
    }

    /// Inverse of [`VertexPool::index`].
    #[inline]
    pub fn vertex(slot: usize) -> Vertex {
        let column = slot / LATTICE_Y;
        Vertex::new(column / LATTICE_Z, slot % LATTICE_Y, column % LATTICE_Z)
    }

    #[inline]
    pub fn use_vertex(&mut self, v: Vertex) -> usize {
        self.pool.acquire(Self::index(v.x, v.y, v.z))
    }

    #[inline]
    pub fn release(&mut self, v: Vertex) -> usize {
        self.pool.release(Self::index(v.x, v.y, v.z))
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn number(&mut self) -> usize {
        self.pool.number()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> i32 {
        self.pool.get(slot)
    }

    #[inline]
    pub fn refs(&self, slot: usize) -> u32 {
        self.pool.refs(slot)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Referenced lattice points in output order.
    pub fn referenced(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.pool.referenced().map(Self::vertex)
    }

    /// Appends one `v x y z` line per referenced slot and returns the count.
    pub fn print(&self, buf: &mut String, coord: ChunkCoord) -> usize {
        debug_assert!(self.pool.is_numbered(), "vertices printed before numbering");
        let mut count = 0;
        for v in self.referenced() {
            let (x, y, z) = v.world(coord);
            buf.push_str("v ");
            push_fixed2(buf, x);
            buf.push(' ');
            push_fixed2(buf, y);
            buf.push(' ');
            push_fixed2(buf, z);
            buf.push('\n');
            count += 1;
        }
        count
    }
}
