use super::registry::BlockRegistry;
use super::types::{Block, Face, TexRect};

/// Maps a cell and the geometry of one of its faces to an atlas rectangle.
///
/// `reps` is the number of cells a merged side run covers; `1` for single
/// faces. Implementations return a repeating rectangle only when `reps > 1`.
pub trait MaterialResolver {
    fn texture(&self, block: Block, face: Face, reps: u32) -> TexRect;
}

impl MaterialResolver for BlockRegistry {
    #[inline]
    fn texture(&self, block: Block, face: Face, reps: u32) -> TexRect {
        self.variant(block).texture_for(face, reps)
    }
}
