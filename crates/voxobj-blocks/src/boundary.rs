use super::registry::BlockRegistry;
use super::types::{Block, Opacity};

/// Decides whether a face is emitted between a cell and one neighbor.
///
/// Evaluated from the cell's side only: a transparent cell next to a solid
/// one gets its face from the solid cell, never twice.
pub trait BoundaryLocator {
    fn is_boundary(&self, here: Block, neighbor: Block) -> bool;
}

impl BoundaryLocator for BlockRegistry {
    #[inline]
    fn is_boundary(&self, here: Block, neighbor: Block) -> bool {
        self.opacity(here) > self.opacity(neighbor)
    }
}

/// Two-level classification: every non-air id is solid.
#[derive(Copy, Clone, Debug, Default)]
pub struct SolidAir;

impl BoundaryLocator for SolidAir {
    #[inline]
    fn is_boundary(&self, here: Block, neighbor: Block) -> bool {
        let class = |b: Block| if b.is_air() { Opacity::Empty } else { Opacity::Solid };
        class(here) > class(neighbor)
    }
}
