use voxobj_blocks::{Block, Face};

use crate::face::{Quad, cell_quad, far_corners};

/// A side quad waiting to be committed, possibly covering several cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingRun {
    pub block: Block,
    pub face: Face,
    pub quad: Quad,
    /// Cells covered along the column.
    pub reps: u32,
}

impl PendingRun {
    pub fn cell(block: Block, face: Face, x: usize, y: usize, z: usize) -> Self {
        Self {
            block,
            face,
            quad: cell_quad(face, x, y, z),
            reps: 1,
        }
    }

    /// Grows this run over the cell directly above it.
    fn extend(&mut self, next: &PendingRun) {
        debug_assert_eq!(self.face, next.face);
        for i in far_corners(self.face) {
            self.quad[i] = next.quad[i];
        }
        self.reps += next.reps;
    }
}

/// Merge state for one side direction within one column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Run {
    #[default]
    Empty,
    Pending(PendingRun),
}

impl Run {
    /// Feeds the next boundary cell. Returns the quad that must be
    /// committed now, if any.
    pub fn push(&mut self, candidate: PendingRun, merge: bool) -> Option<PendingRun> {
        if !merge {
            return Some(candidate);
        }
        match self {
            Run::Empty => {
                *self = Run::Pending(candidate);
                None
            }
            Run::Pending(live) if live.block == candidate.block => {
                live.extend(&candidate);
                None
            }
            Run::Pending(_) => match std::mem::replace(self, Run::Pending(candidate)) {
                Run::Pending(done) => Some(done),
                Run::Empty => None,
            },
        }
    }

    /// Ends the run, returning it if one was live.
    pub fn take(&mut self) -> Option<PendingRun> {
        match std::mem::take(self) {
            Run::Pending(done) => Some(done),
            Run::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Run::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_pool::Vertex;

    const STONE: Block = Block::new(1, 0);
    const DIRT: Block = Block::new(3, 0);

    #[test]
    fn same_block_extends() {
        let mut r = Run::Empty;
        for y in 2..6 {
            assert_eq!(r.push(PendingRun::cell(STONE, Face::PosX, 0, y, 0), true), None);
        }
        let done = r.take().unwrap();
        assert_eq!(done.reps, 4);
        assert_eq!(
            done.quad,
            [
                Vertex::new(1, 2, 0),
                Vertex::new(1, 6, 0),
                Vertex::new(1, 6, 1),
                Vertex::new(1, 2, 1)
            ]
        );
        assert!(r.is_empty());
        assert_eq!(r.take(), None);
    }

    #[test]
    fn different_block_replaces() {
        let mut r = Run::Empty;
        r.push(PendingRun::cell(STONE, Face::NegZ, 0, 0, 0), true);
        r.push(PendingRun::cell(STONE, Face::NegZ, 0, 1, 0), true);
        let flushed = r.push(PendingRun::cell(DIRT, Face::NegZ, 0, 2, 0), true).unwrap();
        assert_eq!((flushed.block, flushed.reps), (STONE, 2));
        let rest = r.take().unwrap();
        assert_eq!((rest.block, rest.reps), (DIRT, 1));
    }

    #[test]
    fn merging_off_commits_every_cell() {
        let mut r = Run::Empty;
        let c = PendingRun::cell(STONE, Face::NegX, 0, 0, 0);
        assert_eq!(r.push(c, false), Some(c));
        assert!(r.is_empty());
    }
}
