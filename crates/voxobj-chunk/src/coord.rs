use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// `None` when the step leaves the `i32` coordinate range.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Option<Self> {
        Some(Self {
            cx: self.cx.checked_add(dx)?,
            cz: self.cz.checked_add(dz)?,
        })
    }

    /// The four lateral neighbors in `neg_x, pos_x, neg_z, pos_z` order.
    /// Neighbors past the edge of the coordinate range are `None`.
    #[inline]
    pub fn neighbors(self) -> [Option<ChunkCoord>; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// Chebyshev distance, used for square selection windows.
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> u32 {
        self.cx.abs_diff(other.cx).max(self.cz.abs_diff(other.cz))
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.cx, self.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_stop_at_the_coordinate_range() {
        let corner = ChunkCoord::new(i32::MAX, i32::MIN);
        assert_eq!(
            corner.neighbors(),
            [
                Some(ChunkCoord::new(i32::MAX - 1, i32::MIN)),
                None,
                None,
                Some(ChunkCoord::new(i32::MAX, i32::MIN + 1)),
            ]
        );
        assert_eq!(ChunkCoord::new(0, 0).offset(-2, 3), Some(ChunkCoord::new(-2, 3)));
    }
}
