use serde::{Deserialize, Serialize};

// Compact cell representation: block id plus the 4-bit metadata nibble.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub data: BlockData,
}

pub type BlockId = u8;
pub type BlockData = u8;

impl Block {
    pub const AIR: Block = Block { id: 0, data: 0 };

    #[inline]
    pub const fn new(id: BlockId, data: BlockData) -> Self {
        Self { id, data }
    }

    /// Packs the block into the `id | data << 8` code used by the chunk format.
    #[inline]
    pub const fn code(self) -> u16 {
        self.id as u16 | ((self.data as u16) << 8)
    }

    #[inline]
    pub const fn from_code(code: u16) -> Self {
        Self {
            id: (code & 0xff) as u8,
            data: ((code >> 8) & 0x0f) as u8,
        }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == 0
    }
}

/// Culling classification. Ordered: a face is drawn where a cell meets a
/// strictly less opaque neighbor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opacity {
    Empty,
    Transparent,
    #[default]
    Solid,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// True for the four lateral faces.
    #[inline]
    pub fn is_side(self) -> bool {
        !matches!(self, Face::PosY | Face::NegY)
    }
}

/// A pattern cell in the 16x16 terrain atlas, `(column, row)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct PatternPos {
    pub x: u8,
    pub y: u8,
}

impl PatternPos {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl From<[u8; 2]> for PatternPos {
    fn from(v: [u8; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Texture rectangle in pattern units. `bottom_right` is exclusive, so a
/// single tile at `(c, r)` spans `(c, r)..(c+1, r+1)`.
///
/// A repeating rectangle addresses a column of the repeating strip; its
/// rows are run depths and are filled in by the texcoord pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TexRect {
    pub top_left: PatternPos,
    pub bottom_right: PatternPos,
    pub repeating: bool,
}

impl TexRect {
    #[inline]
    pub const fn tile(p: PatternPos) -> Self {
        Self {
            top_left: p,
            bottom_right: PatternPos::new(p.x + 1, p.y + 1),
            repeating: false,
        }
    }

    #[inline]
    pub const fn strip(column: u8) -> Self {
        Self {
            top_left: PatternPos::new(column, 0),
            bottom_right: PatternPos::new(column + 1, 0),
            repeating: true,
        }
    }
}
