use voxobj_blocks::TexRect;

use crate::constants::{
    ATLAS_CORNERS_ACROSS, ATLAS_PATTERNS, NON_REPEATING_SLOTS, REPEATING_CORNERS_ACROSS,
    REPEATING_DEPTHS, REPEATING_PATTERNS, REPEATING_ROWS, TEXCOORD_SLOTS,
};
use crate::fixed::push_ratio8;
use crate::pool::RefPool;

/// Pixel dimensions used to normalize texture coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub repeating_width: u32,
    pub repeating_height: u32,
}

impl AtlasLayout {
    /// Repeating image sized from the atlas pattern size: 64 patterns wide,
    /// 128 patterns deep.
    pub fn from_atlas(atlas_width: u32, atlas_height: u32) -> Self {
        let pw = atlas_width / ATLAS_PATTERNS as u32;
        let ph = atlas_height / ATLAS_PATTERNS as u32;
        Self {
            atlas_width,
            atlas_height,
            repeating_width: pw * REPEATING_PATTERNS as u32,
            repeating_height: ph * REPEATING_ROWS as u32,
        }
    }

    /// Pixel address of a non-repeating slot. Each pattern contributes its
    /// first and last pixel on each axis.
    fn atlas_pixel(&self, slot: usize) -> (u64, u64) {
        let pw = (self.atlas_width / ATLAS_PATTERNS as u32) as u64;
        let ph = (self.atlas_height / ATLAS_PATTERNS as u32) as u64;
        let (cx, cy) = (slot % ATLAS_CORNERS_ACROSS, slot / ATLAS_CORNERS_ACROSS);
        (corner_pixel(cx, pw), corner_pixel(cy, ph))
    }

    /// Pixel address of a repeating slot; `slot` is relative to the region.
    /// Depth `d > 0` samples the last pixel row of the `d`th pattern row.
    fn repeating_pixel(&self, slot: usize) -> (u64, u64) {
        let pw = (self.repeating_width / REPEATING_PATTERNS as u32) as u64;
        let ph = (self.repeating_height / REPEATING_ROWS as u32) as u64;
        let (cx, depth) = (slot % REPEATING_CORNERS_ACROSS, (slot / REPEATING_CORNERS_ACROSS) as u64);
        let y = if depth == 0 { 0 } else { (depth * ph).saturating_sub(1) };
        (corner_pixel(cx, pw), y)
    }
}

#[inline]
fn corner_pixel(corner: usize, pattern: u64) -> u64 {
    let (p, sub) = ((corner / 2) as u64, (corner % 2) as u64);
    p * pattern + sub * pattern.saturating_sub(1)
}

/// Reference-counted atlas corners for one chunk.
///
/// Slots `[0, 1024)` address the 16x16 pattern atlas at 2x2 corners per
/// pattern. Slots from 1024 on address the repeating strip: 64 patterns at
/// two corners each, one row per run depth in `[0, 128]`.
#[derive(Clone, Debug)]
pub struct TexCoordPool {
    pool: RefPool,
}

impl Default for TexCoordPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TexCoordPool {
    pub fn new() -> Self {
        Self {
            pool: RefPool::new(TEXCOORD_SLOTS),
        }
    }

    /// Slot for the corner `(x, y)` of a rectangle edge, in pattern units.
    /// Right and bottom corners step one sub-position back toward the
    /// rectangle's interior. For the repeating region `y` is the run depth
    /// and is not offset.
    pub fn index(x: usize, y: usize, x_right: bool, y_bottom: bool, repeating: bool) -> usize {
        let base = if repeating { NON_REPEATING_SLOTS } else { 0 };
        if x == 0 && x_right {
            return base;
        }
        let cx = x * 2 - usize::from(x_right);
        if repeating {
            debug_assert!(x <= REPEATING_PATTERNS && y < REPEATING_DEPTHS);
            return base + cx + REPEATING_CORNERS_ACROSS * y;
        }
        if y == 0 && y_bottom {
            return base;
        }
        debug_assert!(x <= ATLAS_PATTERNS && y <= ATLAS_PATTERNS);
        cx + ATLAS_CORNERS_ACROSS * (y * 2 - usize::from(y_bottom))
    }

    /// References one corner of `rect`. A repeating rectangle's bottom
    /// corners sit `reps` rows deep.
    pub fn use_corner(&mut self, rect: TexRect, x_right: bool, y_bottom: bool, reps: u32) -> usize {
        let x = usize::from(if x_right { rect.bottom_right.x } else { rect.top_left.x });
        let y = match (rect.repeating, y_bottom) {
            (true, true) => reps as usize,
            (true, false) => 0,
            (false, true) => usize::from(rect.bottom_right.y),
            (false, false) => usize::from(rect.top_left.y),
        };
        self.pool.acquire(Self::index(x, y, x_right, y_bottom, rect.repeating))
    }

    pub fn release(&mut self, rect: TexRect, x_right: bool, y_bottom: bool, reps: u32) -> usize {
        let slot = self.use_corner(rect, x_right, y_bottom, reps);
        self.pool.release(slot);
        self.pool.release(slot)
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

    pub fn referenced(&self) -> impl Iterator<Item = usize> + '_ {
        self.pool.referenced()
    }

    /// Normalized `(u, v)` of a slot as `(numerator, denominator)` pairs.
    pub fn ratio(slot: usize, layout: &AtlasLayout) -> ((u64, u64), (u64, u64)) {
        if slot < NON_REPEATING_SLOTS {
            let (px, py) = layout.atlas_pixel(slot);
            ((px, layout.atlas_width as u64), (py, layout.atlas_height as u64))
        } else {
            let (px, py) = layout.repeating_pixel(slot - NON_REPEATING_SLOTS);
            (
                (px, layout.repeating_width as u64),
                (py, layout.repeating_height as u64),
            )
        }
    }

    /// Appends one `vt u v` line per referenced slot in storage order and
    /// returns the count. `u` and `v` are measured from the image's top-left.
    pub fn print(&self, buf: &mut String, layout: &AtlasLayout) -> usize {
        debug_assert!(self.pool.is_numbered(), "texcoords printed before numbering");
        let mut count = 0;
        for slot in self.referenced() {
            let ((un, ud), (vn, vd)) = Self::ratio(slot, layout);
            buf.push_str("vt ");
            push_ratio8(buf, un, ud);
            buf.push(' ');
            push_ratio8(buf, vn, vd);
            buf.push('\n');
            count += 1;
        }
        count
    }
}
