//! Shared constants for voxobj-mesh. Pool geometry and output scaling.

use voxobj_chunk::{CHUNK_SX, CHUNK_SY, CHUNK_SZ};

// Vertex lattice: one fencepost beyond the cell count on every axis
pub const LATTICE_X: usize = CHUNK_SX + 1;
pub const LATTICE_Y: usize = CHUNK_SY + 1;
pub const LATTICE_Z: usize = CHUNK_SZ + 1;
pub const VERTEX_SLOTS: usize = LATTICE_X * LATTICE_Y * LATTICE_Z;

/// Subtracted from lattice `y` so the chunk sits vertically centered.
pub const Y_CENTER: i64 = 64;
/// Lattice units per printed unit.
pub const LATTICE_SUBDIVISIONS: u64 = 20;

// Non-repeating region: 16x16 patterns, 2x2 corner sub-positions each
pub const ATLAS_PATTERNS: usize = 16;
pub const ATLAS_CORNERS_ACROSS: usize = ATLAS_PATTERNS * 2;
pub const NON_REPEATING_SLOTS: usize = ATLAS_CORNERS_ACROSS * ATLAS_CORNERS_ACROSS;

// Repeating region: 64 patterns wide, one row per run depth (fencepost included)
pub const REPEATING_PATTERNS: usize = 64;
pub const REPEATING_CORNERS_ACROSS: usize = REPEATING_PATTERNS * 2;
pub const REPEATING_DEPTHS: usize = CHUNK_SY + 1;
pub const REPEATING_SLOTS: usize = REPEATING_CORNERS_ACROSS * REPEATING_DEPTHS;

pub const TEXCOORD_SLOTS: usize = NON_REPEATING_SLOTS + REPEATING_SLOTS;

/// Pixel rows of the repeating image per unit of run depth, in patterns.
pub const REPEATING_ROWS: usize = 128;

/// Digits after the decimal point for texture coordinates.
pub const TEXCOORD_DIGITS: usize = 8;
