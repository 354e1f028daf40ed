//! Quad geometry per face orientation.
//!
//! Every quad winds counter-clockwise seen from outside the cell, so the
//! right-hand normal of its first three corners points along the face.

use voxobj_blocks::Face;

use crate::vertex_pool::Vertex;

pub type Quad = [Vertex; 4];

/// Lateral faces in scan order: one run accumulator each.
pub const SIDE_FACES: [Face; 4] = [Face::NegX, Face::PosX, Face::NegZ, Face::PosZ];

#[inline]
fn v(x: usize, y: usize, z: usize) -> Vertex {
    Vertex::new(x, y, z)
}

/// The face of cell `(x, y, z)` looking out through `face`.
pub fn cell_quad(face: Face, x: usize, y: usize, z: usize) -> Quad {
    match face {
        Face::NegY => [v(x, y, z), v(x + 1, y, z), v(x + 1, y, z + 1), v(x, y, z + 1)],
        Face::PosY => [
            v(x, y + 1, z),
            v(x, y + 1, z + 1),
            v(x + 1, y + 1, z + 1),
            v(x + 1, y + 1, z),
        ],
        Face::NegX => [v(x, y, z), v(x, y, z + 1), v(x, y + 1, z + 1), v(x, y + 1, z)],
        Face::PosX => [
            v(x + 1, y, z),
            v(x + 1, y + 1, z),
            v(x + 1, y + 1, z + 1),
            v(x + 1, y, z + 1),
        ],
        Face::NegZ => [v(x, y, z), v(x, y + 1, z), v(x + 1, y + 1, z), v(x + 1, y, z)],
        Face::PosZ => [
            v(x, y, z + 1),
            v(x + 1, y, z + 1),
            v(x + 1, y + 1, z + 1),
            v(x, y + 1, z + 1),
        ],
    }
}

/// Corners of a side quad at the top of the cell. A vertical run grows by
/// moving these up.
#[inline]
pub fn far_corners(face: Face) -> [usize; 2] {
    match face {
        Face::NegX | Face::PosZ => [2, 3],
        _ => [1, 2],
    }
}

/// Which texture corner `(x_right, y_bottom)` each quad corner samples.
///
/// Sides map height to texture rows with the top edge at row zero, and the
/// texture's right edge to the viewer's right. Top and bottom faces map
/// `x` across and `z` down.
pub fn tex_corners(face: Face, quad: &Quad) -> [(bool, bool); 4] {
    let (min_x, max_x) = span(quad.iter().map(|c| c.x));
    let (min_y, _) = span(quad.iter().map(|c| c.y));
    let (min_z, max_z) = span(quad.iter().map(|c| c.z));
    quad.map(|c| match face {
        Face::PosY | Face::NegY => (c.x == max_x, c.z == max_z),
        Face::NegX => (c.z == max_z, c.y == min_y),
        Face::PosX => (c.z == min_z, c.y == min_y),
        Face::NegZ => (c.x == min_x, c.y == min_y),
        Face::PosZ => (c.x == max_x, c.y == min_y),
    })
}

fn span(it: impl Iterator<Item = usize>) -> (usize, usize) {
    it.fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)))
}
