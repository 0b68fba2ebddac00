//! # Block Face Module
//!
//! The six cardinal directions and the fixed face-geometry tables used by the
//! mesh builders. Full-cube blocks share `ADJACENT_FACES`; item-style blocks
//! (torches, levers, flora, cactus) have hand-authored face sets that are
//! emitted regardless of neighbor occlusion.

use cgmath::Vector3;

/// The six cardinal directions in 3D space.
///
/// The discriminants index neighbor arrays on chunks and redstone items.
/// Only the X and Z directions participate in chunk neighbor linkage; the
/// world is a single 256-tall column per (x, z), so no chunk ever has a
/// vertical neighbor.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Direction {
    XPos = 0,
    XNeg = 1,
    YPos = 2,
    YNeg = 3,
    ZPos = 4,
    ZNeg = 5,
}

impl Direction {
    /// All six directions in discriminant order.
    pub const ALL: [Direction; 6] = [
        Direction::XPos,
        Direction::XNeg,
        Direction::YPos,
        Direction::YNeg,
        Direction::ZPos,
        Direction::ZNeg,
    ];

    /// The four directions along which chunks link to their neighbors.
    pub const LATERAL: [Direction; 4] = [
        Direction::XPos,
        Direction::XNeg,
        Direction::ZPos,
        Direction::ZNeg,
    ];

    /// The direction pointing the opposite way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::XPos => Direction::XNeg,
            Direction::XNeg => Direction::XPos,
            Direction::YPos => Direction::YNeg,
            Direction::YNeg => Direction::YPos,
            Direction::ZPos => Direction::ZNeg,
            Direction::ZNeg => Direction::ZPos,
        }
    }

    /// Unit offset to the adjacent cell in this direction.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            Direction::XPos => Vector3::new(1, 0, 0),
            Direction::XNeg => Vector3::new(-1, 0, 0),
            Direction::YPos => Vector3::new(0, 1, 0),
            Direction::YNeg => Vector3::new(0, -1, 0),
            Direction::ZPos => Vector3::new(0, 0, 1),
            Direction::ZNeg => Vector3::new(0, 0, -1),
        }
    }

    /// Index into a 6-entry neighbor array.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One quad of block geometry: a facing direction, its outward normal, and
/// four corner positions in block-local space, wound counter-clockwise.
pub struct BlockFace {
    pub direction: Direction,
    pub normal: [f32; 3],
    pub corners: [[f32; 3]; 4],
}

const fn face(direction: Direction, normal: [f32; 3], corners: [[f32; 3]; 4]) -> BlockFace {
    BlockFace { direction, normal, corners }
}

/// UV corner offsets matching the corner order of every face table.
pub const UV_CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// The six faces of a full cube, one per direction.
pub static ADJACENT_FACES: [BlockFace; 6] = [
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    ),
    face(
        Direction::YPos,
        [0.0, 1.0, 0.0],
        [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    ),
    face(
        Direction::YNeg,
        [0.0, -1.0, 0.0],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    ),
    face(
        Direction::ZPos,
        [0.0, 0.0, 1.0],
        [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    ),
    face(
        Direction::ZNeg,
        [0.0, 0.0, -1.0],
        [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    ),
];

/// Two crossed pairs of inset quads forming the torch post.
pub static TORCH_FACES: [BlockFace; 4] = [
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[0.5625, 0.0, 1.0], [0.5625, 0.0, 0.0], [0.5625, 1.0, 0.0], [0.5625, 1.0, 1.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[0.4375, 0.0, 0.0], [0.4375, 0.0, 1.0], [0.4375, 1.0, 1.0], [0.4375, 1.0, 0.0]],
    ),
    face(
        Direction::ZPos,
        [0.0, 0.0, 1.0],
        [[0.0, 0.0, 0.5625], [1.0, 0.0, 0.5625], [1.0, 1.0, 0.5625], [0.0, 1.0, 0.5625]],
    ),
    face(
        Direction::ZNeg,
        [0.0, 0.0, -1.0],
        [[1.0, 0.0, 0.4375], [0.0, 0.0, 0.4375], [0.0, 1.0, 0.4375], [1.0, 1.0, 0.4375]],
    ),
];

/// Lever geometry with the handle flipped toward +X.
pub static LEVER_ON_FACES: [BlockFace; 4] = [
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[0.875, 0.0, 0.0], [0.875, 0.0, 1.0], [0.875, 1.0, 1.0], [0.875, 1.0, 0.0]],
    ),
    face(
        Direction::ZPos,
        [0.0, 0.0, 1.0],
        [[0.4375, 0.0, 0.5625], [1.4375, 0.0, 0.5625], [1.4375, 1.0, 0.5625], [0.4375, 1.0, 0.5625]],
    ),
    face(
        Direction::ZNeg,
        [0.0, 0.0, -1.0],
        [[1.4375, 0.0, 0.4375], [0.4375, 0.0, 0.4375], [0.4375, 1.0, 0.4375], [1.4375, 1.0, 0.4375]],
    ),
];

/// Lever geometry with the handle flipped toward -X.
pub static LEVER_OFF_FACES: [BlockFace; 4] = [
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[0.125, 0.0, 1.0], [0.125, 0.0, 0.0], [0.125, 1.0, 0.0], [0.125, 1.0, 1.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    ),
    face(
        Direction::ZPos,
        [0.0, 0.0, 1.0],
        [[-0.4375, 0.0, 0.5625], [0.5625, 0.0, 0.5625], [0.5625, 1.0, 0.5625], [-0.4375, 1.0, 0.5625]],
    ),
    face(
        Direction::ZNeg,
        [0.0, 0.0, -1.0],
        [[0.5625, 0.0, 0.4375], [-0.4375, 0.0, 0.4375], [-0.4375, 1.0, 0.4375], [0.5625, 1.0, 0.4375]],
    ),
];

/// Two double-sided diagonal quads crossing at the cell center.
pub static FLOWER_FACES: [BlockFace; 4] = [
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    ),
    face(
        Direction::XPos,
        [0.0, 0.0, 1.0],
        [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    ),
    face(
        Direction::XNeg,
        [0.0, 0.0, -1.0],
        [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0]],
    ),
];

/// Cactus trunk: side walls inset by one texel, double-sided, plus caps.
pub static CACTUS_FACES: [BlockFace; 10] = [
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[0.9375, 0.0, 1.0], [0.9375, 0.0, 0.0], [0.9375, 1.0, 0.0], [0.9375, 1.0, 1.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[0.9375, 0.0, 0.0], [0.9375, 0.0, 1.0], [0.9375, 1.0, 1.0], [0.9375, 1.0, 0.0]],
    ),
    face(
        Direction::XPos,
        [1.0, 0.0, 0.0],
        [[0.0625, 0.0, 1.0], [0.0625, 0.0, 0.0], [0.0625, 1.0, 0.0], [0.0625, 1.0, 1.0]],
    ),
    face(
        Direction::XNeg,
        [-1.0, 0.0, 0.0],
        [[0.0625, 0.0, 0.0], [0.0625, 0.0, 1.0], [0.0625, 1.0, 1.0], [0.0625, 1.0, 0.0]],
    ),
    face(
        Direction::YPos,
        [0.0, 1.0, 0.0],
        [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    ),
    face(
        Direction::YNeg,
        [0.0, -1.0, 0.0],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    ),
    face(
        Direction::ZPos,
        [0.0, 0.0, 1.0],
        [[0.0, 0.0, 0.9375], [1.0, 0.0, 0.9375], [1.0, 1.0, 0.9375], [0.0, 1.0, 0.9375]],
    ),
    face(
        Direction::ZNeg,
        [0.0, 0.0, -1.0],
        [[1.0, 0.0, 0.9375], [0.0, 0.0, 0.9375], [0.0, 1.0, 0.9375], [1.0, 1.0, 0.9375]],
    ),
    face(
        Direction::ZPos,
        [0.0, 0.0, 1.0],
        [[0.0, 0.0, 0.0625], [1.0, 0.0, 0.0625], [1.0, 1.0, 0.0625], [0.0, 1.0, 0.0625]],
    ),
    face(
        Direction::ZNeg,
        [0.0, 0.0, -1.0],
        [[1.0, 0.0, 0.0625], [0.0, 0.0, 0.0625], [0.0, 1.0, 0.0625], [1.0, 1.0, 0.0625]],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn cube_faces_cover_every_direction() {
        for (i, dir) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(ADJACENT_FACES[i].direction, dir);
            let n = ADJACENT_FACES[i].normal;
            let off = dir.offset();
            assert_eq!([off.x as f32, off.y as f32, off.z as f32], n);
        }
    }
}
