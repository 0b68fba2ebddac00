//! # Block Module
//!
//! Block type definitions and per-type render properties: transparency,
//! "draw anyway" item geometry, redstone family membership, and the texture
//! atlas lookup used when emitting mesh vertices.

use num_derive::FromPrimitive;

pub mod block_face;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data inside a chunk grid.
pub type BlockTypeSize = u8;

/// Enumerates all possible block types in the voxel world.
///
/// The first eight variants are terrain blocks. The `Redstone*` variants come
/// in on/off pairs that the redstone circuit writes back after each
/// propagation cycle. The remaining variants are decorative flora plus
/// cactus, which render with item-style geometry instead of full cubes.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An empty cell; never meshed and never occludes a neighbor.
    Empty,
    Grass,
    Dirt,
    Stone,
    /// Transparent; rendered in the sorted transparent pass.
    Water,
    Snow,
    /// Transparent; rendered in the sorted transparent pass.
    Lava,
    /// Indestructible world floor.
    Bedrock,
    RedstoneTorchOn,
    RedstoneTorchOff,
    RedstoneWireOn,
    RedstoneWireOff,
    RedstoneLeverOn,
    RedstoneLeverOff,
    RedstoneLampOn,
    RedstoneLampOff,
    SpruceSapling,
    Rose,
    Dandelion,
    RedMushroom,
    Mushroom,
    DrySprig,
    Cactus,
}

impl BlockType {
    /// Converts a stored `BlockTypeSize` back into a `BlockType`.
    ///
    /// # Panics
    /// Panics if the value does not correspond to a valid variant; chunk
    /// grids only ever hold values produced from this enum, so a bad value
    /// is a programming error.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype);
        btype_option.unwrap()
    }

    /// Water and lava render in the sorted transparent pass.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::Water | BlockType::Lava)
    }

    /// Both torch variants.
    pub fn is_torch(self) -> bool {
        matches!(self, BlockType::RedstoneTorchOn | BlockType::RedstoneTorchOff)
    }

    /// Both lever variants.
    pub fn is_lever(self) -> bool {
        matches!(self, BlockType::RedstoneLeverOn | BlockType::RedstoneLeverOff)
    }

    /// Decorative cross-quad flora.
    pub fn is_flora(self) -> bool {
        matches!(
            self,
            BlockType::SpruceSapling
                | BlockType::Rose
                | BlockType::Dandelion
                | BlockType::RedMushroom
                | BlockType::Mushroom
                | BlockType::DrySprig
        )
    }

    /// Item-style blocks that always mesh with their own fixed face set and
    /// never occlude an adjacent opaque face.
    pub fn draw_anyways(self) -> bool {
        self.is_torch() || self.is_flora() || self.is_lever() || self == BlockType::Cactus
    }

    /// Membership in the redstone block family (torch, wire, lever, lamp,
    /// on or off). Placing one of these also creates a redstone item;
    /// removing it must remove the item.
    pub fn is_redstone(self) -> bool {
        matches!(
            self,
            BlockType::RedstoneTorchOn
                | BlockType::RedstoneTorchOff
                | BlockType::RedstoneWireOn
                | BlockType::RedstoneWireOff
                | BlockType::RedstoneLeverOn
                | BlockType::RedstoneLeverOff
                | BlockType::RedstoneLampOn
                | BlockType::RedstoneLampOff
        )
    }
}

/// One cell of the 16x16 texture atlas plus the animation flag carried in
/// the vertex stream (water and lava scroll in the shader).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasTile {
    /// Atlas cell coordinates; the mesher scales by 1/16 when emitting UVs.
    pub base: [f32; 2],
    /// Set for blocks whose texture is animated by the render layer.
    pub animated: bool,
}

impl AtlasTile {
    const fn fixed(x: f32, y: f32) -> Self {
        AtlasTile { base: [x, y], animated: false }
    }

    const fn animated(x: f32, y: f32) -> Self {
        AtlasTile { base: [x, y], animated: true }
    }
}

/// Looks up the atlas tile for a block face.
///
/// `normal_y` distinguishes top (+1), bottom (-1), and side (0) faces for
/// the block types whose textures differ per orientation (grass, cactus).
/// Unhandled combinations fall back to the debug tile.
pub fn atlas_tile(block: BlockType, normal_y: f32) -> AtlasTile {
    match block {
        BlockType::Grass => {
            if normal_y == 1.0 {
                AtlasTile::fixed(8.0, 13.0)
            } else if normal_y == -1.0 {
                AtlasTile::fixed(2.0, 15.0)
            } else {
                AtlasTile::fixed(3.0, 15.0)
            }
        }
        BlockType::Dirt => AtlasTile::fixed(2.0, 15.0),
        BlockType::Stone => AtlasTile::fixed(1.0, 15.0),
        BlockType::Water => AtlasTile::animated(13.0, 3.0),
        BlockType::Lava => AtlasTile::animated(13.0, 1.0),
        BlockType::Bedrock => AtlasTile::fixed(1.0, 14.0),
        BlockType::Snow => AtlasTile::fixed(2.0, 11.0),
        BlockType::RedstoneTorchOn => AtlasTile::fixed(3.0, 9.0),
        BlockType::RedstoneTorchOff => AtlasTile::fixed(3.0, 8.0),
        BlockType::RedstoneLeverOn | BlockType::RedstoneLeverOff => AtlasTile::fixed(0.0, 9.0),
        BlockType::RedstoneLampOn => AtlasTile::fixed(4.0, 2.0),
        BlockType::RedstoneLampOff => AtlasTile::fixed(3.0, 2.0),
        BlockType::RedstoneWireOn => AtlasTile::fixed(1.0, 7.0),
        BlockType::RedstoneWireOff => AtlasTile::fixed(1.0, 1.0),
        BlockType::SpruceSapling => AtlasTile::fixed(15.0, 12.0),
        BlockType::Rose => AtlasTile::fixed(12.0, 15.0),
        BlockType::Dandelion => AtlasTile::fixed(13.0, 15.0),
        BlockType::RedMushroom => AtlasTile::fixed(12.0, 14.0),
        BlockType::Mushroom => AtlasTile::fixed(13.0, 14.0),
        BlockType::DrySprig => AtlasTile::fixed(7.0, 12.0),
        BlockType::Cactus => {
            if normal_y == 1.0 || normal_y == -1.0 {
                AtlasTile::fixed(5.0, 11.0)
            } else {
                AtlasTile::fixed(6.0, 11.0)
            }
        }
        // Debug purple for anything without an assigned tile.
        _ => AtlasTile::fixed(7.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trip() {
        for raw in 0..=(BlockType::Cactus as BlockTypeSize) {
            let block = BlockType::from_int(raw);
            assert_eq!(block as BlockTypeSize, raw);
        }
    }

    #[test]
    fn transparency_and_item_flags() {
        assert!(BlockType::Water.is_transparent());
        assert!(BlockType::Lava.is_transparent());
        assert!(!BlockType::Stone.is_transparent());

        assert!(BlockType::RedstoneTorchOff.draw_anyways());
        assert!(BlockType::Rose.draw_anyways());
        assert!(BlockType::Cactus.draw_anyways());
        assert!(!BlockType::Water.draw_anyways());

        assert!(BlockType::RedstoneLampOn.is_redstone());
        assert!(!BlockType::Grass.is_redstone());
    }

    #[test]
    fn grass_tiles_differ_per_orientation() {
        let top = atlas_tile(BlockType::Grass, 1.0);
        let bottom = atlas_tile(BlockType::Grass, -1.0);
        let side = atlas_tile(BlockType::Grass, 0.0);
        assert_ne!(top, bottom);
        assert_ne!(top, side);
        assert!(atlas_tile(BlockType::Water, 0.0).animated);
        assert!(!side.animated);
    }
}
