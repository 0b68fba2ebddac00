//! # Chunk Module
//!
//! The `Chunk` struct: a 16x256x16 column of block data, the unit of mesh
//! regeneration and storage. Each chunk is identified by its world-space
//! corner coordinate (always a multiple of 16) and keeps non-owning links to
//! its four lateral neighbors so the mesh builders can cull faces across
//! chunk borders.
//!
//! ## Storage
//!
//! Blocks live in one flat 65,536-entry array addressed `x + 16y + 4096z`.
//! A chunk also owns its generated opaque/transparent mesh buffers. Mesh
//! buffers are freed when the chunk leaves the create radius, but the block
//! data persists for the lifetime of the store.

use cgmath::Point2;

use crate::core::{MtResource, WeakResource};

use super::block::block_face::Direction;
use super::block::BlockType;

pub mod meshing;

use meshing::MeshBuffers;

/// The lateral dimension (width and depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The vertical extent of the world; there is exactly one chunk per column.
pub const CHUNK_HEIGHT: i32 = 256;
/// The total number of blocks in a chunk.
pub const CHUNK_SIZE: usize = (CHUNK_DIMENSION * CHUNK_HEIGHT * CHUNK_DIMENSION) as usize;

/// Maps a lateral direction to its slot in the neighbor array.
///
/// # Panics
/// Panics for `YPos`/`YNeg`; the world has no vertical chunk neighbors.
fn lateral_slot(direction: Direction) -> usize {
    match direction {
        Direction::XPos => 0,
        Direction::XNeg => 1,
        Direction::ZPos => 2,
        Direction::ZNeg => 3,
        Direction::YPos | Direction::YNeg => {
            panic!("chunks have no vertical neighbors")
        }
    }
}

/// A 16x256x16 column of voxel blocks.
pub struct Chunk {
    /// World-space corner coordinate of this chunk (multiples of 16).
    origin: Point2<i32>,
    /// Flat block grid, addressed `x + 16y + 4096z`.
    blocks: Vec<BlockType>,
    /// Non-owning links to the lateral neighbors, indexed by [`lateral_slot`].
    neighbors: [Option<WeakResource<Chunk>>; 4],

    /// Production opaque mesh buffer.
    pub opaque_mesh: MeshBuffers,
    /// Production transparent mesh buffer.
    pub transparent_mesh: MeshBuffers,
    /// Index counts recorded by the mesh worker, mirroring the buffers that
    /// the render layer will bind.
    pub opaque_index_count: u32,
    pub transparent_index_count: u32,
    /// Whether mesh buffers are currently held for this chunk. Cleared when
    /// the chunk leaves the create radius.
    mesh_resident: bool,
}

impl Chunk {
    /// Creates an empty chunk at the given world-space corner.
    pub fn new(origin: Point2<i32>) -> Self {
        Chunk {
            origin,
            blocks: vec![BlockType::Empty; CHUNK_SIZE],
            neighbors: [None, None, None, None],
            opaque_mesh: MeshBuffers::new(),
            transparent_mesh: MeshBuffers::new(),
            opaque_index_count: 0,
            transparent_index_count: 0,
            mesh_resident: false,
        }
    }

    /// World-space corner coordinate of this chunk.
    pub fn origin(&self) -> Point2<i32> {
        self.origin
    }

    /// Packed map key for this chunk's corner coordinate.
    pub fn key(&self) -> i64 {
        super::terrain::to_key(self.origin.x, self.origin.y)
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        x + 16 * y + 4096 * z
    }

    /// Reads the block at chunk-local coordinates.
    ///
    /// # Panics
    /// Panics if any coordinate is out of `[0,16) x [0,256) x [0,16)`; callers
    /// inside the engine always address through validated coordinates, so an
    /// out-of-range access here is a programming error.
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> BlockType {
        assert!(x < 16 && y < 256 && z < 16, "chunk-local ({x}, {y}, {z}) out of bounds");
        self.blocks[Self::index(x, y, z)]
    }

    /// Writes the block at chunk-local coordinates.
    ///
    /// # Panics
    /// Same bounds contract as [`Chunk::block_at`].
    pub fn set_block_at(&mut self, x: usize, y: usize, z: usize, block: BlockType) {
        assert!(x < 16 && y < 256 && z < 16, "chunk-local ({x}, {y}, {z}) out of bounds");
        self.blocks[Self::index(x, y, z)] = block;
    }

    /// Signed-coordinate accessor used by the mesh builders: `y` outside
    /// `[0,256)` reads as [`BlockType::Empty`] (the world has no blocks above
    /// or below the column), while x/z keep the strict bounds contract.
    pub fn block_at_signed(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return BlockType::Empty;
        }
        self.block_at(x as usize, y as usize, z as usize)
    }

    /// Upgrades the neighbor link in the given lateral direction.
    ///
    /// Returns `None` when no neighbor was ever linked or when the neighbor
    /// has been dropped; both read as "world edge" to the mesh builders.
    pub fn neighbor(&self, direction: Direction) -> Option<MtResource<Chunk>> {
        self.neighbors[lateral_slot(direction)]
            .as_ref()
            .and_then(WeakResource::upgrade)
    }

    /// Establishes a bidirectional, non-owning neighbor relation:
    /// `b` becomes `a`'s neighbor toward `direction`, and `a` becomes `b`'s
    /// neighbor toward the opposite direction.
    pub fn link_neighbors(a: &MtResource<Chunk>, b: &MtResource<Chunk>, direction: Direction) {
        a.get_mut().neighbors[lateral_slot(direction)] = Some(b.downgrade());
        b.get_mut().neighbors[lateral_slot(direction.opposite())] = Some(a.downgrade());
    }

    /// Whether mesh buffers are currently held for this chunk.
    pub fn is_mesh_resident(&self) -> bool {
        self.mesh_resident
    }

    /// Stores completed dual-pass mesh buffers on the chunk. This is the
    /// main-thread half of the mesh pipeline; the render layer reads the
    /// buffers it needs from here.
    pub fn store_mesh(&mut self, opaque: MeshBuffers, transparent: MeshBuffers) {
        self.opaque_index_count = opaque.index_count();
        self.transparent_index_count = transparent.index_count();
        self.opaque_mesh = opaque;
        self.transparent_mesh = transparent;
        self.mesh_resident = true;
    }

    /// Releases all mesh buffers. Block data is unaffected; the chunk will
    /// be re-meshed if it comes back within the create radius.
    pub fn free_mesh_buffers(&mut self) {
        self.opaque_mesh.clear();
        self.transparent_mesh.clear();
        self.opaque_index_count = 0;
        self.transparent_index_count = 0;
        self.mesh_resident = false;
    }
}
