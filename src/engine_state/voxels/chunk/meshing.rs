//! # Chunk Meshing
//!
//! Translates a chunk's block grid into interleaved vertex/index buffers.
//! Two builders are provided:
//!
//! * [`build_mesh_single`]: the legacy single-buffer pass that emits a face
//!   only against truly empty cells.
//! * [`build_mesh`]: the production dual-pass builder that routes geometry
//!   into separate opaque and transparent buffers so the render layer can
//!   draw all opaque geometry first and blend the transparent pass on top.
//!
//! Face culling consults neighboring chunks through the chunk's lateral
//! links; an unloaded neighbor reads as empty, so border faces at the edge
//! of the generated world are always emitted.

use bytemuck::{Pod, Zeroable};

use super::super::block::block_face::{
    BlockFace, Direction, ADJACENT_FACES, CACTUS_FACES, FLOWER_FACES, LEVER_OFF_FACES,
    LEVER_ON_FACES, TORCH_FACES, UV_CORNERS,
};
use super::super::block::{atlas_tile, BlockType};
use super::{Chunk, CHUNK_DIMENSION, CHUNK_HEIGHT};

/// One interleaved mesh vertex: position, normal, atlas UV and an animation
/// flag the shader uses to scroll water and lava tiles.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 4],
    pub normal: [f32; 4],
    pub uv: [f32; 2],
    /// 1.0 for animated tiles (water, lava), 0.0 otherwise.
    pub animated: f32,
    _pad: f32,
}

/// The number of atlas tiles along each axis of the texture atlas.
const ATLAS_TILES_PER_SIDE: f32 = 16.0;

/// An interleaved vertex buffer with its index buffer.
#[derive(Default)]
pub struct MeshBuffers {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        MeshBuffers::default()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends one quad: four vertices for `face` at block-local position
    /// `(x, y, z)`, offset into world space by the chunk origin, plus the
    /// six indices of its two triangles.
    fn push_face(&mut self, face: &BlockFace, block: BlockType, x: i32, y: i32, z: i32, origin_x: i32, origin_z: i32) {
        let tile = atlas_tile(block, face.normal[1]);
        let base = self.vertices.len() as u32;
        for (corner, uv) in face.corners.iter().zip(UV_CORNERS.iter()) {
            self.vertices.push(MeshVertex {
                position: [
                    (origin_x + x) as f32 + corner[0],
                    y as f32 + corner[1],
                    (origin_z + z) as f32 + corner[2],
                    1.0,
                ],
                normal: [face.normal[0], face.normal[1], face.normal[2], 0.0],
                uv: [
                    (tile.base[0] + uv[0]) / ATLAS_TILES_PER_SIDE,
                    (tile.base[1] + uv[1]) / ATLAS_TILES_PER_SIDE,
                ],
                animated: if tile.animated { 1.0 } else { 0.0 },
                _pad: 0.0,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Completed dual-pass mesh buffers for one chunk, produced off-thread and
/// handed back to the terrain store by key.
pub struct ChunkMeshData {
    pub chunk_key: i64,
    pub opaque: MeshBuffers,
    pub transparent: MeshBuffers,
}

/// Which buffer, if any, a face between `current` and its neighbor goes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaceVisibility {
    /// The face is fully occluded; emit nothing.
    Hidden,
    /// Emit into the opaque buffer.
    Opaque,
    /// Emit into the transparent buffer.
    Transparent,
}

/// Classifies the face of `current` that borders `adjacent`.
///
/// Transparent blocks (water, lava) only show faces against empty cells, so
/// two adjacent water blocks share no interior geometry. Opaque blocks show
/// faces against empty cells and against anything see-through, which keeps
/// the terrain visible behind a water surface.
pub fn face_visibility(current: BlockType, adjacent: BlockType) -> FaceVisibility {
    if current.is_transparent() {
        if adjacent == BlockType::Empty {
            FaceVisibility::Transparent
        } else {
            FaceVisibility::Hidden
        }
    } else if adjacent == BlockType::Empty || adjacent.is_transparent() || adjacent.draw_anyways() {
        FaceVisibility::Opaque
    } else {
        FaceVisibility::Hidden
    }
}

/// Reads the block one step from `(x, y, z)` toward `direction`, following
/// the chunk's lateral neighbor link when the step crosses a chunk border.
/// Coordinates into the neighbor wrap modulo the chunk dimensions. A missing
/// or unloaded neighbor reads as [`BlockType::Empty`].
pub fn adjacent_block(chunk: &Chunk, x: i32, y: i32, z: i32, direction: Direction) -> BlockType {
    let offset = direction.offset();
    let (nx, ny, nz) = (x + offset.x, y + offset.y, z + offset.z);
    let crosses = !(0..CHUNK_DIMENSION).contains(&nx) || !(0..CHUNK_DIMENSION).contains(&nz);
    if !crosses {
        return chunk.block_at_signed(nx, ny, nz);
    }
    match chunk.neighbor(direction) {
        None => BlockType::Empty,
        Some(neighbor) => neighbor.get().block_at_signed(
            nx.rem_euclid(CHUNK_DIMENSION),
            ny.rem_euclid(CHUNK_HEIGHT),
            nz.rem_euclid(CHUNK_DIMENSION),
        ),
    }
}

/// Emits a fixed set of free-standing faces (torches, levers, flora,
/// cacti). Item geometry is never culled and always lands in the
/// transparent buffers so it blends correctly with water behind it.
fn push_item_faces(buffers: &mut MeshBuffers, faces: &[BlockFace], block: BlockType, x: i32, y: i32, z: i32, origin_x: i32, origin_z: i32) {
    for face in faces {
        buffers.push_face(face, block, x, y, z, origin_x, origin_z);
    }
}

/// The legacy single-buffer mesh pass: a face is emitted for every
/// non-empty block whose neighbor in that direction is empty.
pub fn build_mesh_single(chunk: &Chunk) -> MeshBuffers {
    let origin = chunk.origin();
    let mut buffers = MeshBuffers::new();
    for z in 0..CHUNK_DIMENSION {
        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_DIMENSION {
                let current = chunk.block_at_signed(x, y, z);
                if current == BlockType::Empty {
                    continue;
                }
                for face in ADJACENT_FACES.iter() {
                    if adjacent_block(chunk, x, y, z, face.direction) == BlockType::Empty {
                        buffers.push_face(face, current, x, y, z, origin.x, origin.y);
                    }
                }
            }
        }
    }
    buffers
}

/// The production dual-pass mesh builder.
///
/// Cube blocks are culled per face via [`face_visibility`] and routed into
/// the opaque or transparent buffer. Item blocks emit their full fixed face
/// sets into the transparent buffers unconditionally.
pub fn build_mesh(chunk: &Chunk) -> ChunkMeshData {
    let origin = chunk.origin();
    let mut opaque = MeshBuffers::new();
    let mut transparent = MeshBuffers::new();
    for z in 0..CHUNK_DIMENSION {
        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_DIMENSION {
                let current = chunk.block_at_signed(x, y, z);
                if current == BlockType::Empty {
                    continue;
                }
                if current.is_torch() {
                    push_item_faces(&mut transparent, &TORCH_FACES, current, x, y, z, origin.x, origin.y);
                } else if current == BlockType::RedstoneLeverOff {
                    push_item_faces(&mut transparent, &LEVER_OFF_FACES, current, x, y, z, origin.x, origin.y);
                } else if current == BlockType::RedstoneLeverOn {
                    push_item_faces(&mut transparent, &LEVER_ON_FACES, current, x, y, z, origin.x, origin.y);
                } else if current == BlockType::Cactus {
                    push_item_faces(&mut transparent, &CACTUS_FACES, current, x, y, z, origin.x, origin.y);
                } else if current.is_flora() {
                    push_item_faces(&mut transparent, &FLOWER_FACES, current, x, y, z, origin.x, origin.y);
                } else {
                    for face in ADJACENT_FACES.iter() {
                        let adjacent = adjacent_block(chunk, x, y, z, face.direction);
                        match face_visibility(current, adjacent) {
                            FaceVisibility::Hidden => {}
                            FaceVisibility::Opaque => {
                                opaque.push_face(face, current, x, y, z, origin.x, origin.y)
                            }
                            FaceVisibility::Transparent => {
                                transparent.push_face(face, current, x, y, z, origin.x, origin.y)
                            }
                        }
                    }
                }
            }
        }
    }
    ChunkMeshData {
        chunk_key: chunk.key(),
        opaque,
        transparent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MtResource;
    use cgmath::Point2;

    fn chunk_at(x: i32, z: i32) -> Chunk {
        Chunk::new(Point2::new(x, z))
    }

    #[test]
    fn visibility_between_opaque_blocks() {
        assert_eq!(
            face_visibility(BlockType::Stone, BlockType::Empty),
            FaceVisibility::Opaque
        );
        assert_eq!(
            face_visibility(BlockType::Stone, BlockType::Dirt),
            FaceVisibility::Hidden
        );
    }

    #[test]
    fn opaque_face_shows_through_water_and_items() {
        assert_eq!(
            face_visibility(BlockType::Stone, BlockType::Water),
            FaceVisibility::Opaque
        );
        assert_eq!(
            face_visibility(BlockType::Stone, BlockType::RedstoneTorchOn),
            FaceVisibility::Opaque
        );
    }

    #[test]
    fn water_only_faces_empty_cells() {
        assert_eq!(
            face_visibility(BlockType::Water, BlockType::Empty),
            FaceVisibility::Transparent
        );
        assert_eq!(
            face_visibility(BlockType::Water, BlockType::Water),
            FaceVisibility::Hidden
        );
        assert_eq!(
            face_visibility(BlockType::Water, BlockType::Stone),
            FaceVisibility::Hidden
        );
    }

    #[test]
    fn lone_block_emits_six_faces() {
        let mut chunk = chunk_at(0, 0);
        chunk.set_block_at(8, 100, 8, BlockType::Grass);
        let mesh = build_mesh(&chunk);
        assert_eq!(mesh.opaque.vertices.len(), 24);
        assert_eq!(mesh.opaque.index_count(), 36);
        assert!(mesh.transparent.is_empty());
    }

    #[test]
    fn buried_block_emits_nothing() {
        let mut chunk = chunk_at(0, 0);
        for (x, y, z) in [
            (8, 100, 8),
            (9, 100, 8),
            (7, 100, 8),
            (8, 101, 8),
            (8, 99, 8),
            (8, 100, 9),
            (8, 100, 7),
        ] {
            chunk.set_block_at(x, y, z, BlockType::Stone);
        }
        let mesh = build_mesh(&chunk);
        // The center block contributes no faces: 6 exposed neighbors * 5
        // visible faces each.
        assert_eq!(mesh.opaque.index_count(), 6 * 5 * 6);
    }

    #[test]
    fn torch_always_emits_four_transparent_faces() {
        let mut chunk = chunk_at(0, 0);
        chunk.set_block_at(4, 60, 4, BlockType::RedstoneTorchOn);
        let mesh = build_mesh(&chunk);
        assert!(mesh.opaque.is_empty());
        assert_eq!(mesh.transparent.vertices.len(), 16);
        assert_eq!(mesh.transparent.index_count(), 24);
    }

    #[test]
    fn cactus_emits_ten_faces() {
        let mut chunk = chunk_at(0, 0);
        chunk.set_block_at(4, 60, 4, BlockType::Cactus);
        let mesh = build_mesh(&chunk);
        assert_eq!(mesh.transparent.vertices.len(), 40);
    }

    #[test]
    fn missing_neighbor_reads_as_empty() {
        let mut chunk = chunk_at(0, 0);
        chunk.set_block_at(15, 100, 8, BlockType::Stone);
        assert_eq!(
            adjacent_block(&chunk, 15, 100, 8, Direction::XPos),
            BlockType::Empty
        );
    }

    #[test]
    fn border_lookup_wraps_into_linked_neighbor() {
        let a = MtResource::new(chunk_at(0, 0));
        let b = MtResource::new(chunk_at(16, 0));
        Chunk::link_neighbors(&a, &b, Direction::XPos);
        b.get_mut().set_block_at(0, 100, 8, BlockType::Stone);

        let a_read = a.get();
        assert_eq!(
            adjacent_block(&a_read, 15, 100, 8, Direction::XPos),
            BlockType::Stone
        );
        drop(a_read);

        // With the neighbor occluding it, the border face disappears.
        a.get_mut().set_block_at(15, 100, 8, BlockType::Stone);
        let mesh = build_mesh(&a.get());
        let faces = mesh.opaque.index_count() / 6;
        assert_eq!(faces, 5);
    }

    #[test]
    fn legacy_pass_ignores_transparency_split() {
        let mut chunk = chunk_at(0, 0);
        chunk.set_block_at(3, 50, 3, BlockType::Water);
        let buffers = build_mesh_single(&chunk);
        assert_eq!(buffers.index_count(), 36);
    }

    #[test]
    fn vertex_uvs_land_inside_the_atlas() {
        let mut chunk = chunk_at(0, 0);
        chunk.set_block_at(0, 10, 0, BlockType::Grass);
        let mesh = build_mesh(&chunk);
        for vertex in &mesh.opaque.vertices {
            assert!((0.0..=1.0).contains(&vertex.uv[0]));
            assert!((0.0..=1.0).contains(&vertex.uv[1]));
        }
    }
}
