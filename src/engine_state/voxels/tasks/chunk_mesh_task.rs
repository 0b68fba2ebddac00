//! Background task that builds the dual-pass mesh for one chunk.

use crate::core::MtResource;
use crate::engine_state::task_management::task::{TaskOutcome, WorldTask};
use crate::engine_state::voxels::chunk::meshing::build_mesh;
use crate::engine_state::voxels::chunk::Chunk;

/// Builds opaque and transparent mesh buffers for a chunk off-thread.
///
/// Only takes read locks; block edits on the main thread block briefly at
/// worst. The buffers travel back in the outcome and are stored on the
/// chunk by the main thread.
pub struct ChunkMeshTask {
    chunk: MtResource<Chunk>,
}

impl ChunkMeshTask {
    pub fn new(chunk: MtResource<Chunk>) -> Self {
        ChunkMeshTask { chunk }
    }
}

impl WorldTask for ChunkMeshTask {
    fn process(self: Box<Self>) -> TaskOutcome {
        TaskOutcome::ChunkMesh(build_mesh(&self.chunk.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockType;
    use cgmath::Point2;

    #[test]
    fn task_meshes_the_chunk_and_carries_its_key() {
        let chunk = MtResource::new(Chunk::new(Point2::new(32, -16)));
        chunk.get_mut().set_block_at(4, 64, 4, BlockType::Stone);

        let outcome = Box::new(ChunkMeshTask::new(chunk)).process();
        match outcome {
            TaskOutcome::ChunkMesh(data) => {
                assert_eq!(data.chunk_key, crate::engine_state::voxels::terrain::to_key(32, -16));
                assert_eq!(data.opaque.index_count(), 36);
            }
            TaskOutcome::BlockData { .. } => panic!("expected mesh data"),
        }
    }
}
