//! Background task that fills block data for every chunk of one 64x64 zone.

use crate::core::MtResource;
use crate::engine_state::task_management::task::{TaskOutcome, WorldTask};
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::terrain::generation::{fill_chunk, TerrainNoise};

/// Generates terrain block data for the 16 chunks of a zone.
///
/// The chunks are already instantiated and registered in the terrain store;
/// this task only writes their block grids. The task carries the world seed
/// and builds its noise fields on the worker, so nothing but chunk handles
/// crosses the channel. The outcome lists the chunk keys so the main thread
/// can queue mesh builds for them.
pub struct ZoneGenerationTask {
    chunks: Vec<(i64, MtResource<Chunk>)>,
    seed: u32,
}

impl ZoneGenerationTask {
    pub fn new(chunks: Vec<(i64, MtResource<Chunk>)>, seed: u32) -> Self {
        ZoneGenerationTask { chunks, seed }
    }
}

impl WorldTask for ZoneGenerationTask {
    fn process(self: Box<Self>) -> TaskOutcome {
        let noise = TerrainNoise::new(self.seed);
        let mut chunk_keys = Vec::with_capacity(self.chunks.len());
        for (key, chunk) in &self.chunks {
            fill_chunk(&mut chunk.get_mut(), &noise);
            chunk_keys.push(*key);
        }
        TaskOutcome::BlockData { chunk_keys }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockType;
    use cgmath::Point2;

    #[test]
    fn task_fills_chunks_and_reports_their_keys() {
        let chunk = MtResource::new(Chunk::new(Point2::new(0, 0)));
        let task = ZoneGenerationTask::new(vec![(42, chunk.clone())], 1);
        let outcome = Box::new(task).process();

        match outcome {
            TaskOutcome::BlockData { chunk_keys } => assert_eq!(chunk_keys, vec![42]),
            TaskOutcome::ChunkMesh(_) => panic!("expected block data"),
        }
        // Below the surface clamp this is terrain or sea water, never empty.
        let generated = chunk.get();
        assert_ne!(generated.block_at(0, 130, 0), BlockType::Empty);
    }
}
