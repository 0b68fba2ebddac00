//! # Task System Core Types
//!
//! Defines the unit of background work and the outcomes workers hand back.
//!
//! ## Task Lifecycle
//! 1. A `WorldTask` is created and scheduled via `TaskPool::publish_task()`
//! 2. The task's `process()` method runs on a worker thread
//! 3. The worker sends the returned [`TaskOutcome`] back over its channel
//! 4. The main thread drains outcomes via `TaskPool::drain_results()` and
//!    applies them to the terrain store
//!
//! ## Thread Safety
//! - Tasks must be `Send` to be transferred to a worker
//! - Outcomes must be `Send` to be transferred back to the main thread
//! - Tasks share chunk data through [`crate::core::MtResource`] handles

use crate::engine_state::voxels::chunk::meshing::ChunkMeshData;

/// A unit of background work for the terrain pipeline.
///
/// Tasks own everything they need: shared chunk handles, coordinates, a
/// noise field. They must not block on main-thread state.
pub trait WorldTask: Send {
    /// Performs the work on a worker thread and reports what was produced.
    ///
    /// Consumes the task; a task runs exactly once.
    fn process(self: Box<Self>) -> TaskOutcome;
}

/// What a completed task produced, delivered back to the main thread.
pub enum TaskOutcome {
    /// A zone-generation task filled block data into these chunks
    /// (identified by packed corner key). The chunks now need meshes.
    BlockData { chunk_keys: Vec<i64> },
    /// A mesh task built dual-pass buffers for one chunk.
    ChunkMesh(ChunkMeshData),
}
