//! Concrete background tasks for the terrain pipeline: zone-wide block
//! generation and per-chunk mesh building.

pub mod chunk_mesh_task;
pub mod zone_generation_task;

pub use chunk_mesh_task::ChunkMeshTask;
pub use zone_generation_task::ZoneGenerationTask;
