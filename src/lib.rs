#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world engine: procedural terrain streamed in 64x64-block
//! zones around the player, background workers that generate block data and
//! build dual-pass (opaque/transparent) chunk meshes, grid-marched block
//! editing, and a per-tick redstone circuit simulation.
//!
//! ## Key Modules
//!
//! * `core` - shared-state wrappers used between the main thread and workers
//! * `engine_state` - the world itself: terrain, tasks, redstone, config
//!
//! ## Architecture
//!
//! The engine is deliberately headless. [`WorldEngine::tick`] advances
//! streaming, meshing and redstone one explicit step at a time, and
//! [`WorldEngine::draw`] hands finished chunk buffers to whatever implements
//! [`ChunkShader`]. Worker threads communicate exclusively through channels;
//! chunk data is shared via [`MtResource`] read-write handles.
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_world::{TickInput, WorldConfig, WorldEngine};
//!
//! voxel_world::init_logging();
//! let mut engine = WorldEngine::new(&WorldConfig::default());
//! let input = TickInput {
//!     player_position: Point3::new(0.0, 140.0, 0.0),
//! };
//! engine.tick(0.016, &input);
//! ```

pub mod core;
pub mod engine_state;

pub use crate::core::MtResource;
pub use engine_state::config::{ConfigError, WorldConfig};
pub use engine_state::redstone::{RedstoneCircuit, RedstoneError};
pub use engine_state::task_management::TaskPool;
pub use engine_state::voxels::block::BlockType;
pub use engine_state::voxels::edit::{EditMode, Inventory};
pub use engine_state::voxels::terrain::{ChunkShader, Terrain, TerrainError};
pub use engine_state::{TickInput, WorldEngine};

/// Initializes the `log` facade with an stdout `env_logger`, filtered by
/// `RUST_LOG`. Call once, before constructing an engine.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
}
