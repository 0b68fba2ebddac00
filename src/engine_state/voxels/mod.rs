//! # Voxel World
//!
//! Everything block-shaped: the block catalog, chunk storage and meshing,
//! the terrain store and its generation pipeline, raycasting and edits.

pub mod block;
pub mod chunk;
pub mod edit;
pub mod raycast;
pub mod tasks;
pub mod terrain;
