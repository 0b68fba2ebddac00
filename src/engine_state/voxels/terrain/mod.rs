//! # Terrain Store
//!
//! Owns every chunk in the world, keyed by packed corner coordinate, and
//! coordinates the streaming pipeline around the player: zone generation,
//! mesh building, block edits and the redstone simulation all funnel
//! through here.
//!
//! ## Zones
//!
//! Chunks are grouped into 64x64 terrain zones (4x4 chunks). Generation is
//! zone-granular: entering a new zone's create radius instantiates and
//! fills all 16 of its chunks in one background task. Mesh residency is
//! also managed per zone as the player moves.
//!
//! ## Main-thread bookkeeping
//!
//! `dirty_chunks` is the main-thread set of chunks whose meshes are stale.
//! Worker outcomes and block edits both feed it; [`Terrain::check_thread_results`]
//! drains it into mesh tasks once per tick.

pub mod generation;

use std::collections::{HashMap, HashSet};

use cgmath::{Point2, Point3};
use log::debug;
use thiserror::Error;

use crate::core::MtResource;
use crate::engine_state::config::WorldConfig;
use crate::engine_state::redstone::{RedstoneCircuit, RedstoneError};
use crate::engine_state::task_management::task::TaskOutcome;
use crate::engine_state::task_management::TaskPool;
use crate::engine_state::voxels::block::block_face::Direction;
use crate::engine_state::voxels::block::BlockType;
use crate::engine_state::voxels::chunk::{Chunk, CHUNK_DIMENSION};
use crate::engine_state::voxels::tasks::{ChunkMeshTask, ZoneGenerationTask};

/// The lateral dimension of a terrain zone in blocks (4x4 chunks).
pub const ZONE_DIMENSION: i32 = 64;

/// Packs a pair of world coordinates into one map key. The X coordinate
/// occupies the upper 32 bits, Z the lower 32.
pub fn to_key(x: i32, z: i32) -> i64 {
    ((x as i64) << 32) | ((z as i64) & 0xffff_ffff)
}

/// Unpacks a map key back into its coordinate pair. The Z half
/// sign-extends through the `as i32` truncation.
pub fn to_coords(key: i64) -> Point2<i32> {
    Point2::new((key >> 32) as i32, key as i32)
}

fn floor_to(value: i32, step: i32) -> i32 {
    value.div_euclid(step) * step
}

/// The 64-aligned corner of the zone containing a world-space position.
pub fn zone_at(position: Point3<f32>) -> Point2<i32> {
    Point2::new(
        (position.x / ZONE_DIMENSION as f32).floor() as i32 * ZONE_DIMENSION,
        (position.z / ZONE_DIMENSION as f32).floor() as i32 * ZONE_DIMENSION,
    )
}

/// Errors from world-coordinate block access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    #[error("coordinates ({x}, {z}) have no chunk")]
    NoChunk { x: i32, z: i32 },
}

/// The seam between the terrain store and whatever renders it. The store
/// drives the two passes; implementations bind the chunk's stored buffers.
pub trait ChunkShader {
    fn draw_opaque(&mut self, chunk: &Chunk);
    fn draw_transparent(&mut self, chunk: &Chunk);
}

/// The world's chunk store and streaming coordinator.
pub struct Terrain {
    chunks: HashMap<i64, MtResource<Chunk>>,
    /// Zones whose block data has been generated (or queued; a zone enters
    /// this set when its generation task is published).
    generated_zones: HashSet<i64>,
    /// Chunks whose meshes are stale. Main-thread only.
    dirty_chunks: HashSet<i64>,
    redstone: RedstoneCircuit,
    seed: u32,
    create_radius: u32,
    draw_radius: u32,
}

impl Terrain {
    pub fn new(config: &WorldConfig) -> Self {
        Terrain {
            chunks: HashMap::new(),
            generated_zones: HashSet::new(),
            dirty_chunks: HashSet::new(),
            redstone: RedstoneCircuit::new(),
            seed: config.seed,
            create_radius: config.create_radius,
            draw_radius: config.draw_radius,
        }
    }

    /// Whether the chunk containing world-space `(x, z)` exists.
    pub fn has_chunk_at(&self, x: i32, z: i32) -> bool {
        self.chunks
            .contains_key(&to_key(floor_to(x, 16), floor_to(z, 16)))
    }

    /// Handle to the chunk containing world-space `(x, z)`.
    pub fn chunk_at(&self, x: i32, z: i32) -> Option<MtResource<Chunk>> {
        self.chunks
            .get(&to_key(floor_to(x, 16), floor_to(z, 16)))
            .cloned()
    }

    /// Reads the block at world-space coordinates. `y` outside `[0, 256)`
    /// reads as empty; a missing chunk column is an error.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        let chunk = self.chunk_at(x, z).ok_or(TerrainError::NoChunk { x, z })?;
        let block = chunk
            .get()
            .block_at_signed(x.rem_euclid(16), y, z.rem_euclid(16));
        Ok(block)
    }

    /// Writes the block at world-space coordinates.
    ///
    /// # Panics
    /// Panics if `y` is outside `[0, 256)`; there is nowhere to put the
    /// block.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), TerrainError> {
        let chunk = self.chunk_at(x, z).ok_or(TerrainError::NoChunk { x, z })?;
        chunk
            .get_mut()
            .set_block_at(x.rem_euclid(16) as usize, y as usize, z.rem_euclid(16) as usize, block);
        Ok(())
    }

    /// Marks a chunk that borders a freshly instantiated one for re-mesh,
    /// but only once its zone has block data; meshing an ungenerated
    /// neighbor would just be redone later.
    fn mark_dirty_if_generated(&mut self, chunk_x: i32, chunk_z: i32) {
        let zone_key = to_key(
            floor_to(chunk_x, ZONE_DIMENSION),
            floor_to(chunk_z, ZONE_DIMENSION),
        );
        if self.generated_zones.contains(&zone_key) {
            self.dirty_chunks.insert(to_key(chunk_x, chunk_z));
        }
    }

    /// Creates an empty chunk at a 16-aligned corner, registers it and
    /// links it with whichever lateral neighbors already exist. Existing
    /// neighbors in generated zones are marked dirty so their border faces
    /// get rebuilt against the new chunk.
    pub fn instantiate_chunk_at(&mut self, x: i32, z: i32) -> MtResource<Chunk> {
        let chunk = MtResource::new(Chunk::new(Point2::new(x, z)));
        self.chunks.insert(to_key(x, z), chunk.clone());

        for direction in Direction::LATERAL {
            let offset = direction.offset() * CHUNK_DIMENSION;
            let (nx, nz) = (x + offset.x, z + offset.z);
            if let Some(neighbor) = self.chunks.get(&to_key(nx, nz)).cloned() {
                Chunk::link_neighbors(&chunk, &neighbor, direction);
                self.mark_dirty_if_generated(nx, nz);
            }
        }
        chunk
    }

    /// Marks the chunk containing `(x, z)` and its four lateral neighbors
    /// for re-mesh. Called after block edits, which can change border
    /// faces in the adjacent chunks.
    pub fn update_chunk(&mut self, x: i32, z: i32) {
        let cx = floor_to(x, 16);
        let cz = floor_to(z, 16);
        for (kx, kz) in [(cx, cz), (cx + 16, cz), (cx - 16, cz), (cx, cz + 16), (cx, cz - 16)] {
            if self.chunks.contains_key(&to_key(kx, kz)) {
                self.dirty_chunks.insert(to_key(kx, kz));
            }
        }
    }

    /// The square of zone keys within `radius` zones of `zone` (inclusive),
    /// `(2 * radius + 1)^2` entries.
    pub fn zones_bordering(zone: Point2<i32>, radius: u32) -> HashSet<i64> {
        let span = radius as i32 * ZONE_DIMENSION;
        let mut result = HashSet::new();
        let mut i = -span;
        while i <= span {
            let mut j = -span;
            while j <= span {
                result.insert(to_key(zone.x + i, zone.y + j));
                j += ZONE_DIMENSION;
            }
            i += ZONE_DIMENSION;
        }
        result
    }

    /// Instantiates a zone's 16 chunks and publishes the task that fills
    /// their block data.
    fn spawn_zone_generation(&mut self, pool: &mut TaskPool, zone_key: i64) {
        self.generated_zones.insert(zone_key);
        let corner = to_coords(zone_key);
        let mut chunks = Vec::with_capacity(16);
        let mut x = corner.x;
        while x < corner.x + ZONE_DIMENSION {
            let mut z = corner.y;
            while z < corner.y + ZONE_DIMENSION {
                let chunk = self.instantiate_chunk_at(x, z);
                chunks.push((to_key(x, z), chunk));
                z += CHUNK_DIMENSION;
            }
            x += CHUNK_DIMENSION;
        }
        debug!("generating zone ({}, {})", corner.x, corner.y);
        pool.publish_task(Box::new(ZoneGenerationTask::new(chunks, self.seed)));
    }

    /// Streams terrain around the player: frees mesh buffers for zones
    /// that left the create radius, re-meshes generated zones that entered
    /// it, and queues generation for zones that never existed.
    pub fn expand_terrain(&mut self, pool: &mut TaskPool, position: Point3<f32>, prev_position: Point3<f32>) {
        let current = Self::zones_bordering(zone_at(position), self.create_radius);
        let previous = Self::zones_bordering(zone_at(prev_position), self.create_radius);

        for zone_key in previous.difference(&current) {
            let corner = to_coords(*zone_key);
            for key in Self::zone_chunk_keys(corner) {
                if let Some(chunk) = self.chunks.get(&key) {
                    chunk.get_mut().free_mesh_buffers();
                }
            }
        }

        for zone_key in current.iter().copied().collect::<Vec<_>>() {
            if self.generated_zones.contains(&zone_key) {
                if !previous.contains(&zone_key) {
                    let corner = to_coords(zone_key);
                    for key in Self::zone_chunk_keys(corner) {
                        if self.chunks.contains_key(&key) {
                            self.dirty_chunks.insert(key);
                        }
                    }
                }
            } else {
                self.spawn_zone_generation(pool, zone_key);
            }
        }
    }

    fn zone_chunk_keys(corner: Point2<i32>) -> Vec<i64> {
        let mut keys = Vec::with_capacity(16);
        let mut x = corner.x;
        while x < corner.x + ZONE_DIMENSION {
            let mut z = corner.y;
            while z < corner.y + ZONE_DIMENSION {
                keys.push(to_key(x, z));
                z += CHUNK_DIMENSION;
            }
            x += CHUNK_DIMENSION;
        }
        keys
    }

    /// Applies completed worker outcomes and dispatches mesh tasks for
    /// every dirty chunk. Call once per tick on the main thread.
    pub fn check_thread_results(&mut self, pool: &mut TaskPool) {
        for outcome in pool.drain_results() {
            match outcome {
                TaskOutcome::BlockData { chunk_keys } => {
                    self.dirty_chunks.extend(chunk_keys);
                }
                TaskOutcome::ChunkMesh(data) => {
                    if let Some(chunk) = self.chunks.get(&data.chunk_key) {
                        chunk.get_mut().store_mesh(data.opaque, data.transparent);
                    } else {
                        debug!("mesh arrived for unknown chunk key {}", data.chunk_key);
                    }
                }
            }
        }

        let dirty: Vec<i64> = self.dirty_chunks.drain().collect();
        for key in dirty {
            if let Some(chunk) = self.chunks.get(&key) {
                pool.publish_task(Box::new(ChunkMeshTask::new(chunk.clone())));
            }
        }
    }

    /// Number of chunks currently awaiting a mesh rebuild.
    pub fn num_dirty_chunks(&self) -> usize {
        self.dirty_chunks.len()
    }

    /// Number of chunks in the store.
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the zone containing this corner has generated block data.
    pub fn is_zone_generated(&self, zone_corner: Point2<i32>) -> bool {
        self.generated_zones
            .contains(&to_key(zone_corner.x, zone_corner.y))
    }

    /// Draws every mesh-resident chunk within the draw radius of the
    /// player: all opaque passes first, then the transparent passes sorted
    /// back to front so blending composes correctly.
    pub fn draw(&self, position: Point3<f32>, shader: &mut dyn ChunkShader) {
        let zones = Self::zones_bordering(zone_at(position), self.draw_radius);

        let mut resident = Vec::new();
        for zone_key in &zones {
            let corner = to_coords(*zone_key);
            for key in Self::zone_chunk_keys(corner) {
                if let Some(chunk) = self.chunks.get(&key) {
                    if chunk.get().is_mesh_resident() {
                        resident.push(chunk.clone());
                    }
                }
            }
        }

        for chunk in &resident {
            shader.draw_opaque(&chunk.get());
        }

        let player_chunk = Point2::new(
            (position.x / 16.0).floor() * 16.0,
            (position.z / 16.0).floor() * 16.0,
        );
        let mut transparent = resident;
        transparent.sort_by(|a, b| {
            let da = Self::distance_sq(a.get().origin(), player_chunk);
            let db = Self::distance_sq(b.get().origin(), player_chunk);
            db.total_cmp(&da)
        });
        for chunk in &transparent {
            shader.draw_transparent(&chunk.get());
        }
    }

    fn distance_sq(origin: Point2<i32>, player_chunk: Point2<f32>) -> f32 {
        let dx = origin.x as f32 - player_chunk.x;
        let dz = origin.y as f32 - player_chunk.y;
        dx * dx + dz * dz
    }

    /// Registers a redstone block with the circuit simulation.
    pub fn place_redstone_item(&mut self, position: Point3<i32>, block: BlockType) -> Result<(), RedstoneError> {
        self.redstone.place(position, block).map(|_| ())
    }

    /// Unregisters the redstone item at a position.
    pub fn remove_redstone_item(&mut self, position: Point3<i32>) -> Result<(), RedstoneError> {
        self.redstone.remove(position)
    }

    /// Whether a redstone item is registered at a position.
    pub fn has_redstone_item_at(&self, position: Point3<i32>) -> bool {
        self.redstone.item_at(position).is_some()
    }

    /// Flips the lever at a position. The block itself updates on the next
    /// redstone cycle, like every other state change.
    pub fn toggle_lever(&mut self, position: Point3<i32>) -> Result<(), RedstoneError> {
        self.redstone.toggle_lever(position)
    }

    /// Runs one redstone cycle and writes every changed item's block back
    /// into the world, marking the affected chunks for re-mesh.
    pub fn update_redstone(&mut self) {
        for (position, block) in self.redstone.update_cycle() {
            match self.set_block_at(position.x, position.y, position.z, block) {
                Ok(()) => self.update_chunk(position.x, position.z),
                Err(error) => {
                    debug!("redstone writeback skipped: {error}");
                }
            }
        }
    }
}
