//! # Engine State
//!
//! The top-level game state: the terrain store, the worker pool that
//! generates and meshes it, and the per-tick update loop that stitches the
//! two together.

pub mod config;
pub mod redstone;
pub mod task_management;
pub mod voxels;

use cgmath::{Point3, Vector3};

use config::WorldConfig;
use task_management::TaskPool;
use voxels::block::BlockType;
use voxels::edit::{edit_block, EditMode, Inventory};
use voxels::terrain::{ChunkShader, Terrain};

/// Everything the engine needs from the outside world for one tick.
pub struct TickInput {
    pub player_position: Point3<f32>,
}

/// The world engine: owns the terrain, the worker pool and the player's
/// inventory, and advances them one explicit step at a time.
pub struct WorldEngine {
    pub terrain: Terrain,
    pool: TaskPool,
    inventory: Inventory,
    prev_player_position: Option<Point3<f32>>,
}

impl WorldEngine {
    pub fn new(config: &WorldConfig) -> Self {
        WorldEngine {
            terrain: Terrain::new(config),
            pool: TaskPool::new(config.num_workers),
            inventory: Inventory::new(),
            prev_player_position: None,
        }
    }

    /// Advances the world one tick:
    /// 1. streams terrain around the player's current and previous zones,
    /// 2. merges completed worker results and queues stale-chunk meshes,
    /// 3. runs one redstone cycle,
    /// 4. re-dispatches any overflow-queued tasks.
    ///
    /// `_dt_seconds` is carried for callers that tie edits or physics to
    /// wall time; the streaming pipeline itself is tick-driven.
    pub fn tick(&mut self, _dt_seconds: f32, input: &TickInput) {
        let position = input.player_position;
        let prev = self.prev_player_position.unwrap_or(position);

        self.terrain.expand_terrain(&mut self.pool, position, prev);
        self.terrain.check_thread_results(&mut self.pool);
        self.terrain.update_redstone();
        self.pool.process_queued_tasks();

        self.prev_player_position = Some(position);
    }

    /// Applies one block edit along the player's view ray.
    pub fn edit_block(
        &mut self,
        origin: Point3<f32>,
        forward: Vector3<f32>,
        mode: EditMode,
        selected: BlockType,
    ) {
        edit_block(&mut self.terrain, &mut self.inventory, origin, forward, mode, selected);
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Submits the resident chunks around a position for drawing.
    pub fn draw(&self, position: Point3<f32>, shader: &mut dyn ChunkShader) {
        self.terrain.draw(position, shader);
    }
}
