//! Block placement and removal through the player's targeting ray, plus
//! the inventory counters the edit loop maintains.

use cgmath::{InnerSpace, Point3, Vector3};
use log::debug;

use super::block::BlockType;
use super::raycast::{grid_march, grid_march_block_before};
use super::terrain::Terrain;

/// How far, in world units, block edits reach.
const EDIT_REACH: f32 = 3.0;

/// Whether an edit places the selected block or removes the targeted one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditMode {
    Place,
    Remove,
}

/// Per-material block counters. Placing spends from the stack, removing
/// refunds to it; only stackable cube materials are tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub grass: i32,
    pub dirt: i32,
    pub stone: i32,
    pub water: i32,
    pub snow: i32,
    pub lava: i32,
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory {
            grass: 10,
            dirt: 10,
            stone: 10,
            water: 10,
            snow: 10,
            lava: 10,
        }
    }
}

impl Inventory {
    pub fn new() -> Self {
        Inventory::default()
    }

    fn adjust(&mut self, block: BlockType, delta: i32) {
        match block {
            BlockType::Grass => self.grass += delta,
            BlockType::Dirt => self.dirt += delta,
            BlockType::Stone => self.stone += delta,
            BlockType::Water => self.water += delta,
            BlockType::Snow => self.snow += delta,
            BlockType::Lava => self.lava += delta,
            _ => {}
        }
    }
}

/// Applies one block edit along the view ray.
///
/// Placement targets the empty cell in front of the first hit; removal
/// targets the hit cell itself. Bedrock cannot be removed, and aiming a
/// removal at a lever flips it instead of breaking it. Redstone blocks are
/// registered with (or removed from) the circuit as a side effect.
pub fn edit_block(
    terrain: &mut Terrain,
    inventory: &mut Inventory,
    origin: Point3<f32>,
    forward: Vector3<f32>,
    mode: EditMode,
    selected: BlockType,
) {
    let ray = forward.normalize() * EDIT_REACH;
    let Some(hit) = grid_march(origin, ray, terrain) else {
        return;
    };

    match mode {
        EditMode::Place => {
            let Some((_, cell)) = grid_march_block_before(origin, ray, terrain) else {
                return;
            };
            if terrain.set_block_at(cell.x, cell.y, cell.z, selected).is_err() {
                debug!("placement landed outside the instantiated world");
                return;
            }
            terrain.update_chunk(cell.x, cell.z);
            if selected.is_redstone() {
                // Infallible here: is_redstone gates the block type.
                let _ = terrain.place_redstone_item(cell, selected);
            }
            inventory.adjust(selected, -1);
        }
        EditMode::Remove => {
            if hit.block == BlockType::Bedrock {
                return;
            }
            if hit.block.is_lever() {
                let _ = terrain.toggle_lever(hit.cell);
                return;
            }
            if terrain
                .set_block_at(hit.cell.x, hit.cell.y, hit.cell.z, BlockType::Empty)
                .is_err()
            {
                return;
            }
            terrain.update_chunk(hit.cell.x, hit.cell.z);
            if hit.block.is_redstone() {
                let _ = terrain.remove_redstone_item(hit.cell);
            }
            inventory.adjust(hit.block, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::WorldConfig;

    fn world_with_floor() -> Terrain {
        let mut terrain = Terrain::new(&WorldConfig::default());
        terrain.instantiate_chunk_at(0, 0);
        for x in 0..16 {
            for z in 0..16 {
                terrain.set_block_at(x, 100, z, BlockType::Stone).unwrap();
            }
        }
        terrain
    }

    fn looking_down() -> (Point3<f32>, Vector3<f32>) {
        (Point3::new(8.5, 102.5, 8.5), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn placing_fills_the_cell_in_front_of_the_hit() {
        let mut terrain = world_with_floor();
        let mut inventory = Inventory::new();
        let (origin, forward) = looking_down();

        edit_block(&mut terrain, &mut inventory, origin, forward, EditMode::Place, BlockType::Dirt);
        assert_eq!(terrain.block_at(8, 101, 8), Ok(BlockType::Dirt));
        assert_eq!(inventory.dirt, 9);
        assert!(terrain.num_dirty_chunks() > 0);
    }

    #[test]
    fn removing_refunds_the_broken_block() {
        let mut terrain = world_with_floor();
        let mut inventory = Inventory::new();
        let (origin, forward) = looking_down();

        edit_block(&mut terrain, &mut inventory, origin, forward, EditMode::Remove, BlockType::Dirt);
        assert_eq!(terrain.block_at(8, 100, 8), Ok(BlockType::Empty));
        assert_eq!(inventory.stone, 11);
        assert_eq!(inventory.dirt, 10);
    }

    #[test]
    fn bedrock_is_indestructible() {
        let mut terrain = world_with_floor();
        terrain.set_block_at(8, 100, 8, BlockType::Bedrock).unwrap();
        let mut inventory = Inventory::new();
        let (origin, forward) = looking_down();

        edit_block(&mut terrain, &mut inventory, origin, forward, EditMode::Remove, BlockType::Dirt);
        assert_eq!(terrain.block_at(8, 100, 8), Ok(BlockType::Bedrock));
        assert_eq!(inventory, Inventory::new());
    }

    #[test]
    fn removal_aimed_at_a_lever_toggles_it() {
        let mut terrain = world_with_floor();
        terrain
            .set_block_at(8, 101, 8, BlockType::RedstoneLeverOff)
            .unwrap();
        terrain
            .place_redstone_item(Point3::new(8, 101, 8), BlockType::RedstoneLeverOff)
            .unwrap();
        let mut inventory = Inventory::new();
        let (origin, forward) = looking_down();

        edit_block(&mut terrain, &mut inventory, origin, forward, EditMode::Remove, BlockType::Dirt);
        // The lever is still in the world; its state flips on the next
        // redstone cycle.
        assert_eq!(terrain.block_at(8, 101, 8), Ok(BlockType::RedstoneLeverOff));
        terrain.update_redstone();
        assert_eq!(terrain.block_at(8, 101, 8), Ok(BlockType::RedstoneLeverOn));
    }

    #[test]
    fn placing_redstone_registers_the_item() {
        let mut terrain = world_with_floor();
        let mut inventory = Inventory::new();
        let (origin, forward) = looking_down();

        edit_block(
            &mut terrain,
            &mut inventory,
            origin,
            forward,
            EditMode::Place,
            BlockType::RedstoneTorchOn,
        );
        assert!(terrain.has_redstone_item_at(Point3::new(8, 101, 8)));
    }

    #[test]
    fn removing_redstone_unregisters_the_item() {
        let mut terrain = world_with_floor();
        terrain
            .set_block_at(8, 101, 8, BlockType::RedstoneWireOff)
            .unwrap();
        terrain
            .place_redstone_item(Point3::new(8, 101, 8), BlockType::RedstoneWireOff)
            .unwrap();
        let mut inventory = Inventory::new();
        let (origin, forward) = looking_down();

        edit_block(&mut terrain, &mut inventory, origin, forward, EditMode::Remove, BlockType::Dirt);
        assert_eq!(terrain.block_at(8, 101, 8), Ok(BlockType::Empty));
        assert!(!terrain.has_redstone_item_at(Point3::new(8, 101, 8)));
    }

    #[test]
    fn a_miss_changes_nothing() {
        let mut terrain = world_with_floor();
        let mut inventory = Inventory::new();

        edit_block(
            &mut terrain,
            &mut inventory,
            Point3::new(8.5, 120.0, 8.5),
            Vector3::new(0.0, 1.0, 0.0),
            EditMode::Place,
            BlockType::Dirt,
        );
        assert_eq!(inventory, Inventory::new());
        assert_eq!(terrain.num_dirty_chunks(), 0);
    }
}
