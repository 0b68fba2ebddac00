//! # Redstone Simulation
//!
//! A per-tick power propagation state machine over the redstone blocks in
//! the world. Components live in an arena keyed by [`ItemId`] handles and
//! form a graph through six-directional neighbor links, so propagation
//! never touches chunk storage directly; the per-cycle result is a list of
//! block writebacks the terrain store applies.
//!
//! ## Cycle semantics
//!
//! Every cycle re-derives the circuit from the sources:
//! 1. each torch inverts against the item directly below it,
//! 2. every wire and lamp is forced off,
//! 3. every source (torch or lever) propagates power outward,
//! 4. items whose state changed are reported as `(position, block)` pairs.
//!
//! A powered torch does not feed the wire or lamp directly below it, and a
//! torch directly above a wire or lamp never powers it. Sources only ever
//! change state through their own rules (torch inversion, lever toggles),
//! so propagation skips torch and lever neighbors.

pub mod item;

use std::collections::{HashMap, HashSet};

use cgmath::Point3;
use log::debug;
use thiserror::Error;

use crate::engine_state::voxels::block::block_face::Direction;
use crate::engine_state::voxels::block::BlockType;

pub use item::{ItemId, RedstoneItem, RedstoneKind};

/// Errors from misusing the circuit API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedstoneError {
    #[error("{0:?} is not a redstone block")]
    NotRedstone(BlockType),
    #[error("no redstone item at ({x}, {y}, {z})")]
    NoItem { x: i32, y: i32, z: i32 },
    #[error("item at ({x}, {y}, {z}) is not a lever")]
    NotALever { x: i32, y: i32, z: i32 },
}

fn position_key(position: Point3<i32>) -> (i32, i32, i32) {
    (position.x, position.y, position.z)
}

/// The redstone component graph for one world.
#[derive(Default)]
pub struct RedstoneCircuit {
    /// Arena of items; removed slots are recycled through `free_slots`.
    items: Vec<Option<RedstoneItem>>,
    free_slots: Vec<usize>,
    by_position: HashMap<(i32, i32, i32), ItemId>,
    sources: HashSet<ItemId>,
}

impl RedstoneCircuit {
    pub fn new() -> Self {
        RedstoneCircuit::default()
    }

    fn item(&self, id: ItemId) -> &RedstoneItem {
        self.items[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("stale redstone item handle {:?}", id))
    }

    fn item_mut(&mut self, id: ItemId) -> &mut RedstoneItem {
        self.items[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("stale redstone item handle {:?}", id))
    }

    /// Handle of the item at a world position, if one exists.
    pub fn item_at(&self, position: Point3<i32>) -> Option<ItemId> {
        self.by_position.get(&position_key(position)).copied()
    }

    /// Current power state of the item at a position.
    pub fn state_at(&self, position: Point3<i32>) -> Option<bool> {
        self.item_at(position).map(|id| self.item(id).state())
    }

    /// Number of live items in the circuit.
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Registers a redstone block as a circuit element and links it to any
    /// adjacent items in all six directions.
    pub fn place(&mut self, position: Point3<i32>, block: BlockType) -> Result<ItemId, RedstoneError> {
        let kind = RedstoneKind::from_block(block).ok_or(RedstoneError::NotRedstone(block))?;
        let item = RedstoneItem::new(kind, position);

        let id = match self.free_slots.pop() {
            Some(slot) => {
                self.items[slot] = Some(item);
                ItemId(slot)
            }
            None => {
                self.items.push(Some(item));
                ItemId(self.items.len() - 1)
            }
        };

        for direction in Direction::ALL {
            let offset = direction.offset();
            let adjacent = Point3::new(
                position.x + offset.x,
                position.y + offset.y,
                position.z + offset.z,
            );
            if let Some(neighbor_id) = self.item_at(adjacent) {
                self.item_mut(id).neighbors[direction.index()] = Some(neighbor_id);
                self.item_mut(neighbor_id).neighbors[direction.opposite().index()] = Some(id);
            }
        }

        if kind.is_source() {
            self.sources.insert(id);
        }
        self.by_position.insert(position_key(position), id);
        debug!("placed {kind:?} at ({}, {}, {})", position.x, position.y, position.z);
        Ok(id)
    }

    /// Removes the item at a position, unlinking it from its neighbors.
    pub fn remove(&mut self, position: Point3<i32>) -> Result<(), RedstoneError> {
        let id = self.item_at(position).ok_or(RedstoneError::NoItem {
            x: position.x,
            y: position.y,
            z: position.z,
        })?;

        let neighbors = self.item(id).neighbors;
        for (slot, neighbor_id) in neighbors.iter().enumerate() {
            if let Some(neighbor_id) = neighbor_id {
                let direction = Direction::ALL[slot];
                self.item_mut(*neighbor_id).neighbors[direction.opposite().index()] = None;
            }
        }

        self.sources.remove(&id);
        self.by_position.remove(&position_key(position));
        self.items[id.0] = None;
        self.free_slots.push(id.0);
        Ok(())
    }

    /// Flips the lever at a position. Levers only ever change state through
    /// this call; the next cycle propagates the new state.
    pub fn toggle_lever(&mut self, position: Point3<i32>) -> Result<(), RedstoneError> {
        let id = self.item_at(position).ok_or(RedstoneError::NoItem {
            x: position.x,
            y: position.y,
            z: position.z,
        })?;
        let item = self.item_mut(id);
        if item.kind != RedstoneKind::Lever {
            return Err(RedstoneError::NotALever {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }
        item.state = !item.state;
        item.state_changed = true;
        Ok(())
    }

    /// Torch inversion: a torch is powered exactly when the item directly
    /// below it is unpowered.
    fn check_below(&mut self, id: ItemId) {
        let below_state = self.item(id).neighbors[Direction::YNeg.index()]
            .map(|below| self.item(below).state())
            .unwrap_or(false);
        let new_state = !below_state;
        let item = self.item_mut(id);
        if item.state != new_state {
            item.state = new_state;
            item.state_changed = true;
        }
    }

    fn force_off(&mut self, id: ItemId) {
        let item = self.item_mut(id);
        if item.state {
            item.state_changed = true;
        }
        item.state = false;
    }

    /// Whether the conductor at `id` should be powered: any powered
    /// neighbor counts, except a torch directly above it.
    fn conductor_is_powered(&self, id: ItemId) -> bool {
        let item = self.item(id);
        for direction in Direction::ALL {
            let Some(neighbor_id) = item.neighbors[direction.index()] else {
                continue;
            };
            let neighbor = self.item(neighbor_id);
            if !neighbor.state() {
                continue;
            }
            if direction == Direction::YPos && neighbor.kind == RedstoneKind::Torch {
                continue;
            }
            return true;
        }
        false
    }

    /// Depth-first propagation. `arrival` is the direction from this item
    /// back toward the caller; propagation never reflects back that way.
    fn update(&mut self, id: ItemId, arrival: Option<Direction>) {
        match self.item(id).kind {
            RedstoneKind::Torch => {
                for direction in Direction::ALL {
                    if Some(direction) == arrival || direction == Direction::YNeg {
                        continue;
                    }
                    let Some(neighbor_id) = self.item(id).neighbors[direction.index()] else {
                        continue;
                    };
                    if self.item(neighbor_id).kind.is_source() {
                        continue;
                    }
                    self.update(neighbor_id, Some(direction.opposite()));
                }
            }
            RedstoneKind::Lever => {
                for direction in Direction::ALL {
                    if Some(direction) == arrival {
                        continue;
                    }
                    let Some(neighbor_id) = self.item(id).neighbors[direction.index()] else {
                        continue;
                    };
                    if self.item(neighbor_id).kind.is_source() {
                        continue;
                    }
                    self.update(neighbor_id, Some(direction.opposite()));
                }
            }
            RedstoneKind::Wire | RedstoneKind::Lamp => {
                let powered = self.conductor_is_powered(id);
                let item = self.item_mut(id);
                if item.state != powered {
                    item.state = powered;
                    item.state_changed = true;
                    for direction in Direction::ALL {
                        if Some(direction) == arrival {
                            continue;
                        }
                        let Some(neighbor_id) = self.item(id).neighbors[direction.index()] else {
                            continue;
                        };
                        self.update(neighbor_id, Some(direction.opposite()));
                    }
                }
            }
        }
    }

    /// Runs one full simulation cycle and returns the block writebacks for
    /// every item whose state changed.
    pub fn update_cycle(&mut self) -> Vec<(Point3<i32>, BlockType)> {
        let sources: Vec<ItemId> = self.sources.iter().copied().collect();
        for &id in &sources {
            if self.item(id).kind == RedstoneKind::Torch {
                self.check_below(id);
            }
        }

        let all_ids: Vec<ItemId> = self.by_position.values().copied().collect();
        for &id in &all_ids {
            if !self.item(id).kind.is_source() {
                self.force_off(id);
            }
        }

        for &id in &sources {
            self.update(id, None);
        }

        let mut writebacks = Vec::new();
        for id in all_ids {
            let item = self.item_mut(id);
            if item.take_state_changed() {
                let block = item.kind.block_for(item.state);
                writebacks.push((item.position, block));
            }
        }
        writebacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32, z: i32) -> Point3<i32> {
        Point3::new(x, y, z)
    }

    fn states(writebacks: &[(Point3<i32>, BlockType)]) -> HashMap<(i32, i32, i32), BlockType> {
        writebacks
            .iter()
            .map(|(position, block)| ((position.x, position.y, position.z), *block))
            .collect()
    }

    #[test]
    fn non_redstone_block_is_rejected() {
        let mut circuit = RedstoneCircuit::new();
        assert_eq!(
            circuit.place(at(0, 5, 0), BlockType::Stone),
            Err(RedstoneError::NotRedstone(BlockType::Stone))
        );
    }

    #[test]
    fn torch_powers_a_wire_run_into_a_lamp() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneTorchOn).unwrap();
        circuit.place(at(1, 5, 0), BlockType::RedstoneWireOff).unwrap();
        circuit.place(at(2, 5, 0), BlockType::RedstoneWireOff).unwrap();
        circuit.place(at(3, 5, 0), BlockType::RedstoneLampOff).unwrap();

        let changed = states(&circuit.update_cycle());
        assert_eq!(changed.get(&(1, 5, 0)), Some(&BlockType::RedstoneWireOn));
        assert_eq!(changed.get(&(2, 5, 0)), Some(&BlockType::RedstoneWireOn));
        assert_eq!(changed.get(&(3, 5, 0)), Some(&BlockType::RedstoneLampOn));
        // The torch never changed state, so it reports nothing.
        assert!(!changed.contains_key(&(0, 5, 0)));
    }

    #[test]
    fn steady_state_reports_no_changes() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneTorchOn).unwrap();
        circuit.place(at(1, 5, 0), BlockType::RedstoneWireOff).unwrap();
        circuit.update_cycle();
        // Wires are forced off and re-powered every cycle; the net state is
        // unchanged, but the off/on transition marks them changed.
        let second = circuit.update_cycle();
        assert!(second
            .iter()
            .all(|(_, block)| *block == BlockType::RedstoneWireOn));
    }

    #[test]
    fn lever_drives_and_releases_a_lamp() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneLeverOff).unwrap();
        circuit.place(at(1, 5, 0), BlockType::RedstoneLampOff).unwrap();

        assert!(circuit.update_cycle().is_empty());

        circuit.toggle_lever(at(0, 5, 0)).unwrap();
        let changed = states(&circuit.update_cycle());
        assert_eq!(changed.get(&(0, 5, 0)), Some(&BlockType::RedstoneLeverOn));
        assert_eq!(changed.get(&(1, 5, 0)), Some(&BlockType::RedstoneLampOn));

        circuit.toggle_lever(at(0, 5, 0)).unwrap();
        let changed = states(&circuit.update_cycle());
        assert_eq!(changed.get(&(0, 5, 0)), Some(&BlockType::RedstoneLeverOff));
        assert_eq!(changed.get(&(1, 5, 0)), Some(&BlockType::RedstoneLampOff));
    }

    #[test]
    fn powered_torch_above_a_wire_does_not_power_it() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneWireOff).unwrap();
        circuit.place(at(0, 6, 0), BlockType::RedstoneTorchOn).unwrap();

        let changed = circuit.update_cycle();
        assert!(changed.is_empty());
        assert_eq!(circuit.state_at(at(0, 5, 0)), Some(false));
    }

    #[test]
    fn torch_inverts_the_item_below_it() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneLeverOff).unwrap();
        circuit.place(at(0, 6, 0), BlockType::RedstoneTorchOn).unwrap();
        circuit.place(at(1, 6, 0), BlockType::RedstoneLampOff).unwrap();

        // Lever off: the torch stays lit and drives the lamp.
        let changed = states(&circuit.update_cycle());
        assert_eq!(changed.get(&(1, 6, 0)), Some(&BlockType::RedstoneLampOn));

        // Lever on: the torch inverts off and the lamp loses power.
        circuit.toggle_lever(at(0, 5, 0)).unwrap();
        let changed = states(&circuit.update_cycle());
        assert_eq!(changed.get(&(0, 6, 0)), Some(&BlockType::RedstoneTorchOff));
        assert_eq!(changed.get(&(1, 6, 0)), Some(&BlockType::RedstoneLampOff));
    }

    #[test]
    fn removing_an_item_breaks_the_circuit() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneTorchOn).unwrap();
        circuit.place(at(1, 5, 0), BlockType::RedstoneWireOff).unwrap();
        circuit.place(at(2, 5, 0), BlockType::RedstoneLampOff).unwrap();
        circuit.update_cycle();
        assert_eq!(circuit.state_at(at(2, 5, 0)), Some(true));

        circuit.remove(at(1, 5, 0)).unwrap();
        circuit.update_cycle();
        assert_eq!(circuit.state_at(at(2, 5, 0)), Some(false));
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn toggling_a_non_lever_is_an_error() {
        let mut circuit = RedstoneCircuit::new();
        circuit.place(at(0, 5, 0), BlockType::RedstoneWireOff).unwrap();
        assert_eq!(
            circuit.toggle_lever(at(0, 5, 0)),
            Err(RedstoneError::NotALever { x: 0, y: 5, z: 0 })
        );
        assert_eq!(
            circuit.toggle_lever(at(9, 9, 9)),
            Err(RedstoneError::NoItem { x: 9, y: 9, z: 9 })
        );
    }

    #[test]
    fn arena_slots_are_recycled() {
        let mut circuit = RedstoneCircuit::new();
        let first = circuit.place(at(0, 5, 0), BlockType::RedstoneWireOff).unwrap();
        circuit.remove(at(0, 5, 0)).unwrap();
        let second = circuit.place(at(4, 5, 0), BlockType::RedstoneWireOff).unwrap();
        assert_eq!(first, second);
    }
}
