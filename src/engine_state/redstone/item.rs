//! Redstone circuit elements: the component kinds and the per-item state
//! tracked between simulation cycles.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockType;

/// Handle to a redstone item inside a [`super::RedstoneCircuit`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(pub(super) usize);

/// The four redstone component kinds.
///
/// Torches and levers are power sources; wires and lamps are conductors
/// whose state is recomputed every cycle from their neighborhood.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RedstoneKind {
    Torch,
    Wire,
    Lever,
    Lamp,
}

impl RedstoneKind {
    /// The component kind behind a redstone block type, or `None` for
    /// non-redstone blocks.
    pub fn from_block(block: BlockType) -> Option<RedstoneKind> {
        match block {
            BlockType::RedstoneTorchOn | BlockType::RedstoneTorchOff => Some(RedstoneKind::Torch),
            BlockType::RedstoneWireOn | BlockType::RedstoneWireOff => Some(RedstoneKind::Wire),
            BlockType::RedstoneLeverOn | BlockType::RedstoneLeverOff => Some(RedstoneKind::Lever),
            BlockType::RedstoneLampOn | BlockType::RedstoneLampOff => Some(RedstoneKind::Lamp),
            _ => None,
        }
    }

    /// The block type that renders this kind in the given power state.
    pub fn block_for(self, powered: bool) -> BlockType {
        match (self, powered) {
            (RedstoneKind::Torch, true) => BlockType::RedstoneTorchOn,
            (RedstoneKind::Torch, false) => BlockType::RedstoneTorchOff,
            (RedstoneKind::Wire, true) => BlockType::RedstoneWireOn,
            (RedstoneKind::Wire, false) => BlockType::RedstoneWireOff,
            (RedstoneKind::Lever, true) => BlockType::RedstoneLeverOn,
            (RedstoneKind::Lever, false) => BlockType::RedstoneLeverOff,
            (RedstoneKind::Lamp, true) => BlockType::RedstoneLampOn,
            (RedstoneKind::Lamp, false) => BlockType::RedstoneLampOff,
        }
    }

    /// Torches are born powered; everything else starts off and waits for
    /// the next cycle to pick up power.
    pub fn initial_state(self) -> bool {
        matches!(self, RedstoneKind::Torch)
    }

    /// Whether this kind drives propagation at the start of a cycle.
    pub fn is_source(self) -> bool {
        matches!(self, RedstoneKind::Torch | RedstoneKind::Lever)
    }
}

/// One element of the redstone graph. Neighbor links are handles into the
/// owning circuit's arena, indexed by [`Direction::index`].
///
/// [`Direction::index`]: crate::engine_state::voxels::block::block_face::Direction::index
pub struct RedstoneItem {
    pub kind: RedstoneKind,
    pub position: Point3<i32>,
    pub(super) state: bool,
    pub(super) state_changed: bool,
    pub(super) neighbors: [Option<ItemId>; 6],
}

impl RedstoneItem {
    pub fn new(kind: RedstoneKind, position: Point3<i32>) -> Self {
        RedstoneItem {
            kind,
            position,
            state: kind.initial_state(),
            state_changed: false,
            neighbors: [None; 6],
        }
    }

    /// Current power state.
    pub fn state(&self) -> bool {
        self.state
    }

    /// Reads and clears the changed flag; each state change is reported to
    /// the block writeback exactly once.
    pub fn take_state_changed(&mut self) -> bool {
        let changed = self.state_changed;
        self.state_changed = false;
        changed
    }
}
