//! Voxel grid raycasting for block targeting.
//!
//! Both marchers step the ray from grid interface to grid interface rather
//! than sampling at a fixed interval, so thin diagonal hits are never
//! skipped. Cells outside the instantiated world read as empty and the
//! march continues through them.

use cgmath::{InnerSpace, Point3, Vector3};

use super::block::BlockType;
use super::terrain::Terrain;

/// A successful raycast: the first non-empty cell along the ray.
#[derive(Debug, PartialEq)]
pub struct RayHit {
    /// World distance from the ray origin to the entry interface.
    pub distance: f32,
    /// Grid cell that was hit.
    pub cell: Point3<i32>,
    pub block: BlockType,
}

struct MarchState {
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_len: f32,
    curr_t: f32,
    curr_cell: Vector3<f32>,
}

impl MarchState {
    fn new(origin: Point3<f32>, ray: Vector3<f32>) -> Self {
        let max_len = ray.magnitude();
        assert!(max_len > 0.0, "cannot march a zero-length ray");
        MarchState {
            origin,
            direction: ray / max_len,
            max_len,
            curr_t: 0.0,
            curr_cell: Vector3::new(origin.x.floor(), origin.y.floor(), origin.z.floor()),
        }
    }

    /// Advances to the next grid interface and returns the cell entered.
    ///
    /// # Panics
    /// Panics if the direction has no nonzero component.
    fn step(&mut self) -> Vector3<f32> {
        let mut min_t = 3.0f32.sqrt();
        let mut interface_axis: Option<usize> = None;
        for axis in 0..3 {
            if self.direction[axis] != 0.0 {
                let mut offset = self.direction[axis].signum().max(0.0);
                // Exactly on an interface and looking negative: the next
                // intercept is one cell back, not this one.
                if self.curr_cell[axis] == self.origin[axis] && offset == 0.0 {
                    offset = -1.0;
                }
                let next_intercept = self.curr_cell[axis] + offset;
                let axis_t =
                    ((next_intercept - self.origin[axis]) / self.direction[axis]).min(self.max_len);
                if axis_t < min_t {
                    min_t = axis_t;
                    interface_axis = Some(axis);
                }
            }
        }
        let interface_axis = interface_axis
            .unwrap_or_else(|| panic!("ray direction has no nonzero component"));

        self.curr_t += min_t;
        self.origin += self.direction * min_t;
        let mut entered = Vector3::new(
            self.origin.x.floor(),
            self.origin.y.floor(),
            self.origin.z.floor(),
        );
        // Stepping in a negative direction lands on the far interface of
        // the entered cell.
        if self.direction[interface_axis] < 0.0 {
            entered[interface_axis] -= 1.0;
        }
        entered
    }

    fn distance(&self) -> f32 {
        self.curr_t.min(self.max_len)
    }
}

fn block_in(terrain: &Terrain, cell: Vector3<f32>) -> BlockType {
    terrain
        .block_at(cell.x as i32, cell.y as i32, cell.z as i32)
        .unwrap_or(BlockType::Empty)
}

fn to_cell(cell: Vector3<f32>) -> Point3<i32> {
    Point3::new(cell.x as i32, cell.y as i32, cell.z as i32)
}

/// Marches `ray` (direction scaled by reach) from `origin` and returns the
/// first non-empty cell, or `None` when the reach is exhausted.
pub fn grid_march(origin: Point3<f32>, ray: Vector3<f32>, terrain: &Terrain) -> Option<RayHit> {
    let mut state = MarchState::new(origin, ray);
    while state.curr_t < state.max_len {
        let cell = state.step();
        state.curr_cell = cell;
        let block = block_in(terrain, cell);
        if block != BlockType::Empty {
            return Some(RayHit {
                distance: state.distance(),
                cell: to_cell(cell),
                block,
            });
        }
    }
    None
}

/// Like [`grid_march`], but returns the last empty cell in front of the
/// hit. This is the cell a placed block occupies.
pub fn grid_march_block_before(
    origin: Point3<f32>,
    ray: Vector3<f32>,
    terrain: &Terrain,
) -> Option<(f32, Point3<i32>)> {
    let mut state = MarchState::new(origin, ray);
    while state.curr_t < state.max_len {
        let next_cell = state.step();
        if block_in(terrain, next_cell) != BlockType::Empty {
            return Some((state.distance(), to_cell(state.curr_cell)));
        }
        state.curr_cell = next_cell;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::WorldConfig;

    fn terrain_with_floor() -> Terrain {
        let mut terrain = Terrain::new(&WorldConfig::default());
        terrain.instantiate_chunk_at(0, 0);
        for x in 0..16 {
            for z in 0..16 {
                terrain.set_block_at(x, 100, z, BlockType::Stone).unwrap();
            }
        }
        terrain
    }

    #[test]
    fn downward_ray_hits_the_floor() {
        let terrain = terrain_with_floor();
        let hit = grid_march(
            Point3::new(8.5, 102.5, 8.5),
            Vector3::new(0.0, -3.0, 0.0),
            &terrain,
        )
        .unwrap();
        assert_eq!(hit.cell, Point3::new(8, 100, 8));
        assert_eq!(hit.block, BlockType::Stone);
        assert!((hit.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn block_before_is_the_cell_in_front_of_the_hit() {
        let terrain = terrain_with_floor();
        let (distance, cell) = grid_march_block_before(
            Point3::new(8.5, 102.5, 8.5),
            Vector3::new(0.0, -3.0, 0.0),
            &terrain,
        )
        .unwrap();
        assert_eq!(cell, Point3::new(8, 101, 8));
        assert!((distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn ray_that_exhausts_its_reach_misses() {
        let terrain = terrain_with_floor();
        let hit = grid_march(
            Point3::new(8.5, 110.5, 8.5),
            Vector3::new(0.0, -3.0, 0.0),
            &terrain,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn uninstantiated_world_reads_as_empty() {
        let terrain = Terrain::new(&WorldConfig::default());
        let hit = grid_march(
            Point3::new(500.0, 100.0, 500.0),
            Vector3::new(3.0, 0.0, 0.0),
            &terrain,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn diagonal_ray_does_not_tunnel_through_corners() {
        let terrain = terrain_with_floor();
        let hit = grid_march(
            Point3::new(4.2, 101.8, 4.2),
            Vector3::new(1.5, -1.5, 1.5),
            &terrain,
        )
        .unwrap();
        assert_eq!(hit.block, BlockType::Stone);
        assert_eq!(hit.cell.y, 100);
    }

    #[test]
    #[should_panic(expected = "zero-length ray")]
    fn zero_length_ray_panics() {
        let terrain = terrain_with_floor();
        grid_march(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0), &terrain);
    }
}
