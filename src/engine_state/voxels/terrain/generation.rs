//! # Terrain Generation
//!
//! Procedural block-data generation for newly instantiated chunks. All
//! noise fields come from the `noise` crate: an fbm-layered Perlin field
//! shapes the mountain biome, a Worley distance field shapes the rolling
//! grasslands, a low-frequency Perlin field blends between the two, and a
//! 3D Perlin field carves the cave layer.
//!
//! Generation is deterministic: the same seed and column coordinates always
//! produce the same blocks, so workers can fill chunks in any order.

use noise::core::worley::ReturnType;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin, Worley};

use super::super::block::BlockType;
use super::super::chunk::{Chunk, CHUNK_DIMENSION};

/// Depth of the indestructible bedrock layer.
pub const BEDROCK_LEVEL: i32 = 50;
/// Caves are carved where the 3D noise field is negative, within this band.
const CAVE_BAND: std::ops::RangeInclusive<i32> = 50..=128;
/// Water fills empty cells from sea floor up to (exclusive) this height.
const SEA_LEVEL: i32 = 139;
const SEA_FLOOR: i32 = 128;

/// The bundled noise fields that drive terrain generation.
pub struct TerrainNoise {
    mountain: Fbm<Perlin>,
    grassland: Worley,
    biome: Perlin,
    cave: Perlin,
}

fn remap(value: f64, from_a: f64, from_b: f64, to_a: f64, to_b: f64) -> f64 {
    (value - from_a) / (from_b - from_a) * (to_b - to_a) + to_a
}

fn smoothstep(edge_a: f64, edge_b: f64, value: f64) -> f64 {
    let t = ((value - edge_a) / (edge_b - edge_a)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl TerrainNoise {
    pub fn new(seed: u32) -> Self {
        TerrainNoise {
            mountain: Fbm::<Perlin>::new(seed)
                .set_octaves(4)
                .set_frequency(0.015)
                .set_persistence(0.5),
            grassland: Worley::new(seed).set_return_type(ReturnType::Distance),
            biome: Perlin::new(seed.wrapping_add(1)),
            cave: Perlin::new(seed.wrapping_add(2)),
        }
    }

    /// Mountain surface height: sharp shard-like peaks. The fbm output is
    /// remapped to `[0, 1]`, banded through a smoothstep and raised to a
    /// power so only the strongest peaks reach full height.
    pub fn mountain_height(&self, world_x: i32, world_z: i32) -> i32 {
        let raw = self.mountain.get([world_x as f64, world_z as f64]);
        let shaped = smoothstep(0.15, 0.85, remap(raw, -1.0, 1.0, 0.0, 1.0)).powf(2.18);
        (shaped * 145.0) as i32 + 127
    }

    /// Grassland surface height: gentle cellular hills from the Worley
    /// distance field.
    pub fn grassland_height(&self, world_x: i32, world_z: i32) -> i32 {
        let raw = self
            .grassland
            .get([world_x as f64 / 64.0, world_z as f64 / 64.0]);
        let worley = remap(raw, -1.0, 1.0, 0.0, 1.0);
        129 + (worley * 127.0 / 1.5) as i32 + 5
    }

    /// Biome blend factor in `[0, 1]`; values below 0.7 read as grassland,
    /// the rest as mountain.
    pub fn biome_blend(&self, world_x: i32, world_z: i32) -> f64 {
        let raw = self
            .biome
            .get([world_x as f64 / 128.0, world_z as f64 / 128.0]);
        smoothstep(0.4, 0.6, remap(raw, -1.0, 1.0, 0.0, 1.0))
    }

    fn cave_field(&self, world_x: i32, y: i32, world_z: i32) -> f64 {
        self.cave.get([
            world_x as f64 / 38.0,
            y as f64 / 68.0,
            world_z as f64 / 48.0,
        ])
    }
}

/// Fills one `(x, z)` column of a chunk with procedural terrain.
///
/// Surface height is the biome-blended mix of the mountain and grassland
/// fields, clamped to at least 130 so the surface always clears sea level.
/// After the surface pass, the bedrock block is placed, the cave field
/// carves the underground band, and water fills whatever the carve left
/// empty between the sea floor and sea level.
pub fn fill_column(chunk: &mut Chunk, x: usize, z: usize, noise: &TerrainNoise) {
    let origin = chunk.origin();
    let world_x = origin.x + x as i32;
    let world_z = origin.y + z as i32;

    let mountain = noise.mountain_height(world_x, world_z);
    let grass = noise.grassland_height(world_x, world_z);
    let blend = noise.biome_blend(world_x, world_z);
    let surface = (grass as f64 + (mountain - grass) as f64 * blend) as i32;
    // Keep the surface above sea level and inside the chunk's vertical range.
    let surface = surface.clamp(130, 255);

    if blend < 0.7 {
        for y in 1..surface {
            let block = if y == surface - 1 && y > 139 {
                BlockType::Grass
            } else if y <= 128 {
                BlockType::Stone
            } else {
                BlockType::Dirt
            };
            chunk.set_block_at(x, y as usize, z, block);
        }
    } else {
        for y in 1..surface {
            let block = if y == surface - 1 && surface > 200 {
                BlockType::Snow
            } else {
                BlockType::Stone
            };
            chunk.set_block_at(x, y as usize, z, block);
        }
    }

    chunk.set_block_at(x, BEDROCK_LEVEL as usize, z, BlockType::Bedrock);
    for y in CAVE_BAND {
        if noise.cave_field(world_x, y, world_z) < 0.0 {
            let carved = if y < 25 {
                BlockType::Lava
            } else {
                BlockType::Empty
            };
            chunk.set_block_at(x, y as usize, z, carved);
        }
    }

    for y in SEA_FLOOR..SEA_LEVEL {
        if chunk.block_at(x, y as usize, z) == BlockType::Empty {
            chunk.set_block_at(x, y as usize, z, BlockType::Water);
        }
    }
}

/// Fills every column of a chunk. This is the work a generation task
/// performs per chunk off the main thread.
pub fn fill_chunk(chunk: &mut Chunk, noise: &TerrainNoise) {
    for x in 0..CHUNK_DIMENSION as usize {
        for z in 0..CHUNK_DIMENSION as usize {
            fill_column(chunk, x, z, noise);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    fn generate(seed: u32, corner_x: i32, corner_z: i32) -> Chunk {
        let noise = TerrainNoise::new(seed);
        let mut chunk = Chunk::new(Point2::new(corner_x, corner_z));
        fill_chunk(&mut chunk, &noise);
        chunk
    }

    fn chunks_equal(a: &Chunk, b: &Chunk) -> bool {
        for x in 0..16 {
            for y in 0..256 {
                for z in 0..16 {
                    if a.block_at(x, y, z) != b.block_at(x, y, z) {
                        return false;
                    }
                }
            }
        }
        true
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(7, 32, -48);
        let b = generate(7, 32, -48);
        assert!(chunks_equal(&a, &b));
    }

    #[test]
    fn distinct_chunks_differ() {
        let a = generate(7, 0, 0);
        let b = generate(7, 1024, 1024);
        assert!(!chunks_equal(&a, &b));
    }

    #[test]
    fn sea_band_is_never_empty() {
        let chunk = generate(3, 0, 0);
        for x in 0..16 {
            for z in 0..16 {
                for y in 128..139 {
                    assert_ne!(
                        chunk.block_at(x, y, z),
                        BlockType::Empty,
                        "empty cell in sea band at ({x}, {y}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn bottom_layer_stays_empty() {
        let chunk = generate(3, 0, 0);
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(chunk.block_at(x, 0, z), BlockType::Empty);
            }
        }
    }

    #[test]
    fn bedrock_layer_is_placed_before_the_carve() {
        let chunk = generate(3, 0, 0);
        for x in 0..16 {
            for z in 0..16 {
                let block = chunk.block_at(x, BEDROCK_LEVEL as usize, z);
                assert!(
                    block == BlockType::Bedrock || block == BlockType::Empty,
                    "unexpected {:?} at bedrock level",
                    block
                );
            }
        }
    }

    #[test]
    fn surface_height_clears_sea_level() {
        let noise = TerrainNoise::new(11);
        for &(x, z) in &[(0, 0), (500, -500), (-1000, 250)] {
            assert!(noise.grassland_height(x, z) >= 129);
            assert!(noise.mountain_height(x, z) >= 127);
        }
    }
}
