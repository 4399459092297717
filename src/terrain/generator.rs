//! Noise-based procedural world generation

use std::time::Instant;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::WorldExtent;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result, UVec3};
use crate::voxel::chunk::{ChunkCoord, VoxelChunk};
use crate::voxel::coords::ChunkLayout;
use crate::voxel::store::{next_generation, ChunkStore};
use crate::voxel::voxel::Voxel;

/// Upper bound on FBM octaves accepted by the noise crate
const MAX_OCTAVES: u32 = 32;

/// Which procedural fill to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Thresholded 2D noise over (x, y) columns, filling a slab in z
    #[default]
    HeightField,
    /// One solid cube inside a single chunk
    Blob,
    /// Lower half of the world's Y extent solid
    Flat,
    /// Every chunk present, all air
    Empty,
}

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub kind: TerrainKind,
    pub seed: u32,
    pub frequency: f32,   // Noise frequency per voxel (smaller = smoother)
    pub octaves: u32,     // FBM octaves (detail levels)
    pub persistence: f32, // FBM persistence (0.5 typical)
    pub lacunarity: f32,  // FBM lacunarity (2.0 typical)
    pub threshold: f32,   // Noise value above which a column is filled
    pub slab_thickness: u32,
    pub blob_chunk: ChunkCoord,
    pub blob_size: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            kind: TerrainKind::HeightField,
            seed: 12345,
            frequency: 0.05,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            threshold: 0.0,
            slab_thickness: 4,
            blob_chunk: ChunkCoord::new(0, 0, 0),
            blob_size: 8,
        }
    }
}

impl TerrainParams {
    /// Check the parameters against the extent they will fill
    pub fn validate(&self, extent: &WorldExtent) -> Result<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "terrain frequency must be positive, got {}", self.frequency
            )));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(Error::InvalidConfig(format!(
                "terrain octaves must be in 1..={}, got {}", MAX_OCTAVES, self.octaves
            )));
        }
        if !self.persistence.is_finite() || !self.lacunarity.is_finite() || !self.threshold.is_finite() {
            return Err(Error::InvalidConfig("terrain noise parameters must be finite".into()));
        }
        if self.kind == TerrainKind::HeightField && self.slab_thickness == 0 {
            return Err(Error::InvalidConfig("slab_thickness must be at least 1".into()));
        }
        if self.kind == TerrainKind::Blob {
            if self.blob_size == 0 {
                return Err(Error::InvalidConfig("blob_size must be at least 1".into()));
            }
            if !extent.contains(self.blob_chunk) {
                return Err(Error::InvalidConfig(format!(
                    "blob chunk {:?} lies outside the world extent {:?}", self.blob_chunk, extent
                )));
            }
        }
        Ok(())
    }
}

/// Deterministic world generator.
///
/// Output depends only on the parameters, extent, layout and material, never
/// on how rayon schedules the per-chunk work.
pub struct WorldGenerator {
    params: TerrainParams,
    material: Voxel,
    noise: Fbm<Perlin>,
}

impl WorldGenerator {
    /// Create a generator that fills solid voxels with `material`
    pub fn new(params: TerrainParams, material: Voxel) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_frequency(params.frequency as f64)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, material, noise }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Noise value of the (x, y) column, roughly in [-1, 1]
    pub fn column_value(&self, x: i32, y: i32) -> f64 {
        self.noise.get([x as f64, y as f64])
    }

    /// Generate a store under a fresh generation id
    pub fn generate(&self, extent: &WorldExtent, layout: ChunkLayout) -> ChunkStore {
        self.generate_as(extent, layout, next_generation())
    }

    /// Generate a store tagged with a world generation id.
    ///
    /// Every chunk in the extent gets an entry, even if it is all air.
    pub fn generate_as(&self, extent: &WorldExtent, layout: ChunkLayout, generation: u64) -> ChunkStore {
        let start = Instant::now();
        let coords: Vec<ChunkCoord> = extent.coords().collect();

        let chunks: Vec<(ChunkCoord, VoxelChunk)> = coords
            .par_iter()
            .map(|&coord| (coord, self.generate_chunk(coord, extent, layout)))
            .collect();

        let solid: usize = chunks.iter().map(|(_, c)| c.solid_count()).sum();
        log::info!(
            "generated {:?} world: {} chunks, {} solid voxels (seed {}, generation {}) in {:.1}ms",
            self.params.kind,
            chunks.len(),
            solid,
            self.params.seed,
            generation,
            start.elapsed().as_secs_f64() * 1000.0
        );

        ChunkStore::from_chunks(layout, generation, chunks)
    }

    /// Generate the contents of one chunk
    pub fn generate_chunk(&self, coord: ChunkCoord, extent: &WorldExtent, layout: ChunkLayout) -> VoxelChunk {
        let size = layout.chunk_size();
        let origin = layout.chunk_origin(coord);

        match self.params.kind {
            TerrainKind::Empty => VoxelChunk::empty(size),
            TerrainKind::HeightField => self.height_field_chunk(origin, size),
            TerrainKind::Flat => {
                let world_height = extent.height as i32 * size as i32;
                let surface = world_height / 2;
                VoxelChunk::from_fn(size, |p| {
                    if origin.y + (p.y as i32) < surface { self.material } else { Voxel::EMPTY }
                })
            }
            TerrainKind::Blob => {
                let mut chunk = VoxelChunk::empty(size);
                if coord == self.params.blob_chunk {
                    let edge = self.params.blob_size.min(size);
                    let min = UVec3::splat((size - edge) / 2);
                    chunk.fill_box(min, min + UVec3::splat(edge - 1), self.material);
                }
                chunk
            }
        }
    }

    fn height_field_chunk(&self, origin: IVec3, size: u32) -> VoxelChunk {
        let slab = self.params.slab_thickness as i32;
        let chunk_z = origin.z..origin.z + size as i32;
        // No overlap with z in [0, slab): skip the noise entirely
        if chunk_z.end <= 0 || chunk_z.start >= slab {
            return VoxelChunk::empty(size);
        }

        let n = size as usize;
        let mut filled = vec![false; n * n];
        for y in 0..n {
            for x in 0..n {
                let value = self.column_value(origin.x + x as i32, origin.y + y as i32);
                filled[y * n + x] = value > self.params.threshold as f64;
            }
        }

        VoxelChunk::from_fn(size, |p| {
            let z = origin.z + p.z as i32;
            if (0..slab).contains(&z) && filled[p.y as usize * n + p.x as usize] {
                self.material
            } else {
                Voxel::EMPTY
            }
        })
    }
}
