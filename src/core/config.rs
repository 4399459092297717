//! World configuration.
//!
//! Every tunable the core depends on (chunk size, world extent, default
//! material, edit radius bounds, terrain and meshing parameters) lives here
//! so nothing downstream hardcodes them. Configs round-trip through JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::mesh::MeshOptions;
use crate::terrain::generator::TerrainParams;
use crate::voxel::chunk::ChunkCoord;
use crate::voxel::coords::ChunkLayout;
use crate::voxel::edit::MissingChunkPolicy;

/// Largest accepted chunk edge length.
pub const MAX_CHUNK_SIZE: u32 = 256;

/// World size in chunks along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldExtent {
    /// Chunks along X
    pub width: u32,
    /// Chunks along Y
    pub height: u32,
    /// Chunks along Z
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

impl WorldExtent {
    /// Create an extent one chunk deep
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, depth: 1 }
    }

    /// Override the depth (Z) of the extent
    pub fn with_depth(self, depth: u32) -> Self {
        Self { depth, ..self }
    }

    /// Total number of chunks covered
    pub fn chunk_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Check whether a chunk coordinate lies inside the extent
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.z >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
            && (coord.z as u32) < self.depth
    }

    /// Iterate every chunk coordinate in the extent (x fastest, then z, then y)
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        let (w, h, d) = (self.width as i32, self.height as i32, self.depth as i32);
        (0..h).flat_map(move |y| {
            (0..d).flat_map(move |z| (0..w).map(move |x| ChunkCoord::new(x, y, z)))
        })
    }
}

impl Default for WorldExtent {
    fn default() -> Self {
        // 8 x 4 chunks of 16: the 128 x 64 voxel placement plane
        Self::new(8, 4)
    }
}

/// Allowed range for edit radii, in voxels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusBounds {
    pub min: f32,
    pub max: f32,
}

impl RadiusBounds {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if a radius is inside the bounds (inclusive)
    pub fn contains(&self, radius: f32) -> bool {
        radius >= self.min && radius <= self.max
    }

    /// Clamp a radius into the bounds
    pub fn clamp(&self, radius: f32) -> f32 {
        radius.clamp(self.min, self.max)
    }

    /// Reject non-finite, negative or inverted bounds
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidConfig("radius bounds must be finite".into()));
        }
        if self.min < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "minimum edit radius must be non-negative, got {}", self.min
            )));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "radius bounds inverted: min {} > max {}", self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self { min: 1.0, max: 15.0 }
    }
}

/// Top-level configuration for a [`World`](crate::voxel::World).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk in voxels
    pub chunk_size: u32,
    /// World size in chunks
    pub extent: WorldExtent,
    /// Material placed by the generator
    pub default_material: u8,
    /// Accepted edit radii
    pub radius_bounds: RadiusBounds,
    /// Procedural terrain parameters
    pub terrain: TerrainParams,
    /// What edits do with writes that land in absent chunks
    pub missing_chunk_policy: MissingChunkPolicy,
    /// Mesh extraction options
    pub mesh: MeshOptions,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            extent: WorldExtent::default(),
            default_material: 1,
            radius_bounds: RadiusBounds::default(),
            terrain: TerrainParams::default(),
            missing_chunk_policy: MissingChunkPolicy::default(),
            mesh: MeshOptions::default(),
        }
    }
}

impl WorldConfig {
    /// Check every parameter, returning a descriptive error for the first bad one.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::InvalidConfig(format!(
                "chunk_size must be in 1..={}, got {}", MAX_CHUNK_SIZE, self.chunk_size
            )));
        }
        if self.extent.width == 0 || self.extent.height == 0 || self.extent.depth == 0 {
            return Err(Error::InvalidConfig(format!(
                "world extent must be at least one chunk per axis, got {:?}", self.extent
            )));
        }
        if self.default_material == 0 {
            return Err(Error::InvalidConfig("default material cannot be air (0)".into()));
        }
        self.radius_bounds.validate()?;
        self.terrain.validate(&self.extent)?;
        Ok(())
    }

    /// Chunk layout described by this config
    pub fn layout(&self) -> Result<ChunkLayout> {
        ChunkLayout::new(self.chunk_size)
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
