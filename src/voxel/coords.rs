//! Mapping between world, chunk and chunk-local voxel coordinates

use crate::core::error::Error;
use crate::core::types::{IVec3, Result, UVec3};
use crate::voxel::chunk::ChunkCoord;

/// Chunk partitioning of the world grid.
///
/// All conversions use floor division so negative world coordinates land in
/// negative chunks with a non-negative local offset: with size 16,
/// world x = -1 is chunk -1, local 15.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkLayout {
    size: i32,
}

impl ChunkLayout {
    /// Create a layout with the given chunk edge length
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 || size > i32::MAX as u32 {
            return Err(Error::InvalidConfig(format!(
                "chunk size must be a positive i32, got {}", size
            )));
        }
        Ok(Self { size: size as i32 })
    }

    /// Edge length of a chunk in voxels
    pub fn chunk_size(&self) -> u32 {
        self.size as u32
    }

    /// Chunk containing a world voxel
    pub fn world_to_chunk(&self, world: IVec3) -> ChunkCoord {
        ChunkCoord::new(
            world.x.div_euclid(self.size),
            world.y.div_euclid(self.size),
            world.z.div_euclid(self.size),
        )
    }

    /// Position of a world voxel inside its chunk, in `[0, size)` per axis
    pub fn world_to_local(&self, world: IVec3) -> UVec3 {
        let origin = self.chunk_origin(self.world_to_chunk(world));
        (world - origin).as_uvec3()
    }

    /// Chunk and local position of a world voxel
    pub fn split(&self, world: IVec3) -> (ChunkCoord, UVec3) {
        let coord = self.world_to_chunk(world);
        let local = (world - self.chunk_origin(coord)).as_uvec3();
        (coord, local)
    }

    /// World voxel at `local` inside chunk `coord`
    pub fn to_world(&self, coord: ChunkCoord, local: UVec3) -> IVec3 {
        self.chunk_origin(coord) + local.as_ivec3()
    }

    /// World-space minimum corner of a chunk: `coord * size`
    pub fn chunk_origin(&self, coord: ChunkCoord) -> IVec3 {
        coord.as_ivec3() * self.size
    }

    /// Store key for a chunk triple
    pub fn chunk_key(&self, cx: i32, cy: i32, cz: i32) -> ChunkCoord {
        ChunkCoord::new(cx, cy, cz)
    }
}
