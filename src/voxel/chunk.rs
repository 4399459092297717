//! Chunk system: fixed-size cubic blocks of voxels

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, UVec3};
use crate::voxel::voxel::Voxel;

/// Integer coordinate identifying a chunk in the world grid.
///
/// This triple is also the store key: it is total and injective over all
/// `i32` coordinates, so no packing or string formatting is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Neighbouring coordinate offset by `delta` chunks
    pub fn offset(self, delta: IVec3) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }
}

impl From<IVec3> for ChunkCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

/// A cube of `size³` voxels.
///
/// Voxels are stored y-major, then z, then x:
/// `index = y * size² + z * size + x`. Every reader and writer goes through
/// [`VoxelChunk::index`], so the order is defined in exactly one place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelChunk {
    size: u32,
    voxels: Box<[Voxel]>,
}

impl VoxelChunk {
    /// Create a chunk filled with air
    pub fn empty(size: u32) -> Self {
        Self::filled(size, Voxel::EMPTY)
    }

    /// Create a chunk where every voxel is `voxel`
    pub fn filled(size: u32, voxel: Voxel) -> Self {
        assert!(size > 0, "chunk size must be positive");
        let len = (size as usize).pow(3);
        Self {
            size,
            voxels: vec![voxel; len].into_boxed_slice(),
        }
    }

    /// Build a chunk by evaluating `f` at every local position
    pub fn from_fn(size: u32, mut f: impl FnMut(UVec3) -> Voxel) -> Self {
        let mut chunk = Self::empty(size);
        for y in 0..size {
            for z in 0..size {
                for x in 0..size {
                    let local = UVec3::new(x, y, z);
                    let i = chunk.index(local);
                    chunk.voxels[i] = f(local);
                }
            }
        }
        chunk
    }

    /// Edge length in voxels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Linear index of a local position.
    ///
    /// # Panics
    /// If any component is outside `[0, size)`. An out-of-range local
    /// coordinate means the world-to-local mapping is broken upstream.
    pub fn index(&self, local: UVec3) -> usize {
        assert!(
            local.x < self.size && local.y < self.size && local.z < self.size,
            "local voxel coordinate {:?} out of range for chunk size {}",
            local,
            self.size
        );
        let s = self.size as usize;
        local.y as usize * s * s + local.z as usize * s + local.x as usize
    }

    /// Voxel at a local position
    pub fn get(&self, local: UVec3) -> Voxel {
        self.voxels[self.index(local)]
    }

    /// Overwrite the voxel at a local position
    pub fn set(&mut self, local: UVec3, voxel: Voxel) {
        let i = self.index(local);
        self.voxels[i] = voxel;
    }

    /// Fill an inclusive local box with `voxel`
    pub fn fill_box(&mut self, min: UVec3, max: UVec3, voxel: Voxel) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set(UVec3::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Raw voxel slice in storage order
    pub fn as_slice(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Voxels reinterpreted as material bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels)
    }

    /// Number of solid voxels
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }

    /// True if every voxel is air
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|v| v.is_empty())
    }

    /// True if every voxel is solid
    pub fn is_full(&self) -> bool {
        self.voxels.iter().all(|v| v.is_solid())
    }
}
