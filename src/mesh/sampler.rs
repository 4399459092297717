//! Voxel sources the mesher can read from.
//!
//! The mesher looks one voxel past each face of the chunk, so samplers must
//! answer for positions in `[-1, size]` on every axis.

use crate::core::types::{IVec3, UVec3};
use crate::voxel::chunk::{ChunkCoord, VoxelChunk};
use crate::voxel::store::ChunkStore;
use crate::voxel::voxel::Voxel;

/// Read-only voxel access for meshing.
pub trait VoxelSampler: Sync {
    /// Edge length of the meshed block
    fn size(&self) -> u32;

    /// Voxel at a block-local position in `[-1, size]` per axis
    fn sample(&self, pos: IVec3) -> Voxel;
}

fn in_block(pos: IVec3, size: u32) -> bool {
    let s = size as i32;
    pos.cmpge(IVec3::ZERO).all() && pos.cmplt(IVec3::splat(s)).all()
}

/// A bare chunk: everything past its faces reads as air.
impl VoxelSampler for VoxelChunk {
    fn size(&self) -> u32 {
        VoxelChunk::size(self)
    }

    fn sample(&self, pos: IVec3) -> Voxel {
        if in_block(pos, self.size()) {
            self.get(pos.as_uvec3())
        } else {
            Voxel::EMPTY
        }
    }
}

/// Sampler backed by an arbitrary function.
pub struct FnSampler<F> {
    size: u32,
    f: F,
}

impl<F> FnSampler<F>
where
    F: Fn(IVec3) -> Voxel + Sync,
{
    pub fn new(size: u32, f: F) -> Self {
        Self { size, f }
    }
}

impl<F> VoxelSampler for FnSampler<F>
where
    F: Fn(IVec3) -> Voxel + Sync,
{
    fn size(&self) -> u32 {
        self.size
    }

    fn sample(&self, pos: IVec3) -> Voxel {
        (self.f)(pos)
    }
}

/// A chunk plus a one-voxel halo copied from its neighbours.
///
/// Positions are stored shifted by one so the halo starts at index 0;
/// order matches [`VoxelChunk`] (y, then z, then x).
#[derive(Clone, Debug)]
pub struct PaddedBlock {
    size: u32,
    voxels: Vec<Voxel>,
}

impl PaddedBlock {
    /// Gather a chunk and its halo from a store. Absent chunks read as air.
    pub fn from_store(store: &ChunkStore, coord: ChunkCoord) -> Self {
        let size = store.layout().chunk_size();
        let origin = store.layout().chunk_origin(coord);
        let center = store.get(coord);
        Self::from_fn(size, |pos| {
            match center {
                Some(chunk) if in_block(pos, size) => chunk.get(pos.as_uvec3()),
                _ => store.get_voxel(origin + pos),
            }
        })
    }

    /// Build a padded block by evaluating `f` over `[-1, size]³`
    pub fn from_fn(size: u32, mut f: impl FnMut(IVec3) -> Voxel) -> Self {
        let padded = size as usize + 2;
        let mut voxels = Vec::with_capacity(padded.pow(3));
        let last = size as i32;
        for y in -1..=last {
            for z in -1..=last {
                for x in -1..=last {
                    voxels.push(f(IVec3::new(x, y, z)));
                }
            }
        }
        Self { size, voxels }
    }

    /// Interior voxel at a chunk-local position
    pub fn interior(&self, local: UVec3) -> Voxel {
        self.sample(local.as_ivec3())
    }
}

impl VoxelSampler for PaddedBlock {
    fn size(&self) -> u32 {
        self.size
    }

    fn sample(&self, pos: IVec3) -> Voxel {
        let p = pos + IVec3::ONE;
        let padded = self.size as i32 + 2;
        if p.cmplt(IVec3::ZERO).any() || p.cmpge(IVec3::splat(padded)).any() {
            return Voxel::EMPTY;
        }
        let n = padded as usize;
        self.voxels[p.y as usize * n * n + p.z as usize * n + p.x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::coords::ChunkLayout;

    #[test]
    fn test_chunk_outside_reads_air() {
        let chunk = VoxelChunk::filled(4, Voxel(1));
        assert_eq!(chunk.sample(IVec3::new(0, 0, 0)), Voxel(1));
        assert_eq!(chunk.sample(IVec3::new(3, 3, 3)), Voxel(1));
        assert_eq!(chunk.sample(IVec3::new(-1, 0, 0)), Voxel::EMPTY);
        assert_eq!(chunk.sample(IVec3::new(0, 4, 0)), Voxel::EMPTY);
    }

    #[test]
    fn test_padded_block_reads_neighbours() {
        let layout = ChunkLayout::new(4).unwrap();
        let store = ChunkStore::from_chunks(
            layout,
            0,
            [
                (ChunkCoord::new(0, 0, 0), VoxelChunk::filled(4, Voxel(1))),
                (ChunkCoord::new(1, 0, 0), VoxelChunk::filled(4, Voxel(2))),
            ],
        );
        let block = PaddedBlock::from_store(&store, ChunkCoord::new(0, 0, 0));
        assert_eq!(block.size(), 4);
        assert_eq!(block.interior(UVec3::new(3, 0, 0)), Voxel(1));
        assert_eq!(block.sample(IVec3::new(4, 0, 0)), Voxel(2));
        assert_eq!(block.sample(IVec3::new(-1, 0, 0)), Voxel::EMPTY);
        assert_eq!(block.sample(IVec3::new(0, 4, 0)), Voxel::EMPTY);
    }

    #[test]
    fn test_padded_block_of_absent_chunk() {
        let layout = ChunkLayout::new(4).unwrap();
        let store = ChunkStore::from_chunks(
            layout,
            0,
            [(ChunkCoord::new(0, 0, 0), VoxelChunk::filled(4, Voxel(3)))],
        );
        // Chunk (1,0,0) is missing but its -x halo sees chunk (0,0,0)
        let block = PaddedBlock::from_store(&store, ChunkCoord::new(1, 0, 0));
        assert_eq!(block.interior(UVec3::ZERO), Voxel::EMPTY);
        assert_eq!(block.sample(IVec3::new(-1, 2, 2)), Voxel(3));
    }

    #[test]
    fn test_fn_sampler() {
        let sampler = FnSampler::new(8, |p: IVec3| if p.y < 0 { Voxel(1) } else { Voxel::EMPTY });
        assert_eq!(sampler.size(), 8);
        assert_eq!(sampler.sample(IVec3::new(0, -1, 0)), Voxel(1));
        assert_eq!(sampler.sample(IVec3::new(0, 0, 0)), Voxel::EMPTY);
    }
}
