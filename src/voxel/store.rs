//! Sparse, versioned chunk storage with copy-on-write updates.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::types::IVec3;
use crate::voxel::chunk::{ChunkCoord, VoxelChunk};
use crate::voxel::coords::ChunkLayout;
use crate::voxel::voxel::Voxel;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Allocate a world generation id unique within this process.
pub fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Immutable-update map from chunk coordinate to voxel chunk.
///
/// Chunks sit behind `Arc`, so [`ChunkStore::with_edits`] builds a new store
/// that shares every untouched chunk with its parent. A store value is never
/// mutated after construction; holders of an older store keep seeing the
/// old voxels.
#[derive(Clone, Debug)]
pub struct ChunkStore {
    layout: ChunkLayout,
    chunks: HashMap<ChunkCoord, Arc<VoxelChunk>>,
    /// World instance that produced this store
    generation: u64,
    /// Number of committed edit batches since generation
    revision: u64,
    /// Revision this store was derived from, `None` for a fresh generation
    parent_revision: Option<u64>,
}

impl ChunkStore {
    /// Create an empty store (no chunks present)
    pub fn new(layout: ChunkLayout, generation: u64) -> Self {
        Self {
            layout,
            chunks: HashMap::new(),
            generation,
            revision: 0,
            parent_revision: None,
        }
    }

    /// Create a store from generated chunks.
    ///
    /// # Panics
    /// If a chunk's size does not match the layout.
    pub fn from_chunks(
        layout: ChunkLayout,
        generation: u64,
        chunks: impl IntoIterator<Item = (ChunkCoord, VoxelChunk)>,
    ) -> Self {
        let mut store = Self::new(layout, generation);
        for (coord, chunk) in chunks {
            assert_eq!(
                chunk.size(),
                layout.chunk_size(),
                "chunk {:?} has size {}, layout expects {}",
                coord,
                chunk.size(),
                layout.chunk_size()
            );
            store.chunks.insert(coord, Arc::new(chunk));
        }
        store
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn parent_revision(&self) -> Option<u64> {
        self.parent_revision
    }

    /// Chunk at `coord`, if present
    pub fn get(&self, coord: ChunkCoord) -> Option<&Arc<VoxelChunk>> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Voxel at a world position; air if its chunk is absent
    pub fn get_voxel(&self, world: IVec3) -> Voxel {
        let (coord, local) = self.layout.split(world);
        self.chunks
            .get(&coord)
            .map(|chunk| chunk.get(local))
            .unwrap_or(Voxel::EMPTY)
    }

    /// Writable copy of a chunk, or a fresh all-air chunk if absent
    pub fn chunk_or_empty(&self, coord: ChunkCoord) -> VoxelChunk {
        self.chunks
            .get(&coord)
            .map(|chunk| VoxelChunk::clone(chunk))
            .unwrap_or_else(|| VoxelChunk::empty(self.layout.chunk_size()))
    }

    /// New store with the listed chunks replaced; all other entries are shared.
    ///
    /// # Panics
    /// If an edited chunk's size does not match the layout.
    pub fn with_edits(&self, edits: HashMap<ChunkCoord, VoxelChunk>) -> ChunkStore {
        let mut chunks = self.chunks.clone();
        for (coord, chunk) in edits {
            assert_eq!(chunk.size(), self.layout.chunk_size(), "edited chunk {:?} has wrong size", coord);
            chunks.insert(coord, Arc::new(chunk));
        }
        ChunkStore {
            layout: self.layout,
            chunks,
            generation: self.generation,
            revision: self.revision + 1,
            parent_revision: Some(self.revision),
        }
    }

    /// Check whether both stores hold the very same chunk allocation at `coord`
    pub fn same_chunk(&self, other: &ChunkStore, coord: ChunkCoord) -> bool {
        match (self.chunks.get(&coord), other.chunks.get(&coord)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Number of chunks present
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All chunk coordinates, sorted
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Iterate over `(coord, chunk)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &Arc<VoxelChunk>)> {
        self.chunks.iter().map(|(coord, chunk)| (*coord, chunk))
    }
}
