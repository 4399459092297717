//! Chunk invalidation tracking for meshes made stale by edits.

use std::collections::HashSet;

use crate::voxel::chunk::ChunkCoord;

/// Tracks which chunks need their mesh re-extracted.
#[derive(Debug)]
pub struct ChunkInvalidator {
    /// Chunks needing re-extraction
    dirty_chunks: HashSet<ChunkCoord>,
}

impl ChunkInvalidator {
    /// Create a new chunk invalidator with empty state.
    pub fn new() -> Self {
        Self {
            dirty_chunks: HashSet::new(),
        }
    }

    /// Mark a specific chunk as dirty.
    pub fn mark_chunk_dirty(&mut self, coord: ChunkCoord) {
        self.dirty_chunks.insert(coord);
    }

    /// Mark several chunks dirty.
    pub fn mark_chunks_dirty(&mut self, coords: impl IntoIterator<Item = ChunkCoord>) {
        self.dirty_chunks.extend(coords);
    }

    /// Take all dirty chunks (sorted) and clear the dirty list.
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<_> = self.dirty_chunks.drain().collect();
        dirty.sort_unstable();
        dirty
    }

    /// Clear the dirty flag of one chunk.
    pub fn clear_chunk(&mut self, coord: &ChunkCoord) -> bool {
        self.dirty_chunks.remove(coord)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty_chunks.is_empty()
    }

    pub fn is_chunk_dirty(&self, coord: &ChunkCoord) -> bool {
        self.dirty_chunks.contains(coord)
    }

    /// Clear all dirty state.
    pub fn clear(&mut self) {
        self.dirty_chunks.clear();
    }

    /// Count of dirty chunks (for diagnostics).
    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty_chunks.len()
    }
}

impl Default for ChunkInvalidator {
    fn default() -> Self {
        Self::new()
    }
}
