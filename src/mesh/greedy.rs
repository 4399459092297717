//! Greedy surface extraction.
//!
//! For each axis the mesher sweeps the `size + 1` planes between voxel
//! slices, builds a mask of faces where solid meets air, and merges runs of
//! identical mask entries into maximal rectangles. A mask entry is the
//! material id, signed by which side of the plane is solid, so faces of
//! different materials or opposite orientation never merge.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::IVec3;
use crate::mesh::buffers::{ChunkMesh, MeshBuilder};
use crate::mesh::sampler::{PaddedBlock, VoxelSampler};
use crate::voxel::chunk::{ChunkCoord, VoxelChunk};
use crate::voxel::store::ChunkStore;

/// Where the mesher gets voxels beyond a chunk's faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Treat everything outside the chunk as air; each chunk is closed
    #[default]
    Isolated,
    /// Read neighbouring chunks; faces between solid chunks are culled
    Padded,
}

/// Mesher settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    /// Share vertices between quads at the same position
    pub weld_vertices: bool,
    pub sampling: SamplingPolicy,
}

/// Extract the boundary surface of a voxel block.
///
/// A face is emitted only on the side of a solid voxel that lies inside the
/// block, so padded neighbours contribute occlusion but never geometry.
pub fn extract_mesh<S: VoxelSampler + ?Sized>(sampler: &S, options: &MeshOptions) -> ChunkMesh {
    let size = sampler.size() as i32;
    let n = size as usize;
    let mut builder = MeshBuilder::new(options.weld_vertices);
    let mut mask = vec![0i16; n * n];

    for axis in 0..3 {
        let u = (axis + 1) % 3;
        let v = (axis + 2) % 3;

        for slice in 0..=size {
            fill_mask(sampler, axis, slice, &mut mask);

            for j in 0..n {
                let mut i = 0;
                while i < n {
                    let value = mask[j * n + i];
                    if value == 0 {
                        i += 1;
                        continue;
                    }

                    let mut width = 1;
                    while i + width < n && mask[j * n + i + width] == value {
                        width += 1;
                    }

                    let mut height = 1;
                    'grow: while j + height < n {
                        for k in 0..width {
                            if mask[(j + height) * n + i + k] != value {
                                break 'grow;
                            }
                        }
                        height += 1;
                    }

                    for dy in 0..height {
                        let row = (j + dy) * n;
                        mask[row + i..row + i + width].fill(0);
                    }

                    let mut origin = IVec3::ZERO;
                    origin[axis] = slice;
                    origin[u] = i as i32;
                    origin[v] = j as i32;
                    let mut du = IVec3::ZERO;
                    du[u] = width as i32;
                    let mut dv = IVec3::ZERO;
                    dv[v] = height as i32;

                    builder.push_quad([origin, origin + du, origin + du + dv, origin + dv], value > 0);
                    i += width;
                }
            }
        }
    }

    builder.finish()
}

/// Mask of the plane at `slice` along `axis`, indexed `[v * n + u]`.
///
/// Positive entries face +axis (solid behind the plane), negative entries
/// face -axis.
fn fill_mask<S: VoxelSampler + ?Sized>(sampler: &S, axis: usize, slice: i32, mask: &mut [i16]) {
    let size = sampler.size() as i32;
    let n = size as usize;
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    let behind_inside = slice >= 1;
    let ahead_inside = slice < size;

    for j in 0..size {
        for i in 0..size {
            let mut pos = IVec3::ZERO;
            pos[u] = i;
            pos[v] = j;
            pos[axis] = slice - 1;
            let behind = sampler.sample(pos);
            pos[axis] = slice;
            let ahead = sampler.sample(pos);

            mask[j as usize * n + i as usize] = if behind_inside && behind.is_solid() && ahead.is_empty() {
                behind.0 as i16
            } else if ahead_inside && ahead.is_solid() && behind.is_empty() {
                -(ahead.0 as i16)
            } else {
                0
            };
        }
    }
}

/// Mesh one chunk on its own, with default options.
pub fn mesh_chunk(chunk: &VoxelChunk) -> ChunkMesh {
    extract_mesh(chunk, &MeshOptions::default())
}

/// Mesh the chunk at `coord` using the configured sampling policy.
///
/// Returns `None` if the store has no such chunk.
pub fn mesh_store_chunk(store: &ChunkStore, coord: ChunkCoord, options: &MeshOptions) -> Option<ChunkMesh> {
    let chunk = store.get(coord)?;
    let mesh = match options.sampling {
        SamplingPolicy::Isolated => extract_mesh(&**chunk, options),
        SamplingPolicy::Padded => extract_mesh(&PaddedBlock::from_store(store, coord), options),
    };
    Some(mesh)
}

/// Mesh a set of chunks in parallel. Absent coordinates are skipped.
pub fn mesh_chunks(store: &ChunkStore, coords: &[ChunkCoord], options: &MeshOptions) -> Vec<(ChunkCoord, ChunkMesh)> {
    coords
        .par_iter()
        .filter_map(|&coord| mesh_store_chunk(store, coord, options).map(|mesh| (coord, mesh)))
        .collect()
}

/// Mesh every chunk in a store in parallel, sorted by coordinate.
pub fn mesh_store(store: &ChunkStore, options: &MeshOptions) -> Vec<(ChunkCoord, ChunkMesh)> {
    let start = std::time::Instant::now();
    let coords = store.coords();
    let meshes = mesh_chunks(store, &coords, options);
    log::debug!(
        "meshed {} chunks ({} triangles) in {:.1}ms",
        meshes.len(),
        meshes.iter().map(|(_, m)| m.triangle_count()).sum::<usize>(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    meshes
}
