//! Surface extraction from voxel chunks

pub mod buffers;
pub mod greedy;
pub mod sampler;

pub use buffers::{ChunkMesh, CollisionSurface, MeshVertex};
pub use greedy::{extract_mesh, mesh_chunk, mesh_chunks, mesh_store, mesh_store_chunk, MeshOptions, SamplingPolicy};
pub use sampler::{FnSampler, PaddedBlock, VoxelSampler};
