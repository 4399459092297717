//! Voxsculpt - an editable chunked voxel world with greedy boundary meshing

pub mod core;
pub mod math;
pub mod voxel;
pub mod mesh;
pub mod terrain;

pub use crate::core::{Error, Result, WorldConfig};
pub use crate::mesh::{ChunkMesh, CollisionSurface};
pub use crate::voxel::{ChunkCoord, Voxel, World};
