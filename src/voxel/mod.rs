//! Voxel data structures and operations

pub mod voxel;
pub mod chunk;
pub mod coords;
pub mod store;
pub mod edit;
pub mod world;

pub use chunk::{ChunkCoord, VoxelChunk};
pub use coords::ChunkLayout;
pub use edit::{apply_edit, Brush, ChunkInvalidator, EditResult, MissingChunkPolicy, SphereEdit};
pub use store::ChunkStore;
pub use voxel::{Material, Voxel};
pub use world::World;
