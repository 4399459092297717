//! Voxel edits: sphere paint/carve with copy-on-write, brush state,
//! and tracking of chunks whose meshes went stale.

pub mod sphere;
pub mod invalidator;
pub mod brush;

pub use sphere::{apply_edit, EditResult, MissingChunkPolicy, SphereEdit};
pub use invalidator::ChunkInvalidator;
pub use brush::Brush;
