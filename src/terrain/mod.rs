//! Procedural world generation

pub mod background;
pub mod generator;

pub use background::{BackgroundGenerator, GenerationOutcome, GenerationResult, Ticket};
pub use generator::{TerrainKind, TerrainParams, WorldGenerator};
