//! Sphere edits applied to a chunk store with chunk-level copy-on-write.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::core::config::RadiusBounds;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result, Vec3};
use crate::math::Aabb;
use crate::voxel::chunk::{ChunkCoord, VoxelChunk};
use crate::voxel::store::ChunkStore;
use crate::voxel::voxel::Voxel;

/// What an edit does with a write whose chunk is not in the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingChunkPolicy {
    /// Drop the write; edits never grow the world
    #[default]
    Drop,
    /// Create an all-air chunk and write into it
    Materialize,
}

/// Set every voxel strictly inside a sphere to one material.
///
/// `material` 0 carves, anything else paints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereEdit {
    pub center: Vec3,
    pub radius: f32,
    pub material: Voxel,
}

impl SphereEdit {
    /// Create a validated edit
    pub fn new(center: Vec3, radius: f32, material: Voxel, bounds: &RadiusBounds) -> Result<Self> {
        if !center.is_finite() {
            return Err(Error::InvalidEdit(format!("edit center {center} is not finite")));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidEdit(format!(
                "edit radius must be a non-negative number, got {radius}"
            )));
        }
        if !bounds.contains(radius) {
            return Err(Error::InvalidEdit(format!(
                "edit radius {} outside allowed range [{}, {}]",
                radius, bounds.min, bounds.max
            )));
        }
        Ok(Self { center, radius, material })
    }

    /// Voxel box that can contain affected voxels
    pub fn bounds(&self) -> Aabb {
        Aabb::around_sphere(self.center, self.radius)
    }

    /// Strict membership: a voxel exactly `radius` away is outside
    pub fn contains(&self, voxel: IVec3) -> bool {
        let d = voxel.as_dvec3() - self.center.as_dvec3();
        let r = self.radius as f64;
        d.length_squared() < r * r
    }
}

/// Result of applying an edit.
#[derive(Clone, Debug)]
pub struct EditResult {
    /// Store with the edit committed
    pub store: ChunkStore,
    /// Chunks that received at least one write, sorted; each needs remeshing
    pub touched: Vec<ChunkCoord>,
    /// Voxel writes performed
    pub voxels_written: usize,
    /// Writes dropped because their chunk was absent
    pub voxels_dropped: usize,
}

/// Apply a sphere edit, returning a new store.
///
/// Each touched chunk is copied from `store` once, on its first write, and
/// every later write in the same edit goes to that copy. The input store is
/// left untouched and the output shares every other chunk with it.
pub fn apply_edit(store: &ChunkStore, edit: &SphereEdit, policy: MissingChunkPolicy) -> EditResult {
    let layout = store.layout();
    let mut copies: HashMap<ChunkCoord, VoxelChunk> = HashMap::new();
    let mut written = 0usize;
    let mut dropped = 0usize;

    for world in edit.bounds().iter() {
        if !edit.contains(world) {
            continue;
        }
        let (coord, local) = layout.split(world);

        let chunk = match copies.entry(coord) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if policy == MissingChunkPolicy::Drop && !store.contains(coord) {
                    dropped += 1;
                    continue;
                }
                entry.insert(store.chunk_or_empty(coord))
            }
        };
        chunk.set(local, edit.material);
        written += 1;
    }

    let mut touched: Vec<_> = copies.keys().copied().collect();
    touched.sort_unstable();

    log::debug!(
        "sphere edit at {} r={} material={}: {} voxels in {} chunks ({} dropped)",
        edit.center, edit.radius, edit.material.0, written, touched.len(), dropped
    );

    EditResult {
        store: store.with_edits(copies),
        touched,
        voxels_written: written,
        voxels_dropped: dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldExtent;
    use crate::terrain::generator::{TerrainKind, TerrainParams, WorldGenerator};
    use crate::voxel::coords::ChunkLayout;

    fn air_store(size: u32, extent: WorldExtent) -> ChunkStore {
        let layout = ChunkLayout::new(size).unwrap();
        ChunkStore::from_chunks(layout, 0, extent.coords().map(|c| (c, VoxelChunk::empty(size))))
    }

    fn edit(center: Vec3, radius: f32, material: u8) -> SphereEdit {
        SphereEdit::new(center, radius, Voxel(material), &RadiusBounds::new(0.0, 64.0)).unwrap()
    }

    #[test]
    fn test_strict_boundary_scenario() {
        let store = air_store(16, WorldExtent::new(1, 1));
        let result = apply_edit(&store, &edit(Vec3::splat(8.0), 4.0, 1), MissingChunkPolicy::Drop);

        assert_eq!(result.store.get_voxel(IVec3::new(8, 8, 8)), Voxel(1));
        assert_eq!(result.store.get_voxel(IVec3::new(8, 8, 12)), Voxel::EMPTY);
        assert_eq!(result.store.get_voxel(IVec3::new(8, 8, 11)), Voxel(1));
        assert_eq!(result.touched, vec![ChunkCoord::new(0, 0, 0)]);
    }

    #[test]
    fn test_containment() {
        let store = air_store(8, WorldExtent::new(3, 3).with_depth(3));
        let e = edit(Vec3::new(11.5, 12.0, 9.25), 5.5, 3);
        let result = apply_edit(&store, &e, MissingChunkPolicy::Drop);

        let region = Aabb::new(IVec3::ZERO, IVec3::splat(23));
        for p in region.iter() {
            let expected = if e.contains(p) { Voxel(3) } else { Voxel::EMPTY };
            assert_eq!(result.store.get_voxel(p), expected, "voxel {p}");
        }
    }

    fn sweep(before: &ChunkStore, after: &ChunkStore, e: &SphereEdit) {
        let region = Aabb::new(IVec3::splat(-2), IVec3::splat(25));
        for p in region.iter() {
            let expected = if e.contains(p) && before.contains(before.layout().world_to_chunk(p)) {
                e.material
            } else {
                before.get_voxel(p)
            };
            assert_eq!(after.get_voxel(p), expected, "voxel {p}");
        }
    }

    #[test]
    fn test_containment_over_generated_terrain() {
        let extent = WorldExtent::new(3, 3).with_depth(3);
        let layout = ChunkLayout::new(8).unwrap();
        let height_field = WorldGenerator::new(TerrainParams::default(), Voxel(1)).generate(&extent, layout);
        let flat = WorldGenerator::new(
            TerrainParams { kind: TerrainKind::Flat, ..Default::default() },
            Voxel(1),
        )
        .generate(&extent, layout);

        for store in [&height_field, &flat] {
            // Both terrain and air intersect the sphere
            let paint = edit(Vec3::new(11.5, 12.0, 3.25), 6.5, 4);
            let painted = apply_edit(store, &paint, MissingChunkPolicy::Drop);
            sweep(store, &painted.store, &paint);

            let carve = edit(Vec3::new(4.0, 9.0, 1.0), 5.0, 0);
            let carved = apply_edit(store, &carve, MissingChunkPolicy::Drop);
            sweep(store, &carved.store, &carve);
        }
    }

    #[test]
    fn test_sequential_paint_then_carve() {
        let store = air_store(16, WorldExtent::new(2, 2).with_depth(2));
        // origin sits at the corner of 8 chunks when shifted by one chunk
        let origin = Vec3::splat(16.0);
        let painted = apply_edit(&store, &edit(origin, 5.0, 2), MissingChunkPolicy::Drop).store;
        let carved = apply_edit(&painted, &edit(origin, 2.0, 0), MissingChunkPolicy::Drop).store;

        assert_eq!(carved.get_voxel(IVec3::splat(16)), Voxel::EMPTY);
        assert_eq!(carved.get_voxel(IVec3::new(19, 16, 16)), Voxel(2));
        assert_eq!(carved.get_voxel(IVec3::new(16, 13, 16)), Voxel(2));
    }

    #[test]
    fn test_copy_on_write_isolation() {
        let store = air_store(8, WorldExtent::new(4, 1));
        let before = store.clone();
        let result = apply_edit(&store, &edit(Vec3::new(8.0, 4.0, 4.0), 3.0, 5), MissingChunkPolicy::Drop);

        // Original store still reads air everywhere
        for (_, chunk) in store.iter() {
            assert!(chunk.is_empty());
        }
        assert_eq!(result.touched, vec![ChunkCoord::new(0, 0, 0), ChunkCoord::new(1, 0, 0)]);
        // Exactly the touched chunks were replaced
        for coord in store.coords() {
            let shared = result.store.same_chunk(&before, coord);
            assert_eq!(shared, !result.touched.contains(&coord), "chunk {:?}", coord);
        }
    }

    #[test]
    fn test_chunk_copied_once_per_edit() {
        let store = air_store(4, WorldExtent::new(1, 1));
        let result = apply_edit(&store, &edit(Vec3::splat(2.0), 1.5, 7), MissingChunkPolicy::Drop);
        // All writes land in one copy, so every in-sphere voxel survives
        let chunk = result.store.get(ChunkCoord::new(0, 0, 0)).unwrap();
        assert_eq!(chunk.solid_count(), result.voxels_written);
        assert_eq!(result.voxels_written, 19);
    }

    #[test]
    fn test_missing_chunk_dropped() {
        let store = air_store(8, WorldExtent::new(1, 1));
        let result = apply_edit(&store, &edit(Vec3::new(0.0, 4.0, 4.0), 2.0, 1), MissingChunkPolicy::Drop);

        assert!(result.voxels_dropped > 0);
        assert!(!result.store.contains(ChunkCoord::new(-1, 0, 0)));
        assert_eq!(result.store.len(), 1);
        assert_eq!(result.store.get_voxel(IVec3::new(-1, 4, 4)), Voxel::EMPTY);
        assert_eq!(result.store.get_voxel(IVec3::new(0, 4, 4)), Voxel(1));
    }

    #[test]
    fn test_missing_chunk_materialized() {
        let store = air_store(8, WorldExtent::new(1, 1));
        let result = apply_edit(
            &store,
            &edit(Vec3::new(0.0, 4.0, 4.0), 2.0, 1),
            MissingChunkPolicy::Materialize,
        );

        assert_eq!(result.voxels_dropped, 0);
        assert!(result.store.contains(ChunkCoord::new(-1, 0, 0)));
        assert_eq!(result.store.get_voxel(IVec3::new(-1, 4, 4)), Voxel(1));
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let store = air_store(8, WorldExtent::new(1, 1));
        let result = apply_edit(&store, &edit(Vec3::splat(4.0), 0.0, 1), MissingChunkPolicy::Drop);
        assert!(result.touched.is_empty());
        assert_eq!(result.voxels_written, 0);
        assert!(result.store.same_chunk(&store, ChunkCoord::new(0, 0, 0)));
    }

    #[test]
    fn test_invalid_edits_rejected() {
        let bounds = RadiusBounds::new(1.0, 15.0);
        assert!(matches!(
            SphereEdit::new(Vec3::ZERO, -1.0, Voxel(1), &bounds),
            Err(Error::InvalidEdit(_))
        ));
        assert!(SphereEdit::new(Vec3::ZERO, f32::NAN, Voxel(1), &bounds).is_err());
        assert!(SphereEdit::new(Vec3::ZERO, 16.0, Voxel(1), &bounds).is_err());
        assert!(SphereEdit::new(Vec3::new(f32::INFINITY, 0.0, 0.0), 2.0, Voxel(1), &bounds).is_err());
        assert!(SphereEdit::new(Vec3::ZERO, 15.0, Voxel(1), &bounds).is_ok());
    }
}
