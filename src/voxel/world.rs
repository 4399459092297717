//! World facade: the current store, its meshes, and the edit/generate entry points

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::WorldConfig;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result, Vec3};
use crate::mesh::{mesh_chunks, mesh_store_chunk, ChunkMesh, CollisionSurface, SamplingPolicy};
use crate::terrain::generator::WorldGenerator;
use crate::voxel::chunk::ChunkCoord;
use crate::voxel::coords::ChunkLayout;
use crate::voxel::edit::{apply_edit, ChunkInvalidator, SphereEdit};
use crate::voxel::store::ChunkStore;
use crate::voxel::voxel::Voxel;

const FACE_NEIGHBOURS: [IVec3; 6] = [
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

/// Single-writer owner of the voxel world.
///
/// Holds the latest [`ChunkStore`] and a cache of chunk meshes. Edits swap
/// in a new store and mark the touched chunks dirty; meshes are re-extracted
/// lazily by [`World::get_mesh`] or in bulk by [`World::remesh_dirty`].
pub struct World {
    config: WorldConfig,
    layout: ChunkLayout,
    store: Arc<ChunkStore>,
    invalidator: ChunkInvalidator,
    meshes: HashMap<ChunkCoord, Arc<ChunkMesh>>,
}

impl World {
    /// Validate `config` and generate the initial world
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let layout = config.layout()?;
        let store = Self::generator(&config).generate(&config.extent, layout);

        let mut world = Self {
            config,
            layout,
            store: Arc::new(store),
            invalidator: ChunkInvalidator::new(),
            meshes: HashMap::new(),
        };
        world.invalidate_all();
        Ok(world)
    }

    fn generator(config: &WorldConfig) -> WorldGenerator {
        WorldGenerator::new(config.terrain.clone(), Voxel(config.default_material))
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// Current store
    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    /// Generation id of the current store
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    /// Edit revision of the current store
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Paint (material != 0) or carve (material 0) a sphere.
    ///
    /// Returns the chunks whose meshes are now stale.
    pub fn edit_sphere(&mut self, center: Vec3, radius: f32, material: Voxel) -> Result<Vec<ChunkCoord>> {
        let edit = SphereEdit::new(center, radius, material, &self.config.radius_bounds)?;
        Ok(self.apply(&edit))
    }

    /// Apply an already validated edit to the current store
    pub fn apply(&mut self, edit: &SphereEdit) -> Vec<ChunkCoord> {
        let result = apply_edit(&self.store, edit, self.config.missing_chunk_policy);
        self.store = Arc::new(result.store);
        self.invalidate(&result.touched);
        result.touched
    }

    /// Replace the world with a freshly generated one.
    ///
    /// `seed` overrides the configured terrain seed. Every cached mesh is
    /// dropped. Returns the new generation id.
    pub fn generate_world(&mut self, seed: Option<u32>) -> u64 {
        if let Some(seed) = seed {
            self.config.terrain.seed = seed;
        }
        let store = Self::generator(&self.config).generate(&self.config.extent, self.layout);
        self.replace_store(store);
        self.generation()
    }

    /// Adopt a store generated off-thread.
    ///
    /// The store must use this world's chunk layout, carry no edits, and
    /// come from a generation newer than the current one.
    pub fn install_generated(&mut self, store: ChunkStore) -> Result<()> {
        if store.layout() != self.layout {
            return Err(Error::InvalidConfig(format!(
                "generated store uses chunk size {}, world uses {}",
                store.layout().chunk_size(),
                self.layout.chunk_size()
            )));
        }
        if store.parent_revision().is_some() {
            return Err(Error::InvalidConfig("generated store already carries edits".into()));
        }
        if store.generation() <= self.store.generation() {
            return Err(Error::GenerationMismatch {
                expected: self.store.generation(),
                found: store.generation(),
            });
        }
        self.replace_store(store);
        Ok(())
    }

    fn replace_store(&mut self, store: ChunkStore) {
        log::info!(
            "world generation {} -> {} ({} chunks)",
            self.store.generation(),
            store.generation(),
            store.len()
        );
        self.store = Arc::new(store);
        self.meshes.clear();
        self.invalidator.clear();
        self.invalidate_all();
    }

    fn invalidate_all(&mut self) {
        let coords = self.store.coords();
        self.invalidator.mark_chunks_dirty(coords);
    }

    fn invalidate(&mut self, touched: &[ChunkCoord]) {
        self.invalidator.mark_chunks_dirty(touched.iter().copied());
        if self.config.mesh.sampling == SamplingPolicy::Padded {
            // Neighbours read the touched chunks through their halo
            for coord in touched {
                for delta in FACE_NEIGHBOURS {
                    let neighbour = coord.offset(delta);
                    if self.store.contains(neighbour) {
                        self.invalidator.mark_chunk_dirty(neighbour);
                    }
                }
            }
        }
    }

    /// Voxel at a world position; air outside the generated world
    pub fn get_voxel(&self, world: IVec3) -> Voxel {
        self.store.get_voxel(world)
    }

    /// Mesh of one chunk, re-extracted if it is missing or stale.
    ///
    /// `None` if the chunk does not exist.
    pub fn get_mesh(&mut self, coord: ChunkCoord) -> Option<Arc<ChunkMesh>> {
        if !self.invalidator.is_chunk_dirty(&coord) {
            if let Some(mesh) = self.meshes.get(&coord) {
                return Some(Arc::clone(mesh));
            }
        }

        let Some(mesh) = mesh_store_chunk(&self.store, coord, &self.config.mesh) else {
            self.meshes.remove(&coord);
            return None;
        };
        let mesh = Arc::new(mesh);
        self.meshes.insert(coord, Arc::clone(&mesh));
        self.invalidator.clear_chunk(&coord);
        Some(mesh)
    }

    /// Chunk mesh as a static collision surface at the chunk's world offset
    pub fn collision_surface(&mut self, coord: ChunkCoord) -> Option<CollisionSurface> {
        let mesh = self.get_mesh(coord)?;
        Some(CollisionSurface::from_mesh(&mesh, self.layout.chunk_origin(coord)))
    }

    /// Re-extract every dirty mesh in parallel.
    ///
    /// Returns the coordinates that were remeshed, sorted.
    pub fn remesh_dirty(&mut self) -> Vec<ChunkCoord> {
        let dirty = self.invalidator.take_dirty_chunks();
        if dirty.is_empty() {
            return dirty;
        }

        let start = std::time::Instant::now();
        let meshes = mesh_chunks(&self.store, &dirty, &self.config.mesh);
        let mut remeshed = Vec::with_capacity(meshes.len());
        for coord in &dirty {
            self.meshes.remove(coord);
        }
        for (coord, mesh) in meshes {
            self.meshes.insert(coord, Arc::new(mesh));
            remeshed.push(coord);
        }

        log::debug!(
            "remeshed {} of {} dirty chunks in {:.1}ms",
            remeshed.len(),
            dirty.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        remeshed
    }

    /// Drain the list of chunks whose meshes are stale, for callers that
    /// mesh on their own
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        let dirty = self.invalidator.take_dirty_chunks();
        for coord in &dirty {
            self.meshes.remove(coord);
        }
        dirty
    }

    pub fn is_chunk_dirty(&self, coord: ChunkCoord) -> bool {
        self.invalidator.is_chunk_dirty(&coord)
    }

    /// Shared handle to the current store, for edits prepared elsewhere
    pub fn snapshot(&self) -> Arc<ChunkStore> {
        Arc::clone(&self.store)
    }

    /// Install a store derived from the current one.
    ///
    /// The store must come from this generation and be exactly one edit
    /// batch ahead of the current revision; anything else would discard a
    /// concurrent edit. Returns the chunks that changed.
    pub fn commit(&mut self, store: ChunkStore) -> Result<Vec<ChunkCoord>> {
        if store.generation() != self.store.generation() {
            return Err(Error::GenerationMismatch {
                expected: self.store.generation(),
                found: store.generation(),
            });
        }
        let current = self.store.revision();
        if store.parent_revision() != Some(current) {
            return Err(Error::StaleSnapshot {
                expected: current,
                found: store.parent_revision().unwrap_or(store.revision()),
            });
        }

        let mut changed: Vec<_> = store
            .iter()
            .map(|(coord, _)| coord)
            .filter(|&coord| !store.same_chunk(&self.store, coord))
            .collect();
        changed.sort_unstable();

        log::debug!("committed revision {} ({} chunks changed)", store.revision(), changed.len());
        self.store = Arc::new(store);
        self.invalidate(&changed);
        Ok(changed)
    }
}
