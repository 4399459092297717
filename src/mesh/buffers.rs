//! Mesh buffers handed to renderers and physics.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::core::types::{IVec3, Vec3};

/// Vertex layout produced by the mesher: chunk-local position only.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
}

/// Triangle mesh of one chunk's boundary surface.
///
/// Positions are chunk-local; add the chunk origin for world space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex buffer
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Construct an empty mesh
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if the chunk has no visible or collidable surface
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of emitted quads (two triangles each)
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex positions as a flat `[x, y, z, x, y, z, ...]` slice
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Iterate triangles as corner positions
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(self.vertices[i as usize].position))
        })
    }

    /// Total surface area of all triangles
    pub fn surface_area(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum()
    }
}

/// Static triangle surface for a physics layer, placed at a chunk's world offset.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionSurface {
    /// World position of the chunk's minimum corner
    pub offset: IVec3,
    /// Chunk-local vertex positions
    pub vertices: Vec<[f32; 3]>,
    /// Triangles as index triples
    pub indices: Vec<[u32; 3]>,
}

impl CollisionSurface {
    pub fn from_mesh(mesh: &ChunkMesh, offset: IVec3) -> Self {
        Self {
            offset,
            vertices: mesh.vertices.iter().map(|v| v.position).collect(),
            indices: mesh.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
        }
    }

    /// Vertex positions translated into world space
    pub fn world_vertices(&self) -> Vec<Vec3> {
        let offset = self.offset.as_vec3();
        self.vertices.iter().map(|p| Vec3::from_array(*p) + offset).collect()
    }
}

/// Accumulates quads into vertex/index buffers, optionally sharing corners.
pub(crate) struct MeshBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    welded: Option<HashMap<IVec3, u32>>,
}

impl MeshBuilder {
    pub(crate) fn new(weld_vertices: bool) -> Self {
        Self {
            vertices: Vec::with_capacity(256),
            indices: Vec::with_capacity(384),
            welded: weld_vertices.then(HashMap::new),
        }
    }

    fn vertex(&mut self, corner: IVec3) -> u32 {
        let next = self.vertices.len() as u32;
        if let Some(welded) = &mut self.welded {
            if let Some(&index) = welded.get(&corner) {
                return index;
            }
            welded.insert(corner, next);
        }
        self.vertices.push(MeshVertex { position: corner.as_vec3().to_array() });
        next
    }

    /// Push a quad given counter-clockwise corners for a positive face.
    /// Negative faces reverse the winding.
    pub(crate) fn push_quad(&mut self, corners: [IVec3; 4], positive: bool) {
        let ids = corners.map(|c| self.vertex(c));
        let order = if positive {
            [0, 1, 2, 0, 2, 3]
        } else {
            [0, 2, 1, 0, 3, 2]
        };
        self.indices.extend(order.iter().map(|&k| ids[k]));
    }

    pub(crate) fn finish(self) -> ChunkMesh {
        ChunkMesh {
            vertices: self.vertices,
            indices: self.indices,
        }
    }
}
