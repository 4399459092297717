//! Axis-aligned box over integer voxel coordinates

use crate::core::types::{IVec3, Vec3};

/// Inclusive box of voxel coordinates defined by min and max corners
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub min: IVec3,
    pub max: IVec3,
}

impl Aabb {
    /// Create box from min and max corners (both inclusive)
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Smallest voxel box covering the cube `[center - radius, center + radius]`
    pub fn around_sphere(center: Vec3, radius: f32) -> Self {
        let r = Vec3::splat(radius);
        Self {
            min: (center - r).floor().as_ivec3(),
            max: (center + r).ceil().as_ivec3(),
        }
    }

    /// Iterate all voxels in the box, x fastest
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}
