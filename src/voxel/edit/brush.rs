//! Brush state: current radius and material for interactive edits

use crate::core::config::RadiusBounds;
use crate::core::types::{Result, Vec3};
use crate::voxel::edit::sphere::SphereEdit;
use crate::voxel::voxel::{Material, Voxel};

/// Brush used to build sphere edits from pointer positions.
///
/// The radius always stays within the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    radius: f32,
    material: Voxel,
    bounds: RadiusBounds,
}

impl Brush {
    /// Create a brush; `radius` is clamped into `bounds`
    pub fn new(radius: f32, material: Voxel, bounds: RadiusBounds) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            radius: bounds.clamp(radius),
            material,
            bounds,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> Voxel {
        self.material
    }

    /// Set the radius, clamped into bounds. Returns the applied radius.
    pub fn set_radius(&mut self, radius: f32) -> f32 {
        self.radius = self.bounds.clamp(radius);
        self.radius
    }

    /// Select the material used by [`Brush::paint_at`]
    pub fn set_material(&mut self, material: Voxel) -> &mut Self {
        self.material = material;
        self
    }

    /// Additive edit at `center` with the selected material
    pub fn paint_at(&self, center: Vec3) -> Result<SphereEdit> {
        SphereEdit::new(center, self.radius, self.material, &self.bounds)
    }

    /// Destructive edit at `center`
    pub fn carve_at(&self, center: Vec3) -> Result<SphereEdit> {
        SphereEdit::new(center, self.radius, Voxel::EMPTY, &self.bounds)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            radius: 3.0,
            material: Material::Dirt.voxel(),
            bounds: RadiusBounds::default(),
        }
    }
}
