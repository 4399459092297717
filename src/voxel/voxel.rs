//! Voxel data type

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Single voxel - a material ID, exactly 1 byte. `0` is air.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Voxel(pub u8);

impl Voxel {
    /// Empty/air voxel
    pub const EMPTY: Voxel = Voxel(0);

    /// Create voxel from a material ID
    pub const fn new(material_id: u8) -> Self {
        Self(material_id)
    }

    /// Material ID of this voxel
    pub const fn material_id(self) -> u8 {
        self.0
    }

    /// Check if voxel is empty (air)
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if voxel is solid (any nonzero material)
    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }
}

impl From<u8> for Voxel {
    fn from(material_id: u8) -> Self {
        Self(material_id)
    }
}

impl From<Material> for Voxel {
    fn from(material: Material) -> Self {
        Self(material as u8)
    }
}

/// Named materials of the default palette.
///
/// Any nonzero ID is a valid solid voxel; these are just the ones with names.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Dirt = 1,
    Stone = 2,
    Red = 3,
    Blue = 4,
    Green = 5,
    Yellow = 6,
}

impl Material {
    /// Every named material, in ID order
    pub const ALL: [Material; 6] = [
        Material::Dirt,
        Material::Stone,
        Material::Red,
        Material::Blue,
        Material::Green,
        Material::Yellow,
    ];

    /// Look up a named material by ID
    pub fn from_id(id: u8) -> Option<Material> {
        Self::ALL.into_iter().find(|m| *m as u8 == id)
    }

    /// Look up a named material by (case-insensitive) name
    pub fn from_name(name: &str) -> Option<Material> {
        Self::ALL.into_iter().find(|m| m.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Dirt => "dirt",
            Material::Stone => "stone",
            Material::Red => "red",
            Material::Blue => "blue",
            Material::Green => "green",
            Material::Yellow => "yellow",
        }
    }

    pub fn voxel(self) -> Voxel {
        Voxel::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(std::mem::size_of::<Voxel>(), 1);
    }

    #[test]
    fn test_empty() {
        assert!(Voxel::EMPTY.is_empty());
        assert!(!Voxel::EMPTY.is_solid());
        assert!(Voxel::new(7).is_solid());
        assert_eq!(Voxel::default(), Voxel::EMPTY);
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Material::from_id(2), Some(Material::Stone));
        assert_eq!(Material::from_id(0), None);
        assert_eq!(Material::from_id(42), None);
        assert_eq!(Material::from_name("Yellow"), Some(Material::Yellow));
        assert_eq!(Material::Blue.voxel(), Voxel(4));
    }

    #[test]
    fn test_cast_slice() {
        let voxels = [Voxel(1), Voxel(0), Voxel(3)];
        let bytes: &[u8] = bytemuck::cast_slice(&voxels);
        assert_eq!(bytes, &[1, 0, 3]);
    }
}
