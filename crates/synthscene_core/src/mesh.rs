//! Mesh geometry and materials
//!
//! Geometry is either a backend primitive (box, plane, sphere) or an explicit
//! triangle buffer. Buffers can be filled attribute by attribute, or loaded
//! from a Wavefront OBJ file.

use std::fmt;
use std::path::Path;

use serde::{Serialize, Deserialize};
use synthscene_math::{Aabb, Color, Vec3};

/// The only vertex attribute a [`BufferGeometry`] understands
pub const POSITION_ATTRIBUTE: &str = "position";

/// Flat `f32` data interpreted in groups of `item_size` components
#[derive(Clone, Debug, PartialEq)]
pub struct Float32BufferAttribute {
    pub data: Vec<f32>,
    pub item_size: usize,
}

impl Float32BufferAttribute {
    /// Wrap flat data with the given component count per item
    pub fn new(data: Vec<f32>, item_size: usize) -> Self {
        Self { data, item_size }
    }

    /// Number of items (vertices) in the buffer
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.data.len() / self.item_size
        }
    }
}

/// Error building or loading mesh geometry
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Attribute other than `position`
    UnsupportedAttribute(String),
    /// Attribute item size is not 3, or data length is not a multiple of it
    InvalidItemSize { item_size: usize, len: usize },
    /// A face references a vertex that does not exist
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// Index buffer length is not a multiple of 3
    NotTriangles(usize),
    /// Geometry file could not be loaded
    Load(String),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::UnsupportedAttribute(name) => {
                write!(f, "Unsupported buffer attribute: '{}'", name)
            }
            GeometryError::InvalidItemSize { item_size, len } => {
                write!(f, "Invalid position attribute: item size {} with {} values", item_size, len)
            }
            GeometryError::IndexOutOfRange { index, vertex_count } => {
                write!(f, "Face index {} out of range ({} vertices)", index, vertex_count)
            }
            GeometryError::NotTriangles(len) => {
                write!(f, "Index buffer of length {} is not a triangle list", len)
            }
            GeometryError::Load(msg) => write!(f, "Geometry load error: {}", msg),
        }
    }
}

impl std::error::Error for GeometryError {}

/// An explicit triangle mesh
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferGeometry {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl BufferGeometry {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from vertices and triangles, checking the indices
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, GeometryError> {
        let geometry = Self { vertices, faces };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Set a vertex attribute
    ///
    /// Only `position` with an item size of 3 is supported.
    pub fn set_attribute(&mut self, name: &str, attribute: Float32BufferAttribute) -> Result<(), GeometryError> {
        if name != POSITION_ATTRIBUTE {
            return Err(GeometryError::UnsupportedAttribute(name.to_string()));
        }
        if attribute.item_size != 3 || attribute.data.len() % 3 != 0 {
            return Err(GeometryError::InvalidItemSize {
                item_size: attribute.item_size,
                len: attribute.data.len(),
            });
        }
        self.vertices = bytemuck::cast_slice::<f32, Vec3>(&attribute.data).to_vec();
        Ok(())
    }

    /// Set the triangle index list
    pub fn set_index(&mut self, faces: Vec<[u32; 3]>) {
        self.faces = faces;
    }

    /// Set the triangle index list from flat indices
    pub fn set_index_flat(&mut self, indices: &[u32]) -> Result<(), GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::NotTriangles(indices.len()));
        }
        self.faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(())
    }

    /// Check that every face index refers to an existing vertex
    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertex_count = self.vertices.len();
        for face in &self.faces {
            for &index in face {
                if index as usize >= vertex_count {
                    return Err(GeometryError::IndexOutOfRange { index, vertex_count });
                }
            }
        }
        Ok(())
    }

    /// Bounding box of the vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Load the first model of a Wavefront OBJ file, triangulated
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, GeometryError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|e| GeometryError::Load(format!("{}: {}", path.display(), e)))?;

        let model = models
            .into_iter()
            .next()
            .ok_or_else(|| GeometryError::Load(format!("{}: no models in file", path.display())))?;

        log::debug!(
            "Loaded OBJ model '{}' ({} positions, {} indices)",
            model.name,
            model.mesh.positions.len() / 3,
            model.mesh.indices.len()
        );

        let mut geometry = Self::new();
        geometry.set_attribute(POSITION_ATTRIBUTE, Float32BufferAttribute::new(model.mesh.positions, 3))?;
        geometry.set_index_flat(&model.mesh.indices)?;
        geometry.validate()?;
        Ok(geometry)
    }
}

/// Mesh geometry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Unit cube centered at the origin (side length 1)
    Box,
    /// Unit square in the XY plane centered at the origin
    Plane,
    /// UV sphere of radius 0.5
    Sphere { segments: u32, rings: u32 },
    /// Explicit triangle mesh
    Buffer(BufferGeometry),
}

impl Geometry {
    /// UV sphere with the backend's default tessellation
    pub fn sphere() -> Self {
        Geometry::Sphere { segments: 32, rings: 16 }
    }

    /// Short name of the geometry kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Box => "box",
            Geometry::Plane => "plane",
            Geometry::Sphere { .. } => "sphere",
            Geometry::Buffer(_) => "buffer",
        }
    }
}

/// Surface material
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Unlit, constant color
    Flat { color: Color },
    /// Lit with specular highlights; higher shininess means tighter highlights
    Phong { color: Color, shininess: f32 },
    /// Invisible except for the shadows it receives
    Shadow,
}

impl Default for Material {
    fn default() -> Self {
        Material::flat(Color::WHITE)
    }
}

impl Material {
    /// Flat material
    pub fn flat(color: Color) -> Self {
        Material::Flat { color }
    }

    /// Phong material with the default shininess of 30
    pub fn phong(color: Color) -> Self {
        Material::Phong { color, shininess: 30.0 }
    }

    /// Shadow-catcher material
    pub fn shadow() -> Self {
        Material::Shadow
    }

    /// Base color, `None` for shadow catchers
    pub fn color(&self) -> Option<Color> {
        match self {
            Material::Flat { color } | Material::Phong { color, .. } => Some(*color),
            Material::Shadow => None,
        }
    }
}

/// Geometry paired with a material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl Mesh {
    /// Create a mesh
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_set_position_attribute() {
        let mut geometry = BufferGeometry::new();
        let data = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        geometry.set_attribute("position", Float32BufferAttribute::new(data, 3)).unwrap();
        geometry.set_index(vec![[0, 1, 2]]);

        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.vertices[1], Vec3::X);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_rejects_other_attributes() {
        let mut geometry = BufferGeometry::new();
        let err = geometry
            .set_attribute("normal", Float32BufferAttribute::new(vec![0.0; 3], 3))
            .unwrap_err();
        assert_eq!(err, GeometryError::UnsupportedAttribute("normal".to_string()));
    }

    #[test]
    fn test_rejects_bad_item_size() {
        let mut geometry = BufferGeometry::new();
        let err = geometry
            .set_attribute("position", Float32BufferAttribute::new(vec![0.0; 4], 2))
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidItemSize { item_size: 2, len: 4 }));

        let err = geometry
            .set_attribute("position", Float32BufferAttribute::new(vec![0.0; 4], 3))
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidItemSize { item_size: 3, len: 4 }));
    }

    #[test]
    fn test_validate_out_of_range_index() {
        let result = BufferGeometry::from_parts(vec![Vec3::ZERO, Vec3::X], vec![[0, 1, 2]]);
        assert_eq!(
            result.unwrap_err(),
            GeometryError::IndexOutOfRange { index: 2, vertex_count: 2 }
        );
    }

    #[test]
    fn test_set_index_flat_requires_triangles() {
        let mut geometry = BufferGeometry::new();
        assert_eq!(geometry.set_index_flat(&[0, 1]), Err(GeometryError::NotTriangles(2)));
        geometry.set_index_flat(&[0, 1, 2, 2, 1, 0]).unwrap();
        assert_eq!(geometry.faces, vec![[0, 1, 2], [2, 1, 0]]);
    }

    #[test]
    fn test_bounds() {
        let geometry = BufferGeometry::from_parts(
            vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.5), Vec3::ZERO],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 0.5));
        assert!(BufferGeometry::new().bounds().is_none());
    }

    #[test]
    fn test_from_obj_triangulates_quad() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "o quad").unwrap();
        writeln!(file, "v 0 0 0").unwrap();
        writeln!(file, "v 1 0 0").unwrap();
        writeln!(file, "v 1 1 0").unwrap();
        writeln!(file, "v 0 1 0").unwrap();
        writeln!(file, "f 1 2 3 4").unwrap();
        drop(file);

        let geometry = BufferGeometry::from_obj(&path).unwrap();
        assert_eq!(geometry.vertices.len(), 4);
        assert_eq!(geometry.faces.len(), 2);
    }

    #[test]
    fn test_from_obj_missing_file() {
        let err = BufferGeometry::from_obj("/nonexistent/mesh.obj").unwrap_err();
        assert!(matches!(err, GeometryError::Load(_)));
    }

    #[test]
    fn test_material_color() {
        assert_eq!(Material::phong(Color::GRAY).color(), Some(Color::GRAY));
        assert_eq!(Material::shadow().color(), None);
        assert_eq!(Material::default(), Material::flat(Color::WHITE));
    }
}
