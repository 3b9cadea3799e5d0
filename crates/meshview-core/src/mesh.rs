//! Decoded triangle geometry handed to the rendering collaborator

use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::error::MeshError;

/// Triangle geometry recovered from a mesh file.
///
/// `positions` and `normals` are flat `f32` arrays with three components per
/// vertex. Without `indices` every consecutive run of three vertices is one
/// triangle (a triangle soup); with `indices` every consecutive run of three
/// indices is one triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedMesh {
    pub positions: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub indices: Option<Vec<u32>>,
    pub vertex_count: u32,
}

impl ParsedMesh {
    /// Create an empty mesh
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a mesh from flat positions, deriving `vertex_count`.
    pub fn from_parts(
        positions: Vec<f32>,
        normals: Option<Vec<f32>>,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, MeshError> {
        let vertex_count = u32::try_from(positions.len() / 3)
            .map_err(|_| MeshError::TooManyVertices(positions.len() / 3))?;
        let mesh = Self {
            positions,
            normals,
            indices,
            vertex_count,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check the structural invariants of the mesh.
    pub fn validate(&self) -> Result<(), MeshError> {
        let expected = self.vertex_count as usize * 3;
        if self.positions.len() != expected {
            return Err(MeshError::PositionLength {
                vertex_count: self.vertex_count,
                len: self.positions.len(),
            });
        }

        if let Some(normals) = &self.normals {
            if normals.len() != self.positions.len() {
                return Err(MeshError::NormalLength {
                    expected: self.positions.len(),
                    len: normals.len(),
                });
            }
        }

        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::PartialTriangle(indices.len()));
                }
                if let Some((position, &index)) = indices
                    .iter()
                    .enumerate()
                    .find(|&(_, &index)| index >= self.vertex_count)
                {
                    return Err(MeshError::IndexOutOfBounds {
                        position,
                        index,
                        vertex_count: self.vertex_count,
                    });
                }
            }
            None => {
                if self.vertex_count % 3 != 0 {
                    return Err(MeshError::PartialTriangle(self.vertex_count as usize));
                }
            }
        }

        Ok(())
    }

    /// Whether the mesh shares vertices through an index buffer
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Whether per-vertex normals are present
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Whether the mesh contains no vertices
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Number of whole triangles described by the mesh.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count as usize / 3,
        }
    }

    /// Position of vertex `index`, if it exists.
    pub fn position(&self, index: u32) -> Option<[f32; 3]> {
        let start = index as usize * 3;
        self.positions
            .get(start..start + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Axis-aligned bounds of all vertex positions, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_positions(&self.positions)
    }

    /// Raw bytes of `positions` for vertex buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of `normals`, if present.
    pub fn normal_bytes(&self) -> Option<&[u8]> {
        self.normals.as_deref().map(bytemuck::cast_slice)
    }

    /// Raw bytes of `indices`, if present.
    pub fn index_bytes(&self) -> Option<&[u8]> {
        self.indices.as_deref().map(bytemuck::cast_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ParsedMesh {
        ParsedMesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
            indices: None,
            vertex_count: 3,
        }
    }

    #[test]
    fn empty_mesh_is_valid() {
        let mesh = ParsedMesh::empty();
        assert!(mesh.validate().is_ok());
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn from_parts_derives_vertex_count() {
        let mesh = ParsedMesh::from_parts(vec![0.0; 9], None, Some(vec![0, 1, 2])).unwrap();
        assert_eq!(mesh.vertex_count, 3);
        assert!(mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn position_length_mismatch_is_rejected() {
        let mut mesh = triangle();
        mesh.vertex_count = 4;
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::PositionLength { vertex_count: 4, len: 9 })
        ));
    }

    #[test]
    fn normal_length_mismatch_is_rejected() {
        let mut mesh = triangle();
        mesh.normals = Some(vec![0.0; 3]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::NormalLength { expected: 9, len: 3 })
        ));
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let mut mesh = triangle();
        mesh.indices = Some(vec![0, 1, 3]);
        match mesh.validate() {
            Err(MeshError::IndexOutOfBounds {
                position,
                index,
                vertex_count,
            }) => {
                assert_eq!(position, 2);
                assert_eq!(index, 3);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("expected IndexOutOfBounds, got: {:?}", other),
        }
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mut mesh = triangle();
        mesh.indices = Some(vec![0, 1]);
        assert!(matches!(mesh.validate(), Err(MeshError::PartialTriangle(2))));
    }

    #[test]
    fn position_lookup() {
        let mesh = triangle();
        assert_eq!(mesh.position(1), Some([1.0, 0.0, 0.0]));
        assert_eq!(mesh.position(3), None);
    }

    #[test]
    fn byte_views_cover_all_components() {
        let mut mesh = triangle();
        mesh.indices = Some(vec![0, 1, 2]);
        assert_eq!(mesh.position_bytes().len(), 9 * 4);
        assert_eq!(mesh.normal_bytes().map(<[u8]>::len), Some(9 * 4));
        assert_eq!(mesh.index_bytes().map(<[u8]>::len), Some(3 * 4));
        assert_eq!(&mesh.position_bytes()[12..16], &1.0f32.to_ne_bytes());
    }
}
