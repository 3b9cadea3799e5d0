//! Vertex welding: turn a triangle soup into an indexed mesh

use std::collections::HashMap;

use crate::mesh::ParsedMesh;

/// Which vertex attributes must match for two vertices to be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeldMode {
    /// Position and normal must both be bit-identical. Normals are kept.
    #[default]
    PositionAndNormal,
    /// Only positions are compared. Normals are dropped, since merged
    /// vertices may disagree on them.
    PositionOnly,
}

/// Hash key over the raw bit patterns of a vertex. Comparing bits keeps
/// `-0.0` and `0.0` apart and lets NaN positions weld with themselves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey([u32; 6]);

impl VertexKey {
    fn new(position: &[f32], normal: Option<&[f32]>) -> Self {
        let mut bits = [0u32; 6];
        for (slot, value) in bits.iter_mut().zip(position) {
            *slot = value.to_bits();
        }
        if let Some(normal) = normal {
            for (slot, value) in bits[3..].iter_mut().zip(normal) {
                *slot = value.to_bits();
            }
        }
        Self(bits)
    }
}

impl ParsedMesh {
    /// Merge bit-identical vertices (position and normal) into an indexed mesh.
    pub fn weld(&self) -> ParsedMesh {
        self.weld_with(WeldMode::PositionAndNormal)
    }

    /// Merge vertices that share a position, dropping normals.
    pub fn weld_positions(&self) -> ParsedMesh {
        self.weld_with(WeldMode::PositionOnly)
    }

    /// Merge duplicate vertices according to `mode`.
    ///
    /// Unique vertices keep the order of their first occurrence. An existing
    /// index buffer is remapped; a triangle soup gets one index per vertex.
    /// The input mesh is left untouched.
    ///
    /// The mesh must pass [`ParsedMesh::validate`]; an index with no vertex
    /// behind it trips a debug assertion and is kept unchanged in release.
    pub fn weld_with(&self, mode: WeldMode) -> ParsedMesh {
        let normals = match mode {
            WeldMode::PositionAndNormal => self.normals.as_deref(),
            WeldMode::PositionOnly => None,
        };

        let vertex_count = self.vertex_count as usize;
        let mut unique: HashMap<VertexKey, u32> = HashMap::with_capacity(vertex_count);
        let mut remap: Vec<u32> = Vec::with_capacity(vertex_count);
        let mut positions = Vec::new();
        let mut welded_normals = normals.map(|_| Vec::new());

        for (vertex, position) in self.positions.chunks_exact(3).enumerate() {
            let normal = normals.and_then(|n| n.get(vertex * 3..vertex * 3 + 3));
            let key = VertexKey::new(position, normal);
            let next = (positions.len() / 3) as u32;
            let index = *unique.entry(key).or_insert_with(|| {
                positions.extend_from_slice(position);
                if let (Some(out), Some(normal)) = (welded_normals.as_mut(), normal) {
                    out.extend_from_slice(normal);
                }
                next
            });
            remap.push(index);
        }

        let indices = match &self.indices {
            Some(indices) => indices
                .iter()
                .map(|&i| {
                    debug_assert!(
                        (i as usize) < remap.len(),
                        "index {i} out of bounds for {} vertices",
                        remap.len()
                    );
                    remap.get(i as usize).copied().unwrap_or(i)
                })
                .collect(),
            None => remap,
        };

        ParsedMesh {
            vertex_count: (positions.len() / 3) as u32,
            positions,
            normals: welded_normals,
            indices: Some(indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles sharing the edge (1,0,0)-(0,1,0), as a soup.
    fn quad_soup() -> ParsedMesh {
        let positions = vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
        ];
        let normals = [0.0f32, 0.0, 1.0].repeat(6);
        ParsedMesh::from_parts(positions, Some(normals), None).unwrap()
    }

    /// Unit cube as a soup with flat normals: 12 triangles, 36 vertices.
    fn cube_soup() -> ParsedMesh {
        let corner = |i: u32| [(i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32];
        let faces: [[u32; 4]; 6] = [
            [0, 1, 3, 2],
            [4, 6, 7, 5],
            [0, 4, 5, 1],
            [2, 3, 7, 6],
            [0, 2, 6, 4],
            [1, 5, 7, 3],
        ];
        let face_normals = [
            [0.0, 0.0, -1.0],
            [0.0, 0.0, 1.0],
            [0.0, -1.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ];

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for (face, normal) in faces.iter().zip(face_normals) {
            for tri in [[face[0], face[1], face[2]], [face[0], face[2], face[3]]] {
                for c in tri {
                    positions.extend_from_slice(&corner(c));
                    normals.extend_from_slice(&normal);
                }
            }
        }
        ParsedMesh::from_parts(positions, Some(normals), None).unwrap()
    }

    #[test]
    fn shared_edge_is_welded() {
        let welded = quad_soup().weld();
        assert_eq!(welded.vertex_count, 4);
        assert_eq!(welded.indices, Some(vec![0, 1, 2, 1, 3, 2]));
        assert_eq!(welded.normals.as_ref().map(Vec::len), Some(12));
        assert!(welded.validate().is_ok());
    }

    #[test]
    fn cube_positions_collapse_to_corners() {
        let cube = cube_soup();
        assert_eq!(cube.vertex_count, 36);

        let welded = cube.weld_positions();
        assert_eq!(welded.vertex_count, 8);
        assert_eq!(welded.triangle_count(), 12);
        assert!(welded.normals.is_none());
        assert!(welded.validate().is_ok());
    }

    #[test]
    fn differing_normals_keep_vertices_apart() {
        // Each cube corner touches three faces with distinct normals.
        let welded = cube_soup().weld();
        assert_eq!(welded.vertex_count, 24);
        assert_eq!(welded.triangle_count(), 12);
    }

    #[test]
    fn existing_indices_are_remapped() {
        let mesh = ParsedMesh::from_parts(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            None,
            Some(vec![0, 1, 3, 2, 1, 3]),
        )
        .unwrap();
        let welded = mesh.weld();
        assert_eq!(welded.vertex_count, 3);
        assert_eq!(welded.indices, Some(vec![0, 1, 2, 0, 1, 2]));
    }

    #[test]
    fn welding_leaves_input_untouched() {
        let soup = quad_soup();
        let before = soup.clone();
        let _ = soup.weld();
        assert_eq!(soup, before);
        assert!(!soup.is_indexed());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of bounds")]
    fn welding_dangling_index_asserts() {
        let mesh = ParsedMesh {
            positions: vec![0.0; 9],
            normals: None,
            indices: Some(vec![0, 1, 3]),
            vertex_count: 3,
        };
        let _ = mesh.weld();
    }

    #[test]
    fn welding_empty_mesh() {
        let welded = ParsedMesh::empty().weld();
        assert_eq!(welded.vertex_count, 0);
        assert_eq!(welded.indices, Some(Vec::new()));
    }
}
