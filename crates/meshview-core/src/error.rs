/// Structural problems found when checking a [`ParsedMesh`](crate::ParsedMesh).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("{len} position components do not match vertex count {vertex_count}")]
    PositionLength { vertex_count: u32, len: usize },

    #[error("expected {expected} normal components, found {len}")]
    NormalLength { expected: usize, len: usize },

    #[error("index {index} at position {position} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        position: usize,
        index: u32,
        vertex_count: u32,
    },

    #[error("{0} elements do not form whole triangles")]
    PartialTriangle(usize),

    #[error("{0} vertices exceed the 32-bit vertex count")]
    TooManyVertices(usize),
}
