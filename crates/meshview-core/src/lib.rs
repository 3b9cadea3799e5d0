//! Meshview Core - Decoded mesh data model
//!
//! This crate provides the types shared between the decoders and whatever
//! renders their output:
//! - `ParsedMesh`, the flat positions/normals/indices arrays
//! - Bounding boxes (built on glam)
//! - Vertex welding for turning triangle soups into indexed meshes

pub mod aabb;
pub mod error;
pub mod mesh;
pub mod weld;

pub use aabb::Aabb;
pub use error::MeshError;
pub use glam::Vec3;
pub use mesh::ParsedMesh;
pub use weld::WeldMode;
