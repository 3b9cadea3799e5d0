//! Meshview Assets - Mesh file decoding
//!
//! Bounds-checked decoders for binary STL and binary glTF (GLB) buffers.
//! Decoding is a pure function of the input bytes: no I/O, no logging and no
//! shared state, so any number of decodes may run concurrently. The
//! [`load_mesh`] helper adds file reading and a debug log line on top.

pub mod bounds;
pub mod document;
mod error;
mod format;
pub mod glb;
mod loader;
mod options;
pub mod stl;

#[cfg(test)]
mod fixtures;

pub use error::{AssetError, DecodeError, ErrorKind};
pub use format::{decode, MeshFormat};
pub use glb::{decode_glb, inspect_glb, GlbInfo};
pub use loader::{load_mesh, load_mesh_as, LoadedMesh};
pub use meshview_core::ParsedMesh;
pub use options::{DecodeOptions, OffsetBase};
pub use stl::{decode_stl, looks_like_ascii_stl, read_stl_header, StlHeader};
