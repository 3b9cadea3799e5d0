//! Typed view of the glTF JSON chunk.
//!
//! Only the parts needed to locate triangle geometry are modelled; every
//! other key is ignored. Cross references stay plain `u32` indices into the
//! owned tables and are resolved through [`Tables`], which turns a dangling
//! reference into a `MissingField` error instead of a panic.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::DecodeError;

/// `componentType` of 32-bit floats.
pub const COMPONENT_F32: u32 = 5126;
/// `componentType` of unsigned 16-bit integers.
pub const COMPONENT_U16: u32 = 5123;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfDocument {
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    pub buffer_views: Option<Vec<BufferView>>,
    pub accessors: Option<Vec<Accessor>>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub uri: Option<String>,
    pub byte_length: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    #[serde(default)]
    pub buffer: u32,
    #[serde(default)]
    pub byte_offset: u32,
    pub byte_length: Option<u32>,
    pub byte_stride: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: Option<u32>,
    #[serde(default)]
    pub byte_offset: u32,
    pub component_type: Option<u32>,
    pub count: Option<u32>,
    #[serde(rename = "type")]
    pub element_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Mesh {
    pub name: Option<String>,
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Primitive {
    #[serde(default)]
    pub attributes: BTreeMap<String, u32>,
    pub indices: Option<u32>,
}

impl GltfDocument {
    /// Parse the JSON chunk text.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Total number of primitives across all meshes.
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives.len()).sum()
    }

    pub fn tables(&self) -> Tables<'_> {
        Tables { document: self }
    }
}

/// Shape of an accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "SCALAR" => Self::Scalar,
            "VEC2" => Self::Vec2,
            "VEC3" => Self::Vec3,
            "VEC4" => Self::Vec4,
            "MAT2" => Self::Mat2,
            "MAT3" => Self::Mat3,
            "MAT4" => Self::Mat4,
            _ => return None,
        })
    }

    /// Number of components per element
    pub fn components(self) -> u32 {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// Checked lookups into the document's tables.
#[derive(Clone, Copy)]
pub struct Tables<'d> {
    document: &'d GltfDocument,
}

impl<'d> Tables<'d> {
    pub fn accessor(&self, index: u32) -> Result<&'d Accessor, DecodeError> {
        lookup(self.document.accessors.as_deref(), "accessors", index)
    }

    pub fn buffer_view(&self, index: u32) -> Result<&'d BufferView, DecodeError> {
        lookup(self.document.buffer_views.as_deref(), "bufferViews", index)
    }

    /// Fail with `UnsupportedFormat("external buffer")` unless `buffer` is the
    /// container's own embedded buffer.
    pub fn require_embedded(&self, buffer: u32) -> Result<(), DecodeError> {
        let external = buffer != 0
            || self
                .document
                .buffers
                .first()
                .is_some_and(|b| b.uri.is_some());
        if external {
            return Err(DecodeError::unsupported("external buffer"));
        }
        Ok(())
    }
}

fn lookup<'d, T>(table: Option<&'d [T]>, name: &str, index: u32) -> Result<&'d T, DecodeError> {
    let table = table.ok_or_else(|| DecodeError::missing(name))?;
    table
        .get(index as usize)
        .ok_or_else(|| DecodeError::missing(format!("{name}[{index}]")))
}
