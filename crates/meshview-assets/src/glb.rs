//! Binary glTF (GLB) container decoding.
//!
//! A GLB file is a 12-byte header (`glTF` magic, version, total length)
//! followed by a length-prefixed JSON chunk and, usually, a `BIN` chunk. The
//! JSON describes meshes whose primitives point at accessors, which point at
//! bufferViews, which name byte ranges of the binary payload. All meshes are
//! flattened into one [`ParsedMesh`] in document order.

use meshview_core::ParsedMesh;

use crate::bounds::{checked_slice, extend_vec3_le, read_u32_le, validate};
use crate::document::{ElementType, GltfDocument, Tables, COMPONENT_F32, COMPONENT_U16};
use crate::error::DecodeError;
use crate::options::{DecodeOptions, OffsetBase};

pub const GLB_MAGIC: &[u8; 4] = b"glTF";
pub const GLB_VERSION: u32 = 2;

const CHUNK_JSON: &[u8; 4] = b"JSON";
const CHUNK_BIN: &[u8; 4] = b"BIN\0";
/// 12-byte file header plus the JSON chunk's length and type words.
const JSON_CHUNK_START: u64 = 20;

/// Container-level facts about a GLB buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlbInfo {
    pub version: u32,
    pub declared_len: u32,
    pub json_len: u32,
    pub bin_len: Option<u32>,
    pub mesh_count: usize,
    /// Name of each mesh in document order, `None` where the mesh is unnamed.
    pub mesh_names: Vec<Option<String>>,
    pub primitive_count: usize,
    pub accessor_count: usize,
    pub buffer_view_count: usize,
}

/// Decode every triangle primitive of a GLB buffer into one mesh.
///
/// Primitives without a `POSITION` attribute are skipped. Index buffers are
/// rebased so they address the concatenated vertex arrays. Normals are kept
/// only when every contributing primitive has them.
pub fn decode_glb(bytes: &[u8], options: &DecodeOptions) -> Result<ParsedMesh, DecodeError> {
    let container = Container::open(bytes, options)?;
    let document = &container.document;

    let base = match options.glb_offset_base {
        OffsetBase::File => 0,
        OffsetBase::BinChunk if document.primitive_count() > 0 => container.bin_chunk()?.0,
        OffsetBase::BinChunk => 0,
    };
    let reader = AccessorReader {
        bytes,
        tables: document.tables(),
        base,
    };

    let mut primitives = Vec::new();
    for mesh in &document.meshes {
        for primitive in &mesh.primitives {
            let Some(&position) = primitive.attributes.get("POSITION") else {
                continue;
            };
            let (positions, vertex_count) = reader.read_vec3(position, "POSITION")?;

            let normals = match primitive.attributes.get("NORMAL") {
                Some(&normal) => {
                    let (normals, count) = reader.read_vec3(normal, "NORMAL")?;
                    if count != vertex_count {
                        return Err(DecodeError::CountMismatch {
                            attribute: "NORMAL".into(),
                            expected: vertex_count,
                            actual: count,
                        });
                    }
                    Some(normals)
                }
                None => None,
            };

            let indices = primitive
                .indices
                .map(|index| reader.read_indices(index, vertex_count))
                .transpose()?;

            primitives.push(PrimitiveGeometry {
                positions,
                normals,
                indices,
                vertex_count,
            });
        }
    }

    assemble(primitives)
}

/// Read the container header and JSON tables without decoding geometry.
pub fn inspect_glb(bytes: &[u8]) -> Result<GlbInfo, DecodeError> {
    let container = Container::open(bytes, &DecodeOptions::default())?;
    let document = &container.document;
    Ok(GlbInfo {
        version: read_u32_le(bytes, 4, "GLB version")?,
        declared_len: read_u32_le(bytes, 8, "GLB length")?,
        json_len: container.json_len,
        bin_len: container.bin_chunk().ok().map(|(_, len)| len),
        mesh_count: document.meshes.len(),
        mesh_names: document.meshes.iter().map(|m| m.name.clone()).collect(),
        primitive_count: document.primitive_count(),
        accessor_count: document.accessors.as_ref().map_or(0, Vec::len),
        buffer_view_count: document.buffer_views.as_ref().map_or(0, Vec::len),
    })
}

/// A GLB buffer whose JSON chunk has been located and parsed.
struct Container<'a> {
    bytes: &'a [u8],
    json_len: u32,
    document: GltfDocument,
}

impl<'a> Container<'a> {
    fn open(bytes: &'a [u8], options: &DecodeOptions) -> Result<Self, DecodeError> {
        let actual = bytes.len() as u64;
        if actual < JSON_CHUNK_START {
            return Err(DecodeError::Truncated {
                expected: JSON_CHUNK_START,
                actual,
            });
        }
        if options.strict_glb_header {
            check_header(bytes)?;
        }

        let json_len = read_u32_le(bytes, 12, "GLB JSON chunk length")?;
        let json_end = JSON_CHUNK_START + u64::from(json_len);
        if actual < json_end {
            return Err(DecodeError::Truncated {
                expected: json_end,
                actual,
            });
        }

        let json = checked_slice(bytes, JSON_CHUNK_START, u64::from(json_len), "GLB JSON chunk")?;
        let document = GltfDocument::from_json(std::str::from_utf8(json)?)?;

        Ok(Self {
            bytes,
            json_len,
            document,
        })
    }

    /// File offset and length of the `BIN` chunk data following the JSON chunk.
    fn bin_chunk(&self) -> Result<(u64, u32), DecodeError> {
        let missing = |_: DecodeError| DecodeError::missing("BIN chunk");
        let header = JSON_CHUNK_START + u64::from(self.json_len);
        let len = read_u32_le(self.bytes, header, "GLB BIN chunk header").map_err(missing)?;
        let kind = checked_slice(self.bytes, header + 4, 4, "GLB BIN chunk header").map_err(missing)?;
        if kind != CHUNK_BIN {
            return Err(DecodeError::missing("BIN chunk"));
        }
        let start = header + 8;
        validate(self.bytes.len(), start, u64::from(len), "GLB BIN chunk")?;
        Ok((start, len))
    }
}

fn check_header(bytes: &[u8]) -> Result<(), DecodeError> {
    if checked_slice(bytes, 0, 4, "GLB magic")? != GLB_MAGIC {
        return Err(DecodeError::unsupported("not a GLB container"));
    }
    let version = read_u32_le(bytes, 4, "GLB version")?;
    if version != GLB_VERSION {
        return Err(DecodeError::unsupported(format!("glTF version {version}")));
    }
    if checked_slice(bytes, 16, 4, "GLB JSON chunk type")? != CHUNK_JSON {
        return Err(DecodeError::unsupported("not a GLB container"));
    }
    Ok(())
}

/// An accessor's validated byte range.
struct Located<'a> {
    data: &'a [u8],
    count: u32,
    stride: usize,
}

impl Located<'_> {
    /// Bytes of element `i`; `data` covers `(count - 1) * stride + element_size`.
    fn element(&self, i: u32) -> &[u8] {
        &self.data[i as usize * self.stride..]
    }
}

struct AccessorReader<'a> {
    bytes: &'a [u8],
    tables: Tables<'a>,
    base: u64,
}

impl<'a> AccessorReader<'a> {
    /// Read a float VEC3 attribute, returning flat components and element count.
    fn read_vec3(&self, accessor: u32, attribute: &str) -> Result<(Vec<f32>, u32), DecodeError> {
        let located = self.locate(accessor, attribute, 12, COMPONENT_F32, ElementType::Vec3)?;
        let mut out = Vec::with_capacity(located.count as usize * 3);
        for i in 0..located.count {
            extend_vec3_le(&mut out, located.element(i));
        }
        Ok((out, located.count))
    }

    /// Read an unsigned 16-bit index accessor, widened to `u32`.
    ///
    /// Every index must address one of the primitive's own `vertex_count`
    /// vertices, so rebasing can never reach into a neighbouring primitive.
    fn read_indices(&self, accessor: u32, vertex_count: u32) -> Result<Vec<u32>, DecodeError> {
        let located = self.locate(accessor, "indices", 2, COMPONENT_U16, ElementType::Scalar)?;
        (0..located.count)
            .map(|i| {
                let element = located.element(i);
                let index = u32::from(u16::from_le_bytes([element[0], element[1]]));
                if index >= vertex_count {
                    return Err(DecodeError::IndexOutOfRange {
                        accessor,
                        position: i,
                        index,
                        vertex_count,
                    });
                }
                Ok(index)
            })
            .collect()
    }

    /// Resolve accessor → bufferView, bounds-check both ranges, then confirm
    /// the accessor holds the expected component and element types.
    fn locate(
        &self,
        index: u32,
        attribute: &str,
        element_size: u64,
        component_type: u32,
        element_type: ElementType,
    ) -> Result<Located<'a>, DecodeError> {
        let accessor = self.tables.accessor(index)?;
        let count = accessor
            .count
            .ok_or_else(|| DecodeError::missing(format!("accessors[{index}].count")))?;
        let view_index = accessor
            .buffer_view
            .ok_or_else(|| DecodeError::missing(format!("accessors[{index}].bufferView")))?;

        let view = self.tables.buffer_view(view_index)?;
        self.tables.require_embedded(view.buffer)?;
        let view_len = view.byte_length.ok_or_else(|| {
            DecodeError::missing(format!("bufferViews[{view_index}].byteLength"))
        })?;

        let context = format!("bufferView[{view_index}]");
        let view_start = self.base + u64::from(view.byte_offset);
        validate(self.bytes.len(), view_start, u64::from(view_len), &context)?;

        let stride = match view.byte_stride {
            None => element_size,
            Some(stride) if u64::from(stride) >= element_size => u64::from(stride),
            Some(stride) => {
                return Err(DecodeError::InvalidMetadata {
                    reason: format!(
                        "bufferViews[{view_index}].byteStride {stride} is smaller than the {element_size}-byte {attribute} element"
                    ),
                })
            }
        };
        let extent = match count {
            0 => 0,
            n => u64::from(n - 1) * stride + element_size,
        };
        // The accessor must stay inside its own view, not just inside the file.
        validate(view_len as usize, u64::from(accessor.byte_offset), extent, &context)?;
        let start = view_start + u64::from(accessor.byte_offset);
        let data = checked_slice(self.bytes, start, extent, &context)?;

        let actual_component = accessor
            .component_type
            .ok_or_else(|| DecodeError::missing(format!("accessors[{index}].componentType")))?;
        if actual_component != component_type {
            return Err(DecodeError::UnsupportedComponentType {
                component_type: actual_component,
                attribute: attribute.to_string(),
            });
        }

        let type_name = accessor
            .element_type
            .as_deref()
            .ok_or_else(|| DecodeError::missing(format!("accessors[{index}].type")))?;
        if ElementType::parse(type_name) != Some(element_type) {
            return Err(DecodeError::UnsupportedElementType {
                element_type: type_name.to_string(),
                attribute: attribute.to_string(),
            });
        }

        Ok(Located {
            data,
            count,
            stride: stride as usize,
        })
    }
}

/// Geometry of one decoded primitive, before concatenation.
struct PrimitiveGeometry {
    positions: Vec<f32>,
    normals: Option<Vec<f32>>,
    indices: Option<Vec<u32>>,
    vertex_count: u32,
}

fn assemble(primitives: Vec<PrimitiveGeometry>) -> Result<ParsedMesh, DecodeError> {
    let any_indexed = primitives.iter().any(|p| p.indices.is_some());
    let all_normals = !primitives.is_empty() && primitives.iter().all(|p| p.normals.is_some());

    let mut positions = Vec::with_capacity(primitives.iter().map(|p| p.positions.len()).sum());
    let mut normals = all_normals.then(|| Vec::with_capacity(positions.capacity()));
    let mut indices = any_indexed.then(Vec::new);
    let mut base = 0u32;

    for primitive in primitives {
        if let Some(out) = indices.as_mut() {
            // A non-indexed primitive in an otherwise indexed mesh gets a
            // sequential index run so its triangles are not lost.
            match &primitive.indices {
                Some(local) => {
                    for &index in local {
                        out.push(rebase(base, index)?);
                    }
                }
                None => {
                    for index in 0..primitive.vertex_count {
                        out.push(rebase(base, index)?);
                    }
                }
            }
        }
        positions.extend_from_slice(&primitive.positions);
        if let (Some(out), Some(local)) = (normals.as_mut(), &primitive.normals) {
            out.extend_from_slice(local);
        }
        base = base
            .checked_add(primitive.vertex_count)
            .ok_or_else(too_many_vertices)?;
    }

    Ok(ParsedMesh {
        positions,
        normals,
        indices,
        vertex_count: base,
    })
}

fn rebase(base: u32, index: u32) -> Result<u32, DecodeError> {
    base.checked_add(index).ok_or_else(too_many_vertices)
}

fn too_many_vertices() -> DecodeError {
    DecodeError::unsupported("mesh with more than u32::MAX vertices")
}
