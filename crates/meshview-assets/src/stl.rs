//! Binary STL decoding.
//!
//! Layout: an 80-byte header, a little-endian `u32` triangle count, then one
//! 50-byte record per triangle (facet normal, three vertices, two attribute
//! bytes). The output is a flat-shaded triangle soup.

use meshview_core::ParsedMesh;

use crate::bounds::{checked_slice, extend_vec3_le, read_u32_le};
use crate::error::DecodeError;
use crate::options::DecodeOptions;

/// Length of the free-form header.
pub const HEADER_LEN: u64 = 80;
/// Header plus the triangle count.
pub const PREAMBLE_LEN: u64 = 84;
/// Size of one triangle record.
pub const RECORD_LEN: u64 = 50;

/// How many leading bytes are inspected when guessing whether a buffer is
/// ASCII STL.
const ASCII_PREFIX_LEN: usize = 256;

/// The header of a binary STL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlHeader {
    /// Header text with trailing NULs and whitespace removed.
    pub comment: String,
    /// Declared number of triangle records.
    pub triangle_count: u32,
}

impl StlHeader {
    /// Number of bytes a file with this header must contain.
    pub fn expected_len(&self) -> u64 {
        PREAMBLE_LEN + RECORD_LEN * u64::from(self.triangle_count)
    }
}

/// Read the header and declared triangle count without decoding geometry.
pub fn read_stl_header(bytes: &[u8]) -> Result<StlHeader, DecodeError> {
    require_len(bytes, PREAMBLE_LEN, &DecodeOptions::default())?;
    let header = checked_slice(bytes, 0, HEADER_LEN, "STL header")?;
    let triangle_count = read_u32_le(bytes, HEADER_LEN, "STL triangle count")?;
    let comment = String::from_utf8_lossy(header)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();
    Ok(StlHeader {
        comment,
        triangle_count,
    })
}

/// Decode a binary STL buffer into a non-indexed mesh with one normal per
/// vertex (the facet normal repeated three times).
pub fn decode_stl(bytes: &[u8], options: &DecodeOptions) -> Result<ParsedMesh, DecodeError> {
    require_len(bytes, PREAMBLE_LEN, options)?;
    let triangle_count = read_u32_le(bytes, HEADER_LEN, "STL triangle count")?;

    let block_len = RECORD_LEN * u64::from(triangle_count);
    require_len(bytes, PREAMBLE_LEN + block_len, options)?;
    let block = checked_slice(bytes, PREAMBLE_LEN, block_len, "STL triangle block")?;

    let vertex_count = triangle_count
        .checked_mul(3)
        .ok_or_else(|| DecodeError::unsupported("STL with more than u32::MAX vertices"))?;
    let floats = vertex_count as usize * 3;
    let mut positions = Vec::with_capacity(floats);
    let mut normals = Vec::with_capacity(floats);

    for record in block.chunks_exact(RECORD_LEN as usize) {
        let normal = &record[0..12];
        for vertex in record[12..48].chunks_exact(12) {
            extend_vec3_le(&mut positions, vertex);
            extend_vec3_le(&mut normals, normal);
        }
    }

    Ok(ParsedMesh {
        positions,
        normals: Some(normals),
        indices: None,
        vertex_count,
    })
}

/// Whether `bytes` plausibly hold ASCII STL text: after optional leading
/// whitespace they start with `solid`, and the inspected prefix is 7-bit ASCII.
///
/// Binary exporters frequently start their header with `solid` too, so this
/// is only consulted once the binary length accounting has already failed.
pub fn looks_like_ascii_stl(bytes: &[u8]) -> bool {
    let prefix = &bytes[..bytes.len().min(ASCII_PREFIX_LEN)];
    let start = prefix
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(prefix.len());
    prefix[start..].starts_with(b"solid") && prefix.is_ascii()
}

fn require_len(bytes: &[u8], expected: u64, options: &DecodeOptions) -> Result<(), DecodeError> {
    let actual = bytes.len() as u64;
    if actual >= expected {
        return Ok(());
    }
    if options.detect_ascii_stl && looks_like_ascii_stl(bytes) {
        return Err(DecodeError::unsupported("ASCII STL"));
    }
    Err(DecodeError::Truncated { expected, actual })
}
