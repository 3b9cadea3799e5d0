//! Bounds-checked access to raw file buffers.
//!
//! Every read the decoders perform goes through [`checked_slice`], so a byte
//! range is always confirmed to lie inside the buffer before it is touched.

use crate::error::DecodeError;

/// Confirm that `length` bytes starting at `offset` lie within a buffer of
/// `buffer_len` bytes.
///
/// `context` names the sub-resource being checked ("STL triangle block",
/// "bufferView[2]") and is carried into the error. An `offset + length` sum
/// that overflows is reported the same way as one that runs past the end.
pub fn validate(
    buffer_len: usize,
    offset: u64,
    length: u64,
    context: &str,
) -> Result<(), DecodeError> {
    let buffer_len = buffer_len as u64;
    match offset.checked_add(length) {
        Some(end) if end <= buffer_len => Ok(()),
        _ => Err(DecodeError::OutOfRange {
            context: context.to_string(),
            offset,
            length,
            buffer_len,
        }),
    }
}

/// Validate a byte range and return it as a sub-slice of `bytes`.
pub fn checked_slice<'a>(
    bytes: &'a [u8],
    offset: u64,
    length: u64,
    context: &str,
) -> Result<&'a [u8], DecodeError> {
    validate(bytes.len(), offset, length, context)?;
    // Both values are bounded by `bytes.len()` now, so they fit in usize.
    let start = offset as usize;
    let end = start + length as usize;
    Ok(&bytes[start..end])
}

/// Read a little-endian `u32` at `offset`.
pub fn read_u32_le(bytes: &[u8], offset: u64, context: &str) -> Result<u32, DecodeError> {
    let slice = checked_slice(bytes, offset, 4, context)?;
    Ok(u32::from_le_bytes(word(slice)))
}

/// Read a little-endian `u16` at `offset`.
pub fn read_u16_le(bytes: &[u8], offset: u64, context: &str) -> Result<u16, DecodeError> {
    let slice = checked_slice(bytes, offset, 2, context)?;
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Read a little-endian `f32` at `offset`.
pub fn read_f32_le(bytes: &[u8], offset: u64, context: &str) -> Result<f32, DecodeError> {
    let slice = checked_slice(bytes, offset, 4, context)?;
    Ok(f32::from_le_bytes(word(slice)))
}

/// Append three little-endian `f32` values from the start of `slice`.
///
/// Callers hand in a slice already obtained through [`checked_slice`] that is
/// at least 12 bytes long.
pub(crate) fn extend_vec3_le(out: &mut Vec<f32>, slice: &[u8]) {
    out.extend(
        slice[..12]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(word(c))),
    );
}

fn word(slice: &[u8]) -> [u8; 4] {
    let mut word = [0u8; 4];
    word.copy_from_slice(&slice[..4]);
    word
}
