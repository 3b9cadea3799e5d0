use serde::{Deserialize, Serialize};

/// Where glTF bufferView byte offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetBase {
    /// Offsets count from the first byte of the file.
    #[default]
    File,
    /// Offsets count from the first data byte of the `BIN` chunk that follows
    /// the JSON chunk, as written by most exporters.
    BinChunk,
}

/// Knobs that adjust how tolerant the decoders are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Report `UnsupportedFormat("ASCII STL")` instead of `Truncated` when an
    /// STL buffer fails its length check and its header reads as ASCII text.
    pub detect_ascii_stl: bool,
    /// Require the `glTF` magic, container version 2 and a `JSON` first chunk.
    pub strict_glb_header: bool,
    /// Base for glTF bufferView offsets.
    pub glb_offset_base: OffsetBase,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            detect_ascii_stl: true,
            strict_glb_header: false,
            glb_offset_base: OffsetBase::File,
        }
    }
}

impl DecodeOptions {
    /// Options for files written by standard glTF exporters: strict header
    /// and offsets relative to the `BIN` chunk.
    pub fn standard_glb() -> Self {
        Self {
            strict_glb_header: true,
            glb_offset_base: OffsetBase::BinChunk,
            ..Self::default()
        }
    }
}
