use std::fmt;
use std::path::Path;
use std::str::FromStr;

use meshview_core::ParsedMesh;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::glb::{decode_glb, GLB_MAGIC};
use crate::options::DecodeOptions;
use crate::stl::decode_stl;

/// Supported mesh container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    /// Binary STL triangle soup
    Stl,
    /// Binary glTF container
    Glb,
}

impl MeshFormat {
    /// Pick a format from a file extension (case insensitive).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "glb" => Some(Self::Glb),
            _ => None,
        }
    }

    /// Guess the format from the leading bytes: GLB files start with the
    /// `glTF` magic, binary STL has no magic at all.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(GLB_MAGIC) {
            Self::Glb
        } else {
            Self::Stl
        }
    }

    /// Lowercase name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Glb => "glb",
        }
    }

    /// Decode `bytes` with this format's decoder.
    pub fn decode(self, bytes: &[u8], options: &DecodeOptions) -> Result<ParsedMesh, DecodeError> {
        match self {
            Self::Stl => decode_stl(bytes, options),
            Self::Glb => decode_glb(bytes, options),
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stl" => Ok(Self::Stl),
            "glb" => Ok(Self::Glb),
            other => Err(format!("unknown mesh format '{other}' (expected stl or glb)")),
        }
    }
}

/// Decode `bytes` as `format`.
pub fn decode(
    bytes: &[u8],
    format: MeshFormat,
    options: &DecodeOptions,
) -> Result<ParsedMesh, DecodeError> {
    format.decode(bytes, options)
}
