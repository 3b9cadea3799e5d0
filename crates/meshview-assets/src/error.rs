use std::path::PathBuf;

/// Reasons a mesh buffer could not be decoded.
///
/// Decoders stop at the first structural violation and return it; no partial
/// mesh is ever produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("buffer truncated: expected at least {expected} bytes, found {actual}")]
    Truncated { expected: u64, actual: u64 },

    #[error(
        "{context} out of range: {length} bytes at offset {offset} exceed buffer of {buffer_len} bytes"
    )]
    OutOfRange {
        context: String,
        offset: u64,
        length: u64,
        buffer_len: u64,
    },

    #[error("missing field '{name}'")]
    MissingField { name: String },

    #[error("unsupported component type {component_type} for {attribute}")]
    UnsupportedComponentType {
        component_type: u32,
        attribute: String,
    },

    #[error("unsupported element type '{element_type}' for {attribute}")]
    UnsupportedElementType {
        element_type: String,
        attribute: String,
    },

    #[error("{attribute} has {actual} elements, expected {expected}")]
    CountMismatch {
        attribute: String,
        expected: u32,
        actual: u32,
    },

    #[error(
        "accessors[{accessor}] element {position} holds index {index}, out of range for {vertex_count} vertices"
    )]
    IndexOutOfRange {
        accessor: u32,
        position: u32,
        index: u32,
        vertex_count: u32,
    },

    #[error("unsupported format: {kind}")]
    UnsupportedFormat { kind: String },

    #[error("invalid glTF metadata: {reason}")]
    InvalidMetadata { reason: String },
}

/// Coarse error category, for mapping decode failures to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Truncated,
    OutOfRange,
    MissingField,
    UnsupportedComponentType,
    UnsupportedElementType,
    CountMismatch,
    IndexOutOfRange,
    UnsupportedFormat,
    InvalidMetadata,
}

impl DecodeError {
    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self::MissingField { name: name.into() }
    }

    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedFormat { kind: kind.into() }
    }

    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::UnsupportedComponentType { .. } => ErrorKind::UnsupportedComponentType,
            Self::UnsupportedElementType { .. } => ErrorKind::UnsupportedElementType,
            Self::CountMismatch { .. } => ErrorKind::CountMismatch,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::InvalidMetadata { .. } => ErrorKind::InvalidMetadata,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::InvalidMetadata {
            reason: err.to_string(),
        }
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(err: std::str::Utf8Error) -> Self {
        DecodeError::InvalidMetadata {
            reason: format!("JSON chunk is not UTF-8: {err}"),
        }
    }
}

/// Errors that can occur while loading a mesh file from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("mesh file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

impl AssetError {
    /// The decode failure behind this error, if any.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_range() {
        let err = DecodeError::OutOfRange {
            context: "bufferView[2]".into(),
            offset: 16,
            length: 36,
            buffer_len: 40,
        };
        assert_eq!(
            err.to_string(),
            "bufferView[2] out of range: 36 bytes at offset 16 exceed buffer of 40 bytes"
        );
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn json_errors_become_invalid_metadata() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DecodeError::from(json_err);
        assert_eq!(err.kind(), ErrorKind::InvalidMetadata);
    }
}
