use std::path::{Path, PathBuf};

use meshview_core::ParsedMesh;
use tracing::debug;

use crate::error::{AssetError, DecodeError};
use crate::format::MeshFormat;
use crate::options::DecodeOptions;

/// A mesh decoded from a file on disk.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub path: PathBuf,
    pub format: MeshFormat,
    pub mesh: ParsedMesh,
}

/// Load a `.stl` or `.glb` file, picking the decoder from the extension and
/// falling back to sniffing the leading bytes.
///
/// `.gltf` text documents are refused, since their geometry lives in
/// external buffers.
pub fn load_mesh(path: &Path, options: &DecodeOptions) -> Result<LoadedMesh, AssetError> {
    let is_gltf_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gltf"));
    if is_gltf_text {
        return Err(AssetError::Decode {
            path: path.to_path_buf(),
            source: DecodeError::unsupported("external buffer"),
        });
    }

    let bytes = read(path)?;
    let format = MeshFormat::from_extension(path).unwrap_or_else(|| MeshFormat::sniff(&bytes));
    decode_file(path, &bytes, format, options)
}

/// Load a file with an explicitly chosen format.
pub fn load_mesh_as(
    path: &Path,
    format: MeshFormat,
    options: &DecodeOptions,
) -> Result<LoadedMesh, AssetError> {
    let bytes = read(path)?;
    decode_file(path, &bytes, format, options)
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))
}

fn decode_file(
    path: &Path,
    bytes: &[u8],
    format: MeshFormat,
    options: &DecodeOptions,
) -> Result<LoadedMesh, AssetError> {
    let mesh = format
        .decode(bytes, options)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Decoded {} '{}': {} vertices, {} triangles, indexed: {}",
        format,
        path.display(),
        mesh.vertex_count,
        mesh.triangle_count(),
        mesh.is_indexed()
    );

    Ok(LoadedMesh {
        path: path.to_path_buf(),
        format,
        mesh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    /// A scratch file under the system temp dir, removed on drop.
    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str, bytes: &[u8]) -> Self {
            let path = std::env::temp_dir().join(format!(
                "meshview-loader-{}-{}",
                std::process::id(),
                name
            ));
            std::fs::write(&path, bytes).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn missing_file_returns_error() {
        let result = load_mesh(Path::new("/nonexistent/does_not_exist.stl"), &DecodeOptions::default());
        match result.unwrap_err() {
            AssetError::NotFound(_) => {}
            other => panic!("expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn loads_stl_by_extension() {
        let file = TempFile::new("tri.stl", &fixtures::stl(&[fixtures::UNIT_TRIANGLE]));
        let loaded = load_mesh(&file.0, &DecodeOptions::default()).unwrap();
        assert_eq!(loaded.format, MeshFormat::Stl);
        assert_eq!(loaded.mesh.vertex_count, 3);
        assert_eq!(loaded.path, file.0);
    }

    #[test]
    fn sniffs_glb_without_extension() {
        let bytes = fixtures::glb(
            &fixtures::triangle_document(fixtures::BIN_DATA_START),
            &fixtures::triangle_bin(),
        );
        let file = TempFile::new("tri-noext", &bytes);
        let loaded = load_mesh(&file.0, &DecodeOptions::default()).unwrap();
        assert_eq!(loaded.format, MeshFormat::Glb);
        assert_eq!(loaded.mesh.indices, Some(vec![0, 1, 2]));
    }

    #[test]
    fn gltf_text_is_refused() {
        let err = load_mesh(Path::new("scene.gltf"), &DecodeOptions::default()).unwrap_err();
        assert_eq!(
            err.decode_error(),
            Some(&DecodeError::unsupported("external buffer"))
        );
    }

    #[test]
    fn decode_failures_carry_the_path() {
        let file = TempFile::new("short.stl", &[0u8; 10]);
        let err = load_mesh_as(&file.0, MeshFormat::Stl, &DecodeOptions::default()).unwrap_err();
        match err {
            AssetError::Decode { path, source } => {
                assert_eq!(path, file.0);
                assert_eq!(
                    source,
                    DecodeError::Truncated {
                        expected: 84,
                        actual: 10
                    }
                );
            }
            other => panic!("expected Decode, got: {:?}", other),
        }
    }
}
