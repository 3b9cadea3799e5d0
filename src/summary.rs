//! Per-file decode report

use std::fmt;
use std::path::PathBuf;

use meshview_assets::{LoadedMesh, MeshFormat};
use meshview_core::Aabb;

/// What the inspector prints for one decoded file
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSummary {
    pub path: PathBuf,
    pub format: MeshFormat,
    pub vertex_count: u32,
    pub triangle_count: usize,
    pub indexed: bool,
    pub normals: bool,
    pub welded: bool,
    pub bounds: Option<Aabb>,
}

impl MeshSummary {
    /// Summarize a loaded mesh, welding it first if requested.
    pub fn new(loaded: &LoadedMesh, weld: bool) -> Self {
        let welded;
        let mesh = if weld {
            welded = loaded.mesh.weld();
            &welded
        } else {
            &loaded.mesh
        };

        Self {
            path: loaded.path.clone(),
            format: loaded.format,
            vertex_count: mesh.vertex_count,
            triangle_count: mesh.triangle_count(),
            indexed: mesh.is_indexed(),
            normals: mesh.has_normals(),
            welded: weld,
            bounds: mesh.bounds(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.path.display(), self.format)?;
        writeln!(
            f,
            "  vertices: {}{}",
            self.vertex_count,
            if self.welded { " (welded)" } else { "" }
        )?;
        writeln!(f, "  triangles: {}", self.triangle_count)?;
        writeln!(f, "  indexed: {}", yes_no(self.indexed))?;
        writeln!(f, "  normals: {}", yes_no(self.normals))?;
        match &self.bounds {
            Some(bounds) => {
                let (min, max) = (bounds.min, bounds.max);
                write!(
                    f,
                    "  bounds: [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
                    min.x, min.y, min.z, max.x, max.y, max.z
                )
            }
            None => write!(f, "  bounds: empty"),
        }
    }
}
