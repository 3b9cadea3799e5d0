//! Meshview - inspect binary STL and GLB mesh files
//!
//! Decodes each file given on the command line and prints what a renderer
//! would receive: vertex and triangle counts, index/normal presence and
//! bounds.

mod settings;
mod summary;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use meshview_assets::{load_mesh, load_mesh_as, MeshFormat, OffsetBase};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::settings::Settings;
use crate::summary::MeshSummary;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect binary STL and GLB mesh files")]
struct Args {
    /// Mesh files to decode
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Decode every file as this format (stl or glb) instead of guessing
    #[arg(long)]
    format: Option<MeshFormat>,

    /// Weld duplicate vertices into an indexed mesh before reporting
    #[arg(long)]
    weld: bool,

    /// Treat glTF bufferView offsets as relative to the BIN chunk
    #[arg(long)]
    bin_chunk_offsets: bool,

    /// Require a well-formed GLB header (magic, version 2, JSON chunk)
    #[arg(long)]
    strict: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Settings file to use instead of the default location (must exist)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Store the effective options in the settings file
    #[arg(long)]
    save_settings: bool,
}

impl Args {
    /// Command-line flags override whatever the settings file says.
    fn apply(&self, settings: &mut Settings) {
        if self.weld {
            settings.output.weld = true;
        }
        if self.bin_chunk_offsets {
            settings.decode.glb_offset_base = OffsetBase::BinChunk;
        }
        if self.strict {
            settings.decode.strict_glb_header = true;
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn inspect(path: &Path, format: Option<MeshFormat>, settings: &Settings) -> Result<MeshSummary> {
    let loaded = match format {
        Some(format) => load_mesh_as(path, format, &settings.decode),
        None => load_mesh(path, &settings.decode),
    }
    .with_context(|| format!("Failed to inspect {}", path.display()))?;

    if let Err(e) = loaded.mesh.validate() {
        warn!("{}: decoded mesh is inconsistent: {}", path.display(), e);
    }

    Ok(MeshSummary::new(&loaded, settings.output.weld))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let (mut settings, source) = Settings::load(args.config.as_deref())?;
    debug!("Settings source: {:?}", source);
    args.apply(&mut settings);

    if args.save_settings {
        match &args.config {
            Some(path) => settings.save_to(path)?,
            None => {
                settings.save()?;
            }
        }
    }

    info!("Decoding {} file(s)", args.files.len());

    // Decoders share no state, so each file gets its own thread.
    let results: Vec<Result<MeshSummary>> = std::thread::scope(|scope| {
        let handles: Vec<_> = args
            .files
            .iter()
            .map(|path| {
                let settings = &settings;
                let format = args.format;
                scope.spawn(move || inspect(path, format, settings))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("decoder thread panicked")))
            })
            .collect()
    });

    let mut failed = 0usize;
    for result in &results {
        match result {
            Ok(summary) => println!("{summary}"),
            Err(e) => {
                failed += 1;
                error!("{:#}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed to decode", failed, results.len());
    }
    Ok(())
}
