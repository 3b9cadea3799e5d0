//! Viewer settings with persistence
//!
//! Settings live at `~/.config/meshview/settings.toml` unless `--config`
//! names another file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use meshview_assets::{DecodeOptions, OffsetBase};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// All viewer settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub decode: DecodeOptions,
    pub output: OutputSettings,
}

/// Where a [`Settings`] value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// Read from this file
    File(PathBuf),
    /// No file was found or it could not be used
    Defaults,
}

impl Settings {
    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("meshview").join("settings.toml"))
    }

    /// Resolve and load settings.
    ///
    /// An explicit path must exist and parse. The default location is
    /// optional: a missing or broken file there falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, SettingsSource)> {
        if let Some(path) = explicit {
            let settings = Self::read(path)?;
            return Ok((settings, SettingsSource::File(path.to_path_buf())));
        }

        let Some(path) = Self::default_path() else {
            warn!("Could not determine config directory");
            return Ok((Self::default(), SettingsSource::Defaults));
        };
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok((Self::default(), SettingsSource::Defaults));
        }

        match Self::read(&path) {
            Ok(settings) => Ok((settings, SettingsSource::File(path))),
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Ok((Self::default(), SettingsSource::Defaults))
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = Self::parse(&content)
            .with_context(|| format!("Failed to parse settings file {:?}", path))?;
        for note in settings.decode_notes() {
            warn!("{:?}: {}", path, note);
        }
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Decode option combinations that are legal but unlikely to be meant.
    pub fn decode_notes(&self) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if self.decode.strict_glb_header && self.decode.glb_offset_base == OffsetBase::File {
            notes.push(
                "strict_glb_header is set but bufferView offsets are file-relative; \
                 files from standard exporters need glb_offset_base = \"bin_chunk\"",
            );
        }
        notes
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Write settings to the default location and return the path written.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(path) = Self::default_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)?;
        Ok(path)
    }
}

/// What the inspector prints and does with decoded meshes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Weld duplicate vertices before reporting
    pub weld: bool,
}
