use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::image::ExportFormat;

const CONFIG_FILE_NAME: &str = "filtergram.toml";
const FALLBACK_DOWNLOAD_NAME: &str = "download";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub quality: f32,
    /// Unset means `image.<extension of format>`.
    pub file_name: Option<String>,
    pub revoke_delay_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: 0.85,
            file_name: None,
            revoke_delay_ms: 150,
        }
    }
}

impl ExportConfig {
    pub const fn quality(&self) -> f32 {
        if self.quality.is_nan() {
            return 0.85;
        }
        self.quality.clamp(0.01, 1.0)
    }

    /// Name offered by the save dialog; blank names fall back to `download`.
    pub fn file_name(&self) -> String {
        match self.file_name.as_deref().map(str::trim) {
            None => format!("image.{}", self.format.extension()),
            Some("") => FALLBACK_DOWNLOAD_NAME.to_string(),
            Some(name) => name.to_string(),
        }
    }

    pub fn revoke_delay(&self) -> Duration {
        Duration::from_millis(self.revoke_delay_ms.min(10_000))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 96,
            height: 96,
        }
    }
}

impl ThumbnailConfig {
    pub fn size(&self) -> [u32; 2] {
        [self.width.clamp(16, 512), self.height.clamp(16, 512)]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub export: ExportConfig,
    pub thumbnail: ThumbnailConfig,
    pub image_limits: ImageLimits,
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match Self::from_toml_str(&contents) {
                    Ok(cfg) => {
                        log::info!("Loaded config from {}", path.display());
                        return cfg;
                    }
                    Err(err) => {
                        log::warn!("Failed to parse config {}: {err:#}", path.display());
                    }
                }
            }
        }
        Self::default()
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str::<Self>(contents).context("Invalid filtergram config")
    }

    pub fn effective_image_limits(&self) -> ImageLimits {
        self.image_limits.sanitized()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Filtergram", "Filtergram") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(
                base_dirs
                    .config_dir()
                    .join("filtergram")
                    .join(CONFIG_FILE_NAME),
            );
        }

        paths
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub image_dim: u32,
    pub total_pixels: u64,
    pub alloc_bytes: u64,
    /// Longest side of the copy that filters run on.
    pub working_dim: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            image_dim: 12_000,
            total_pixels: 80_000_000,       // ~80 MP
            alloc_bytes: 512 * 1024 * 1024, // 512 MiB
            working_dim: 2048,
        }
    }
}

impl ImageLimits {
    pub fn sanitized(&self) -> Self {
        let dim = self.image_dim.clamp(64, 100_000);
        let pixels = self.total_pixels.clamp(1_000_000, 5_000_000_000); // 1 MP .. 5 GP
        let alloc = self
            .alloc_bytes
            .clamp(8 * 1024 * 1024, 8 * 1024 * 1024 * 1024); // 8 MiB .. 8 GiB
        Self {
            image_dim: dim,
            total_pixels: pixels,
            alloc_bytes: alloc,
            working_dim: self.working_dim.clamp(256, 16_384).min(dim),
        }
    }
}
