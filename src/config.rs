use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::error::Error;
use crate::render::RenderSize;
use crate::scan::ScanOptions;

/// Runtime configuration, loaded from YAML (kebab-case keys).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Directory to open at startup. The user is prompted when absent.
    pub image_directory: Option<PathBuf>,
    /// Include images from subdirectories.
    pub recursive: bool,
    /// Depth limit for `recursive` scans; the chosen directory is depth 1.
    pub max_depth: Option<usize>,
    /// Delay between slides while the slideshow is playing.
    #[serde(with = "humantime_serde")]
    pub slide_delay: Duration,
    /// Box every slide is resized to.
    pub render_size: RenderSize,
    /// Box for start-page thumbnails.
    pub thumbnail_size: RenderSize,
    /// Number of thumbnails on the start page.
    pub preview_count: usize,
    /// Rotate/flip according to EXIF orientation before resizing.
    pub apply_exif_orientation: bool,
    /// Write the current frame to this PNG file.
    pub output_frame: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            image_directory: None,
            recursive: false,
            max_depth: None,
            slide_delay: Duration::from_secs(3),
            render_size: RenderSize::new(800, 600),
            thumbnail_size: RenderSize::new(80, 60),
            preview_count: 3,
            apply_exif_orientation: true,
            output_frame: None,
        }
    }
}

impl Configuration {
    /// # Errors
    /// [`Error::Io`] when the file cannot be read, [`Error::Config`] when it is
    /// not a valid configuration document.
    pub fn from_yaml_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&raw)?;
        Ok(cfg)
    }

    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.slide_delay.is_zero(), "slide-delay must be positive");
        for (name, size) in [
            ("render-size", self.render_size),
            ("thumbnail-size", self.thumbnail_size),
        ] {
            ensure!(
                size.width > 0 && size.height > 0,
                "{} must have a positive width and height",
                name
            );
        }
        if let Some(frame) = &self.output_frame {
            ensure!(
                !frame.as_os_str().is_empty(),
                "output-frame must not be blank when provided"
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            max_depth: self.max_depth,
        }
    }
}
