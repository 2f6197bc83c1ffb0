use std::path::PathBuf;

use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The active directory holds no decodable images.
    #[error("no decodable images in the selected directory")]
    EmptyImageSet,

    /// The chosen directory is missing or is not a directory.
    #[error("image directory unavailable: {}", .0.display())]
    DirectoryUnavailable(PathBuf),

    /// A file could not be opened or decoded as an image.
    #[error("undecodable image {}: {source}", .path.display())]
    UndecodableFile {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for [`Configuration`](crate::config::Configuration).
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),

    /// Rendering/display error from the host surface.
    #[error("render error: {0}")]
    Render(anyhow::Error),
}

impl Error {
    /// Errors the host recovers from by asking for another directory.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyImageSet | Self::DirectoryUnavailable(_) | Self::UndecodableFile { .. }
        )
    }
}
