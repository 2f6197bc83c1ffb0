//! Image decode/render collaborator.
//!
//! Decodes a path into an RGBA8 bitmap sized exactly to the render box, and
//! offers a cheap header-only probe used when building an [`ImageSet`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::FilterType;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Error;
use crate::scan::ImageSet;

/// Target box (width, height) in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
}

impl RenderSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A decoded, resized bitmap ready to show.
#[derive(Debug, Clone)]
pub struct DisplayedImage {
    pub path: PathBuf,
    pub pixels: RgbaImage,
}

impl DisplayedImage {
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Answers "can this path be opened as an image?".
pub trait ImageProbe {
    fn probe(&self, path: &Path) -> bool;
}

/// Turns a path into a bitmap of the requested size.
pub trait ImageDecoder: ImageProbe {
    /// # Errors
    /// Returns [`Error::UndecodableFile`] if the file cannot be read as an image.
    fn decode(&self, path: &Path, size: RenderSize) -> Result<DisplayedImage, Error>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateDecoder {
    pub apply_exif_orientation: bool,
}

impl Default for ImageCrateDecoder {
    fn default() -> Self {
        Self {
            apply_exif_orientation: true,
        }
    }
}

impl ImageProbe for ImageCrateDecoder {
    fn probe(&self, path: &Path) -> bool {
        // Header only: sniff the format and read dimensions.
        let dims = image::ImageReader::open(path)
            .and_then(image::ImageReader::with_guessed_format)
            .map_err(image::ImageError::IoError)
            .and_then(image::ImageReader::into_dimensions);
        dims.is_ok()
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path, size: RenderSize) -> Result<DisplayedImage, Error> {
        let undecodable = |source| Error::UndecodableFile {
            path: path.to_path_buf(),
            source,
        };
        let img = image::ImageReader::open(path)
            .and_then(image::ImageReader::with_guessed_format)
            .map_err(|e| undecodable(image::ImageError::IoError(e)))?
            .decode()
            .map_err(undecodable)?;

        let mut rgba = img.to_rgba8();
        if self.apply_exif_orientation {
            rgba = apply_orientation(rgba, read_orientation(path).unwrap_or(1));
        }

        let resized = image::imageops::resize(&rgba, size.width, size.height, FilterType::Lanczos3);
        debug!(
            path = %path.display(),
            width = size.width,
            height = size.height,
            "decoded image"
        );
        Ok(DisplayedImage {
            path: path.to_path_buf(),
            pixels: resized,
        })
    }
}

fn apply_orientation(img: RgbaImage, orientation: u16) -> RgbaImage {
    use image::imageops::{flip_horizontal, flip_vertical, rotate90, rotate180, rotate270};
    match orientation {
        2 => flip_horizontal(&img),
        3 => rotate180(&img),
        4 => flip_vertical(&img),
        5 => flip_horizontal(&rotate90(&img)),
        6 => rotate90(&img),
        7 => flip_horizontal(&rotate270(&img)),
        8 => rotate270(&img),
        _ => img,
    }
}

fn read_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let o = u16::try_from(field.value.get_uint(0)?).ok()?;
    debug!("exif orientation {} for {}", o, path.display());
    Some(o)
}

/// Summary shown on the start screen: a few thumbnails plus a remainder count.
#[derive(Debug, Clone)]
pub struct StartPage {
    pub directory: PathBuf,
    pub total: usize,
    pub previews: Vec<DisplayedImage>,
    pub remaining: usize,
}

impl StartPage {
    /// Render up to `count` thumbnails from the front of `images`.
    pub fn build<D>(images: &ImageSet, decoder: &D, thumb: RenderSize, count: usize) -> Self
    where
        D: ImageDecoder + ?Sized,
    {
        let previews: Vec<DisplayedImage> = images
            .as_slice()
            .iter()
            .take(count)
            .filter_map(|p| match decoder.decode(p, thumb) {
                Ok(img) => Some(img),
                Err(err) => {
                    warn!(path = %p.display(), error = %err, "thumbnail failed; skipping");
                    None
                }
            })
            .collect();
        let shown = images.len().min(count);
        Self {
            directory: images.directory().to_path_buf(),
            total: images.len(),
            remaining: images.len() - shown,
            previews,
        }
    }

    /// Place the thumbnails side by side on one canvas.
    #[must_use]
    pub fn preview_strip(&self) -> Option<RgbaImage> {
        let height = self.previews.iter().map(|p| p.pixels.height()).max()?;
        let width = self.previews.iter().map(|p| p.pixels.width()).sum();
        let mut canvas = RgbaImage::new(width, height);
        let mut x = 0i64;
        for preview in &self.previews {
            image::imageops::overlay(&mut canvas, &preview.pixels, x, 0);
            x += i64::from(preview.pixels.width());
        }
        Some(canvas)
    }
}
