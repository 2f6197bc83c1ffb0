//! Display surface the controller draws on.
//!
//! [`ConsoleSurface`] is the headless host: it prints what a window would
//! show and can mirror the current frame into a PNG file.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::navigator::SlideLabel;
use crate::render::{DisplayedImage, StartPage};

/// One slide: the counter plus the bitmap, if it could be decoded.
#[derive(Debug, Clone)]
pub struct Slide {
    pub label: SlideLabel,
    pub path: PathBuf,
    pub image: Option<DisplayedImage>,
}

/// Request for the user to pick (another) directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    NoDirectory,
    DirectoryUnavailable(PathBuf),
    NoImages(PathBuf),
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDirectory => f.write_str("No valid directory selected. Select a directory now?"),
            Self::DirectoryUnavailable(dir) => write!(
                f,
                "{} is not a valid directory. Select a directory now?",
                dir.display()
            ),
            Self::NoImages(dir) => write!(
                f,
                "No valid images in {}. Select new directory?",
                dir.display()
            ),
        }
    }
}

pub trait Surface {
    fn show_start(&mut self, page: &StartPage) -> Result<()>;
    fn show_slide(&mut self, slide: &Slide) -> Result<()>;
    /// Blank the photo and counter.
    fn clear(&mut self) -> Result<()>;
    fn prompt(&mut self, prompt: &Prompt) -> Result<()>;
}

pub struct ConsoleSurface<W: Write> {
    out: W,
    frame_path: Option<PathBuf>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W, frame_path: Option<PathBuf>) -> Self {
        Self { out, frame_path }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&self, frame: &RgbaImage) -> Result<()> {
        if let Some(path) = &self.frame_path {
            frame
                .save_with_format(path, ImageFormat::Png)
                .with_context(|| format!("writing frame to {}", path.display()))?;
            debug!(path = %path.display(), "frame written");
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

impl<W: Write> Surface for ConsoleSurface<W> {
    fn show_start(&mut self, page: &StartPage) -> Result<()> {
        writeln!(
            self.out,
            "Slideshow: {} images in {}",
            page.total,
            page.directory.display()
        )?;
        if !page.previews.is_empty() {
            let names: Vec<String> = page.previews.iter().map(|p| file_name(&p.path)).collect();
            writeln!(self.out, "Preview: {}", names.join(", "))?;
        }
        if page.remaining > 0 {
            writeln!(self.out, "... and {} more images.", page.remaining)?;
        }
        writeln!(
            self.out,
            "Press Enter or 'v' for the picture viewer, 's' for the automatic slideshow."
        )?;
        if let Some(strip) = page.preview_strip() {
            self.write_frame(&strip)?;
        }
        Ok(())
    }

    fn show_slide(&mut self, slide: &Slide) -> Result<()> {
        match &slide.image {
            Some(img) => {
                let (w, h) = img.dimensions();
                writeln!(
                    self.out,
                    "[{}] {} ({}x{})",
                    slide.label,
                    file_name(&slide.path),
                    w,
                    h
                )?;
                self.write_frame(&img.pixels)?;
            }
            None => writeln!(
                self.out,
                "[{}] {} (could not be displayed)",
                slide.label,
                file_name(&slide.path)
            )?,
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<()> {
        writeln!(self.out, "{prompt} (dir <path>)")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(label: (usize, usize), image: Option<DisplayedImage>) -> Slide {
        Slide {
            label: SlideLabel {
                position: label.0,
                total: label.1,
            },
            path: PathBuf::from("/photos/cat.png"),
            image,
        }
    }

    #[test]
    fn prints_label_and_dimensions() {
        let mut surface = ConsoleSurface::new(Vec::new(), None);
        let img = DisplayedImage {
            path: PathBuf::from("/photos/cat.png"),
            pixels: RgbaImage::new(8, 6),
        };
        surface.show_slide(&slide((2, 5), Some(img))).unwrap();
        surface.show_slide(&slide((3, 5), None)).unwrap();
        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(
            text,
            "[2/5] cat.png (8x6)\n[3/5] cat.png (could not be displayed)\n"
        );
    }

    #[test]
    fn mirrors_frame_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.png");
        let mut surface = ConsoleSurface::new(Vec::new(), Some(frame.clone()));
        let img = DisplayedImage {
            path: PathBuf::from("/photos/cat.png"),
            pixels: RgbaImage::new(8, 6),
        };
        surface.show_slide(&slide((1, 1), Some(img))).unwrap();
        assert_eq!(image::image_dimensions(&frame).unwrap(), (8, 6));
    }

    #[test]
    fn frame_is_png_whatever_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = ConsoleSurface::new(Vec::new(), Some(dir.path().join("frame.jpg")));
        let img = DisplayedImage {
            path: PathBuf::from("/photos/cat.png"),
            pixels: RgbaImage::new(4, 2),
        };
        surface.show_slide(&slide((1, 1), Some(img.clone()))).unwrap();

        let bare = dir.path().join("frame");
        let mut surface = ConsoleSurface::new(Vec::new(), Some(bare.clone()));
        surface.show_slide(&slide((1, 1), Some(img))).unwrap();

        for path in [dir.path().join("frame.jpg"), bare] {
            let reader = image::ImageReader::open(&path)
                .unwrap()
                .with_guessed_format()
                .unwrap();
            assert_eq!(reader.format(), Some(ImageFormat::Png));
        }
    }

    #[test]
    fn prompt_text_matches_reason() {
        let mut surface = ConsoleSurface::new(Vec::new(), None);
        surface
            .prompt(&Prompt::NoImages(PathBuf::from("/empty")))
            .unwrap();
        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(
            text,
            "No valid images in /empty. Select new directory? (dir <path>)\n"
        );
    }
}
