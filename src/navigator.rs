//! Circular cursor over an [`ImageSet`].
//!
//! The cursor is either `Idle` (nothing shown, the `-1` position) or
//! `Showing(i)` with `i` a valid index. Stepping forward off the last image
//! falls back to `Idle` and immediately steps again, landing on the first image.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::scan::ImageSet;

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Where the cursor currently points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Before the first image; nothing shown yet.
    #[default]
    Idle,
    /// Showing the image at this index.
    Showing(usize),
}

/// One-based "position/total" counter shown next to a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideLabel {
    pub position: usize,
    pub total: usize,
}

impl fmt::Display for SlideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.total)
    }
}

/// Result of a successful [`Navigator::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub index: usize,
    pub label: SlideLabel,
    /// The request ran past the end, reset to `Idle`, and re-advanced.
    pub wrapped: bool,
}

enum Step {
    Landed(usize),
    PastEnd,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    images: ImageSet,
    position: Position,
}

impl Navigator {
    #[must_use]
    pub fn new(images: ImageSet) -> Self {
        Self {
            images,
            position: Position::Idle,
        }
    }

    #[must_use]
    pub const fn images(&self) -> &ImageSet {
        &self.images
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Cursor in its signed form: `-1` when idle.
    #[must_use]
    pub fn cursor(&self) -> isize {
        match self.position {
            Position::Idle => -1,
            Position::Showing(i) => isize::try_from(i).unwrap_or(isize::MAX),
        }
    }

    /// Path of the image under the cursor.
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        match self.position {
            Position::Idle => None,
            Position::Showing(i) => self.images.get(i),
        }
    }

    /// `"{cursor+1}/{len}"`; `"0/len"` while idle.
    #[must_use]
    pub fn current_label(&self) -> SlideLabel {
        let position = match self.position {
            Position::Idle => 0,
            Position::Showing(i) => i + 1,
        };
        SlideLabel {
            position,
            total: self.images.len(),
        }
    }

    /// Swap in a new set; the cursor always returns to `Idle`.
    pub fn replace(&mut self, images: ImageSet) {
        self.images = images;
        self.position = Position::Idle;
    }

    pub const fn reset(&mut self) {
        self.position = Position::Idle;
    }

    /// Move the cursor one step and report where it landed.
    ///
    /// # Errors
    /// Returns [`Error::EmptyImageSet`] when there is nothing to show; the
    /// cursor is left untouched.
    pub fn advance(&mut self, direction: Direction) -> Result<Advance, Error> {
        if self.images.is_empty() {
            return Err(Error::EmptyImageSet);
        }
        let before = self.cursor();

        let mut wrapped = false;
        let index = match self.step(direction) {
            Step::Landed(i) => i,
            Step::PastEnd => {
                debug!("end of images reached");
                self.position = Position::Idle;
                wrapped = true;
                match self.step(direction) {
                    Step::Landed(i) => i,
                    Step::PastEnd => 0,
                }
            }
        };

        self.position = Position::Showing(index);
        debug!(?direction, from = before, to = index, wrapped, "cursor moved");
        Ok(Advance {
            index,
            label: self.current_label(),
            wrapped,
        })
    }

    fn step(&self, direction: Direction) -> Step {
        let len = self.images.len();
        match (direction, self.position) {
            (Direction::Forward, Position::Idle) => Step::Landed(0),
            (Direction::Forward, Position::Showing(i)) if i + 1 < len => Step::Landed(i + 1),
            (Direction::Forward, Position::Showing(_)) => Step::PastEnd,
            (Direction::Backward, Position::Idle | Position::Showing(0)) => {
                Step::Landed(len - 1)
            }
            (Direction::Backward, Position::Showing(i)) => Step::Landed(i - 1),
        }
    }
}
