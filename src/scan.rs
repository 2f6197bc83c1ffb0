//! Directory scanning: builds the ordered [`ImageSet`] for a chosen directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;
use crate::render::ImageProbe;

/// Options controlling directory scanning.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Maximum recursion depth when `recursive`; 1 is the directory itself.
    /// `None` or `Some(0)` means unlimited.
    pub max_depth: Option<usize>,
}

/// Ordered, immutable list of decodable images found in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    directory: PathBuf,
    paths: Vec<PathBuf>,
}

impl ImageSet {
    /// Build a set from paths that are already known to be images.
    #[must_use]
    pub fn from_paths(directory: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            paths,
        }
    }

    /// Scan `dir` and keep every regular file the `probe` accepts, sorted by file name.
    ///
    /// Files failing the probe are skipped silently (debug log only). An empty
    /// result is a valid set; callers decide whether that is an error.
    ///
    /// # Errors
    /// Returns [`Error::DirectoryUnavailable`] if `dir` is missing or not a directory.
    pub fn scan<P>(dir: &Path, opts: &ScanOptions, probe: &P) -> Result<Self, Error>
    where
        P: ImageProbe + ?Sized,
    {
        if !dir.is_dir() {
            return Err(Error::DirectoryUnavailable(dir.to_path_buf()));
        }

        let mut wd = WalkDir::new(dir).sort_by_file_name();
        if !opts.recursive {
            wd = wd.max_depth(1);
        } else if let Some(d) = opts.max_depth
            && d > 0
        {
            wd = wd.max_depth(d);
        }

        let mut paths = Vec::new();
        let mut skipped = 0usize;
        for entry in wd
            .into_iter()
            .filter_entry(|e| !should_skip_dir(e))
            .flatten()
        {
            let path = entry.path();
            // Follows symlinks, unlike `entry.file_type()`.
            if !path.is_file() {
                continue;
            }
            if probe.probe(path) {
                paths.push(path.to_path_buf());
            } else {
                skipped += 1;
                debug!(path = %path.display(), "not a decodable image; excluded");
            }
        }

        info!(
            dir = %dir.display(),
            images = paths.len(),
            skipped,
            "scanned image directory"
        );
        Ok(Self {
            directory: dir.to_path_buf(),
            paths,
        })
    }

    /// Directory the set was built from.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Borrow the ordered list.
    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}
