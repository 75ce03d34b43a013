//! Discovery of evaluation images in a directory.

use crate::error::InputError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An evaluation image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name as recorded in results
    pub file_name: String,
}

/// Recognized images directly inside one directory, sorted by file name.
#[derive(Debug, Clone)]
pub struct ImageSet {
    images: Vec<ImageFile>,
}

impl ImageSet {
    /// Find every file in `dir` (not recursing) whose extension is in `extensions`.
    pub fn discover(dir: &Path, extensions: &[String]) -> Result<Self, InputError> {
        if !dir.is_dir() {
            return Err(InputError::ImageDirNotFound(dir.to_path_buf()));
        }

        let mut images: Vec<ImageFile> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_supported(e.path(), extensions))
            .map(|e| ImageFile {
                path: e.path().to_path_buf(),
                file_name: e.file_name().to_string_lossy().into_owned(),
            })
            .collect();

        if images.is_empty() {
            return Err(InputError::NoImages(dir.to_path_buf()));
        }

        images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(Self { images })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageFile> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Check if a file has a supported extension (case-insensitive).
fn is_supported(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|fmt| fmt.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
