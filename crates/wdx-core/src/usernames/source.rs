//! Reading and merging plaintext username lists.

use crate::error::InputError;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Read one username per line, trimming whitespace and dropping blank lines.
pub fn read_usernames(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InputError::UsernameFileNotFound(path.to_path_buf())
        } else {
            InputError::UsernameFileUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse_usernames(&content))
}

/// Split text into trimmed, non-blank lines.
pub fn parse_usernames(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Drop repeats, keeping the first occurrence of each name.
pub fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// What one input file added to a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContribution {
    pub path: PathBuf,
    /// Non-blank lines read
    pub names_read: usize,
    /// Names not already present in the merge
    pub new_unique: usize,
}

/// Accumulates usernames from many files into one sorted, distinct set.
#[derive(Debug, Default)]
pub struct UsernameMerger {
    names: BTreeSet<String>,
    contributions: Vec<FileContribution>,
    patterns: Vec<String>,
}

impl UsernameMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a glob pattern and merge every matching file.
    ///
    /// A pattern that matches nothing is logged and skipped. An argument that
    /// is not a valid glob is read as a literal path. Returns the number of
    /// files merged.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<usize, InputError> {
        self.patterns.push(pattern.to_string());

        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                // Not a valid glob (e.g. a file name containing `[`): take it literally.
                tracing::debug!("'{pattern}' is not a glob pattern ({e}), reading as a path");
                return self.add_literal(pattern);
            }
        };

        let mut matched = 0;
        for entry in paths {
            let path = entry.map_err(|e| InputError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            if !path.is_file() {
                continue;
            }
            self.add_file(&path)?;
            matched += 1;
        }

        if matched == 0 {
            tracing::warn!("No files found matching '{pattern}'");
        }
        Ok(matched)
    }

    fn add_literal(&mut self, pattern: &str) -> Result<usize, InputError> {
        let path = Path::new(pattern);
        if !path.is_file() {
            tracing::warn!("No files found matching '{pattern}'");
            return Ok(0);
        }
        self.add_file(path)?;
        Ok(1)
    }

    /// Merge a single file.
    pub fn add_file(&mut self, path: &Path) -> Result<&FileContribution, InputError> {
        tracing::debug!("Processing {}", path.display());
        let names = read_usernames(path)?;
        Ok(self.add_names(path, names))
    }

    /// Merge names that came from `path`.
    pub fn add_names(&mut self, path: &Path, names: Vec<String>) -> &FileContribution {
        let names_read = names.len();
        let new_unique = names
            .into_iter()
            .filter(|name| self.names.insert(name.clone()))
            .count();

        tracing::debug!("  - Found {names_read} names, {new_unique} new unique");
        self.contributions.push(FileContribution {
            path: path.to_path_buf(),
            names_read,
            new_unique,
        });
        &self.contributions[self.contributions.len() - 1]
    }

    pub fn contributions(&self) -> &[FileContribution] {
        &self.contributions
    }

    /// Patterns passed to [`add_pattern`](Self::add_pattern), in order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The merged set in lexicographic order; empty is an error.
    pub fn into_sorted(self) -> Result<Vec<String>, InputError> {
        if self.names.is_empty() {
            return Err(InputError::NoUsernames);
        }
        Ok(self.names.into_iter().collect())
    }
}
