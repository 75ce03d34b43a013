//! Username pool seeding: plaintext lists in, batched SQL out.
//!
//! Two entry points share the same SQL shape:
//! - [`convert_file`] reads one list and keeps first-seen order;
//! - [`merge_patterns`] merges many files (glob patterns) and sorts the result.
//!
//! Both render the whole script in memory so a bad input never leaves a
//! half-written output file behind.

pub mod source;
pub mod sql;

pub use source::{
    dedup_preserving_order, parse_usernames, read_usernames, FileContribution, UsernameMerger,
};
pub use sql::{escape_literal, render_sql, SqlHeader};

use crate::config::UsernamesConfig;
use crate::error::Result;
use std::path::Path;

/// A rendered SQL script and what went into it.
#[derive(Debug, Clone)]
pub struct SqlScript {
    pub sql: String,
    /// Distinct usernames in the script
    pub total: usize,
    /// Per-file contributions (merge only)
    pub contributions: Vec<FileContribution>,
}

impl SqlScript {
    /// Write the script to `path` in one call.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.sql)?;
        Ok(())
    }
}

/// Deduplicate one username file, keeping first-seen order.
pub fn convert_file(input: &Path, target: &UsernamesConfig) -> Result<SqlScript> {
    let names = dedup_preserving_order(read_usernames(input)?);
    tracing::debug!("Found {} unique usernames", names.len());

    Ok(SqlScript {
        sql: render_sql(&names, &SqlHeader::Single, target),
        total: names.len(),
        contributions: Vec::new(),
    })
}

/// Merge every file matched by `patterns` into one sorted, distinct list.
pub fn merge_patterns(patterns: &[String], target: &UsernamesConfig) -> Result<SqlScript> {
    let mut merger = UsernameMerger::new();
    for pattern in patterns {
        merger.add_pattern(pattern)?;
    }

    let contributions = merger.contributions().to_vec();
    let sources = merger.patterns().to_vec();
    let names = merger.into_sorted()?;
    tracing::debug!(
        "Total unique usernames across {} files: {}",
        contributions.len(),
        names.len()
    );

    Ok(SqlScript {
        sql: render_sql(&names, &SqlHeader::Merged { sources }, target),
        total: names.len(),
        contributions,
    })
}
