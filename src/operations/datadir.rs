// Data Directory Copy
// Recursive copy of the GeoServer data directory with exclusion filters

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::utilities::patterns::glob_match;
use crate::utilities::timefilter::TimeFilter;

/// Outcome of a data directory copy.
#[derive(Debug, Default)]
pub struct CopyStats {
    /// Files copied to the destination
    pub copied: usize,
    /// Entries skipped by a filter (subtrees count as one)
    pub skipped: usize,
}

/// Copy `src` into `dst`, leaving out entries excluded by the
/// modification-time window or matching one of the glob
/// `exclude_patterns`. A skipped directory is not descended into.
pub fn copy_data_dir(
    src: &Path,
    dst: &Path,
    time_filter: &TimeFilter,
    exclude_patterns: &[String],
) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;

    let mut skipped = 0usize;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if is_excluded(entry, time_filter, exclude_patterns) {
                debug!("Skipping {}", entry.path().display());
                skipped += 1;
                false
            } else {
                true
            }
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Walked entry outside {}", src.display()))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            stats.copied += 1;
        }
    }

    stats.skipped = skipped;
    Ok(stats)
}

fn is_excluded(entry: &DirEntry, time_filter: &TimeFilter, exclude_patterns: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    exclude_patterns
        .iter()
        .any(|pattern| glob_match(&name, pattern))
        || time_filter.is_excluded(entry.path())
}
