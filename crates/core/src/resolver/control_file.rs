//! Control file resolver implementation.

use chrono::{Datelike, NaiveDate, Weekday};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ResolverConfig;

/// Accepted subfolder name formats, day first.
const DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%d %m %Y"];

/// Errors that can occur while resolving the control file.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The `<YYYY>/<YYYY>-<MM>` directory for the current period does not exist.
    #[error("period folder not found: {}", .0.display())]
    PeriodNotFound(PathBuf),

    /// No eligible subfolder yielded a control file.
    #[error("control file not found under {}", .0.display())]
    ControlFileNotFound(PathBuf),

    /// Listing a directory failed.
    #[error("failed to list {}: {source}", .path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves the weekly control spreadsheet for the current period.
pub struct ControlFileResolver {
    config: ResolverConfig,
}

impl ControlFileResolver {
    /// Create a new resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Locate the control file for the period containing `today`.
    ///
    /// Subfolders whose names fail both date formats are skipped silently,
    /// as are dates that do not fall on a Monday. Within an eligible
    /// subfolder the first file (in lexicographic order) containing the
    /// configured marker and carrying the configured extension wins.
    pub fn resolve(&self, today: NaiveDate) -> Result<PathBuf, ResolverError> {
        let period_dir = self
            .config
            .base_dir
            .join(today.year().to_string())
            .join(format!("{}-{:02}", today.year(), today.month()));

        if !period_dir.is_dir() {
            return Err(ResolverError::PeriodNotFound(period_dir));
        }

        debug!(path = %period_dir.display(), "Scanning period folder");
        let suffix = format!(".{}", self.config.extension.trim_start_matches('.'));

        for subfolder in sorted_entries(&period_dir)? {
            if !subfolder.path.is_dir() {
                continue;
            }

            let Some(date) = parse_subfolder_date(&subfolder.name) else {
                debug!(name = %subfolder.name, "Skipping subfolder with unrecognized name");
                continue;
            };

            if date.weekday() != Weekday::Mon {
                debug!(name = %subfolder.name, weekday = ?date.weekday(), "Skipping non-Monday subfolder");
                continue;
            }

            for file in sorted_entries(&subfolder.path)? {
                if file.name.contains(&self.config.marker)
                    && file.name.ends_with(&suffix)
                    && file.path.is_file()
                {
                    info!(path = %file.path.display(), "Control file found");
                    return Ok(file.path);
                }
            }

            debug!(path = %subfolder.path.display(), "Eligible subfolder had no control file");
        }

        Err(ResolverError::ControlFileNotFound(period_dir))
    }
}

struct Entry {
    name: String,
    path: PathBuf,
}

/// Directory entries sorted by name, so resolution order does not depend
/// on the filesystem's listing order.
fn sorted_entries(dir: &Path) -> Result<Vec<Entry>, ResolverError> {
    let read = fs::read_dir(dir).map_err(|e| ResolverError::ListFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut entries: Vec<Entry> = read
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().into_string().ok()?;
            Some(Entry {
                name,
                path: entry.path(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Parse a subfolder name against the accepted date formats.
fn parse_subfolder_date(name: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(name, fmt).ok())
}
