//! Polling change scanner
//!
//! Walks the whole tree on every tick and compares modification times against
//! a single watermark: the newest mtime already reported. Only "did anything
//! change" is needed, so no per-file state is kept.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::filter::FilterSet;

/// Outcome of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    /// Watermark after the scan (unchanged unless `changed`)
    pub watermark: SystemTime,
    /// Whether any qualifying file is newer than the previous watermark
    pub changed: bool,
}

/// Something that can tell the watch loop whether a reload is due.
///
/// The polling [`Scanner`] is the only implementation; an event-driven
/// detector can stand in without touching the registry or the loop.
pub trait ChangeDetector: Send {
    /// Check for changes since the previous call
    fn detect(&mut self) -> bool;
}

/// Traverse `root` once and compare qualifying files against `watermark`.
///
/// Unreadable entries are skipped; the traversal continues past them.
pub fn scan(root: &Path, watermark: SystemTime, filter: &FilterSet) -> ScanResult {
    let mut newest = watermark;
    let mut changed = false;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy();
        if !filter.should_process(&name, entry.file_type().is_dir()) {
            continue;
        }

        let modified = match entry
            .metadata()
            .map_err(std::io::Error::from)
            .and_then(|m| m.modified())
        {
            Ok(modified) => modified,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "cannot read modification time");
                continue;
            }
        };

        if modified > watermark {
            info!(
                path = %entry.path().display(),
                modified = %DateTime::<Local>::from(modified).format("%H:%M:%S%.3f"),
                "changed"
            );
            changed = true;
            newest = newest.max(modified);
        }
    }

    ScanResult {
        watermark: if changed { newest } else { watermark },
        changed,
    }
}

/// Owns the watermark for one watched tree
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    filter: FilterSet,
    watermark: SystemTime,
}

impl Scanner {
    /// Start watching `root`; only changes made from now on are reported
    pub fn new(root: impl Into<PathBuf>, filter: FilterSet) -> Self {
        Self::with_watermark(root, filter, SystemTime::now())
    }

    /// Start from an explicit watermark
    pub fn with_watermark(
        root: impl Into<PathBuf>,
        filter: FilterSet,
        watermark: SystemTime,
    ) -> Self {
        Self {
            root: root.into(),
            filter,
            watermark,
        }
    }

    /// Run one traversal and advance the watermark
    pub fn scan(&mut self) -> ScanResult {
        let result = scan(&self.root, self.watermark, &self.filter);
        self.watermark = result.watermark;
        result
    }

    pub fn watermark(&self) -> SystemTime {
        self.watermark
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ChangeDetector for Scanner {
    fn detect(&mut self) -> bool {
        self.scan().changed
    }
}
