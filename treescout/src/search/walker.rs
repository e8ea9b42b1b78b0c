use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, trace, warn};

use super::scanner::FileScanner;
use crate::cancel::CancellationToken;
use crate::config::{ErrorPolicy, SearchConfig};
use crate::errors::{SearchError, SearchResult};
use crate::filters::{has_allowed_extension, is_excluded_dir};
use crate::metrics::ScanMetrics;
use crate::results::{Directory, FileResult, SkippedEntry, SkippedKind};

/// `(name, path)` pairs of directory entries
type Entries = Vec<(String, PathBuf)>;

/// A resolved directory together with the nodes skipped below it
#[derive(Debug)]
pub struct Subtree {
    pub dir: Directory,
    pub skipped: Vec<SkippedEntry>,
}

/// Recursively walks directories, scanning files and pruning empty branches.
///
/// Each level lists its entries, then runs one task per subdirectory and one
/// per eligible file on the current rayon pool. Children are collected after
/// the join and handed to the parent in one piece, so no task ever writes into
/// a directory that another task can see.
pub struct DirectoryWalker<'a> {
    scanner: FileScanner<'a>,
    config: &'a SearchConfig,
    metrics: &'a ScanMetrics,
    cancel: &'a CancellationToken,
    first_error: Mutex<Option<SearchError>>,
}

impl<'a> DirectoryWalker<'a> {
    /// Creates a walker; `cancel` is cancelled by the walker itself when a
    /// fail-fast error occurs.
    pub fn new(
        scanner: FileScanner<'a>,
        config: &'a SearchConfig,
        metrics: &'a ScanMetrics,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            scanner,
            config,
            metrics,
            cancel,
            first_error: Mutex::new(None),
        }
    }

    /// Takes the error that stopped a fail-fast walk, if any
    pub fn take_first_error(&self) -> Option<SearchError> {
        self.first_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    /// Walks one directory and everything below it.
    ///
    /// A directory whose own name is excluded yields an empty subtree without
    /// being listed.
    pub fn walk(&self, name: String, path: PathBuf) -> SearchResult<Subtree> {
        if self.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        if is_excluded_dir(&name, &self.config.exclude_directories) {
            debug!("Skipping excluded directory: {}", path.display());
            self.metrics.record_excluded_directory();
            return Ok(Subtree {
                dir: Directory::new(name, path),
                skipped: Vec::new(),
            });
        }

        let (mut sub_dirs, mut files) = self.list_entries(&path)?;
        self.metrics.record_directory();
        debug!(
            "Walking {}: {} subdirectories, {} files",
            path.display(),
            sub_dirs.len(),
            files.len()
        );

        if self.config.sort_entries {
            sub_dirs.sort();
            files.sort();
        }

        let (dir_results, file_results): (Vec<_>, Vec<_>) = rayon::join(
            || {
                sub_dirs
                    .into_par_iter()
                    .map(|(child_name, child_path)| self.walk(child_name, child_path))
                    .collect()
            },
            || {
                files
                    .into_par_iter()
                    .map(|(_, file_path)| self.scan(&file_path))
                    .collect()
            },
        );

        let mut skipped = Vec::new();

        let mut children = Vec::with_capacity(dir_results.len());
        for result in dir_results {
            match result {
                Ok(subtree) => {
                    skipped.extend(subtree.skipped);
                    children.push(subtree.dir);
                }
                Err(e) => skipped.push(self.recover(e, SkippedKind::Directory)?),
            }
        }

        let mut scanned = Vec::with_capacity(file_results.len());
        for result in file_results {
            match result {
                Ok(file) => scanned.push(file),
                Err(e) => skipped.push(self.recover(e, SkippedKind::File)?),
            }
        }

        Ok(Subtree {
            dir: Directory::assemble(name, path, children, scanned),
            skipped,
        })
    }

    fn scan(&self, path: &Path) -> SearchResult<FileResult> {
        if self.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        self.scanner.scan_file(path)
    }

    /// Splits a directory's entries into subdirectories and files whose
    /// extension is allowed.
    fn list_entries(&self, path: &Path) -> SearchResult<(Entries, Entries)> {
        let entries = fs::read_dir(path).map_err(|e| SearchError::directory_unreadable(path, e))?;

        let mut sub_dirs = Vec::new();
        let mut files = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SearchError::directory_unreadable(path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SearchError::directory_unreadable(path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_path = entry.path();

            if file_type.is_dir() {
                sub_dirs.push((name, entry_path));
            } else if !has_allowed_extension(&name, &self.config.allowed_extensions) {
                trace!("Extension not allowed: {}", entry_path.display());
                self.metrics.record_filtered_file();
            } else if file_type.is_file() || (file_type.is_symlink() && is_file_link(&entry_path)) {
                files.push((name, entry_path));
            }
        }

        Ok((sub_dirs, files))
    }

    /// Turns a failed child into a skip-list entry, or escalates the error.
    fn recover(&self, err: SearchError, kind: SkippedKind) -> SearchResult<SkippedEntry> {
        if !err.is_per_node() {
            return Err(err);
        }

        match self.config.error_policy {
            ErrorPolicy::Skip => {
                warn!("Skipping unreadable {:?}: {}", kind, err);
                self.metrics.record_skipped();
                Ok(SkippedEntry {
                    path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                    kind,
                    reason: err.to_string(),
                })
            }
            ErrorPolicy::FailFast => {
                let mut slot = self
                    .first_error
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                if slot.is_none() {
                    warn!("Aborting walk: {}", err);
                    *slot = Some(err);
                    self.cancel.cancel();
                }
                Err(SearchError::Cancelled)
            }
        }
    }
}

/// Whether a symlink should be scanned as a file.
///
/// Links to regular files are scanned and links to directories are not
/// followed. A dangling link counts as a file, so opening it reports the
/// failure instead of the entry vanishing silently.
fn is_file_link(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file(),
        Err(_) => true,
    }
}
