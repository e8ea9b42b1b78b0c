use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Tracks walk and scan counters.
///
/// Shared by reference between every directory and file task of one walk.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    directories_visited: AtomicU64,
    directories_excluded: AtomicU64,
    files_scanned: AtomicU64,
    files_filtered: AtomicU64,
    lines_read: AtomicU64,
    matches_found: AtomicU64,
    nodes_skipped: AtomicU64,
    peak_line_workers: AtomicU64,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a directory whose entries were listed
    pub fn record_directory(&self) {
        self.directories_visited.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a directory skipped because its name is excluded
    pub fn record_excluded_directory(&self) {
        self.directories_excluded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file that was read to the end
    pub fn record_file_scan(&self, lines: u64, matches: u64) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
        self.lines_read.fetch_add(lines, Ordering::Relaxed);
        self.matches_found.fetch_add(matches, Ordering::Relaxed);
    }

    /// Records a file passed over by name or extension
    pub fn record_filtered_file(&self) {
        self.files_filtered.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a node that failed and was left out of the tree
    pub fn record_skipped(&self) {
        self.nodes_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records how many line workers one file needed; only the maximum is kept
    pub fn record_line_workers(&self, workers: u64) {
        self.peak_line_workers.fetch_max(workers, Ordering::Relaxed);
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            directories_visited: self.directories_visited.load(Ordering::Relaxed),
            directories_excluded: self.directories_excluded.load(Ordering::Relaxed),
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_filtered: self.files_filtered.load(Ordering::Relaxed),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            nodes_skipped: self.nodes_skipped.load(Ordering::Relaxed),
            peak_line_workers: self.peak_line_workers.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Directories visited/excluded: {}/{}\n\
             Files scanned/filtered: {}/{}\n\
             Lines read: {}\n\
             Matches found: {}\n\
             Nodes skipped: {}\n\
             Peak line workers per file: {}",
            stats.directories_visited,
            stats.directories_excluded,
            stats.files_scanned,
            stats.files_filtered,
            stats.lines_read,
            stats.matches_found,
            stats.nodes_skipped,
            stats.peak_line_workers
        );
    }
}

/// Snapshot of the counters of a finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub directories_visited: u64,
    pub directories_excluded: u64,
    pub files_scanned: u64,
    pub files_filtered: u64,
    pub lines_read: u64,
    pub matches_found: u64,
    pub nodes_skipped: u64,
    pub peak_line_workers: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_scan_tracking() {
        let metrics = ScanMetrics::new();

        metrics.record_file_scan(10, 2);
        metrics.record_file_scan(5, 0);
        metrics.record_filtered_file();

        let stats = metrics.get_stats();
        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.lines_read, 15);
        assert_eq!(stats.matches_found, 2);
        assert_eq!(stats.files_filtered, 1);
    }

    #[test]
    fn test_directory_tracking() {
        let metrics = ScanMetrics::new();

        metrics.record_directory();
        metrics.record_directory();
        metrics.record_excluded_directory();
        metrics.record_skipped();

        let stats = metrics.get_stats();
        assert_eq!(stats.directories_visited, 2);
        assert_eq!(stats.directories_excluded, 1);
        assert_eq!(stats.nodes_skipped, 1);
    }

    #[test]
    fn test_peak_line_workers_keeps_maximum() {
        let metrics = ScanMetrics::new();

        metrics.record_line_workers(3);
        metrics.record_line_workers(7);
        metrics.record_line_workers(1);

        assert_eq!(metrics.get_stats().peak_line_workers, 7);
    }
}
