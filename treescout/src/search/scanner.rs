use crossbeam_channel::{bounded, unbounded, TrySendError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use tracing::{debug, trace};

use super::matcher::PatternMatcher;
use crate::cancel::CancellationToken;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::filters::should_scan_file;
use crate::metrics::ScanMetrics;
use crate::results::{FileResult, Match};

const BUFFER_CAPACITY: usize = 8192;

/// Scans the lines of one file at a time.
///
/// A single producer reads lines in order and hands each one through a
/// zero-capacity channel to a pool of line workers. Workers are started on
/// demand, only when no idle worker is waiting for the next line, so the pool
/// never grows past `line_workers` or past the number of lines in the file.
/// Workers send their matches over a second channel; the scanning thread is the
/// only owner of the match list and sorts it by line once every worker has
/// finished.
#[derive(Debug)]
pub struct FileScanner<'a> {
    matcher: &'a PatternMatcher,
    config: &'a SearchConfig,
    metrics: &'a ScanMetrics,
    cancel: &'a CancellationToken,
}

impl<'a> FileScanner<'a> {
    /// Creates a new FileScanner with the given pattern matcher
    pub fn new(
        matcher: &'a PatternMatcher,
        config: &'a SearchConfig,
        metrics: &'a ScanMetrics,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            matcher,
            config,
            metrics,
            cancel,
        }
    }

    /// Whether the file passes the name exclusions and the extension allow-list
    pub fn should_scan(&self, path: &Path) -> bool {
        should_scan_file(
            path,
            &self.config.exclude_files,
            &self.config.allowed_extensions,
        )
    }

    /// Scans a file and returns its matches ordered by line.
    ///
    /// A file that is excluded by name or extension is not opened and yields an
    /// empty result.
    pub fn scan_file(&self, path: &Path) -> SearchResult<FileResult> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !self.should_scan(path) {
            trace!("Skipping filtered file: {}", path.display());
            self.metrics.record_filtered_file();
            return Ok(FileResult {
                name,
                path: path.to_path_buf(),
                matches: Vec::new(),
            });
        }

        trace!("Scanning file: {}", path.display());
        let file = File::open(path).map_err(|e| SearchError::file_unopenable(path, e))?;
        let reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let (matches, lines) = self.scan_reader(reader, path)?;

        debug!("Found {} matches in file {}", matches.len(), path.display());
        self.metrics
            .record_file_scan(lines as u64, matches.len() as u64);

        Ok(FileResult {
            name,
            path: path.to_path_buf(),
            matches,
        })
    }

    /// Scans lines from a reader, returning the matches and the number of lines read.
    ///
    /// `path` is only used to label read errors.
    pub fn scan_reader<R: BufRead>(
        &self,
        mut reader: R,
        path: &Path,
    ) -> SearchResult<(Vec<Match>, usize)> {
        let matcher = self.matcher;
        let cancel = self.cancel;
        let limit = self.config.line_workers.get();
        let (match_tx, match_rx) = unbounded::<Match>();

        let (lines, workers) = thread::scope(|scope| -> SearchResult<(usize, usize)> {
            // Both ends live inside the closure so that returning drops them and
            // lets the workers drain out before the scope joins.
            let (line_tx, line_rx) = bounded::<(usize, String)>(0);
            let mut workers = 0;
            let mut line_number = 0;
            let mut buffer = Vec::with_capacity(256);

            loop {
                if cancel.is_cancelled() {
                    return Err(SearchError::Cancelled);
                }

                buffer.clear();
                let read = reader
                    .read_until(b'\n', &mut buffer)
                    .map_err(|e| SearchError::file_unopenable(path, e))?;
                if read == 0 {
                    break;
                }
                line_number += 1;
                let mut item = (line_number, decode_line(&buffer));

                if workers < limit {
                    match line_tx.try_send(item) {
                        Ok(()) => continue,
                        Err(TrySendError::Full(returned))
                        | Err(TrySendError::Disconnected(returned)) => item = returned,
                    }

                    let rx = line_rx.clone();
                    let tx = match_tx.clone();
                    scope.spawn(move || {
                        for (line, text) in rx.iter() {
                            if cancel.is_cancelled() {
                                continue;
                            }
                            for fragment in matcher.find_matches(&text) {
                                trace!("Found match at line {}: {}", line, fragment);
                                if tx.send(Match::new(line, fragment)).is_err() {
                                    return;
                                }
                            }
                        }
                    });
                    workers += 1;
                }

                if line_tx.send(item).is_err() {
                    break;
                }
            }

            trace!(
                "Read {} lines with {} workers from {}",
                line_number,
                workers,
                path.display()
            );
            Ok((line_number, workers))
        })?;
        self.metrics.record_line_workers(workers as u64);

        let mut matches: Vec<Match> = match_rx.try_iter().collect();
        matches.sort_by_key(|m| m.line);
        Ok((matches, lines))
    }
}

/// Decodes one raw line, dropping the trailing `\n` or `\r\n`.
///
/// Invalid UTF-8 is replaced rather than rejected so that line numbering stays
/// aligned with the file.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
