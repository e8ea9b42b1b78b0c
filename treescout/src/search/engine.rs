use rayon::ThreadPoolBuilder;
use std::path::Path;
use tracing::{debug, info, warn};

use super::matcher::PatternMatcher;
use super::scanner::FileScanner;
use super::walker::DirectoryWalker;
use crate::cancel::CancellationToken;
use crate::config::{ErrorPolicy, SearchConfig};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;
use crate::results::{Directory, SearchOutput, SkippedEntry, SkippedKind};

/// Searches `root` for `search` and returns the pruned result tree.
///
/// The root's name in the tree is the path as given.
pub fn find(root: &Path, search: &str, config: &SearchConfig) -> SearchResult<SearchOutput> {
    find_with_cancel(root, search, config, &CancellationToken::new())
}

/// Like [`find`], but stops early with [`SearchError::Cancelled`] once `cancel`
/// is cancelled.
pub fn find_with_cancel(
    root: &Path,
    search: &str,
    config: &SearchConfig,
    cancel: &CancellationToken,
) -> SearchResult<SearchOutput> {
    info!(
        "Starting search for {:?} in {} ({:?})",
        search,
        root.display(),
        config.match_mode()
    );

    let root_dir = Directory::root(root);
    if search.trim().is_empty() {
        warn!("Empty search text provided");
        return Ok(SearchOutput::empty(root_dir));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.thread_count.get())
        .thread_name(|index| format!("treescout-walk-{}", index))
        .build()
        .map_err(|e| SearchError::config_error(format!("Cannot build thread pool: {}", e)))?;
    debug!("Using {} walker threads", config.thread_count);

    let matcher = PatternMatcher::new(config.match_mode(), search);
    let metrics = ScanMetrics::new();
    let walk_cancel = cancel.child_token();
    let scanner = FileScanner::new(&matcher, config, &metrics, &walk_cancel);
    let walker = DirectoryWalker::new(scanner, config, &metrics, &walk_cancel);

    let walked = pool.install(|| walker.walk(root_dir.name.clone(), root_dir.path.clone()));

    let (root, skipped) = match walked {
        Ok(subtree) => (subtree.dir, subtree.skipped),
        Err(e) => {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            let err = walker.take_first_error().unwrap_or(e);
            if err.is_per_node() && config.error_policy == ErrorPolicy::Skip {
                // The root itself could not be listed
                warn!("Skipping unreadable root: {}", err);
                metrics.record_skipped();
                let entry = SkippedEntry {
                    path: root_dir.path.clone(),
                    kind: SkippedKind::Directory,
                    reason: err.to_string(),
                };
                (root_dir, vec![entry])
            } else {
                return Err(err);
            }
        }
    };

    metrics.log_stats();
    let output = SearchOutput {
        root,
        skipped,
        stats: metrics.get_stats(),
    };

    info!(
        "Search complete. Found {} matches in {} files ({} skipped)",
        output.total_matches(),
        output.root.total_files(),
        output.skipped.len()
    );

    Ok(output)
}
