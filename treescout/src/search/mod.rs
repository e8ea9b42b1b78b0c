//! The concurrent traversal-and-scan engine.
//!
//! Three layers, leaves first:
//!
//! 1. [`matcher`]: the four literal match modes and a [`PatternMatcher`] bound to one
//!    search string.
//! 2. [`scanner`]: a [`FileScanner`] that streams one file's lines to a bounded pool
//!    of line workers over a rendezvous channel and collects their matches.
//! 3. [`walker`]: a [`DirectoryWalker`] that fans out one rayon task per
//!    subdirectory and per eligible file, joins them, and prunes empty branches.
//!
//! [`engine::find`] ties them together: it builds a rayon pool sized by
//! `thread_count`, runs the root walk as one task on it, and returns the finished
//! tree along with any nodes that were skipped.
//!
//! ```rust,ignore
//! let config = SearchConfig::load_or_default(None);
//! let output = find(Path::new("src"), "needle", &config)?;
//! println!("{} matches", output.total_matches());
//! ```
pub mod engine;
pub mod matcher;
pub mod scanner;
pub mod walker;

pub use engine::{find, find_with_cancel};
pub use matcher::{MatchMode, PatternMatcher};
pub use scanner::FileScanner;
pub use walker::DirectoryWalker;
