use ::config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::SearchResult;
use crate::search::matcher::MatchMode;

/// Default number of line workers per file
pub const DEFAULT_LINE_WORKERS: usize = 100;

/// Configuration consumed by a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations, later sources
/// overriding earlier ones:
/// 1. Global `$CONFIG_DIR/treescout/config.yaml`
/// 2. Local `config.json` in the current directory
/// 3. Local `.treescout.yaml` in the current directory
/// 4. Custom config file specified via `--config` (YAML or JSON)
///
/// # Configuration Format
///
/// ```yaml
/// # Directory names never descended into, wherever they appear
/// exclude_directories: [".git", "vendor", "node_modules"]
///
/// # File names never scanned
/// exclude_files: ["go.sum"]
///
/// # Only files with these extensions are scanned (dot-prefixed)
/// allowed_extensions: [".go", ".md"]
///
/// # Match mode
/// match_case: false
/// match_full_word: true
///
/// # Engine settings
/// thread_count: 8        # directory-level concurrency (default: CPU cores)
/// line_workers: 100      # line workers per file
/// error_policy: skip     # skip | fail_fast
/// sort_entries: true
/// log_level: "warn"
/// ```
///
/// The match and filter keys are also accepted in camelCase
/// (`excludeDirectories`, `excludeFiles`, `allowedExtensions`, `matchCase`,
/// `matchFullWord`), so an existing `config.json` can be used as is.
///
/// Every field is optional. An absent or unreadable file yields the defaults:
/// no exclusions, no allowed extensions and case-insensitive partial matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Directory names whose subtrees are never visited
    #[serde(alias = "excludedirectories", alias = "excludeDirectories")]
    pub exclude_directories: HashSet<String>,

    /// File names that are never scanned, even with an allowed extension
    #[serde(alias = "excludefiles", alias = "excludeFiles")]
    pub exclude_files: HashSet<String>,

    /// Dot-prefixed extensions that are eligible for scanning.
    /// An empty set admits no files.
    #[serde(alias = "allowedextensions", alias = "allowedExtensions")]
    pub allowed_extensions: HashSet<String>,

    /// Compare text case-sensitively
    #[serde(alias = "matchcase", alias = "matchCase")]
    pub match_case: bool,

    /// Match whole words (or a whole phrase) instead of substrings of words
    #[serde(alias = "matchfullword", alias = "matchFullWord")]
    pub match_full_word: bool,

    /// Number of threads walking directories and scanning files
    /// Defaults to number of CPU cores if not specified
    pub thread_count: NonZeroUsize,

    /// Upper bound on concurrent line workers for a single file
    pub line_workers: NonZeroUsize,

    /// What to do when a directory or file cannot be read
    pub error_policy: ErrorPolicy,

    /// Order children by name so that output is reproducible
    pub sort_entries: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// How per-node read failures are handled during a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Omit the failing node, record it, and keep walking
    #[default]
    Skip,
    /// Abort the whole walk on the first failure
    FailFast,
}

/// Values supplied on the command line that take precedence over file values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub exclude_directories: Vec<String>,
    pub exclude_files: Vec<String>,
    pub allowed_extensions: Vec<String>,
    pub match_case: bool,
    pub match_full_word: bool,
    pub thread_count: Option<NonZeroUsize>,
    pub fail_fast: bool,
    pub log_level: Option<String>,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_line_workers() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_LINE_WORKERS).unwrap_or(NonZeroUsize::MIN)
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exclude_directories: HashSet::new(),
            exclude_files: HashSet::new(),
            allowed_extensions: HashSet::new(),
            match_case: false,
            match_full_word: false,
            thread_count: default_thread_count(),
            line_workers: default_line_workers(),
            error_policy: ErrorPolicy::Skip,
            sort_entries: true,
            log_level: "warn".to_string(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an optional file.
    ///
    /// A missing custom file is an error; missing default files are skipped.
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("treescout/config.yaml")),
            Some(PathBuf::from("config.json")),
            Some(PathBuf::from(".treescout.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                debug!("Adding config source: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            debug!("Adding config source: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: SearchConfig = builder.build()?.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Loads configuration, falling back to defaults when loading fails.
    ///
    /// A malformed or missing file is logged and treated as empty.
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        match Self::load_from(config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Returns the match mode selected by the two match flags
    pub fn match_mode(&self) -> MatchMode {
        MatchMode::from_flags(self.match_case, self.match_full_word)
    }

    /// Prefixes a dot onto allowed extensions that were written without one
    pub fn normalized(mut self) -> Self {
        self.allowed_extensions = self
            .allowed_extensions
            .into_iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();
        self
    }

    /// Merges command-line values with configuration file values.
    ///
    /// List values extend the file's sets; flags can only switch a setting on.
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        self.exclude_directories.extend(cli.exclude_directories);
        self.exclude_files.extend(cli.exclude_files);
        self.allowed_extensions.extend(cli.allowed_extensions);
        if cli.match_case {
            self.match_case = true;
        }
        if cli.match_full_word {
            self.match_full_word = true;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if cli.fail_fast {
            self.error_policy = ErrorPolicy::FailFast;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self.normalized()
    }
}
