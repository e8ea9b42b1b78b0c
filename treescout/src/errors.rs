/// Error types for treescout.
///
/// A walk can fail in two places: listing a directory and opening (or reading)
/// a file. Both carry the offending path so that callers running with
/// [`ErrorPolicy::Skip`](crate::config::ErrorPolicy) can record the node and
/// keep going, while callers running fail-fast can surface the first error as-is.
///
/// ```rust,ignore
/// match treescout::find(root, "needle", &config) {
///     Ok(output) => // Render output.root,
///     Err(SearchError::DirectoryUnreadable { path, .. }) => // Report path,
///     Err(SearchError::Cancelled) => // Caller aborted the walk,
///     Err(e) => // Handle other errors
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot open file {path}: {source}")]
    FileUnopenable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Search cancelled")]
    Cancelled,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn directory_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn file_unopenable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileUnopenable {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Returns the path of the node that failed, if the error is tied to one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DirectoryUnreadable { path, .. } | Self::FileUnopenable { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Whether the error belongs to a single node and can be skipped
    pub fn is_per_node(&self) -> bool {
        matches!(
            self,
            Self::DirectoryUnreadable { .. } | Self::FileUnopenable { .. }
        )
    }
}

impl From<::config::ConfigError> for SearchError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let err = SearchError::directory_unreadable(
            "src",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, SearchError::DirectoryUnreadable { .. }));
        assert_eq!(err.path(), Some(Path::new("src")));
        assert!(err.is_per_node());

        let err = SearchError::file_unopenable(
            "main.go",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, SearchError::FileUnopenable { .. }));
        assert_eq!(err.path(), Some(Path::new("main.go")));

        assert!(!SearchError::Cancelled.is_per_node());
        assert_eq!(SearchError::Cancelled.path(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::file_unopenable(
            "notes.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(
            err.to_string(),
            "Cannot open file notes.txt: permission denied"
        );

        let err = SearchError::config_error("Missing required field");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field"
        );

        assert_eq!(SearchError::Cancelled.to_string(), "Search cancelled");
    }
}
