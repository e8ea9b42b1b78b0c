/// Name-based eligibility rules applied by the walker and the file scanner.
///
/// Exclusions compare whole entry names, never paths or globs: a directory
/// named `vendor` is excluded wherever it sits in the tree, and a file named
/// `go.sum` is excluded in every directory. Extensions are compared with their
/// leading dot and are case-sensitive, so `.go` does not admit `main.GO`.
///
/// This module uses free functions rather than a filter trait; the walker is
/// the only caller and the rules never vary at runtime.
use std::collections::HashSet;
use std::path::Path;

/// Returns the dot-prefixed extension of a file name, e.g. `.go` for `main.go`.
///
/// The extension is everything from the last dot of the final path element, so
/// a dotfile such as `.bashrc` has the extension `.bashrc` and a name without a
/// dot has none.
pub fn dotted_extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|index| &name[index..])
}

/// Checks whether a directory name is on the exclusion list
pub fn is_excluded_dir(name: &str, exclude_directories: &HashSet<String>) -> bool {
    exclude_directories.contains(name)
}

/// Checks whether a file name is on the exclusion list
pub fn is_excluded_file(name: &str, exclude_files: &HashSet<String>) -> bool {
    exclude_files.contains(name)
}

/// Checks whether a file's extension is on the allow-list.
///
/// An empty allow-list admits nothing.
pub fn has_allowed_extension(name: &str, allowed_extensions: &HashSet<String>) -> bool {
    dotted_extension(name).is_some_and(|ext| allowed_extensions.contains(ext))
}

/// Determines if a file should be scanned.
///
/// File-name exclusion takes precedence over an allowed extension. Names that
/// are not valid UTF-8 are judged on their lossy decoding, the same form the
/// walker uses when it lists them.
pub fn should_scan_file(
    path: &Path,
    exclude_files: &HashSet<String>,
    allowed_extensions: &HashSet<String>,
) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    !is_excluded_file(&name, exclude_files) && has_allowed_extension(&name, allowed_extensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension("main.go"), Some(".go"));
        assert_eq!(dotted_extension("archive.tar.gz"), Some(".gz"));
        assert_eq!(dotted_extension(".bashrc"), Some(".bashrc"));
        assert_eq!(dotted_extension("Makefile"), None);
    }

    #[test]
    fn test_has_allowed_extension() {
        let allowed = set(&[".go", ".txt"]);
        assert!(has_allowed_extension("main.go", &allowed));
        assert!(has_allowed_extension("notes.txt", &allowed));
        assert!(!has_allowed_extension("main.GO", &allowed)); // Case sensitive
        assert!(!has_allowed_extension("build.log", &allowed));
        assert!(!has_allowed_extension("Makefile", &allowed));
        assert!(!has_allowed_extension("main.go", &HashSet::new()));
    }

    #[test]
    fn test_is_excluded_dir() {
        let excluded = set(&["vendor", ".git"]);
        assert!(is_excluded_dir("vendor", &excluded));
        assert!(is_excluded_dir(".git", &excluded));
        assert!(!is_excluded_dir("vendor2", &excluded));
        assert!(!is_excluded_dir("src", &excluded));
    }

    #[test]
    fn test_should_scan_file() {
        let excluded = set(&["secrets.txt"]);
        let allowed = set(&[".txt"]);

        assert!(should_scan_file(Path::new("dir/a.txt"), &excluded, &allowed));
        // Exclusion wins over an allowed extension
        assert!(!should_scan_file(
            Path::new("dir/secrets.txt"),
            &excluded,
            &allowed
        ));
        assert!(!should_scan_file(Path::new("dir/b.log"), &excluded, &allowed));
    }

    #[cfg(unix)]
    #[test]
    fn test_should_scan_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let allowed = set(&[".txt"]);
        let path = Path::new(OsStr::from_bytes(b"dir/caf\xe9.txt"));
        assert!(should_scan_file(path, &HashSet::new(), &allowed));

        let path = Path::new(OsStr::from_bytes(b"dir/caf\xe9.log"));
        assert!(!should_scan_file(path, &HashSet::new(), &allowed));
    }
}
