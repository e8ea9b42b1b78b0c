/// Result types produced by a walk.
///
/// The tree is assembled bottom-up: a node is attached to its parent only after
/// its own subtree is complete, and only if that subtree holds at least one
/// match. Once [`find`](crate::find) returns, the tree is never written again,
/// so reporters only get read access through the methods here.
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::metrics::ScanStats;

/// Represents a single match in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// The 1-based line number where the match was found
    pub line: usize,
    /// The fragment that matched: the phrase, or the word containing the match
    pub text: String,
}

impl Match {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// Represents all matches found in a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// The file name
    pub name: String,
    /// The path to the file
    pub path: PathBuf,
    /// Matches ordered by line number
    pub matches: Vec<Match>,
}

impl FileResult {
    /// Number of matches in this file
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

/// A directory in the result tree, holding only children that contain matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    pub name: String,
    pub path: PathBuf,
    sub_dirs: Vec<Directory>,
    files: Vec<FileResult>,
}

impl Directory {
    /// Creates an empty directory node
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            sub_dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Creates a root node whose name is the path as given by the caller
    pub fn root(path: &Path) -> Self {
        Self::new(path.display().to_string(), path)
    }

    /// Builds a directory from fully resolved children, dropping any child
    /// that holds no matches.
    pub(crate) fn assemble(
        name: String,
        path: PathBuf,
        sub_dirs: impl IntoIterator<Item = Directory>,
        files: impl IntoIterator<Item = FileResult>,
    ) -> Self {
        Self {
            name,
            path,
            sub_dirs: sub_dirs.into_iter().filter(|d| !d.is_empty()).collect(),
            files: files
                .into_iter()
                .filter(|f| !f.matches.is_empty())
                .collect(),
        }
    }

    /// Child directories that contain matches
    pub fn sub_dirs(&self) -> &[Directory] {
        &self.sub_dirs
    }

    /// Files in this directory that contain matches
    pub fn files(&self) -> &[FileResult] {
        &self.files
    }

    /// True when nothing below this directory matched
    pub fn is_empty(&self) -> bool {
        self.sub_dirs.is_empty() && self.files.is_empty()
    }

    /// Total number of matches in this directory and all descendants
    pub fn total_matches(&self) -> usize {
        self.files.iter().map(FileResult::match_count).sum::<usize>()
            + self
                .sub_dirs
                .iter()
                .map(Directory::total_matches)
                .sum::<usize>()
    }

    /// Total number of files with matches in this directory and all descendants
    pub fn total_files(&self) -> usize {
        self.files.len() + self.sub_dirs.iter().map(Directory::total_files).sum::<usize>()
    }

    /// Walks the tree in parent-before-child order.
    ///
    /// A directory is followed by its subdirectories (recursively), then by its
    /// files, each file immediately followed by its matches.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: vec![Node::Directory {
                dir: self,
                depth: 0,
            }],
        }
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = Node<'a>;
    type IntoIter = TreeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A node visited while traversing the result tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Directory { dir: &'a Directory, depth: usize },
    File { file: &'a FileResult, depth: usize },
    Match { m: &'a Match, depth: usize },
}

impl Node<'_> {
    /// Depth below the root; the root directory is at depth 0
    pub fn depth(&self) -> usize {
        match self {
            Node::Directory { depth, .. } | Node::File { depth, .. } | Node::Match { depth, .. } => {
                *depth
            }
        }
    }
}

/// Pre-order iterator over a [`Directory`]
#[derive(Debug)]
pub struct TreeIter<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node {
            Node::Directory { dir, depth } => {
                // Pushed in reverse so that they pop in declaration order
                for file in dir.files.iter().rev() {
                    self.stack.push(Node::File {
                        file,
                        depth: depth + 1,
                    });
                }
                for sub in dir.sub_dirs.iter().rev() {
                    self.stack.push(Node::Directory {
                        dir: sub,
                        depth: depth + 1,
                    });
                }
            }
            Node::File { file, depth } => {
                for m in file.matches.iter().rev() {
                    self.stack.push(Node::Match { m, depth: depth + 1 });
                }
            }
            Node::Match { .. } => {}
        }
        Some(node)
    }
}

/// Kind of node that was skipped during a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkippedKind {
    Directory,
    File,
}

/// A node omitted from the tree because it could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub kind: SkippedKind,
    pub reason: String,
}

/// Represents the complete output of a walk
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    /// The pruned result tree
    pub root: Directory,
    /// Nodes that were skipped because they could not be read
    pub skipped: Vec<SkippedEntry>,
    /// Counters collected during the walk
    pub stats: ScanStats,
}

impl SearchOutput {
    /// Creates an output with an empty tree
    pub fn empty(root: Directory) -> Self {
        Self {
            root,
            skipped: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    /// Total number of matches in the tree
    pub fn total_matches(&self) -> usize {
        self.root.total_matches()
    }

    /// True when the walk found no matches at all
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
