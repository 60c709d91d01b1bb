//! Builders that turn indented outlines and directories into trees.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use crate::domain::arena::{MultiTree, NodeId};
use crate::domain::error::{BuildError, BuildResult};

pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Builds a tree from indented text.
///
/// Each non-blank line that does not start with `#` is one node. Its level
/// is the number of leading tabs plus the leading spaces divided by the
/// indent width. The first entry is the root and is the only entry on
/// level 0.
///
/// ```text
/// Languages
///   Compiled
///     Java
///   Interpreted
/// ```
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    indent_width: usize,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Spaces per level; zero is treated as one.
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width.max(1);
        self
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build_from_path(&self, path: &Path) -> BuildResult<MultiTree<String>> {
        let text = fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.build_from_str(&text)
    }

    #[instrument(level = "debug", skip_all)]
    pub fn build_from_str(&self, text: &str) -> BuildResult<MultiTree<String>> {
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let label = raw.trim();
            if label.is_empty() || label.starts_with('#') {
                continue;
            }
            entries.push((line, self.level_of(raw, line)?, label));
        }

        let mut entries = entries.into_iter();
        let (line, level, label) = entries
            .next()
            .ok_or_else(|| malformed(0, "the outline has no entries"))?;
        if level != 0 {
            return Err(malformed(line, "the first entry must not be indented"));
        }
        let mut tree = MultiTree::new(label.to_string());
        // Last node seen on each level, root at index 0
        let mut open: Vec<NodeId> = vec![tree.root()];

        for (line, level, label) in entries {
            if level == 0 {
                return Err(malformed(line, "an outline has exactly one unindented entry"));
            }
            if level > open.len() {
                return Err(malformed(
                    line,
                    &format!("indentation jumps from level {} to {}", open.len() - 1, level),
                ));
            }

            open.truncate(level);
            let parent = open[level - 1];
            let ids = tree
                .insert(parent, [label.to_string()])
                .map_err(|source| BuildError::Tree { line, source })?;
            open.extend(ids);
        }

        debug!(nodes = tree.len(), "outline built");
        Ok(tree)
    }

    fn level_of(&self, raw: &str, line: usize) -> BuildResult<usize> {
        let mut tabs = 0;
        let mut spaces = 0;
        for c in raw.chars() {
            match c {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                _ => break,
            }
        }
        if spaces % self.indent_width != 0 {
            return Err(malformed(
                line,
                &format!(
                    "{} leading spaces is not a multiple of the indent width {}",
                    spaces, self.indent_width
                ),
            ));
        }
        Ok(tabs + spaces / self.indent_width)
    }
}

fn malformed(line: usize, reason: &str) -> BuildError {
    BuildError::MalformedOutline {
        line,
        reason: reason.to_string(),
    }
}

/// Builds a tree mirroring a directory, entries sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct DirectoryBuilder {
    max_depth: Option<usize>,
    include_hidden: bool,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels to descend below the directory; `None` walks everything.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether to include entries whose name starts with a dot.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build_from_directory(&self, directory_path: &Path) -> BuildResult<MultiTree<String>> {
        if !directory_path.exists() {
            return Err(BuildError::NotFound(directory_path.to_path_buf()));
        }
        if !directory_path.is_dir() {
            return Err(BuildError::NotADirectory(directory_path.to_path_buf()));
        }

        let root_label = directory_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| directory_path.display().to_string());
        let mut tree = MultiTree::new(root_label);
        let mut open: Vec<NodeId> = vec![tree.root()];

        let mut walker = WalkDir::new(directory_path).min_depth(1).sort_by_file_name();
        if let Some(max_depth) = self.max_depth {
            walker = walker.max_depth(max_depth);
        }
        let include_hidden = self.include_hidden;

        for entry in walker
            .into_iter()
            .filter_entry(move |e| include_hidden || !is_hidden(e))
        {
            let entry = entry.map_err(|e| BuildError::Walk {
                path: directory_path.to_path_buf(),
                message: e.to_string(),
            })?;

            // Pre-order walk: the parent of a depth-d entry is the last node on level d-1
            open.truncate(entry.depth());
            let Some(&parent) = open.last() else {
                return Err(BuildError::Walk {
                    path: entry.path().to_path_buf(),
                    message: "entry reported without its parent directory".to_string(),
                });
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let ids = tree
                .insert(parent, [name])
                .map_err(|source| BuildError::Entry {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
            open.extend(ids);
        }

        debug!(nodes = tree.len(), "directory tree built");
        Ok(tree)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}
