use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expands input roots into a sorted list of files.
///
/// Files given directly are kept as-is; directories are walked recursively.
/// Walked files can be narrowed by extension and excluded by glob pattern.
pub struct InputWalker {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    exclude_patterns: Vec<glob::Pattern>,
}

impl InputWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            extensions: vec![],
            exclude_patterns: vec![],
        }
    }

    /// Only keep walked files with one of these extensions (no leading dot).
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid glob pattern '{p}'")))
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// Walk every root. Each root's files are sorted by path, and roots keep
    /// their command line order.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for root in &self.roots {
            if root.is_file() {
                files.push(root.clone());
                continue;
            }

            let mut found = Vec::new();
            for entry in WalkDir::new(root).follow_links(false) {
                let entry =
                    entry.with_context(|| format!("Failed to walk {}", root.display()))?;
                let path = entry.path();
                if entry.file_type().is_file() && self.should_process(path) {
                    found.push(path.to_path_buf());
                }
            }
            found.sort();
            files.extend(found);
        }

        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if !self.extensions.is_empty() {
            let matches_ext = path
                .extension()
                .map(|ext| self.extensions.iter().any(|e| ext == e.as_str()))
                .unwrap_or(false);
            if !matches_ext {
                return false;
            }
        }

        let path_str = path.to_string_lossy();
        !self.exclude_patterns.iter().any(|p| p.matches(&path_str))
    }
}
