use std::path::PathBuf;

/// Result of running a rewriter over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub output: String,
    pub edits: usize,
}

impl Rewrite {
    pub fn unchanged(text: &str) -> Self {
        Self {
            output: text.to_string(),
            edits: 0,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.edits > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Report pending changes without touching files.
    #[default]
    Report,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub edits: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: usize,
    pub changed: Vec<FileChange>,
    pub written: usize,
    pub missing: Vec<PathBuf>,
}

impl RunSummary {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    pub fn total_edits(&self) -> usize {
        self.changed.iter().map(|c| c.edits).sum()
    }
}
