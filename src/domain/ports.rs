use crate::domain::model::{EntryKind, Rewrite};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub trait Storage {
    fn entry_kind(&self, path: &Path) -> EntryKind;
    /// All files under `dir` with the given extension, recursively, sorted.
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write_string(&self, path: &Path, contents: &str) -> Result<()>;
}

/// A single-pass text transformer applied to every matching file.
pub trait Rewriter {
    fn name(&self) -> &'static str;
    /// File extension (without the dot) this rewriter accepts.
    fn extension(&self) -> &'static str;
    /// Whether a file named directly as a target must also carry
    /// [`extension`](Rewriter::extension). Directory scans always filter.
    fn filters_explicit_files(&self) -> bool {
        true
    }
    fn rewrite(&self, path: &Path, text: &str) -> Result<Rewrite>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        (**self).entry_kind(path)
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        (**self).list_files(dir, extension)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        (**self).write_string(path, contents)
    }
}
