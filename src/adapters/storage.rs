use crate::domain::model::EntryKind;
use crate::domain::ports::Storage;
use crate::utils::error::{DocfixError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names never descended into during discovery.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

fn should_skip_dir(name: &str) -> bool {
    SKIPPED_DIRS.contains(&name)
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| DocfixError::io(dir, e))? {
            let entry = entry.map_err(|e| DocfixError::io(dir, e))?;
            entries.push(entry.path());
        }
        entries.sort();

        for entry_path in entries {
            if entry_path.is_dir() {
                let skip = entry_path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(should_skip_dir);
                if skip {
                    tracing::debug!("Skipping directory {}", entry_path.display());
                    continue;
                }
                Self::collect_files(&entry_path, extension, out)?;
            } else if has_extension(&entry_path, extension) {
                out.push(entry_path);
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        if path.is_file() {
            EntryKind::File
        } else if path.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::Missing
        }
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        Self::collect_files(dir, extension, &mut files)?;
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| DocfixError::io(path, e))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|e| DocfixError::io(path, e))
    }
}

/// In-memory file tree. Directories exist implicitly as prefixes of stored
/// file paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<BTreeMap<PathBuf, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .borrow()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

impl Storage for MemoryStorage {
    fn entry_kind(&self, path: &Path) -> EntryKind {
        if self.files.borrow().contains_key(path) {
            EntryKind::File
        } else if self.is_dir(path) {
            EntryKind::Dir
        } else {
            EntryKind::Missing
        }
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|file| file.starts_with(dir) && has_extension(file, extension))
            .filter(|file| {
                file.strip_prefix(dir)
                    .map(|rel| {
                        !rel.components()
                            .any(|c| c.as_os_str().to_str().is_some_and(should_skip_dir))
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.get(path).ok_or_else(|| {
            DocfixError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
