use crate::adapters::storage::has_extension;
use crate::domain::model::{EntryKind, FileChange, RunMode, RunSummary};
use crate::domain::ports::{Rewriter, Storage};
use crate::utils::error::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub struct RewriteEngine<R: Rewriter, S: Storage> {
    rewriter: R,
    storage: S,
    mode: RunMode,
}

impl<R: Rewriter, S: Storage> RewriteEngine<R, S> {
    pub fn new(rewriter: R, storage: S) -> Self {
        Self {
            rewriter,
            storage,
            mode: RunMode::Report,
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Expands targets into the ordered, de-duplicated list of files to
    /// process. Missing targets are logged and recorded in `missing`.
    pub fn discover(&self, targets: &[PathBuf], missing: &mut Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        let extension = self.rewriter.extension();
        let mut seen = BTreeSet::new();
        let mut files = Vec::new();

        for target in targets {
            let found = match self.storage.entry_kind(target) {
                EntryKind::Missing => {
                    tracing::warn!("{} not found, skipping", target.display());
                    missing.push(target.clone());
                    continue;
                }
                EntryKind::File => {
                    if self.rewriter.filters_explicit_files() && !has_extension(target, extension) {
                        tracing::warn!(
                            "{} is not a .{} file, skipping",
                            target.display(),
                            extension
                        );
                        continue;
                    }
                    vec![target.clone()]
                }
                EntryKind::Dir => self.storage.list_files(target, extension)?,
            };

            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        Ok(files)
    }

    pub fn run(&self, targets: &[PathBuf]) -> Result<RunSummary> {
        self.run_with(targets, |_| Ok(()))
    }

    /// Like [`run`](Self::run), but hands each change to `on_change` as soon
    /// as it is made, so a caller's report survives a later failure.
    pub fn run_with<F>(&self, targets: &[PathBuf], mut on_change: F) -> Result<RunSummary>
    where
        F: FnMut(&FileChange) -> Result<()>,
    {
        tracing::info!(
            "Running {} over {} target(s) ({:?} mode)",
            self.rewriter.name(),
            targets.len(),
            self.mode
        );

        let mut summary = RunSummary::default();
        let files = self.discover(targets, &mut summary.missing)?;

        for file in files {
            summary.scanned += 1;
            let text = self.storage.read_to_string(&file)?;
            let rewrite = self.rewriter.rewrite(&file, &text)?;
            if !rewrite.is_changed() {
                tracing::debug!("{} is up to date", file.display());
                continue;
            }

            tracing::debug!("{}: {} edit(s)", file.display(), rewrite.edits);
            if self.mode == RunMode::Write {
                self.storage.write_string(&file, &rewrite.output)?;
                summary.written += 1;
            }
            let change = FileChange {
                path: file,
                edits: rewrite.edits,
            };
            on_change(&change)?;
            summary.changed.push(change);
        }

        tracing::info!(
            "{}: scanned {} file(s), {} with changes ({} edit(s)), {} written",
            self.rewriter.name(),
            summary.scanned,
            summary.changed.len(),
            summary.total_edits(),
            summary.written
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::core::chapters::ChapterLinkifier;
    use crate::core::migrate::KeyMigration;
    use crate::utils::error::DocfixError;

    fn guide_storage() -> MemoryStorage {
        MemoryStorage::new()
            .with_file("docs/guide/CHAPTER-001.md", "Intro. Next: Chapter 2.\n")
            .with_file("docs/guide/CHAPTER-002.md", "# Chapter 2\nNothing to link.\n")
            .with_file("docs/guide/notes.txt", "Chapter 3\n")
    }

    #[test]
    fn test_report_mode_does_not_write() {
        let storage = guide_storage();
        let engine = RewriteEngine::new(ChapterLinkifier::default(), &storage);
        let summary = engine.run(&[PathBuf::from("docs/guide")]).unwrap();

        assert_eq!(summary.scanned, 2);
        assert_eq!(
            summary.changed,
            vec![FileChange {
                path: PathBuf::from("docs/guide/CHAPTER-001.md"),
                edits: 1,
            }]
        );
        assert_eq!(summary.written, 0);
        assert_eq!(
            storage.get("docs/guide/CHAPTER-001.md").as_deref(),
            Some("Intro. Next: Chapter 2.\n")
        );
    }

    #[test]
    fn test_write_mode_rewrites_in_place() {
        let storage = guide_storage();
        let engine =
            RewriteEngine::new(ChapterLinkifier::default(), &storage).with_mode(RunMode::Write);
        let summary = engine.run(&[PathBuf::from("docs/guide")]).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(
            storage.get("docs/guide/CHAPTER-001.md").as_deref(),
            Some("Intro. Next: [Chapter 2](./CHAPTER-002.md).\n")
        );
        assert_eq!(storage.get("docs/guide/notes.txt").as_deref(), Some("Chapter 3\n"));

        let again = engine.run(&[PathBuf::from("docs/guide")]).unwrap();
        assert!(!again.has_changes());
    }

    #[test]
    fn test_missing_targets_are_recorded_and_skipped() {
        let storage = guide_storage();
        let engine = RewriteEngine::new(ChapterLinkifier::default(), &storage);
        let summary = engine
            .run(&[
                PathBuf::from("docs/absent"),
                PathBuf::from("docs/guide/CHAPTER-001.md"),
            ])
            .unwrap();

        assert_eq!(summary.missing, vec![PathBuf::from("docs/absent")]);
        assert_eq!(summary.scanned, 1);
        assert!(summary.has_changes());
    }

    #[test]
    fn test_overlapping_targets_processed_once() {
        let storage = guide_storage();
        let engine = RewriteEngine::new(ChapterLinkifier::default(), &storage);
        let summary = engine
            .run(&[
                PathBuf::from("docs/guide/CHAPTER-001.md"),
                PathBuf::from("docs"),
            ])
            .unwrap();
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.changed.len(), 1);
    }

    #[test]
    fn test_explicit_file_with_other_extension() {
        let storage = guide_storage().with_file("data/pointers.data", "{\"cipher_meta\": 1}");

        let chapters = RewriteEngine::new(ChapterLinkifier::default(), &storage);
        let summary = chapters.run(&[PathBuf::from("docs/guide/notes.txt")]).unwrap();
        assert_eq!(summary.scanned, 0);

        let migrate = RewriteEngine::new(KeyMigration::default(), &storage);
        let summary = migrate.run(&[PathBuf::from("data/pointers.data")]).unwrap();
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.changed.len(), 1);

        let summary = migrate.run(&[PathBuf::from("data")]).unwrap();
        assert_eq!(summary.scanned, 0);
    }

    #[test]
    fn test_changes_are_reported_before_a_later_failure() {
        let storage = MemoryStorage::new()
            .with_file("data/a.json", "{\"cipher_meta\": 1}")
            .with_file("data/b.json", "{not json");
        let engine = RewriteEngine::new(KeyMigration::default(), &storage);
        let mut reported = Vec::new();
        let err = engine
            .run_with(&[PathBuf::from("data")], |change| {
                reported.push(change.path.clone());
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, DocfixError::JsonError { .. }));
        assert_eq!(reported, vec![PathBuf::from("data/a.json")]);
    }

    #[test]
    fn test_callback_error_stops_run() {
        let storage = guide_storage();
        let engine =
            RewriteEngine::new(ChapterLinkifier::default(), &storage).with_mode(RunMode::Write);
        let err = engine
            .run_with(&[PathBuf::from("docs/guide")], |_| {
                Err(DocfixError::usage("report closed"))
            })
            .unwrap_err();

        assert!(matches!(err, DocfixError::UsageError { .. }));
        assert_eq!(
            storage.get("docs/guide/CHAPTER-001.md").as_deref(),
            Some("Intro. Next: [Chapter 2](./CHAPTER-002.md).\n")
        );
    }

    #[test]
    fn test_malformed_json_aborts_run() {
        let storage = MemoryStorage::new()
            .with_file("data/a.json", "{\"cipher_meta\": 1}")
            .with_file("data/b.json", "{not json");
        let engine =
            RewriteEngine::new(KeyMigration::default(), &storage).with_mode(RunMode::Write);
        let err = engine.run(&[PathBuf::from("data")]).unwrap_err();

        assert!(matches!(err, DocfixError::JsonError { .. }));
        assert_eq!(
            storage.get("data/a.json").as_deref(),
            Some("{\n  \"encrypted_meta\": 1\n}\n")
        );
    }
}
