use crate::adapters::LocalStorage;
use crate::config::{CliConfig, Command, DocfixConfig, RunArgs};
use crate::core::chapters::ChapterLinkifier;
use crate::core::engine::RewriteEngine;
use crate::core::migrate::KeyMigration;
use crate::core::refs::RefLinkifier;
use crate::domain::model::RunMode;
use crate::domain::ports::Rewriter;
use crate::utils::error::{DocfixError, Result};
use crate::utils::validation::Validate;
use std::io::Write;
use std::path::PathBuf;

pub const EXIT_OK: u8 = 0;
/// Returned when `--check` finds pending changes.
pub const EXIT_PENDING: u8 = 2;

/// Runs the selected subcommand, writing the change report to `out`, and
/// returns the process exit code.
pub fn run<W: Write>(cli: &CliConfig, out: &mut W) -> Result<u8> {
    let config = DocfixConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match &cli.command {
        Command::Chapters(args) => {
            let targets = args.resolve_targets(&config.chapters.paths);
            execute(ChapterLinkifier::new(&config.chapters), args, &targets, out)
        }
        Command::Refs(args) => {
            let targets = args.resolve_targets(&config.refs.paths);
            execute(RefLinkifier::new(&config.refs)?, args, &targets, out)
        }
        Command::Migrate(args) => {
            let targets = args.resolve_targets(&config.migrate.paths);
            if targets.is_empty() && args.paths.is_none() {
                return Err(DocfixError::usage(
                    "migrate needs at least one file or directory",
                ));
            }
            execute(KeyMigration::from_config(&config.migrate), args, &targets, out)
        }
        Command::Config => {
            let rendered = config.to_toml_string()?;
            write!(out, "{}", rendered).map_err(report_error)?;
            Ok(EXIT_OK)
        }
    }
}

fn execute<R: Rewriter, W: Write>(
    rewriter: R,
    args: &RunArgs,
    targets: &[PathBuf],
    out: &mut W,
) -> Result<u8> {
    let label = match (args.mode(), rewriter.name()) {
        (RunMode::Report, _) => "would change",
        (RunMode::Write, "migrate") => "migrated",
        (RunMode::Write, _) => "changed",
    };

    let engine = RewriteEngine::new(rewriter, LocalStorage::new()).with_mode(args.mode());
    let summary = engine.run_with(targets, |change| {
        writeln!(out, "{}: {}", label, change.path.display()).map_err(report_error)
    })?;

    if args.check && summary.has_changes() {
        tracing::warn!("{} file(s) need changes", summary.changed.len());
        return Ok(EXIT_PENDING);
    }
    Ok(EXIT_OK)
}

fn report_error(e: std::io::Error) -> DocfixError {
    DocfixError::io("<stdout>", e)
}
