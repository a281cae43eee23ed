use crate::domain::model::RunMode;
use crate::utils::logger::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "docfix", version)]
#[command(about = "Documentation maintenance: linkify references and migrate JSON keys")]
pub struct CliConfig {
    /// Path to TOML configuration file (default: ./docfix.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Link bare "Chapter N" mentions to per-chapter files
    Chapters(RunArgs),
    /// Link "SPEC §N" / "TECH-SPEC §N" mentions to anchored sections
    Refs(RunArgs),
    /// Rename a legacy key throughout JSON documents
    Migrate(RunArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Apply changes in place
    #[arg(long)]
    pub write: bool,

    /// Exit with status 2 if any file needs changes
    #[arg(long)]
    pub check: bool,

    /// Files or directories to process (overrides configured defaults)
    #[arg(long, num_args = 0.., value_name = "PATH")]
    pub paths: Option<Vec<PathBuf>>,

    /// Additional files or directories to process
    #[arg(value_name = "PATH")]
    pub targets: Vec<PathBuf>,
}

impl RunArgs {
    pub fn mode(&self) -> RunMode {
        if self.write {
            RunMode::Write
        } else {
            RunMode::Report
        }
    }

    /// Explicit targets merged from `--paths` and positionals, or `defaults`
    /// when neither was given. `--paths` with no values yields no targets.
    pub fn resolve_targets(&self, defaults: &[PathBuf]) -> Vec<PathBuf> {
        match &self.paths {
            None if self.targets.is_empty() => defaults.to_vec(),
            None => self.targets.clone(),
            Some(paths) => paths.iter().chain(&self.targets).cloned().collect(),
        }
    }
}
