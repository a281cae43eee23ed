#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, RunArgs};
pub use toml_config::{ChaptersConfig, DocfixConfig, MigrateConfig, RefsConfig};
