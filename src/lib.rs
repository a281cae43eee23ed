pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, MemoryStorage};
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::DocfixConfig;
pub use crate::core::{
    chapters::ChapterLinkifier, engine::RewriteEngine, migrate::KeyMigration, refs::RefLinkifier,
};
pub use utils::error::{DocfixError, Result};
