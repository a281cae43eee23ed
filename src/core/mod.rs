pub mod chapters;
pub mod engine;
pub mod markdown;
pub mod migrate;
pub mod refs;

pub use crate::domain::model::{Rewrite, RunMode, RunSummary};
pub use crate::domain::ports::{Rewriter, Storage};
pub use crate::utils::error::Result;
