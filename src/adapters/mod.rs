// Adapters layer: concrete Storage implementations.

pub mod storage;

pub use storage::{LocalStorage, MemoryStorage};
