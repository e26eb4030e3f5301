//! Adapters for external dependencies.

pub mod sessions_memory;
