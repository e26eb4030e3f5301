//! Storage seams for the session engine.

pub mod sessions;
