//! Backend test support utilities
//!
//! Unified logging initialization for integration tests and helpers for
//! generating unique identities.

pub mod test_logging;
pub mod unique_helpers;
