//! Unified error types for chartlink.
//!
//! Parse, hierarchy, and binding failures share one error type so callers
//! can log them uniformly at the boundary where they are contained.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
