//! Utility functions and helpers.
//!
//! Common functionality used across multiple reqmap crates.

pub mod name;
pub mod path;

// Re-export commonly used utilities
pub use name::{is_normalized, normalize};
pub use path::{ensure_trailing_slash, is_safe_fragment, module_path};
