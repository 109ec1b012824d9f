//! Foundation types for the notification engine.
//!
//! - [`FileId`] - Opaque file handles from the host
//! - [`Location`] - Diagnostic anchors
//! - [`TextRange`], [`TextSize`] - Source positions
//!
//! This module has NO dependencies on other inpc modules.

mod location;

pub use location::{FileId, Location, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
