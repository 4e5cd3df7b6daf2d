//! Defines the error types for widget operations.

use scrolltoc_traits::DomError;
use scrolltoc_types::ConfigError;
use std::fmt;
use thiserror::Error;

/// One of the two document regions the widget works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The container scanned for headings.
    Content,
    /// The container the outline links are rendered into.
    Outline,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Content => write!(f, "Content"),
            Region::Outline => write!(f, "Outline"),
        }
    }
}

/// The main error enum for widget operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TocError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{role} region not found for selector '{selector}'")]
    MissingRegion { role: Region, selector: String },
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}
