pub mod document;
pub mod heading;
pub mod ids;
pub mod options;

pub use document::TocEntry;
pub use heading::HeadingLevel;
pub use ids::AnchorId;
pub use options::{ConfigError, TocConfig, TocOptions};
