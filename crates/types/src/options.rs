//! Widget options and their validation.
//!
//! [`TocOptions`] is the loose option bag a caller hands over (usually a
//! JavaScript object or JSON text). Every field is optional and unknown keys
//! are ignored. [`TocOptions::validate`] turns it into an immutable
//! [`TocConfig`], or reports the first invalid value.

use crate::heading::HeadingLevel;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HEADING_TAGS: [&str; 3] = ["H1", "H2", "H3"];
pub const DEFAULT_OFFSET_SCROLL: f64 = 60.0;
pub const DEFAULT_LINK_CLASS_PREFIX: &str = "toc-level-";
pub const DEFAULT_ACTIVE_CLASS: &str = "toc-active";
pub const DEFAULT_ID_PREFIX: &str = "toc-heading-";
pub const DEFAULT_PLACEHOLDER_TEXT: &str = "No headings found";

/// Error type for option validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("headingTags must contain at least one heading tag")]
    EmptyHeadingTags,

    #[error("headingTags contains '{0}', which is not a heading tag (H1-H6)")]
    InvalidHeadingTag(String),

    #[error("offsetScroll must be a finite, non-negative number of pixels, got {0}")]
    InvalidOffset(f64),

    #[error("{option} must be a non-empty CSS class token without whitespace, got '{value}'")]
    InvalidClassName { option: &'static str, value: String },

    #[error("idPrefix must not contain whitespace, got '{0}'")]
    InvalidIdPrefix(String),

    #[error("Malformed options: {0}")]
    Parse(String),
}

/// Raw widget options, as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocOptions {
    /// Heading tags to collect (`["H1", "H2", "H3"]` when absent).
    pub heading_tags: Option<Vec<String>>,
    /// Pixels between the viewport top and a heading considered "current".
    pub offset_scroll: Option<f64>,
    /// Prefix of the per-level link class (`{prefix}{level}`).
    pub link_class_prefix: Option<String>,
    /// Class toggled on the link of the current section.
    pub active_class: Option<String>,
    /// Prefix for identifiers generated for headings that lack one.
    pub id_prefix: Option<String>,
    /// Text of the placeholder shown when no heading matches.
    pub placeholder_text: Option<String>,
}

impl TocOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON text. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_heading_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heading_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_offset_scroll(mut self, offset: f64) -> Self {
        self.offset_scroll = Some(offset);
        self
    }

    pub fn with_link_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_class_prefix = Some(prefix.into());
        self
    }

    pub fn with_active_class(mut self, class: impl Into<String>) -> Self {
        self.active_class = Some(class.into());
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = Some(text.into());
        self
    }

    /// Validates the options and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found; nothing is partially applied.
    pub fn validate(&self) -> Result<TocConfig, ConfigError> {
        let heading_levels = match &self.heading_tags {
            Some(tags) => parse_heading_tags(tags)?,
            None => parse_heading_tags(&DEFAULT_HEADING_TAGS[..])?,
        };

        let offset_scroll = self.offset_scroll.unwrap_or(DEFAULT_OFFSET_SCROLL);
        if !offset_scroll.is_finite() || offset_scroll < 0.0 {
            return Err(ConfigError::InvalidOffset(offset_scroll));
        }

        let link_class_prefix = class_token(
            "linkClassPrefix",
            self.link_class_prefix.as_deref(),
            DEFAULT_LINK_CLASS_PREFIX,
        )?;
        let active_class = class_token(
            "activeClass",
            self.active_class.as_deref(),
            DEFAULT_ACTIVE_CLASS,
        )?;

        let id_prefix = self
            .id_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_ID_PREFIX.to_string());
        if id_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidIdPrefix(id_prefix));
        }

        let placeholder_text = self
            .placeholder_text
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_TEXT.to_string());

        Ok(TocConfig {
            heading_levels,
            offset_scroll,
            link_class_prefix,
            active_class,
            id_prefix,
            placeholder_text,
        })
    }
}

fn parse_heading_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<HeadingLevel>, ConfigError> {
    let mut levels = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref();
        let level = HeadingLevel::from_tag(tag)
            .ok_or_else(|| ConfigError::InvalidHeadingTag(tag.to_string()))?;
        if !levels.contains(&level) {
            levels.push(level);
        }
    }
    if levels.is_empty() {
        return Err(ConfigError::EmptyHeadingTags);
    }
    Ok(levels)
}

fn class_token(
    option: &'static str,
    value: Option<&str>,
    default: &str,
) -> Result<String, ConfigError> {
    let value = value.unwrap_or(default);
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidClassName {
            option,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validated, immutable widget configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TocConfig {
    heading_levels: Vec<HeadingLevel>,
    offset_scroll: f64,
    link_class_prefix: String,
    active_class: String,
    id_prefix: String,
    placeholder_text: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            heading_levels: (1..=3).filter_map(HeadingLevel::new).collect(),
            offset_scroll: DEFAULT_OFFSET_SCROLL,
            link_class_prefix: DEFAULT_LINK_CLASS_PREFIX.to_string(),
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            placeholder_text: DEFAULT_PLACEHOLDER_TEXT.to_string(),
        }
    }
}

impl TocConfig {
    pub fn heading_levels(&self) -> &[HeadingLevel] {
        &self.heading_levels
    }

    /// The normalized, uppercase heading tags (`["H1", "H2"]`).
    pub fn heading_tags(&self) -> Vec<String> {
        self.heading_levels.iter().map(|l| l.tag()).collect()
    }

    /// Selector list matching every configured heading tag (`"H1, H2, H3"`).
    pub fn heading_selector(&self) -> String {
        self.heading_tags().join(", ")
    }

    pub fn matches_tag(&self, tag: &str) -> bool {
        HeadingLevel::from_tag(tag).is_some_and(|level| self.heading_levels.contains(&level))
    }

    pub fn offset_scroll(&self) -> f64 {
        self.offset_scroll
    }

    pub fn link_class_prefix(&self) -> &str {
        &self.link_class_prefix
    }

    pub fn active_class(&self) -> &str {
        &self.active_class
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder_text
    }
}
