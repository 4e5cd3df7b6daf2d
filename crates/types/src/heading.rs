use serde::Serialize;
use std::fmt;

/// The level of a section heading, `1` for `<h1>` through `6` for `<h6>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    /// Parses a heading tag name (`h2`, `H2`) into its level.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        let digits = tag.strip_prefix('H').or_else(|| tag.strip_prefix('h'))?;
        if digits.len() != 1 {
            return None;
        }
        digits.parse::<u8>().ok().and_then(Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The canonical uppercase tag name for this level.
    pub fn tag(self) -> String {
        format!("H{}", self.0)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
