use crate::heading::HeadingLevel;
use crate::ids::AnchorId;
use serde::Serialize;

/// An entry in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Heading level (1 = h1, 2 = h2, etc.)
    pub level: HeadingLevel,
    /// The trimmed text content of the heading.
    pub text: String,
    /// The anchor ID to link to this heading.
    pub target_id: AnchorId,
}

impl TocEntry {
    /// The CSS class of the outline link for this entry: `{prefix}{level}`.
    pub fn link_class(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_class_combines_prefix_and_level() {
        let entry = TocEntry {
            level: HeadingLevel::new(2).unwrap(),
            text: "Background".to_string(),
            target_id: AnchorId::new("background"),
        };
        assert_eq!(entry.link_class("toc-level-"), "toc-level-2");
        assert_eq!(entry.target_id.href(), "#background");
    }
}
