//! Dom trait for abstracting the host document.
//!
//! The widget never touches a browser API directly. Everything it needs from
//! the page (finding elements, reading positions, creating links, toggling
//! classes, scrolling) goes through this trait, so the same widget drives a
//! real `web_sys::Document` or the in-memory tree used by tests.

use crate::registry::IdRegistry;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for document operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Unsupported selector: '{0}'")]
    UnsupportedSelector(String),

    #[error("DOM operation '{op}' failed: {message}")]
    Operation { op: &'static str, message: String },
}

impl DomError {
    pub fn operation(op: &'static str, message: impl Into<String>) -> Self {
        DomError::Operation {
            op,
            message: message.into(),
        }
    }
}

/// How a programmatic scroll moves the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump straight to the destination.
    #[default]
    Auto,
    /// Animate towards the destination.
    Smooth,
}

/// Where an outline link navigates to.
///
/// The destination is resolved when the link is activated, not when it is
/// created, so layout changes between build and click are honoured.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTarget<N> {
    /// The heading to bring into view.
    pub heading: N,
    /// Distance in pixels to keep between the viewport top and the heading.
    pub offset: f64,
}

/// The document capability the widget drives.
///
/// Node handles are cheap to clone and compare by identity. Every `Dom` is
/// also an [`IdRegistry`] over its own document.
pub trait Dom: IdRegistry {
    type Node: Clone + PartialEq + Debug;

    /// Returns the first element in the document matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, DomError>;

    /// Returns every descendant of `root` matching `selector`, in document order.
    fn query_selector_all(
        &self,
        root: &Self::Node,
        selector: &str,
    ) -> Result<Vec<Self::Node>, DomError>;

    fn tag_name(&self, node: &Self::Node) -> String;

    /// The element's identifier, or `None` when it has none (or an empty one).
    fn id(&self, node: &Self::Node) -> Option<String>;

    fn set_id(&self, node: &Self::Node, id: &str) -> Result<(), DomError>;

    /// The concatenated text of the element and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// The element's top edge in document coordinates (pixels from the document top).
    fn offset_top(&self, node: &Self::Node) -> f64;

    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    fn set_text(&self, node: &Self::Node, text: &str);

    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Detaches `child` from `parent`, releasing any navigation bound to it
    /// or its descendants.
    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Removes every child of `parent`, releasing any navigation bound to them.
    fn clear_children(&self, parent: &Self::Node);

    /// Returns `true` if `node` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// The current vertical scroll offset of the document.
    fn scroll_y(&self) -> f64;

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    /// Makes activating `link` cancel its default navigation and call
    /// [`Dom::navigate`] with `target` instead.
    fn bind_navigation(
        &self,
        link: &Self::Node,
        target: NavigationTarget<Self::Node>,
    ) -> Result<(), DomError>;

    /// Smoothly scrolls so the target heading sits `offset` pixels below the viewport top.
    fn navigate(&self, target: &NavigationTarget<Self::Node>) {
        let top = (self.offset_top(&target.heading) - target.offset).max(0.0);
        self.scroll_to(top, ScrollBehavior::Smooth);
    }
}
