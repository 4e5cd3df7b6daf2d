//! # scrolltoc-core
//!
//! Platform-agnostic core of the scroll-synchronized table of contents.
//!
//! - **outline**: scans the content region for headings and renders one link per heading
//! - **tracker**: resolves the current section from the scroll position and moves the active class
//! - **lifecycle**: listener bookkeeping, frame coalescing and teardown
//! - **widget**: [`TableOfContents`], which ties the three together
//! - **error**: error types for the widget
//!
//! ## Design Principle
//!
//! This crate has **no platform dependencies**. The document, the identifier
//! namespace and event subscriptions are all reached through the traits in
//! `scrolltoc-traits`, so the widget runs the same against a browser page or
//! an in-memory tree.

// Re-export foundation crates
pub use scrolltoc_traits as traits;
pub use scrolltoc_types as types;

pub mod error;
pub mod lifecycle;
pub mod outline;
pub mod tracker;
pub mod widget;

pub use error::{Region, TocError};
pub use lifecycle::{ContentChange, ScrollDispatch};
pub use outline::{OutlineItem, PLACEHOLDER_CLASS, generate_id};
pub use tracker::{ActiveTracker, resolve_active};
pub use widget::TableOfContents;

pub use types::{AnchorId, ConfigError, HeadingLevel, TocConfig, TocEntry, TocOptions};
pub use traits::{
    Dom, DomError, IdRegistry, InMemoryDom, InMemoryIdRegistry, NavigationTarget, NodeId,
    ScrollBehavior, ScrollRequest, Subscription,
};
