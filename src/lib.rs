//! # scrolltoc
//!
//! A table of contents that stays in step with the reader.
//!
//! Given a content region and an outline region, [`TableOfContents`] renders
//! one link per heading into the outline, gives every heading an identifier,
//! scrolls smoothly to a heading when its link is activated, and keeps the
//! link of the section currently being read marked as active.
//!
//! The widget runs against any [`Dom`]. Browsers use `WebDom` from the
//! `scrolltoc-wasm` crate; native code and tests use [`InMemoryDom`].
//!
//! ```
//! use scrolltoc::{Dom, InMemoryDom, TableOfContents, TocOptions};
//!
//! let dom = InMemoryDom::new();
//! let article = dom.append_element(dom.root(), "article").unwrap();
//! dom.set_id(&article, "article").unwrap();
//! let nav = dom.append_element(dom.root(), "nav").unwrap();
//! dom.set_id(&nav, "toc").unwrap();
//!
//! let heading = dom.append_element(article, "h2").unwrap();
//! dom.set_text(&heading, "Getting started");
//!
//! let toc = TableOfContents::new(dom.clone(), "#article", "#toc", &TocOptions::new()).unwrap();
//! assert_eq!(toc.len(), 1);
//! assert_eq!(dom.id(&heading).as_deref(), Some("toc-heading-0"));
//! ```

pub use scrolltoc_core::{
    ActiveTracker, ContentChange, OutlineItem, PLACEHOLDER_CLASS, Region, ScrollDispatch,
    TableOfContents, TocError, generate_id, outline, resolve_active, tracker,
};
pub use scrolltoc_traits::{
    Dom, DomError, IdRegistry, InMemoryDom, InMemoryIdRegistry, NavigationTarget, NodeId,
    ScrollBehavior, ScrollRequest, Subscription,
};
pub use scrolltoc_types::{AnchorId, ConfigError, HeadingLevel, TocConfig, TocEntry, TocOptions};
