//! The table-of-contents widget.
//!
//! `TableOfContents` ties the outline builder, the active-section tracker and
//! the lifecycle bookkeeping together. It is driven entirely by its host:
//! the host attaches listeners through [`TableOfContents::attach_scroll`] and
//! [`TableOfContents::watch_content`], then forwards events to
//! [`TableOfContents::on_scroll`], [`TableOfContents::on_frame`] and
//! [`TableOfContents::on_content_mutation`].

use crate::error::{Region, TocError};
use crate::lifecycle::{ContentChange, Lifecycle, ScrollDispatch};
use crate::outline::{self, OutlineItem};
use crate::tracker::ActiveTracker;
use log::{debug, warn};
use scrolltoc_traits::{Dom, DomError, NavigationTarget, Subscription};
use scrolltoc_types::{TocConfig, TocEntry, TocOptions};

struct Regions<N> {
    content: N,
    outline: N,
}

/// A scroll-synchronized table of contents over a host document.
pub struct TableOfContents<D: Dom> {
    dom: D,
    config: TocConfig,
    regions: Option<Regions<D::Node>>,
    items: Vec<OutlineItem<D::Node>>,
    tracker: ActiveTracker,
    lifecycle: Lifecycle,
    builds: usize,
}

impl<D: Dom> TableOfContents<D> {
    /// Validates `options`, resolves both regions and builds the outline.
    ///
    /// No listeners are attached yet.
    ///
    /// # Errors
    ///
    /// Fails without touching the document if an option is invalid or a
    /// selector matches nothing.
    pub fn new(
        dom: D,
        content_selector: &str,
        outline_selector: &str,
        options: &TocOptions,
    ) -> Result<Self, TocError> {
        let config = options.validate()?;
        Self::with_config(dom, content_selector, outline_selector, config)
    }

    /// Like [`TableOfContents::new`], with an already validated configuration.
    pub fn with_config(
        dom: D,
        content_selector: &str,
        outline_selector: &str,
        config: TocConfig,
    ) -> Result<Self, TocError> {
        let content = find_region(&dom, Region::Content, content_selector)?;
        let outline = find_region(&dom, Region::Outline, outline_selector)?;

        let mut toc = Self {
            dom,
            config,
            regions: Some(Regions { content, outline }),
            items: Vec::new(),
            tracker: ActiveTracker::default(),
            lifecycle: Lifecycle::default(),
            builds: 0,
        };
        toc.rebuild()?;
        Ok(toc)
    }

    /// Discards every outline link and builds the outline again from the
    /// current content. Does nothing once the widget is destroyed.
    pub fn rebuild(&mut self) -> Result<(), TocError> {
        let Some(regions) = &self.regions else {
            debug!("Ignoring rebuild of a destroyed table of contents");
            return Ok(());
        };

        self.tracker.reset();
        self.items.clear();
        self.items = outline::build(&self.dom, &regions.content, &regions.outline, &self.config)?;
        self.builds += 1;

        if self.lifecycle.is_listening() {
            self.refresh_active();
        }
        Ok(())
    }

    /// Attaches the scroll listener through `subscribe`.
    ///
    /// Returns `Ok(false)` without calling `subscribe` if the listener is
    /// already attached or the widget is destroyed. After a fresh attach the
    /// active link is evaluated once.
    pub fn attach_scroll<F>(&mut self, subscribe: F) -> Result<bool, TocError>
    where
        F: FnOnce() -> Result<Box<dyn Subscription>, DomError>,
    {
        let attached = self.lifecycle.attach_scroll(subscribe)?;
        if attached {
            self.refresh_active();
        }
        Ok(attached)
    }

    /// Attaches the content-mutation watcher through `subscribe`.
    pub fn watch_content<F>(&mut self, subscribe: F) -> Result<bool, TocError>
    where
        F: FnOnce() -> Result<Box<dyn Subscription>, DomError>,
    {
        Ok(self.lifecycle.attach_watcher(subscribe)?)
    }

    /// Handles a scroll event. See [`ScrollDispatch`] for what the host must do next.
    pub fn on_scroll(&mut self) -> ScrollDispatch {
        self.lifecycle.request_frame()
    }

    /// Runs the evaluation scheduled by [`TableOfContents::on_scroll`].
    pub fn on_frame(&mut self) {
        if self.lifecycle.complete_frame() {
            self.refresh_active();
        }
    }

    /// Handles a batch of observed content changes.
    ///
    /// Rebuilds once if any change adds or removes nodes outside the outline
    /// region. Returns `true` if a rebuild happened.
    pub fn on_content_mutation(&mut self, changes: &[ContentChange<D::Node>]) -> bool {
        let Some(regions) = &self.regions else {
            return false;
        };
        let relevant = changes
            .iter()
            .any(|c| c.is_structural() && !self.dom.contains(&regions.outline, &c.target));
        if !relevant {
            return false;
        }

        debug!("Content changed, rebuilding outline");
        match self.rebuild() {
            Ok(()) => true,
            Err(e) => {
                warn!("Rebuilding outline after content change failed: {}", e);
                false
            }
        }
    }

    /// Navigates to the heading behind the link at `index`, as a click would.
    pub fn activate(&self, index: usize) -> bool {
        if self.lifecycle.is_destroyed() {
            return false;
        }
        match self.items.get(index) {
            Some(item) => {
                self.dom.navigate(&NavigationTarget {
                    heading: item.heading.clone(),
                    offset: self.config.offset_scroll(),
                });
                true
            }
            None => false,
        }
    }

    /// Detaches all listeners, clears the outline region and releases every
    /// reference into the document. The widget stays inert afterwards.
    pub fn destroy(&mut self) {
        if !self.lifecycle.shutdown() {
            warn!("destroy() called on a table of contents that is already destroyed");
            return;
        }
        if let Some(regions) = self.regions.take() {
            self.dom.clear_children(&regions.outline);
        }
        self.items.clear();
        self.tracker.reset();
        debug!("Table of contents destroyed");
    }

    fn refresh_active(&mut self) {
        if self.regions.is_none() {
            return;
        }
        let next = ActiveTracker::evaluate(&self.dom, &self.items, self.config.offset_scroll());
        self.tracker
            .apply(&self.dom, &self.items, self.config.active_class(), next);
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn config(&self) -> &TocConfig {
        &self.config
    }

    /// The content region, until the widget is destroyed.
    pub fn content_region(&self) -> Option<&D::Node> {
        self.regions.as_ref().map(|r| &r.content)
    }

    /// The outline region, until the widget is destroyed.
    pub fn outline_region(&self) -> Option<&D::Node> {
        self.regions.as_ref().map(|r| &r.outline)
    }

    /// The outline entries, in document order.
    pub fn entries(&self) -> Vec<TocEntry> {
        self.items.iter().map(|i| i.entry.clone()).collect()
    }

    pub fn items(&self) -> &[OutlineItem<D::Node>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the link currently carrying the active class.
    pub fn active_index(&self) -> Option<usize> {
        self.tracker.active()
    }

    pub fn is_listening(&self) -> bool {
        self.lifecycle.is_listening()
    }

    pub fn is_watching(&self) -> bool {
        self.lifecycle.is_watching()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Number of outline builds so far, the initial one included.
    pub fn build_count(&self) -> usize {
        self.builds
    }
}

fn find_region<D: Dom>(dom: &D, role: Region, selector: &str) -> Result<D::Node, TocError> {
    dom.query_selector(selector)?
        .ok_or_else(|| TocError::MissingRegion {
            role,
            selector: selector.to_string(),
        })
}
