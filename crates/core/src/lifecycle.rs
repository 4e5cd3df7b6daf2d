//! Listener bookkeeping for the widget.
//!
//! The host owns the actual event plumbing (a `scroll` listener, a mutation
//! observer, animation frames). This module only holds the subscriptions the
//! host hands back, coalesces scroll events into at most one evaluation per
//! frame, and guarantees teardown happens exactly once.

use scrolltoc_traits::{DomError, Subscription};

/// What the host should do with a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDispatch {
    /// Scroll tracking is not attached (or the widget was destroyed).
    Ignored,
    /// A frame is already pending; this event folds into it.
    Coalesced,
    /// Request an animation frame and call `on_frame` from it.
    ScheduleFrame,
}

/// A batch of structural changes observed under the content region.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentChange<N> {
    /// The node whose child list changed.
    pub target: N,
    pub added: usize,
    pub removed: usize,
}

impl<N> ContentChange<N> {
    pub fn is_structural(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

#[derive(Default)]
pub(crate) struct Lifecycle {
    scroll: Option<Box<dyn Subscription>>,
    watcher: Option<Box<dyn Subscription>>,
    frame_pending: bool,
    destroyed: bool,
}

impl Lifecycle {
    pub(crate) fn is_listening(&self) -> bool {
        self.scroll.is_some()
    }

    pub(crate) fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Attaches the scroll listener unless it is already attached.
    ///
    /// `subscribe` is only called when an attach actually happens.
    pub(crate) fn attach_scroll<F>(&mut self, subscribe: F) -> Result<bool, DomError>
    where
        F: FnOnce() -> Result<Box<dyn Subscription>, DomError>,
    {
        if self.destroyed || self.scroll.is_some() {
            return Ok(false);
        }
        self.scroll = Some(subscribe()?);
        Ok(true)
    }

    /// Attaches the content-mutation watcher unless it is already attached.
    pub(crate) fn attach_watcher<F>(&mut self, subscribe: F) -> Result<bool, DomError>
    where
        F: FnOnce() -> Result<Box<dyn Subscription>, DomError>,
    {
        if self.destroyed || self.watcher.is_some() {
            return Ok(false);
        }
        self.watcher = Some(subscribe()?);
        Ok(true)
    }

    pub(crate) fn request_frame(&mut self) -> ScrollDispatch {
        if self.destroyed || self.scroll.is_none() {
            ScrollDispatch::Ignored
        } else if self.frame_pending {
            ScrollDispatch::Coalesced
        } else {
            self.frame_pending = true;
            ScrollDispatch::ScheduleFrame
        }
    }

    /// Marks the pending frame as run. Returns `false` once torn down.
    pub(crate) fn complete_frame(&mut self) -> bool {
        self.frame_pending = false;
        !self.destroyed
    }

    /// Cancels every subscription. Returns `false` if already torn down.
    pub(crate) fn shutdown(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        if let Some(scroll) = self.scroll.take() {
            scroll.cancel();
        }
        if let Some(watcher) = self.watcher.take() {
            watcher.cancel();
        }
        self.frame_pending = false;
        self.destroyed = true;
        true
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        // Host registrations must never outlive their handles uncancelled.
        self.shutdown();
    }
}
