//! Active-section tracking.
//!
//! The current section is the last heading whose top edge is at or above the
//! effective scroll position (`scrollY + offsetScroll`). Heading tops are
//! non-decreasing in document order, so the search is a binary search that
//! reads only `O(log n)` positions from the document per evaluation.

use crate::outline::OutlineItem;
use log::warn;
use scrolltoc_traits::Dom;

/// Returns the highest index in `0..len` whose top is `<= threshold`.
///
/// `top_at` must be non-decreasing over the index range. When several
/// headings share a top, the last of them wins. `None` means the threshold
/// lies above the first heading.
pub fn resolve_active<F>(len: usize, threshold: f64, mut top_at: F) -> Option<usize>
where
    F: FnMut(usize) -> f64,
{
    // Everything below `lo` qualifies, nothing at or above `hi` does.
    let (mut lo, mut hi) = (0usize, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if top_at(mid) <= threshold {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo.checked_sub(1)
}

/// The effective scroll position headings are compared against.
pub fn effective_scroll(scroll_y: f64, offset: f64) -> f64 {
    scroll_y + offset
}

/// Keeps the active class on at most one outline link.
#[derive(Debug, Default)]
pub struct ActiveTracker {
    active: Option<usize>,
}

impl ActiveTracker {
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Forgets the active link, e.g. after the links it pointed at were discarded.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Resolves the current section from the document's scroll position.
    pub fn evaluate<D: Dom>(dom: &D, items: &[OutlineItem<D::Node>], offset: f64) -> Option<usize> {
        let threshold = effective_scroll(dom.scroll_y(), offset);
        resolve_active(items.len(), threshold, |i| dom.offset_top(&items[i].heading))
    }

    /// Moves the active class to the link at `next`, clearing it from the
    /// previously active link. Returns `true` if anything changed.
    pub fn apply<D: Dom>(
        &mut self,
        dom: &D,
        items: &[OutlineItem<D::Node>],
        active_class: &str,
        next: Option<usize>,
    ) -> bool {
        if self.active == next {
            return false;
        }
        if let Some(item) = self.active.and_then(|i| items.get(i)) {
            if let Err(e) = dom.remove_class(&item.link, active_class) {
                warn!("Could not clear active class: {}", e);
            }
        }
        if let Some(item) = next.and_then(|i| items.get(i)) {
            if let Err(e) = dom.add_class(&item.link, active_class) {
                warn!("Could not set active class: {}", e);
            }
        }
        self.active = next;
        true
    }
}
