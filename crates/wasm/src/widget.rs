//! The `TableOfContents` class exported to JavaScript.
//!
//! Wires the core widget to the page: a `scroll` listener on `window`
//! coalesced through `requestAnimationFrame`, and a `MutationObserver` on the
//! content region.
//!
//! The scroll listener and the observer callback own the widget, so it keeps
//! running after the JavaScript object is garbage collected or `free()`d.
//! Only `destroy()` cancels them, which releases the widget. Animation-frame
//! callbacks hold a weak reference, so a frame queued before teardown does
//! nothing.

use crate::dom::WebDom;
use crate::error::{ErrorCode, TocJsError};
use crate::options::parse_options;
use log::{debug, warn};
use scrolltoc_core::{ContentChange, ScrollDispatch, Subscription};
use scrolltoc_traits::DomError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Element, Event, MutationObserver, MutationObserverInit,
    MutationRecord, Window,
};

type CoreToc = scrolltoc_core::TableOfContents<WebDom>;
type Shared = Rc<RefCell<CoreToc>>;

/// Scroll-synchronized table of contents.
///
/// The instance may be dropped right after construction; the outline keeps
/// tracking the page until `destroy()` is called. Calling `free()` without
/// `destroy()` leaves the widget running.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const toc = new TableOfContents('#article', '#toc', { offsetScroll: 80 });
/// if (!toc.isReady) {
///   // selectors did not match, or options were invalid; see the console
/// }
/// toc.destroy();
/// ```
#[wasm_bindgen]
pub struct TableOfContents {
    inner: Option<Shared>,
}

#[wasm_bindgen]
impl TableOfContents {
    /// Builds the outline and starts tracking the scroll position.
    ///
    /// Never throws. On failure the error is logged and the returned instance
    /// is inert (`isReady === false`).
    #[wasm_bindgen(constructor)]
    pub fn new(content_selector: &str, toc_selector: &str, options: JsValue) -> TableOfContents {
        match mount(content_selector, toc_selector, options) {
            Ok(shared) => Self {
                inner: Some(shared),
            },
            Err(e) => {
                report(&e);
                Self { inner: None }
            }
        }
    }

    /// Detaches all listeners and clears the outline. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        let Some(shared) = &self.inner else {
            debug!("destroy() on an inert table of contents");
            return;
        };
        let destroyed = match shared.try_borrow_mut() {
            Ok(mut toc) => {
                toc.destroy();
                true
            }
            Err(_) => false,
        };
        if !destroyed {
            warn!("Table of contents is busy; destroy() ignored");
            return;
        }
        self.inner = None;
    }

    /// Rebuilds the outline from the current content.
    pub fn rebuild(&self) -> Result<(), JsValue> {
        if let Some(shared) = &self.inner {
            shared
                .try_borrow_mut()
                .map_err(|_| TocJsError::new(ErrorCode::Dom, "table of contents is busy"))?
                .rebuild()
                .map_err(TocJsError::from)?;
        }
        Ok(())
    }

    /// Smoothly scrolls to the heading behind the link at `index`.
    #[wasm_bindgen(js_name = scrollToIndex)]
    pub fn scroll_to_index(&self, index: u32) -> bool {
        self.with(|toc| toc.activate(index as usize)).unwrap_or(false)
    }

    /// The outline entries as `{ level, text, targetId }` objects.
    pub fn entries(&self) -> Result<JsValue, JsValue> {
        let entries = self.with(|toc| toc.entries()).unwrap_or_default();
        let value = serde_wasm_bindgen::to_value(&entries).map_err(TocJsError::from)?;
        Ok(value)
    }

    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.with(|toc| !toc.is_destroyed()).unwrap_or(false)
    }

    /// Index of the active link, or `undefined` when none is active.
    #[wasm_bindgen(getter, js_name = activeIndex)]
    pub fn active_index(&self) -> Option<u32> {
        self.with(|toc| toc.active_index())
            .flatten()
            .map(|i| i as u32)
    }

    #[wasm_bindgen(getter, js_name = headingCount)]
    pub fn heading_count(&self) -> u32 {
        self.with(|toc| toc.len() as u32).unwrap_or(0)
    }
}

impl TableOfContents {
    fn with<R>(&self, f: impl FnOnce(&CoreToc) -> R) -> Option<R> {
        let shared = self.inner.as_ref()?;
        let toc = shared.try_borrow().ok()?;
        Some(f(&toc))
    }
}

fn mount(content_selector: &str, toc_selector: &str, options: JsValue) -> Result<Shared, TocJsError> {
    let options = parse_options(options)?;
    let dom = WebDom::new()?;
    let window = dom.window().clone();

    let toc = CoreToc::new(dom, content_selector, toc_selector, &options)?;
    let shared = Rc::new(RefCell::new(toc));

    if let Err(e) = attach_listeners(&shared, &window) {
        shared.borrow_mut().destroy();
        return Err(e);
    }
    debug!(
        "Table of contents ready with {} links",
        shared.borrow().len()
    );
    Ok(shared)
}

fn attach_listeners(shared: &Shared, window: &Window) -> Result<(), TocJsError> {
    let content = shared
        .borrow()
        .content_region()
        .cloned()
        .ok_or_else(|| DomError::NotFound("content region".to_string()))?;

    shared
        .borrow_mut()
        .attach_scroll(|| subscribe_scroll(window, shared.clone()))?;
    shared
        .borrow_mut()
        .watch_content(|| observe_content(&content, shared.clone()))?;
    Ok(())
}

/// The returned subscription owns `widget` until it is cancelled.
fn subscribe_scroll(window: &Window, widget: Shared) -> Result<Box<dyn Subscription>, DomError> {
    let frame_window = window.clone();
    let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let dispatch = match widget.try_borrow_mut() {
            Ok(mut toc) => toc.on_scroll(),
            Err(_) => return,
        };
        if dispatch == ScrollDispatch::ScheduleFrame {
            schedule_frame(&frame_window, Rc::downgrade(&widget));
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    window
        .add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            listener.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(crate::error::js_error("addEventListener"))?;

    let target = window.clone();
    Ok(Box::new(move || {
        if let Err(e) = target
            .remove_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref())
        {
            warn!("Could not remove scroll listener: {:?}", e);
        }
        drop(listener);
    }))
}

fn schedule_frame(window: &Window, widget: Weak<RefCell<CoreToc>>) {
    let queued = widget.clone();
    let callback = Closure::once_into_js(move || run_frame(&queued));
    if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
        warn!("requestAnimationFrame failed, evaluating now: {:?}", e);
        run_frame(&widget);
    }
}

fn run_frame(widget: &Weak<RefCell<CoreToc>>) {
    if let Some(shared) = widget.upgrade() {
        if let Ok(mut toc) = shared.try_borrow_mut() {
            toc.on_frame();
        }
    }
}

/// The returned subscription owns `widget` until it is cancelled.
fn observe_content(content: &Element, widget: Shared) -> Result<Box<dyn Subscription>, DomError> {
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            let changes: Vec<ContentChange<Element>> = records
                .iter()
                .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                .filter_map(to_change)
                .collect();
            if let Ok(mut toc) = widget.try_borrow_mut() {
                toc.on_content_mutation(&changes);
            }
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
        .map_err(crate::error::js_error("MutationObserver"))?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer
        .observe_with_options(content, &init)
        .map_err(crate::error::js_error("observe"))?;

    Ok(Box::new(move || {
        observer.disconnect();
        drop(callback);
    }))
}

fn to_change(record: MutationRecord) -> Option<ContentChange<Element>> {
    let target = record.target()?.dyn_into::<Element>().ok()?;
    Some(ContentChange {
        target,
        added: record.added_nodes().length() as usize,
        removed: record.removed_nodes().length() as usize,
    })
}

fn report(err: &TocJsError) {
    #[cfg(feature = "console-logging")]
    log::error!("[scrolltoc] {} ({})", err, err.code().as_str());

    #[cfg(not(feature = "console-logging"))]
    web_sys::console::error_1(&JsValue::from_str(&format!(
        "[scrolltoc] {} ({})",
        err,
        err.code().as_str()
    )));
}
