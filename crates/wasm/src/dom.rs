//! [`Dom`] over the browser document.

use crate::error::js_error;
use log::debug;
use scrolltoc_traits::{Dom, DomError, IdRegistry, NavigationTarget, ScrollBehavior};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, Node, ScrollToOptions, Window};

/// A click listener installed on an outline link.
///
/// Dropping the binding removes the listener and frees the closure.
struct LinkBinding {
    link: Element,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for LinkBinding {
    fn drop(&mut self) {
        let _ = self
            .link
            .remove_event_listener_with_callback("click", self.closure.as_ref().unchecked_ref());
    }
}

struct Inner {
    window: Window,
    document: Document,
    bindings: RefCell<Vec<LinkBinding>>,
}

/// The browser page. Clones share the same listener bookkeeping.
#[derive(Clone)]
pub struct WebDom {
    inner: Rc<Inner>,
}

impl WebDom {
    /// Binds to the global `window` and its document.
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or_else(|| DomError::NotFound("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::NotFound("document".to_string()))?;
        Ok(Self {
            inner: Rc::new(Inner {
                window,
                document,
                bindings: RefCell::new(Vec::new()),
            }),
        })
    }

    pub fn window(&self) -> &Window {
        &self.inner.window
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Number of live navigation listeners.
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.borrow().len()
    }
}

fn document_top(window: &Window, node: &Element) -> f64 {
    node.get_bounding_client_rect().top() + window.scroll_y().unwrap_or(0.0)
}

fn scroll_window(window: &Window, top: f64, behavior: ScrollBehavior) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(match behavior {
        ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
    });
    window.scroll_to_with_scroll_to_options(&options);
}

fn scroll_to_heading(window: &Window, target: &NavigationTarget<Element>) {
    let top = (document_top(window, &target.heading) - target.offset).max(0.0);
    scroll_window(window, top, ScrollBehavior::Smooth);
}

impl IdRegistry for WebDom {
    fn is_taken(&self, id: &str) -> bool {
        self.inner.document.get_element_by_id(id).is_some()
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
        self.inner
            .document
            .query_selector(selector)
            .map_err(|_| DomError::UnsupportedSelector(selector.to_string()))
    }

    fn query_selector_all(&self, root: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        let list = root
            .query_selector_all(selector)
            .map_err(|_| DomError::UnsupportedSelector(selector.to_string()))?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name()
    }

    fn id(&self, node: &Element) -> Option<String> {
        let id = node.id();
        (!id.is_empty()).then_some(id)
    }

    fn set_id(&self, node: &Element, id: &str) -> Result<(), DomError> {
        node.set_id(id);
        Ok(())
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn offset_top(&self, node: &Element) -> f64 {
        document_top(&self.inner.window, node)
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.inner
            .document
            .create_element(tag)
            .map_err(js_error("createElement"))
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value).map_err(js_error("setAttribute"))
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list().add_1(class).map_err(js_error("classList.add"))
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list()
            .remove_1(class)
            .map_err(js_error("classList.remove"))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(js_error("appendChild"))
    }

    fn remove_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .remove_child(child)
            .map_err(js_error("removeChild"))?;
        self.inner.bindings.borrow_mut().retain(|binding| {
            let link: &Node = &binding.link;
            !child.contains(Some(link))
        });
        Ok(())
    }

    fn clear_children(&self, parent: &Element) {
        let released = {
            let mut bindings = self.inner.bindings.borrow_mut();
            let before = bindings.len();
            bindings.retain(|binding| {
                let link: &Node = &binding.link;
                !parent.contains(Some(link))
            });
            before - bindings.len()
        };
        if released > 0 {
            debug!("Released {} link listeners", released);
        }
        parent.set_text_content(None);
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn scroll_y(&self) -> f64 {
        self.inner.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        scroll_window(&self.inner.window, top, behavior);
    }

    fn bind_navigation(
        &self,
        link: &Element,
        target: NavigationTarget<Element>,
    ) -> Result<(), DomError> {
        let window = self.inner.window.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            scroll_to_heading(&window, &target);
        });
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_error("addEventListener"))?;
        self.inner.bindings.borrow_mut().push(LinkBinding {
            link: link.clone(),
            closure,
        });
        Ok(())
    }

    fn navigate(&self, target: &NavigationTarget<Element>) {
        scroll_to_heading(&self.inner.window, target);
    }
}
