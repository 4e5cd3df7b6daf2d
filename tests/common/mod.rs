#![allow(dead_code)]

use scrolltoc::{Dom, DomError, InMemoryDom, NodeId, Subscription, TableOfContents, TocError, TocOptions};
use std::cell::Cell;
use std::rc::Rc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const CONTENT: &str = "#article";
pub const OUTLINE: &str = "#toc";

/// An in-memory page with an `<article id="article">` and a `<nav id="toc">`.
pub struct Page {
    pub dom: InMemoryDom,
    pub article: NodeId,
    pub toc: NodeId,
}

impl Page {
    pub fn new() -> Self {
        let dom = InMemoryDom::new();
        let article = dom.append_element(dom.root(), "article").unwrap();
        dom.set_id(&article, "article").unwrap();
        let toc = dom.append_element(dom.root(), "nav").unwrap();
        dom.set_id(&toc, "toc").unwrap();
        Self { dom, article, toc }
    }

    /// Builds a page from `(tag, text, top)` triples.
    pub fn with_headings(headings: &[(&str, &str, f64)]) -> Self {
        let page = Self::new();
        for (tag, text, top) in headings {
            page.heading(tag, text, *top);
        }
        page
    }

    /// Appends a heading to the article, laid out at `top`.
    pub fn heading(&self, tag: &str, text: &str, top: f64) -> NodeId {
        let node = self.dom.append_element(self.article, tag).unwrap();
        self.dom.set_text(&node, text);
        self.dom.set_top(node, top);
        node
    }

    pub fn mount(&self, options: &TocOptions) -> Result<TableOfContents<InMemoryDom>, TocError> {
        TableOfContents::new(self.dom.clone(), CONTENT, OUTLINE, options)
    }

    /// Mounts the widget and attaches scroll tracking.
    pub fn mount_listening(&self, options: &TocOptions) -> Result<TableOfContents<InMemoryDom>, TocError> {
        let mut toc = self.mount(options)?;
        toc.attach_scroll(noop_subscription)?;
        Ok(toc)
    }

    pub fn links(&self) -> Vec<NodeId> {
        self.dom.children(self.toc)
    }

    pub fn link_texts(&self) -> Vec<String> {
        self.links().iter().map(|l| self.dom.text_content(l)).collect()
    }

    /// Links currently carrying `class`.
    pub fn marked(&self, class: &str) -> Vec<NodeId> {
        self.links()
            .into_iter()
            .filter(|l| self.dom.has_class(l, class))
            .collect()
    }

    /// Scrolls to `y` and runs the frame the scroll event schedules.
    pub fn scroll(&self, toc: &mut TableOfContents<InMemoryDom>, y: f64) {
        self.dom.set_scroll_y(y);
        toc.on_scroll();
        toc.on_frame();
    }
}

pub fn noop_subscription() -> Result<Box<dyn Subscription>, DomError> {
    Ok(Box::new(|| {}))
}

/// A subscription that counts how often it was cancelled.
pub fn counting_subscription(counter: &Rc<Cell<u32>>) -> Result<Box<dyn Subscription>, DomError> {
    let counter = counter.clone();
    Ok(Box::new(move || counter.set(counter.get() + 1)))
}

/// The layout used by the worked example: Intro, Background, Method.
pub fn three_sections() -> Page {
    Page::with_headings(&[
        ("h1", "Intro", 0.0),
        ("h2", "Background", 500.0),
        ("h2", "Method", 1200.0),
    ])
}
