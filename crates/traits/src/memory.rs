//! An in-memory document.
//!
//! `InMemoryDom` is a small element tree with explicit layout positions and a
//! scroll offset. It implements [`Dom`] well enough to run the widget without
//! a browser, and records what the widget did to it (scroll requests, the
//! number of mutations) so tests can assert on behaviour.
//!
//! Selectors are limited to comma-separated compounds of a tag name, `#id` and
//! `.class` parts (`"H1, H2"`, `"#article"`, `"nav.toc"`). Combinators are
//! rejected with [`DomError::UnsupportedSelector`].

use crate::dom::{Dom, DomError, NavigationTarget, ScrollBehavior};
use crate::registry::IdRegistry;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle to an element of an [`InMemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A scroll the document was asked to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Default)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: String,
    top: f64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Tree {
    elements: Vec<Element>,
    scroll_y: f64,
    scroll_requests: Vec<ScrollRequest>,
    mutations: usize,
    bindings: HashMap<NodeId, NavigationTarget<NodeId>>,
    rejected_attributes: Vec<(String, String)>,
    rejected_navigation: Vec<NodeId>,
}

const ROOT: NodeId = NodeId(0);

impl Tree {
    fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0)
    }

    fn require_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        self.elements
            .get_mut(node.0)
            .ok_or_else(|| DomError::NotFound(format!("{:?}", node)))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|el| el.parent)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.contains(ROOT, node)
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            if let Some(el) = self.get_mut(parent) {
                el.children.retain(|c| *c != node);
            }
        }
        if let Some(el) = self.get_mut(node) {
            el.parent = None;
        }
    }

    /// Pre-order walk of the descendants of `root`, excluding `root` itself.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(root)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.get(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(el) = self.get(node) else {
            return String::new();
        };
        let mut text = el.text.clone();
        for child in &el.children {
            text.push_str(&self.text_content(*child));
        }
        text
    }
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&el.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| el.classes.contains(c))
    }
}

fn parse_selector(selector: &str) -> Result<Vec<Compound>, DomError> {
    let unsupported = || DomError::UnsupportedSelector(selector.to_string());
    let mut list = Vec::new();

    for part in selector.split(',') {
        let part = part.trim();
        if part.is_empty() || part.contains(char::is_whitespace) {
            return Err(unsupported());
        }

        let mut compound = Compound::default();
        let tag_end = part.find(['#', '.']).unwrap_or(part.len());
        let tag = &part[..tag_end];
        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag.to_ascii_uppercase());
        }

        let mut rest = &part[tag_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[marker.len_utf8()..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return Err(unsupported());
            }
            if marker == '#' {
                compound.id = Some(name.to_string());
            } else {
                compound.classes.push(name.to_string());
            }
            rest = &body[end..];
        }
        list.push(compound);
    }

    Ok(list)
}

fn validate_class(class: &str) -> Result<(), DomError> {
    if class.is_empty() || class.contains(char::is_whitespace) {
        return Err(DomError::operation(
            "classList",
            format!("'{}' is not a valid class token", class),
        ));
    }
    Ok(())
}

/// A shared-handle, in-memory element tree.
///
/// Clones share the same tree, so a test can keep a handle while the widget
/// owns another.
#[derive(Debug, Clone)]
pub struct InMemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for InMemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDom {
    /// Creates a document containing only its root element.
    pub fn new() -> Self {
        let root = Element {
            tag: "HTML".to_string(),
            ..Element::default()
        };
        Self {
            tree: Rc::new(RefCell::new(Tree {
                elements: vec![root],
                scroll_y: 0.0,
                scroll_requests: Vec::new(),
                mutations: 0,
                bindings: HashMap::new(),
                rejected_attributes: Vec::new(),
                rejected_navigation: Vec::new(),
            })),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Creates a `tag` element and appends it to `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let node = self.create_element(tag)?;
        self.append_child(&parent, &node)?;
        Ok(node)
    }

    /// Detaches `node` from its parent, as if a script removed it.
    pub fn remove(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        if tree.parent(node).is_some() {
            tree.detach(node);
            tree.mutations += 1;
        }
    }

    /// Sets the laid-out top position of `node`.
    pub fn set_top(&self, node: NodeId, top: f64) {
        if let Some(el) = self.tree.borrow_mut().get_mut(node) {
            el.top = top;
        }
    }

    /// Moves the viewport as a user scroll would, without recording a request.
    pub fn set_scroll_y(&self, y: f64) {
        self.tree.borrow_mut().scroll_y = y;
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .get(node)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.borrow().get(node).and_then(|el| {
            el.attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        })
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .get(node)
            .map(|el| el.classes.clone())
            .unwrap_or_default()
    }

    /// Number of changes made to elements since the document was created.
    pub fn mutation_count(&self) -> usize {
        self.tree.borrow().mutations
    }

    pub fn scroll_requests(&self) -> Vec<ScrollRequest> {
        self.tree.borrow().scroll_requests.clone()
    }

    /// Number of links that currently have navigation bound.
    pub fn binding_count(&self) -> usize {
        self.tree.borrow().bindings.len()
    }

    /// Makes `set_attribute(_, name, value)` fail, to exercise error paths.
    pub fn reject_attribute(&self, name: &str, value: &str) {
        self.tree
            .borrow_mut()
            .rejected_attributes
            .push((name.to_string(), value.to_string()));
    }

    /// Makes `bind_navigation` fail for links targeting `heading`.
    pub fn reject_navigation(&self, heading: NodeId) {
        self.tree.borrow_mut().rejected_navigation.push(heading);
    }

    /// Simulates a click on `link`.
    ///
    /// Returns `true` if navigation was bound to the link, in which case the
    /// default action is cancelled and the document scrolls to the target.
    pub fn click(&self, link: NodeId) -> bool {
        let target = self.tree.borrow().bindings.get(&link).cloned();
        match target {
            Some(target) => {
                self.navigate(&target);
                true
            }
            None => false,
        }
    }
}

impl IdRegistry for InMemoryDom {
    fn is_taken(&self, id: &str) -> bool {
        let tree = self.tree.borrow();
        tree.elements.iter().enumerate().any(|(index, el)| {
            el.id.as_deref() == Some(id) && tree.is_connected(NodeId(index))
        })
    }
}

impl Dom for InMemoryDom {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let compounds = parse_selector(selector)?;
        let tree = self.tree.borrow();
        let found = std::iter::once(ROOT)
            .chain(tree.descendants(ROOT))
            .find(|id| {
                tree.get(*id)
                    .is_some_and(|el| compounds.iter().any(|c| c.matches(el)))
            });
        Ok(found)
    }

    fn query_selector_all(&self, root: &NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let compounds = parse_selector(selector)?;
        let tree = self.tree.borrow();
        Ok(tree
            .descendants(*root)
            .into_iter()
            .filter(|id| {
                tree.get(*id)
                    .is_some_and(|el| compounds.iter().any(|c| c.matches(el)))
            })
            .collect())
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.tree
            .borrow()
            .get(*node)
            .map(|el| el.tag.clone())
            .unwrap_or_default()
    }

    fn id(&self, node: &NodeId) -> Option<String> {
        self.tree
            .borrow()
            .get(*node)
            .and_then(|el| el.id.clone())
            .filter(|id| !id.is_empty())
    }

    fn set_id(&self, node: &NodeId, id: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.require_mut(*node)?.id = Some(id.to_string());
        tree.mutations += 1;
        Ok(())
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.tree.borrow().text_content(*node)
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.tree
            .borrow()
            .get(*node)
            .map(|el| el.top)
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::operation(
                "createElement",
                format!("invalid tag name '{}'", tag),
            ));
        }
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.elements.len());
        tree.elements.push(Element {
            tag: tag.to_ascii_uppercase(),
            ..Element::default()
        });
        Ok(id)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if tree
            .rejected_attributes
            .iter()
            .any(|(n, v)| n == name && v == value)
        {
            return Err(DomError::operation(
                "setAttribute",
                format!("{}=\"{}\" rejected", name, value),
            ));
        }
        let el = tree.require_mut(*node)?;
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
        tree.mutations += 1;
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let children = self.children(*node);
        let mut tree = self.tree.borrow_mut();
        for child in children {
            tree.detach(child);
        }
        if let Some(el) = tree.get_mut(*node) {
            el.text = text.to_string();
            tree.mutations += 1;
        }
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), DomError> {
        validate_class(class)?;
        let mut tree = self.tree.borrow_mut();
        let el = tree.require_mut(*node)?;
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
            tree.mutations += 1;
        }
        Ok(())
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<(), DomError> {
        validate_class(class)?;
        let mut tree = self.tree.borrow_mut();
        let el = tree.require_mut(*node)?;
        let before = el.classes.len();
        el.classes.retain(|c| c != class);
        if el.classes.len() != before {
            tree.mutations += 1;
        }
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .get(*node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if tree.get(*parent).is_none() || tree.get(*child).is_none() {
            return Err(DomError::NotFound(format!("{:?} or {:?}", parent, child)));
        }
        if tree.contains(*child, *parent) {
            return Err(DomError::operation(
                "appendChild",
                "the new child contains the parent",
            ));
        }
        tree.detach(*child);
        if let Some(el) = tree.get_mut(*child) {
            el.parent = Some(*parent);
        }
        tree.require_mut(*parent)?.children.push(*child);
        tree.mutations += 1;
        Ok(())
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if tree.parent(*child) != Some(*parent) {
            return Err(DomError::NotFound(format!("{:?} in {:?}", child, parent)));
        }
        for node in std::iter::once(*child).chain(tree.descendants(*child)) {
            tree.bindings.remove(&node);
        }
        tree.detach(*child);
        tree.mutations += 1;
        Ok(())
    }

    fn clear_children(&self, parent: &NodeId) {
        let mut tree = self.tree.borrow_mut();
        let removed = tree.descendants(*parent);
        if removed.is_empty() {
            return;
        }
        for node in &removed {
            tree.bindings.remove(node);
        }
        let children = tree
            .get_mut(*parent)
            .map(|el| std::mem::take(&mut el.children))
            .unwrap_or_default();
        for child in children {
            if let Some(el) = tree.get_mut(child) {
                el.parent = None;
            }
        }
        tree.mutations += 1;
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.tree.borrow().contains(*ancestor, *node)
    }

    fn scroll_y(&self) -> f64 {
        self.tree.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let mut tree = self.tree.borrow_mut();
        let top = top.max(0.0);
        tree.scroll_requests.push(ScrollRequest { top, behavior });
        tree.scroll_y = top;
    }

    fn bind_navigation(
        &self,
        link: &NodeId,
        target: NavigationTarget<NodeId>,
    ) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if tree.get(*link).is_none() {
            return Err(DomError::NotFound(format!("{:?}", link)));
        }
        if tree.rejected_navigation.contains(&target.heading) {
            return Err(DomError::operation(
                "addEventListener",
                format!("navigation to {:?} rejected", target.heading),
            ));
        }
        tree.bindings.insert(*link, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> (InMemoryDom, NodeId) {
        let dom = InMemoryDom::new();
        let article = dom.append_element(dom.root(), "article").unwrap();
        dom.set_id(&article, "article").unwrap();
        (dom, article)
    }

    #[test]
    fn test_query_selector_by_id_and_tag() {
        let (dom, article) = article();
        let h2 = dom.append_element(article, "h2").unwrap();

        assert_eq!(dom.query_selector("#article").unwrap(), Some(article));
        assert_eq!(dom.query_selector("H2").unwrap(), Some(h2));
        assert_eq!(dom.query_selector("#missing").unwrap(), None);
        assert_eq!(dom.tag_name(&h2), "H2");
    }

    #[test]
    fn test_query_selector_all_keeps_document_order() {
        let (dom, article) = article();
        let h1 = dom.append_element(article, "h1").unwrap();
        let section = dom.append_element(article, "section").unwrap();
        let h3 = dom.append_element(section, "h3").unwrap();
        let h2 = dom.append_element(article, "h2").unwrap();

        let found = dom.query_selector_all(&article, "H2, h3, H1").unwrap();
        assert_eq!(found, vec![h1, h3, h2]);
    }

    #[test]
    fn test_class_compound_selector() {
        let (dom, article) = article();
        let nav = dom.append_element(article, "nav").unwrap();
        dom.add_class(&nav, "toc").unwrap();
        dom.append_element(article, "nav").unwrap();

        assert_eq!(dom.query_selector("nav.toc").unwrap(), Some(nav));
        assert_eq!(dom.query_selector(".toc").unwrap(), Some(nav));
    }

    #[test]
    fn test_descendant_combinator_is_unsupported() {
        let (dom, _) = article();
        let err = dom.query_selector("#article h2").unwrap_err();
        assert!(matches!(err, DomError::UnsupportedSelector(_)));
        assert!(dom.query_selector("#").is_err());
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let (dom, article) = article();
        let h2 = dom.append_element(article, "h2").unwrap();
        dom.set_text(&h2, "  Intro ");
        let em = dom.append_element(h2, "em").unwrap();
        dom.set_text(&em, "duction");

        assert_eq!(dom.text_content(&h2), "  Intro duction");
    }

    #[test]
    fn test_id_registry_only_sees_connected_elements() {
        let (dom, article) = article();
        let h2 = dom.append_element(article, "h2").unwrap();
        dom.set_id(&h2, "intro").unwrap();
        assert!(dom.is_taken("intro"));

        dom.remove(h2);
        assert!(!dom.is_taken("intro"));

        let detached = dom.create_element("h2").unwrap();
        dom.set_id(&detached, "floating").unwrap();
        assert!(!dom.is_taken("floating"));
    }

    #[test]
    fn test_empty_id_reads_as_none() {
        let (dom, article) = article();
        let h2 = dom.append_element(article, "h2").unwrap();
        assert_eq!(dom.id(&h2), None);
        dom.set_id(&h2, "").unwrap();
        assert_eq!(dom.id(&h2), None);
    }

    #[test]
    fn test_clear_children_releases_bindings() {
        let (dom, article) = article();
        let heading = dom.append_element(article, "h2").unwrap();
        let toc = dom.append_element(dom.root(), "nav").unwrap();
        let link = dom.append_element(toc, "a").unwrap();
        dom.bind_navigation(
            &link,
            NavigationTarget {
                heading,
                offset: 0.0,
            },
        )
        .unwrap();
        assert_eq!(dom.binding_count(), 1);

        dom.clear_children(&toc);
        assert!(dom.children(toc).is_empty());
        assert_eq!(dom.binding_count(), 0);
        assert!(!dom.click(link));
    }

    #[test]
    fn test_remove_child_releases_bindings() {
        let (dom, article) = article();
        let heading = dom.append_element(article, "h2").unwrap();
        let toc = dom.append_element(dom.root(), "nav").unwrap();
        let kept = dom.append_element(toc, "a").unwrap();
        let removed = dom.append_element(toc, "a").unwrap();
        for link in [kept, removed] {
            dom.bind_navigation(&link, NavigationTarget { heading, offset: 0.0 })
                .unwrap();
        }

        dom.remove_child(&toc, &removed).unwrap();

        assert_eq!(dom.children(toc), vec![kept]);
        assert_eq!(dom.binding_count(), 1);
        assert!(!dom.click(removed));
        assert!(dom.remove_child(&toc, &removed).is_err());
    }

    #[test]
    fn test_rejected_navigation_fails() {
        let (dom, article) = article();
        let heading = dom.append_element(article, "h2").unwrap();
        let link = dom.create_element("a").unwrap();
        dom.reject_navigation(heading);

        let target = NavigationTarget { heading, offset: 0.0 };
        assert!(dom.bind_navigation(&link, target).is_err());
        assert_eq!(dom.binding_count(), 0);
    }

    #[test]
    fn test_click_navigates_smoothly_with_offset() {
        let (dom, article) = article();
        let heading = dom.append_element(article, "h2").unwrap();
        dom.set_top(heading, 500.0);
        let link = dom.create_element("a").unwrap();
        dom.bind_navigation(
            &link,
            NavigationTarget {
                heading,
                offset: 60.0,
            },
        )
        .unwrap();

        assert!(dom.click(link));
        assert_eq!(
            dom.scroll_requests(),
            vec![ScrollRequest {
                top: 440.0,
                behavior: ScrollBehavior::Smooth
            }]
        );
        assert_eq!(dom.scroll_y(), 440.0);
    }

    #[test]
    fn test_navigation_never_scrolls_above_document_top() {
        let (dom, article) = article();
        let heading = dom.append_element(article, "h1").unwrap();
        dom.navigate(&NavigationTarget {
            heading,
            offset: 60.0,
        });
        assert_eq!(dom.scroll_y(), 0.0);
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (dom, article) = article();
        let inner = dom.append_element(article, "div").unwrap();
        assert!(dom.append_child(&inner, &article).is_err());
    }

    #[test]
    fn test_class_tokens_are_validated() {
        let (dom, article) = article();
        assert!(dom.add_class(&article, "two words").is_err());
        assert!(dom.add_class(&article, "").is_err());
    }

    #[test]
    fn test_rejected_attribute_fails() {
        let (dom, article) = article();
        dom.reject_attribute("href", "#broken");
        assert!(dom.set_attribute(&article, "href", "#broken").is_err());
        assert!(dom.set_attribute(&article, "href", "#fine").is_ok());
        assert_eq!(dom.attribute(article, "href").as_deref(), Some("#fine"));
    }

    #[test]
    fn test_mutation_counter_ignores_reads_and_scrolls() {
        let (dom, article) = article();
        let before = dom.mutation_count();
        let _ = dom.query_selector_all(&article, "H2").unwrap();
        let _ = dom.text_content(&article);
        dom.scroll_to(100.0, ScrollBehavior::Auto);
        dom.set_scroll_y(50.0);
        assert_eq!(dom.mutation_count(), before);
    }
}
