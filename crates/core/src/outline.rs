//! Outline builder.
//!
//! Scans the content region for headings, makes sure each one carries an
//! identifier, and renders one link per heading into the outline region, in
//! document order. A build always starts from an empty outline region; links
//! are never patched in place.

use log::{debug, warn};
use scrolltoc_traits::{Dom, DomError, IdRegistry, NavigationTarget};
use scrolltoc_types::{AnchorId, HeadingLevel, TocConfig, TocEntry};

/// Class carried by the placeholder rendered when no heading matches.
pub const PLACEHOLDER_CLASS: &str = "toc-empty";

/// A heading together with the outline link rendered for it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem<N> {
    pub heading: N,
    pub link: N,
    pub entry: TocEntry,
}

/// Generates an identifier `{prefix}{index}` that nothing in `registry` uses yet.
///
/// On collision a numeric suffix is appended and incremented (`{prefix}{index}-1`,
/// `{prefix}{index}-2`, ...) until the identifier is free.
pub fn generate_id(registry: &dyn IdRegistry, prefix: &str, index: usize) -> AnchorId {
    let base = format!("{}{}", prefix, index);
    if !registry.is_taken(&base) {
        return AnchorId::from(base);
    }
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !registry.is_taken(&candidate) {
            return AnchorId::from(candidate);
        }
        suffix += 1;
    }
}

/// Returns the configured headings inside `content`, in document order.
pub fn scan_headings<D: Dom>(
    dom: &D,
    content: &D::Node,
    config: &TocConfig,
) -> Result<Vec<D::Node>, DomError> {
    let found = dom.query_selector_all(content, &config.heading_selector())?;
    Ok(found
        .into_iter()
        .filter(|node| config.matches_tag(&dom.tag_name(node)))
        .collect())
}

/// Rebuilds the outline region from scratch.
///
/// Per-heading failures are logged and that heading is left out of the
/// outline; the rest of the build carries on. Only failing to scan the
/// content region (or to render the placeholder) aborts the build.
pub fn build<D: Dom>(
    dom: &D,
    content: &D::Node,
    outline: &D::Node,
    config: &TocConfig,
) -> Result<Vec<OutlineItem<D::Node>>, DomError> {
    dom.clear_children(outline);

    let headings = scan_headings(dom, content, config)?;
    if headings.is_empty() {
        render_placeholder(dom, outline, config)?;
        debug!("No headings matched {}", config.heading_selector());
        return Ok(Vec::new());
    }

    let mut items = Vec::with_capacity(headings.len());
    for (index, heading) in headings.into_iter().enumerate() {
        match build_item(dom, outline, config, index, heading) {
            Ok(item) => items.push(item),
            Err(e) => warn!("Skipping heading #{} in the outline: {}", index, e),
        }
    }

    debug!("Outline built with {} links", items.len());
    Ok(items)
}

fn build_item<D: Dom>(
    dom: &D,
    outline: &D::Node,
    config: &TocConfig,
    index: usize,
    heading: D::Node,
) -> Result<OutlineItem<D::Node>, DomError> {
    let tag = dom.tag_name(&heading);
    let level = HeadingLevel::from_tag(&tag)
        .ok_or_else(|| DomError::operation("outline", format!("<{}> is not a heading", tag)))?;

    let target_id = match dom.id(&heading) {
        Some(id) => AnchorId::from(id),
        None => {
            let id = generate_id(dom, config.id_prefix(), index);
            dom.set_id(&heading, id.as_str())?;
            id
        }
    };

    let entry = TocEntry {
        level,
        text: dom.text_content(&heading).trim().to_string(),
        target_id,
    };

    let link = dom.create_element("a")?;
    dom.set_attribute(&link, "href", &entry.target_id.href())?;
    dom.set_text(&link, &entry.text);
    dom.add_class(&link, &entry.link_class(config.link_class_prefix()))?;
    dom.append_child(outline, &link)?;
    // Bound only once the link is in the outline, where clearing releases it.
    let bound = dom.bind_navigation(
        &link,
        NavigationTarget {
            heading: heading.clone(),
            offset: config.offset_scroll(),
        },
    );
    if let Err(e) = bound {
        if let Err(cleanup) = dom.remove_child(outline, &link) {
            warn!("Could not remove unbound outline link: {}", cleanup);
        }
        return Err(e);
    }

    Ok(OutlineItem {
        heading,
        link,
        entry,
    })
}

fn render_placeholder<D: Dom>(
    dom: &D,
    outline: &D::Node,
    config: &TocConfig,
) -> Result<(), DomError> {
    let placeholder = dom.create_element("p")?;
    dom.add_class(&placeholder, PLACEHOLDER_CLASS)?;
    dom.set_text(&placeholder, config.placeholder_text());
    dom.append_child(outline, &placeholder)
}
