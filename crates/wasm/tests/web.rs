//! WebAssembly integration tests.
//!
//! These tests run in a headless browser using wasm-bindgen-test.
//!
//! Run with: wasm-pack test --headless --chrome crates/wasm

use scrolltoc_core::{Dom, IdRegistry, ScrollBehavior};
use scrolltoc_wasm::{TableOfContents, WebDom};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, Event, EventInit, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

/// Mounts a fresh `<article id=..>` and `<nav id=..>` into the body.
fn mount_page(name: &str, article_html: &str) -> (Element, Element) {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();

    let article = document.create_element("article").unwrap();
    article.set_id(&format!("{}-article", name));
    article.set_inner_html(article_html);
    let nav = document.create_element("nav").unwrap();
    nav.set_id(&format!("{}-toc", name));

    body.append_child(&article).unwrap();
    body.append_child(&nav).unwrap();
    (article, nav)
}

fn unmount(article: &Element, nav: &Element) {
    article.remove();
    nav.remove();
}

/// Resolves after the current task, once pending microtasks (mutation
/// observer callbacks among them) have run.
async fn next_task() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

/// Resolves from an animation frame requested now, i.e. after any frame
/// callback requested before it.
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn link_at(nav: &Element, index: u32) -> HtmlElement {
    nav.query_selector_all("a")
        .unwrap()
        .get(index)
        .unwrap()
        .dyn_into()
        .unwrap()
}

/// Sections separated by tall spacers so the page actually scrolls.
fn tall_article(titles: &[&str]) -> String {
    let mut html = String::new();
    for title in titles {
        html.push_str(&format!("<h2>{}</h2><div style='height: 1500px'></div>", title));
    }
    html
}

#[wasm_bindgen_test]
fn test_init() {
    let version = scrolltoc_wasm::get_version();
    assert!(!version.is_empty());
}

#[wasm_bindgen_test]
fn test_builds_one_link_per_heading() {
    let (article, nav) = mount_page(
        "links",
        "<h1>Intro</h1><p>text</p><h2>Background</h2><h3 id='m'>Method</h3><h4>Skipped</h4>",
    );

    let mut toc = TableOfContents::new("#links-article", "#links-toc", JsValue::UNDEFINED);
    assert!(toc.is_ready());
    assert_eq!(toc.heading_count(), 3);

    let links = nav.query_selector_all("a").unwrap();
    assert_eq!(links.length(), 3);

    let third: Element = links.get(2).unwrap().dyn_into().unwrap();
    assert_eq!(third.get_attribute("href").as_deref(), Some("#m"));
    assert!(third.class_list().contains("toc-level-3"));

    toc.destroy();
    unmount(&article, &nav);
}

#[wasm_bindgen_test]
fn test_placeholder_when_no_headings() {
    let (article, nav) = mount_page("empty", "<p>No structure here</p>");

    let mut toc = TableOfContents::new("#empty-article", "#empty-toc", JsValue::NULL);
    assert!(toc.is_ready());
    assert_eq!(toc.heading_count(), 0);
    assert_eq!(toc.active_index(), None);
    assert!(nav.query_selector(".toc-empty").unwrap().is_some());

    toc.destroy();
    unmount(&article, &nav);
}

#[wasm_bindgen_test]
fn test_missing_region_yields_inert_instance() {
    let (article, nav) = mount_page("inert", "<h2>Only</h2>");

    let mut toc = TableOfContents::new("#does-not-exist", "#inert-toc", JsValue::UNDEFINED);
    assert!(!toc.is_ready());
    assert_eq!(toc.heading_count(), 0);
    assert_eq!(nav.child_element_count(), 0);
    assert!(toc.rebuild().is_ok());
    toc.destroy();

    unmount(&article, &nav);
}

#[wasm_bindgen_test]
fn test_destroy_clears_outline_and_is_repeatable() {
    let (article, nav) = mount_page("teardown", "<h2>One</h2><h2>Two</h2>");

    let mut toc = TableOfContents::new("#teardown-article", "#teardown-toc", JsValue::UNDEFINED);
    assert_eq!(nav.child_element_count(), 2);

    toc.destroy();
    assert!(!toc.is_ready());
    assert_eq!(nav.child_element_count(), 0);
    toc.destroy();

    unmount(&article, &nav);
}

#[wasm_bindgen_test]
fn test_web_dom_ids_and_bindings() {
    let (article, nav) = mount_page("webdom", "<h2 id='taken'>Taken</h2>");
    let dom = WebDom::new().unwrap();

    assert!(dom.is_taken("taken"));
    assert!(!dom.is_taken("free-id"));

    let link = dom.create_element("a").unwrap();
    let heading = article.first_element_child().unwrap();
    dom.bind_navigation(
        &link,
        scrolltoc_core::NavigationTarget {
            heading,
            offset: 60.0,
        },
    )
    .unwrap();
    dom.append_child(&nav, &link).unwrap();
    assert_eq!(dom.binding_count(), 1);

    dom.clear_children(&nav);
    assert_eq!(dom.binding_count(), 0);
    assert_eq!(nav.child_element_count(), 0);

    dom.scroll_to(0.0, ScrollBehavior::Auto);
    unmount(&article, &nav);
}

#[wasm_bindgen_test]
async fn test_appended_heading_triggers_rebuild() {
    let (article, nav) = mount_page("observe", "<h2>First</h2>");
    let mut toc = TableOfContents::new("#observe-article", "#observe-toc", JsValue::UNDEFINED);
    assert_eq!(toc.heading_count(), 1);

    let document = web_sys::window().unwrap().document().unwrap();
    let heading = document.create_element("h2").unwrap();
    heading.set_text_content(Some("Second"));
    article.append_child(&heading).unwrap();
    next_task().await;

    assert_eq!(toc.heading_count(), 2);
    assert_eq!(nav.query_selector_all("a").unwrap().length(), 2);

    toc.destroy();
    let late = document.create_element("h2").unwrap();
    article.append_child(&late).unwrap();
    next_task().await;
    assert_eq!(nav.child_element_count(), 0);

    unmount(&article, &nav);
}

#[wasm_bindgen_test]
async fn test_scroll_event_moves_active_link_after_a_frame() {
    let window = web_sys::window().unwrap();
    window.scroll_to_with_x_and_y(0.0, 0.0);
    let (article, nav) = mount_page("scroll", &tall_article(&["One", "Two", "Three"]));
    let mut toc = TableOfContents::new("#scroll-article", "#scroll-toc", JsValue::UNDEFINED);
    assert_eq!(toc.heading_count(), 3);

    let third = article.query_selector_all("h2").unwrap().get(2).unwrap();
    let third: Element = third.dyn_into().unwrap();
    let top = third.get_bounding_client_rect().top() + window.scroll_y().unwrap();
    window.scroll_to_with_x_and_y(0.0, top);
    window.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
    next_frame().await;

    assert_eq!(toc.active_index(), Some(2));
    assert!(link_at(&nav, 2).class_list().contains("toc-active"));
    assert!(!link_at(&nav, 0).class_list().contains("toc-active"));

    toc.destroy();
    window.scroll_to_with_x_and_y(0.0, 0.0);
    unmount(&article, &nav);
}

#[wasm_bindgen_test]
async fn test_link_click_prevents_hash_navigation() {
    let window = web_sys::window().unwrap();
    let (article, nav) = mount_page("click", &tall_article(&["Alpha", "Beta"]));
    let mut toc = TableOfContents::new("#click-article", "#click-toc", JsValue::UNDEFINED);

    let hash_before = window.location().hash().unwrap();
    link_at(&nav, 1).click();
    next_task().await;
    assert_eq!(window.location().hash().unwrap(), hash_before);

    let init = EventInit::new();
    init.set_cancelable(true);
    let click = Event::new_with_event_init_dict("click", &init).unwrap();
    let not_cancelled = link_at(&nav, 0).dispatch_event(&click).unwrap();
    assert!(!not_cancelled);
    assert!(click.default_prevented());

    toc.destroy();
    window.scroll_to_with_x_and_y(0.0, 0.0);
    unmount(&article, &nav);
}

#[wasm_bindgen_test]
async fn test_widget_keeps_running_after_wrapper_is_released() {
    let (article, nav) = mount_page("detached", "<h2>First</h2>");
    // Fire-and-forget construction, as a page script would do.
    let _ = TableOfContents::new("#detached-article", "#detached-toc", JsValue::UNDEFINED);
    next_task().await;
    assert_eq!(nav.child_element_count(), 1);

    let document = web_sys::window().unwrap().document().unwrap();
    let heading = document.create_element("h2").unwrap();
    heading.set_text_content(Some("Second"));
    article.append_child(&heading).unwrap();
    next_task().await;

    assert_eq!(nav.child_element_count(), 2);
    unmount(&article, &nav);
}
