//! WebAssembly bindings for the scroll-synchronized table of contents.
//!
//! This crate exposes the platform-agnostic widget from `scrolltoc-core` to
//! JavaScript, driving a real browser page through [`WebDom`].
//!
//! # Architecture
//!
//! The core widget never touches the browser. This crate supplies:
//!
//! - [`dom`] - `WebDom`, the `Dom` implementation over `web_sys::Document`
//! - [`widget`] - the exported `TableOfContents` class and its event plumbing
//! - [`options`] - conversion of the JavaScript options bag
//! - [`error`] - error types with JavaScript interop
//!
//! Scroll events are folded into at most one evaluation per animation frame;
//! structural changes under the content region trigger a single rebuild per
//! observer batch.
//!
//! # Example
//!
//! ```javascript
//! import init, { TableOfContents } from '@scrolltoc/wasm';
//!
//! await init();
//!
//! const toc = new TableOfContents('#article', '#toc', {
//!   headingTags: ['H2', 'H3'],
//!   offsetScroll: 80,
//!   activeClass: 'current',
//! });
//!
//! console.log(toc.headingCount, toc.activeIndex);
//! toc.destroy();
//! ```

pub mod dom;
pub mod error;
pub mod options;
pub mod widget;

pub use dom::WebDom;
pub use error::{ErrorCode, TocJsError};
pub use widget::TableOfContents;

use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// Sets up panic hooks for readable errors in the browser console. Called
/// automatically by the wasm-bindgen glue code.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

/// Get the version of the scrolltoc-wasm library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
