//! Options passed from JavaScript.

use scrolltoc_types::{ConfigError, TocOptions};
use wasm_bindgen::JsValue;

/// Reads the options bag handed to the constructor.
///
/// `undefined` and `null` mean "all defaults". Unknown keys are ignored.
pub fn parse_options(value: JsValue) -> Result<TocOptions, ConfigError> {
    if value.is_undefined() || value.is_null() {
        return Ok(TocOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
}
