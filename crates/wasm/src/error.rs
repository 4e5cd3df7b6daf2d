//! Error handling for WASM bindings.
//!
//! Converts widget errors into JavaScript `Error` objects carrying a `code`.

use scrolltoc_core::TocError;
use scrolltoc_traits::DomError;
use scrolltoc_types::ConfigError;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Error codes for TypeScript consumption.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed or invalid options
    Config,
    /// A selector matched no element
    MissingRegion,
    /// A DOM call failed
    Dom,
    /// Converting a value to or from JavaScript failed
    Json,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG_ERROR",
            ErrorCode::MissingRegion => "MISSING_REGION",
            ErrorCode::Dom => "DOM_ERROR",
            ErrorCode::Json => "JSON_ERROR",
        }
    }
}

/// A JavaScript-friendly error type.
///
/// Note: This is NOT a wasm_bindgen struct because we need custom
/// conversion to JavaScript Error objects.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TocJsError {
    code: ErrorCode,
    message: String,
}

impl TocJsError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TocError> for TocJsError {
    fn from(err: TocError) -> Self {
        let code = match &err {
            TocError::Config(_) => ErrorCode::Config,
            TocError::MissingRegion { .. } => ErrorCode::MissingRegion,
            TocError::Dom(_) => ErrorCode::Dom,
        };
        Self::new(code, err.to_string())
    }
}

impl From<ConfigError> for TocJsError {
    fn from(err: ConfigError) -> Self {
        TocError::from(err).into()
    }
}

impl From<DomError> for TocJsError {
    fn from(err: DomError) -> Self {
        TocError::from(err).into()
    }
}

impl From<serde_wasm_bindgen::Error> for TocJsError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::new(ErrorCode::Json, err.to_string())
    }
}

impl From<TocJsError> for JsValue {
    fn from(err: TocJsError) -> Self {
        let js_error = js_sys::Error::new(&err.message);
        js_sys::Reflect::set(
            &js_error,
            &"code".into(),
            &JsValue::from_str(err.code.as_str()),
        )
        .ok();
        js_error.into()
    }
}

/// Maps a thrown JavaScript value into a [`DomError`] for operation `op`.
pub(crate) fn js_error(op: &'static str) -> impl Fn(JsValue) -> DomError {
    move |value| {
        let message = value
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{:?}", value));
        DomError::operation(op, message)
    }
}
