use dragscroll::MonitorError;
use thiserror::Error;

/// Failures while binding a monitor to the DOM.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WebError {
    /// There is no global `window`, for example inside a worker.
    #[error("no global window; DOM bindings only work on the main thread")]
    NoWindow,
    /// The window has no document.
    #[error("window has no document")]
    NoDocument,
    /// The document has no `<body>` yet.
    #[error("document has no body element")]
    NoBody,
    /// The monitor itself rejected the configuration.
    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

pub(crate) fn document() -> Result<web_sys::Document, WebError> {
    web_sys::window()
        .ok_or(WebError::NoWindow)?
        .document()
        .ok_or(WebError::NoDocument)
}

pub(crate) fn body() -> Result<web_sys::HtmlElement, WebError> {
    document()?.body().ok_or(WebError::NoBody)
}
