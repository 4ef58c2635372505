//! Saving the processed image to disk.
//!
//! The browser offers no direct "save file" call, so the bytes are exposed
//! through a temporary object URL and a detached `<a download>` is clicked.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlAnchorElement};

use crate::raster::{BlobUrl, RasterError};

/// Errors that can occur while saving a file.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The object URL for the data could not be created.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Offer `data` to the user as a file called `filename`.
///
/// # Errors
///
/// Returns [`DownloadError`] if the page has no document or any of the
/// Blob, URL, or anchor calls fail.
pub fn trigger_download(data: &[u8], filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let document = document()?;
    // Revoked when it goes out of scope, after the click has started the download.
    let url = BlobUrl::new(data, mime_type)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("<a> is not an anchor: {e:?}")))?;
    anchor.set_href(url.as_str());
    anchor.set_download(filename);
    anchor.set_hidden(true);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("page has no body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    Ok(())
}

fn document() -> Result<Document, DownloadError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| DownloadError::JsError("no document".into()))
}
