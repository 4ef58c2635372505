//! Multipart POST to the processing service via `window.fetch`.
//!
//! Translates a [`RequestPayload`] into a browser `FormData` body, sends
//! it, and returns the raw response bytes. Requires a browser environment
//! (`wasm32-unknown-unknown` target).

use picsys_core::{FieldValue, RequestPayload, ServiceConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::BlobPropertyBag;

/// Errors that can occur while talking to the service.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A browser API call failed (network error, CORS rejection, ...).
    #[error("browser API error: {0}")]
    JsError(String),

    /// The service answered with a non-success status.
    #[error("service responded with {status} {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase reported by the browser.
        status_text: String,
    },
}

impl From<JsValue> for SubmitError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// POST `payload` to the configured endpoint and return the response body.
///
/// # Errors
///
/// Returns [`SubmitError::JsError`] if building the body or the fetch
/// itself fails, and [`SubmitError::Status`] for a non-2xx response.
#[allow(clippy::future_not_send)] // WASM is single-threaded; JsFuture is !Send
pub async fn submit(
    payload: &RequestPayload<'_>,
    config: &ServiceConfig,
) -> Result<Vec<u8>, SubmitError> {
    let window = web_sys::window().ok_or_else(|| SubmitError::JsError("no global window".into()))?;
    let body = to_form_data(payload)?;

    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    // No explicit Content-Type: the browser adds the multipart boundary.
    init.set_body(&body);
    let request = web_sys::Request::new_with_str_and_init(&config.endpoint, &init)?;

    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|e| SubmitError::JsError(format!("fetch did not return a Response: {e:?}")))?;

    if !response.ok() {
        return Err(SubmitError::Status {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Build a `FormData` with the payload's fields in order.
fn to_form_data(payload: &RequestPayload<'_>) -> Result<web_sys::FormData, SubmitError> {
    let form = web_sys::FormData::new()?;
    for field in payload.fields() {
        match &field.value {
            FieldValue::Text(value) => form.append_with_str(&field.name, value)?,
            FieldValue::File {
                filename,
                mime_type,
                bytes,
            } => {
                let parts = js_sys::Array::new();
                parts.push(&js_sys::Uint8Array::from(*bytes));
                let opts = BlobPropertyBag::new();
                opts.set_type(mime_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
                form.append_with_blob_and_filename(&field.name, &blob, filename)?;
            }
        }
    }
    Ok(form)
}
