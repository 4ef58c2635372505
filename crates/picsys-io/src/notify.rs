//! User-facing failure reporting.

use dioxus::logger::tracing;

/// Message shown when a processing run fails.
pub const PROCESSING_FAILED: &str = "Error processing image. See console for details.";

/// Show a blocking `window.alert` with `message`.
///
/// Silently does nothing outside a browser window.
pub fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.alert_with_message(message) {
        tracing::warn!("alert failed: {e:?}");
    }
}

/// Log `error` with its context, then alert the user.
pub fn report_failure(context: &str, error: &dyn std::fmt::Display, message: &str) {
    tracing::error!("{context}: {error}");
    alert(message);
}
