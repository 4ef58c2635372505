//! One processing run: validate, submit, decode.

use dioxus::logger::tracing;
use picsys_core::{PicsysError, RequestPayload, Selection, ServiceConfig, SourceImages};

use crate::result::{ProcessedImage, ResultError};
use crate::submit::{self, SubmitError};

/// Errors from any step of a processing run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The form is incomplete (no image, no operation, missing second image).
    #[error(transparent)]
    Request(#[from] PicsysError),

    /// The request failed or the service rejected it.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// The response could not be turned into a displayable result.
    #[error(transparent)]
    Decode(#[from] ResultError),
}

/// Check that the form can be submitted, without sending anything.
///
/// # Errors
///
/// Returns the [`PicsysError`] that [`RequestPayload::build`] reports.
pub fn validate(
    selection: &Selection,
    images: &SourceImages,
    config: &ServiceConfig,
) -> Result<(), PicsysError> {
    RequestPayload::build(selection, images, config).map(|_| ())
}

/// Send the form to the service and decode the returned image.
///
/// Yields to the browser once between receiving the response and
/// decoding it so the loading state stays painted.
///
/// # Errors
///
/// Returns [`RunError`] wrapping the first failing step.
#[allow(clippy::future_not_send)] // WASM is single-threaded; JsFuture is !Send
pub async fn process(
    selection: &Selection,
    images: &SourceImages,
    config: &ServiceConfig,
) -> Result<ProcessedImage, RunError> {
    let payload = RequestPayload::build(selection, images, config)?;
    let summary = selection.summary();
    tracing::info!("POST {} ({summary})", config.endpoint);

    let bytes = submit::submit(&payload, config).await?;
    tracing::info!("received {} bytes", bytes.len());

    gloo_timers::future::TimeoutFuture::new(0).await;

    let download_name = images
        .primary
        .as_ref()
        .map_or_else(|| "processed.png".to_owned(), |img| img.processed_filename());
    Ok(ProcessedImage::from_response(bytes, summary, download_name)?)
}

/// How a finished run updates the result area.
#[derive(Debug, PartialEq, Eq)]
pub enum Settled<T, E> {
    /// Replace the displayed result.
    Show(T),
    /// Clear the displayed result and report the error.
    Failed(E),
    /// The inputs changed while the request was out; drop the response.
    Stale,
}

/// Decide what to do with `outcome` from a run started at `started`,
/// given the form's `current` generation.
///
/// A failure never leaves an earlier result on screen.
pub fn settle<T, E>(outcome: Result<T, E>, started: u64, current: u64) -> Settled<T, E> {
    if started != current {
        return Settled::Stale;
    }
    match outcome {
        Ok(value) => Settled::Show(value),
        Err(e) => Settled::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_success_is_shown() {
        assert_eq!(settle::<_, ()>(Ok(7), 3, 3), Settled::Show(7));
    }

    #[test]
    fn current_failure_clears_result() {
        assert_eq!(settle::<(), _>(Err("500"), 3, 3), Settled::Failed("500"));
    }

    #[test]
    fn outdated_responses_are_dropped() {
        assert_eq!(settle::<_, ()>(Ok(7), 2, 3), Settled::Stale);
        assert_eq!(settle::<(), _>(Err("500"), 2, 3), Settled::Stale);
    }
}
