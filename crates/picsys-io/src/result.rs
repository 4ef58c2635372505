//! A decoded service response ready for display.

use picsys_core::{Histogram, PicsysError};

use crate::raster::{BlobUrl, RasterError};

/// MIME type the response is displayed and downloaded as.
pub const RESULT_MIME: &str = "image/png";

/// Errors that can occur while turning response bytes into a result.
#[derive(Debug, thiserror::Error)]
pub enum ResultError {
    /// The response body is not a decodable image.
    #[error("response is not an image: {0}")]
    Decode(#[from] PicsysError),

    /// The browser could not create an object URL for it.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// The processed image returned by the service, with its histogram.
#[derive(Debug, PartialEq)]
pub struct ProcessedImage {
    /// Encoded bytes exactly as received (used for download).
    pub bytes: Vec<u8>,
    /// Object URL for `<img src>`; revoked when this value is dropped.
    pub url: BlobUrl,
    /// RGB histogram of the decoded pixels.
    pub histogram: Histogram,
    /// Selection summary captured when the request was sent.
    pub summary: String,
    /// File name offered by the download button.
    pub download_name: String,
}

impl ProcessedImage {
    /// Decode `bytes`, tally the histogram, and create the display URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::Decode`] if `bytes` is not an image and
    /// [`ResultError::Raster`] if the Blob URL cannot be created.
    pub fn from_response(
        bytes: Vec<u8>,
        summary: String,
        download_name: String,
    ) -> Result<Self, ResultError> {
        let histogram = Histogram::from_encoded(&bytes)?;
        let url = BlobUrl::new(&bytes, RESULT_MIME)?;
        Ok(Self {
            bytes,
            url,
            histogram,
            summary,
            download_name,
        })
    }
}
