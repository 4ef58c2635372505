//! picsys-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, the multipart request to the processing
//! service, Blob URLs and downloads, user alerts, and provides the UI
//! components of the picsys web application.

pub mod components;
pub mod download;
pub mod notify;
pub mod raster;
pub mod result;
pub mod run;
pub mod submit;

pub use components::{
    FileUpload, HistogramChart, ImagePreview, OperationPicker, ParameterControls, ResultPanel,
    RunButton,
};
pub use raster::BlobUrl;
pub use result::ProcessedImage;
pub use submit::{SubmitError, submit};
