//! Error type shared by the picsys crates.

use crate::catalog::Operation;

/// Errors raised while building a request or decoding a result.
#[derive(Debug, thiserror::Error)]
pub enum PicsysError {
    /// The response (or an input image) could not be decoded.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Image bytes were empty.
    #[error("image data is empty")]
    EmptyInput,

    /// No source image has been chosen yet.
    #[error("no image selected")]
    NoImage,

    /// The operation list is empty.
    #[error("no operations selected")]
    NoOperations,

    /// A combination operation is selected but only one image was given.
    #[error("operation `{operation}` needs a second image")]
    MissingSecondImage {
        /// The first selected operation that combines two images.
        operation: Operation,
    },

    /// A wire name that is not part of the catalog.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A parameter name the operation does not expose.
    #[error("operation `{operation}` has no parameter `{name}`")]
    UnknownParameter {
        /// Operation the parameter was addressed to.
        operation: Operation,
        /// The rejected parameter name.
        name: String,
    },

    /// A parameter was set on an operation that is not selected.
    #[error("operation `{0}` is not selected")]
    NotSelected(Operation),

    /// Service configuration is malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
