//! Multipart request construction.
//!
//! [`RequestPayload::build`] turns the form state into an ordered list of
//! [`FormField`]s. Transports (browser `FormData`, a native HTTP client)
//! only translate those fields; all validation happens here.

use crate::catalog::Operation;
use crate::config::ServiceConfig;
use crate::error::PicsysError;
use crate::params::format_wire_value;
use crate::selection::Selection;

/// An image chosen by the user, as raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Original file name, including extension.
    pub filename: String,
    /// Undecoded file contents.
    pub bytes: Vec<u8>,
}

impl SourceImage {
    #[must_use]
    pub const fn new(filename: String, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// MIME type guessed from the file extension.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        image::ImageFormat::from_path(&self.filename)
            .map_or("application/octet-stream", |format| format.to_mime_type())
    }

    /// File name without its extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(base, _)| base)
    }

    /// Name offered when downloading the processed result.
    #[must_use]
    pub fn processed_filename(&self) -> String {
        let stem = self.stem();
        if stem.is_empty() {
            "processed.png".to_owned()
        } else {
            format!("{stem}_processed.png")
        }
    }
}

/// The images attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceImages {
    /// Image every operation runs on.
    pub primary: Option<SourceImage>,
    /// Second operand for combination operations.
    pub secondary: Option<SourceImage>,
}

/// Value of one multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A plain text part.
    Text(String),
    /// A file part.
    File {
        /// File name reported in the part's `Content-Disposition`.
        filename: &'a str,
        /// Content type of the part.
        mime_type: &'static str,
        /// Undecoded file contents.
        bytes: &'a [u8],
    },
}

/// One named part of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField<'a> {
    /// Multipart field name, e.g. `methods` or `canny_threshold1`.
    pub name: String,
    /// Text or file contents of the part.
    pub value: FieldValue<'a>,
}

impl<'a> FormField<'a> {
    fn text(name: impl Into<String>, value: String) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value),
        }
    }

    fn file(name: impl Into<String>, image: &'a SourceImage) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::File {
                filename: &image.filename,
                mime_type: image.mime_type(),
                bytes: &image.bytes,
            },
        }
    }
}

/// A validated, ordered multipart body ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload<'a> {
    fields: Vec<FormField<'a>>,
}

impl<'a> RequestPayload<'a> {
    /// Build the multipart body for the current form state.
    ///
    /// Field order: the JSON operation list, then each operation's
    /// parameters as `{operation}_{param}`, then the primary image, then
    /// the second image when a combination operation is selected.
    ///
    /// # Errors
    ///
    /// - [`PicsysError::NoImage`] without a primary image
    /// - [`PicsysError::EmptyInput`] if an attached image has no bytes
    /// - [`PicsysError::NoOperations`] for an empty operation list
    /// - [`PicsysError::MissingSecondImage`] when a combination operation
    ///   is selected without a second image
    pub fn build(
        selection: &Selection,
        images: &'a SourceImages,
        config: &ServiceConfig,
    ) -> Result<Self, PicsysError> {
        let primary = images.primary.as_ref().ok_or(PicsysError::NoImage)?;
        if primary.bytes.is_empty() {
            return Err(PicsysError::EmptyInput);
        }
        if selection.is_empty() {
            return Err(PicsysError::NoOperations);
        }
        let secondary = match selection.first_combination() {
            Some(operation) => {
                let image = images
                    .secondary
                    .as_ref()
                    .ok_or(PicsysError::MissingSecondImage { operation })?;
                if image.bytes.is_empty() {
                    return Err(PicsysError::EmptyInput);
                }
                Some(image)
            }
            None => None,
        };

        let names: Vec<&str> = selection.operations().iter().map(|op| op.name()).collect();
        let methods = serde_json::to_string(&names)
            .map_err(|e| PicsysError::InvalidConfig(format!("failed to encode methods: {e}")))?;

        let mut fields = vec![FormField::text(config.methods_field.as_str(), methods)];
        for &op in selection.operations() {
            fields.extend(param_fields(selection, op, config.explicit_defaults));
        }
        fields.push(FormField::file(config.upload_field.as_str(), primary));
        if let Some(image) = secondary {
            fields.push(FormField::file(config.second_upload_field.as_str(), image));
        }

        Ok(Self { fields })
    }

    /// Fields in the order they are written to the body.
    #[must_use]
    pub fn fields(&self) -> &[FormField<'a>] {
        &self.fields
    }

    /// Text value of the first field called `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Text(v) if f.name == name => Some(v.as_str()),
            _ => None,
        })
    }
}

fn param_fields<'a>(
    selection: &Selection,
    op: Operation,
    explicit_defaults: bool,
) -> Vec<FormField<'a>> {
    op.params()
        .iter()
        .filter_map(|spec| {
            let value = match selection.param(op, spec.name) {
                Some(v) => v,
                None if explicit_defaults => spec.default,
                None => return None,
            };
            Some(FormField::text(op.field_name(spec), format_wire_value(value)))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image(name: &str) -> SourceImage {
        SourceImage::new(name.to_owned(), vec![1, 2, 3])
    }

    fn images(primary: bool, secondary: bool) -> SourceImages {
        SourceImages {
            primary: primary.then(|| image("cat.png")),
            secondary: secondary.then(|| image("mask.jpg")),
        }
    }

    fn names<'a>(payload: &'a RequestPayload<'_>) -> Vec<&'a str> {
        payload.fields().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn default_selection_sends_methods_then_upload() {
        let imgs = images(true, false);
        let payload =
            RequestPayload::build(&Selection::default(), &imgs, &ServiceConfig::default()).unwrap();
        assert_eq!(names(&payload), ["methods", "upload"]);
        assert_eq!(payload.text("methods"), Some(r#"["greyscale"]"#));
    }

    #[test]
    fn only_touched_params_are_sent() {
        let mut selection = Selection::new(vec![Operation::Gamma, Operation::Canny]);
        selection.set_param(Operation::Canny, "threshold2", 150.0).unwrap();
        let imgs = images(true, false);
        let payload =
            RequestPayload::build(&selection, &imgs, &ServiceConfig::default()).unwrap();

        assert_eq!(names(&payload), ["methods", "canny_threshold2", "upload"]);
        assert_eq!(payload.text("methods"), Some(r#"["gamma","canny"]"#));
        assert_eq!(payload.text("canny_threshold2"), Some("150"));
    }

    #[test]
    fn explicit_defaults_fill_every_param() {
        let mut selection = Selection::new(vec![Operation::Niblack]);
        selection.set_param(Operation::Niblack, "k", -0.3).unwrap();
        let config = ServiceConfig {
            explicit_defaults: true,
            ..ServiceConfig::default()
        };
        let imgs = images(true, false);
        let payload = RequestPayload::build(&selection, &imgs, &config).unwrap();

        assert_eq!(payload.text("niblack_k"), Some("-0.3"));
        assert_eq!(payload.text("niblack_window_size"), Some("15"));
    }

    #[test]
    fn params_follow_operation_order() {
        let mut selection = Selection::new(vec![Operation::Sobel, Operation::Binary]);
        selection.set_param(Operation::Binary, "thresh", 10.0).unwrap();
        selection.set_param(Operation::Sobel, "thresh", 20.0).unwrap();
        let imgs = images(true, false);
        let payload =
            RequestPayload::build(&selection, &imgs, &ServiceConfig::default()).unwrap();
        assert_eq!(
            names(&payload),
            ["methods", "sobel_thresh", "binary_thresh", "upload"]
        );
    }

    #[test]
    fn upload_carries_filename_and_mime() {
        let imgs = images(true, false);
        let payload =
            RequestPayload::build(&Selection::default(), &imgs, &ServiceConfig::default()).unwrap();
        let upload = payload.fields().last().unwrap();
        assert_eq!(
            upload.value,
            FieldValue::File {
                filename: "cat.png",
                mime_type: "image/png",
                bytes: &[1, 2, 3],
            }
        );
    }

    #[test]
    fn missing_primary_image_is_rejected() {
        let imgs = images(false, true);
        let err = RequestPayload::build(&Selection::default(), &imgs, &ServiceConfig::default())
            .unwrap_err();
        assert!(matches!(err, PicsysError::NoImage));
    }

    #[test]
    fn empty_operation_list_is_rejected() {
        let imgs = images(true, false);
        let err = RequestPayload::build(&Selection::new(vec![]), &imgs, &ServiceConfig::default())
            .unwrap_err();
        assert!(matches!(err, PicsysError::NoOperations));
    }

    #[test]
    fn combination_requires_second_image() {
        let selection = Selection::new(vec![Operation::Greyscale, Operation::Subtract]);
        let imgs = images(true, false);
        let err = RequestPayload::build(&selection, &imgs, &ServiceConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PicsysError::MissingSecondImage {
                operation: Operation::Subtract
            }
        ));
    }

    #[test]
    fn second_image_is_only_sent_when_needed() {
        let imgs = images(true, true);

        let plain = RequestPayload::build(&Selection::default(), &imgs, &ServiceConfig::default())
            .unwrap();
        assert_eq!(names(&plain), ["methods", "upload"]);

        let selection = Selection::new(vec![Operation::Blend]);
        let combined =
            RequestPayload::build(&selection, &imgs, &ServiceConfig::default()).unwrap();
        assert_eq!(names(&combined), ["methods", "upload", "upload2"]);
    }

    #[test]
    fn empty_image_bytes_are_rejected() {
        let imgs = SourceImages {
            primary: Some(SourceImage::new("a.png".into(), Vec::new())),
            secondary: None,
        };
        let err = RequestPayload::build(&Selection::default(), &imgs, &ServiceConfig::default())
            .unwrap_err();
        assert!(matches!(err, PicsysError::EmptyInput));
    }

    #[test]
    fn custom_field_names_are_used() {
        let config = ServiceConfig {
            methods_field: "ops".into(),
            upload_field: "file".into(),
            ..ServiceConfig::default()
        };
        let imgs = images(true, false);
        let payload = RequestPayload::build(&Selection::default(), &imgs, &config).unwrap();
        assert_eq!(names(&payload), ["ops", "file"]);
    }

    #[test]
    fn mime_type_and_stem_from_filename() {
        assert_eq!(image("photo.JPG").mime_type(), "image/jpeg");
        assert_eq!(image("scan.bmp").mime_type(), "image/bmp");
        assert_eq!(image("notes.txt").mime_type(), "application/octet-stream");
        assert_eq!(image("archive.tar.png").stem(), "archive.tar");
        assert_eq!(image("noext").stem(), "noext");
        assert_eq!(image("cat.png").processed_filename(), "cat_processed.png");
    }
}
