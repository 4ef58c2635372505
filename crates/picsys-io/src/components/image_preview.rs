//! Thumbnail of a chosen source image.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::raster::BlobUrl;

/// Props for the [`ImagePreview`] component.
#[derive(Props, Clone)]
pub struct ImagePreviewProps {
    /// Object URL of the encoded image.
    url: Rc<BlobUrl>,
    /// Alternative text for the `<img>`.
    alt: String,
}

impl PartialEq for ImagePreviewProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.url, &other.url) && self.alt == other.alt
    }
}

/// Renders a source image scaled to fit a fixed-height box.
#[component]
pub fn ImagePreview(props: ImagePreviewProps) -> Element {
    let src = props.url.as_str().to_owned();
    rsx! {
        img {
            class: "preview-thumb",
            src: "{src}",
            alt: "{props.alt}",
        }
    }
}
