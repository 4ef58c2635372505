//! Result card: processed image, selection summary, histogram, actions.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdRotateCcw};

use crate::components::HistogramChart;
use crate::download;
use crate::notify;
use crate::result::{ProcessedImage, RESULT_MIME};

/// Props for the [`ResultPanel`] component.
#[derive(Props, Clone)]
pub struct ResultPanelProps {
    /// The latest successful result. `None` shows the placeholder.
    /// Wrapped in `Rc` to avoid cloning image bytes on each render.
    result: Option<Rc<ProcessedImage>>,
    /// A request is in flight (disables "Run again").
    loading: bool,
    /// Fired when the user asks to re-run the current form.
    on_rerun: EventHandler<()>,
}

impl PartialEq for ResultPanelProps {
    fn eq(&self, other: &Self) -> bool {
        let results_eq = match (&self.result, &other.result) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        results_eq && self.loading == other.loading
    }
}

/// Shows the processed image with its histogram, or a placeholder.
#[component]
pub fn ResultPanel(props: ResultPanelProps) -> Element {
    let Some(result) = props.result.clone() else {
        return rsx! {
            div { class: "card stack",
                h2 { class: "section-title", "Result" }
                p { class: "text-muted",
                    "No result yet. Upload an image, select methods, and click Run."
                }
            }
        };
    };

    let download_click = {
        let result = Rc::clone(&result);
        move |_| {
            if let Err(e) =
                download::trigger_download(&result.bytes, &result.download_name, RESULT_MIME)
            {
                notify::report_failure("download failed", &e, &format!("Download failed: {e}"));
            }
        }
    };

    let src = result.url.as_str().to_owned();
    let loading = props.loading;
    let on_rerun = props.on_rerun;

    rsx! {
        div { class: "card stack",
            h2 { class: "section-title", "Result" }
            img { class: "result-image", src: "{src}", alt: "Processed Result" }
            p { class: "text-small", "Selections: {result.summary}" }

            h3 { class: "param-heading", "Histogram" }
            HistogramChart { histogram: result.histogram.clone() }

            div { class: "button-row",
                button {
                    class: if loading { "btn btn-disabled" } else { "btn btn-secondary" },
                    disabled: loading,
                    onclick: move |_| on_rerun.call(()),
                    Icon { width: 16, height: 16, icon: LdRotateCcw }
                    "Run again"
                }
                button {
                    class: "btn btn-primary",
                    onclick: download_click,
                    Icon { width: 16, height: 16, icon: LdDownload }
                    "Download"
                }
            }
        }
    }
}
