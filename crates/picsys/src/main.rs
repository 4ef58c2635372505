use std::rc::Rc;

use dioxus::logger::tracing;
use dioxus::prelude::*;
use picsys_core::{Selection, ServiceConfig, SourceImage, SourceImages};
use picsys_io::{
    BlobUrl, FileUpload, ImagePreview, OperationPicker, ParameterControls, ProcessedImage,
    ResultPanel, RunButton, notify, run, run::Settled,
};

fn main() {
    dioxus::launch(app);
}

/// Which of the two upload slots an image goes into.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Primary,
    Secondary,
}

/// Root application component.
///
/// Holds the form state (images, selection) and the last result in
/// Dioxus signals, and wires the upload, picker, parameter, run, and
/// result components together.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    let config = use_hook(|| {
        let config = ServiceConfig::from_build_env();
        if let Err(e) = config.validate() {
            tracing::error!("{e}");
        }
        tracing::info!("processing endpoint: {}", config.endpoint);
        Rc::new(config)
    });

    // --- Application state ---
    let mut images = use_signal(SourceImages::default);
    let mut primary_preview = use_signal(|| Option::<Rc<BlobUrl>>::None);
    let mut secondary_preview = use_signal(|| Option::<Rc<BlobUrl>>::None);
    let mut selection = use_signal(Selection::default);
    let mut result = use_signal(|| Option::<Rc<ProcessedImage>>::None);
    let mut loading = use_signal(|| false);
    let mut generation = use_signal(|| 0u64);

    // Any input change invalidates the displayed result and any response
    // still in flight.
    let mut invalidate = move || {
        generation += 1;
        result.set(None);
    };

    // --- File upload handler ---
    let mut on_upload = move |slot: Slot, bytes: Vec<u8>, name: String| {
        let image = SourceImage::new(name, bytes);
        let preview = match BlobUrl::new(&image.bytes, image.mime_type()) {
            Ok(url) => Some(Rc::new(url)),
            Err(e) => {
                tracing::warn!("no preview for {}: {e}", image.filename);
                None
            }
        };
        match slot {
            Slot::Primary => {
                images.write().primary = Some(image);
                primary_preview.set(preview);
            }
            Slot::Secondary => {
                images.write().secondary = Some(image);
                secondary_preview.set(preview);
            }
        }
        invalidate();
    };

    // --- Selection handlers ---
    let on_operations_change = move |new_selection: Selection| {
        let operations_changed = selection.peek().operations() != new_selection.operations();
        selection.set(new_selection);
        if operations_changed {
            invalidate();
        }
    };
    let on_params_change = move |new_selection: Selection| {
        selection.set(new_selection);
    };

    // --- Run handler ---
    // A single request at a time: the loading flag gates re-entry.
    let run_config = Rc::clone(&config);
    let on_run = use_callback(move |()| {
        if *loading.peek() {
            return;
        }
        let current_selection = selection.peek().clone();
        let current_images = images.peek().clone();
        let config = Rc::clone(&run_config);

        if let Err(e) = run::validate(&current_selection, &current_images, &config) {
            notify::report_failure("cannot submit", &e, &format!("Cannot run: {e}"));
            return;
        }

        let my_generation = *generation.peek();
        loading.set(true);

        spawn(async move {
            let outcome = run::process(&current_selection, &current_images, &config).await;

            match run::settle(outcome, my_generation, *generation.peek()) {
                Settled::Show(processed) => result.set(Some(Rc::new(processed))),
                Settled::Failed(e) => {
                    result.set(None);
                    notify::report_failure("processing error", &e, notify::PROCESSING_FAILED);
                }
                Settled::Stale => tracing::info!("discarding response for outdated inputs"),
            }

            loading.set(false);
        });
    });

    let needs_second = selection.read().needs_second_image();
    let has_primary = images.read().primary.is_some();

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/picsys.css") }

        div { class: "page",
            header { class: "page-header",
                h1 { class: "title-brand", "Picsys" }
                p { class: "text-muted",
                    "Welcome to Picsys! An experimental picture editing and analysis tool."
                }
            }

            main { class: "columns",
                // Left column: form
                div { class: "card stack column-form",
                    FileUpload {
                        title: "1. Upload Image",
                        input_id: "upload-primary",
                        on_upload: move |(bytes, name): (Vec<u8>, String)| {
                            on_upload(Slot::Primary, bytes, name);
                        },
                    }
                    if let Some(url) = primary_preview() {
                        ImagePreview { url, alt: "Original Preview" }
                    }

                    OperationPicker {
                        selection: selection(),
                        on_change: on_operations_change,
                    }

                    if needs_second {
                        FileUpload {
                            title: "Second Image",
                            input_id: "upload-secondary",
                            on_upload: move |(bytes, name): (Vec<u8>, String)| {
                                on_upload(Slot::Secondary, bytes, name);
                            },
                        }
                        if let Some(url) = secondary_preview() {
                            ImagePreview { url, alt: "Second Image Preview" }
                        }
                    }

                    ParameterControls {
                        selection: selection(),
                        on_change: on_params_change,
                    }

                    RunButton {
                        loading: loading(),
                        disabled: !has_primary,
                        on_run: on_run,
                    }
                }

                // Right column: result
                div { class: "column-result",
                    ResultPanel {
                        result: result(),
                        loading: loading(),
                        on_rerun: on_run,
                    }
                }
            }
        }
    }
}
