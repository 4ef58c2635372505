//! Submit button for the processing form.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdPlay;

/// Props for the [`RunButton`] component.
#[derive(Props, Clone, PartialEq)]
pub struct RunButtonProps {
    /// A request is in flight.
    loading: bool,
    /// The form is not ready (e.g. no image chosen).
    disabled: bool,
    /// Fired on click when enabled.
    on_run: EventHandler<()>,
}

/// Full-width "Run" button; shows "Processing…" while a request is out.
#[component]
pub fn RunButton(props: RunButtonProps) -> Element {
    let inactive = props.disabled || props.loading;
    let class = if inactive {
        "btn btn-block btn-disabled"
    } else {
        "btn btn-block btn-primary"
    };

    rsx! {
        button {
            class: "{class}",
            disabled: inactive,
            onclick: move |_| {
                if !inactive {
                    props.on_run.call(());
                }
            },
            if props.loading {
                span { class: "animate-pulse", "Processing…" }
            } else {
                Icon { width: 16, height: 16, icon: LdPlay }
                "Run"
            }
        }
    }
}
