//! Per-operation parameter sliders.
//!
//! Renders one labelled range slider per parameter of every selected
//! operation that has any. Operations without parameters render nothing.

use dioxus::logger::tracing;
use dioxus::prelude::*;
use picsys_core::{Operation, ParamSpec, Selection};

/// Props for the [`ParameterControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ParameterControlsProps {
    /// Current form state (read-only).
    selection: Selection,
    /// Fired with the updated selection when a slider moves.
    on_change: EventHandler<Selection>,
}

/// Sliders for the parameters of all selected operations, in selection order.
#[component]
pub fn ParameterControls(props: ParameterControlsProps) -> Element {
    let tunable: Vec<Operation> = props
        .selection
        .operations()
        .iter()
        .copied()
        .filter(|op| !op.params().is_empty())
        .collect();

    if tunable.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "stack",
            for op in tunable {
                div { class: "param-group",
                    h3 { class: "param-heading", "{op.label()}" }
                    for spec in op.params() {
                        {render_param(op, spec, &props.selection, props.on_change)}
                    }
                }
            }
        }
    }
}

/// Render the slider for one parameter, wired back into the selection.
fn render_param(
    op: Operation,
    spec: &'static ParamSpec,
    selection: &Selection,
    on_change: EventHandler<Selection>,
) -> Element {
    let value = selection
        .effective_param(op, spec.name)
        .unwrap_or(spec.default);
    let selection = selection.clone();

    render_slider(
        &op.field_name(spec),
        spec,
        value,
        move |v: f64| {
            let mut s = selection.clone();
            match s.set_param(op, spec.name, v) {
                Ok(_) => on_change.call(s),
                Err(e) => tracing::warn!("ignoring slider update: {e}"),
            }
        },
    )
}

/// Render a labeled range slider showing its current value.
fn render_slider(id: &str, spec: &ParamSpec, value: f64, on_input: impl Fn(f64) + 'static) -> Element {
    let display = spec.display(value);
    let id = id.to_string();
    let label = spec.label;
    let (min, max, step) = (spec.min, spec.max, spec.step);

    rsx! {
        div { class: "slider",
            div { class: "slider-header",
                label { r#for: "{id}", class: "field-label", "{label}" }
                span { class: "slider-value", "{display}" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                class: "range",
                oninput: move |e| {
                    match e.value().parse::<f64>() {
                        Ok(v) => on_input(v),
                        Err(err) => {
                            tracing::warn!("slider parse failure: {err:?} from {:?}", e.value());
                        }
                    }
                },
            }
        }
    }
}
