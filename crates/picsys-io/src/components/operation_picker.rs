//! Multi-select for the operation catalog.
//!
//! Selected operations are shown as removable chips in the order they
//! will be applied. A grouped `<select>` appends further operations.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdX;
use picsys_core::{Category, Operation, Selection};

/// Props for the [`OperationPicker`] component.
#[derive(Props, Clone, PartialEq)]
pub struct OperationPickerProps {
    /// Current form state (read-only).
    selection: Selection,
    /// Fired with the updated selection after an add or remove.
    on_change: EventHandler<Selection>,
}

/// Chips for the selected operations plus an "add operation" dropdown.
#[component]
pub fn OperationPicker(props: OperationPickerProps) -> Element {
    let on_change = props.on_change;
    let selected: Vec<Operation> = props.selection.operations().to_vec();
    let selection_add = props.selection.clone();

    rsx! {
        div { class: "stack",
            h2 { class: "section-title", "2. Select Methods" }

            div { class: "chip-row",
                if selected.is_empty() {
                    span { class: "text-muted text-small", "No operations selected" }
                }
                for op in selected {
                    {render_chip(op, &props.selection, on_change)}
                }
            }

            label { r#for: "operation-select", class: "field-label", "DIP Methods" }
            select {
                id: "operation-select",
                class: "select",
                value: "",
                onchange: move |e| {
                    let value = e.value();
                    if value.is_empty() {
                        return;
                    }
                    if let Ok(op) = value.parse::<Operation>() {
                        let mut s = selection_add.clone();
                        s.add(op);
                        on_change.call(s);
                    }
                },

                option { value: "", disabled: true, "Add an operation…" }
                for category in Category::ALL {
                    optgroup { label: "{category.label()}",
                        for op in category.operations() {
                            option {
                                value: "{op.name()}",
                                disabled: props.selection.contains(op),
                                if op.needs_second_image() {
                                    "{op.label()} (2 images)"
                                } else {
                                    "{op.label()}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Render one removable chip.
fn render_chip(op: Operation, selection: &Selection, on_change: EventHandler<Selection>) -> Element {
    let selection = selection.clone();
    let label = op.label();

    rsx! {
        span { class: "chip", title: "{op.name()}",
            "{label}"
            button {
                class: "chip-remove",
                aria_label: "Remove {label}",
                onclick: move |_| {
                    let mut s = selection.clone();
                    s.remove(op);
                    on_change.call(s);
                },
                Icon { width: 12, height: 12, icon: LdX }
            }
        }
    }
}
