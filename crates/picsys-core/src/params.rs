//! Parameter schema and sparse parameter sets.
//!
//! Each tunable knob is described by a [`ParamSpec`] (range, step, and the
//! default the service applies when the field is absent). Values the user
//! has touched are kept in a [`ParamSet`]; untouched parameters are simply
//! missing from it.

use std::collections::BTreeMap;

/// Range, step, and default of one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Name used in the multipart field (`{operation}_{name}`).
    pub name: &'static str,
    /// Slider label.
    pub label: &'static str,
    /// Value the service assumes when the field is not sent.
    pub default: f64,
    /// Lower slider bound.
    pub min: f64,
    /// Upper slider bound.
    pub max: f64,
    /// Slider increment. The grid is anchored at `min`.
    pub step: f64,
}

impl ParamSpec {
    /// Number of decimal places implied by `step` (`0.1` -> 1, `2` -> 0).
    #[must_use]
    pub fn decimals(&self) -> usize {
        let mut step = self.step.abs();
        let mut places = 0;
        while places < 6 && (step - step.round()).abs() > 1e-9 {
            step *= 10.0;
            places += 1;
        }
        places
    }

    /// Clamp `value` into range and snap it onto the step grid.
    ///
    /// The grid starts at `min`, so a `3..=201` step-2 window stays odd.
    /// The result is rounded to [`decimals`](Self::decimals) places to
    /// strip accumulated float error. Non-finite input yields the default.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let mut snapped = self.step.mul_add(steps, self.min);
        if snapped > self.max {
            snapped -= self.step;
        }
        let scale = 10f64.powi(i32::try_from(self.decimals()).unwrap_or(0));
        let rounded = (snapped * scale).round() / scale;
        // Avoid sending "-0".
        if rounded == 0.0 { 0.0 } else { rounded }
    }

    /// Format `value` for display with the precision of the step.
    #[must_use]
    pub fn display(&self, value: f64) -> String {
        let decimals = self.decimals();
        format!("{value:.decimals$}")
    }
}

/// Format a value the way it is written into the multipart body.
///
/// Uses the shortest round-trip representation: `127`, `0.2`, `1.5`.
#[must_use]
pub fn format_wire_value(value: f64) -> String {
    format!("{value}")
}

pub const GAMMA: ParamSpec = ParamSpec {
    name: "gamma",
    label: "Gamma",
    default: 1.0,
    min: 0.1,
    max: 5.0,
    step: 0.1,
};

pub const BINARY_THRESH: ParamSpec = ParamSpec {
    name: "thresh",
    label: "Threshold",
    default: 127.0,
    min: 0.0,
    max: 255.0,
    step: 1.0,
};

pub const SOBEL_THRESH: ParamSpec = ParamSpec {
    name: "thresh",
    label: "Edge Threshold",
    default: 100.0,
    min: 0.0,
    max: 255.0,
    step: 1.0,
};

pub const THRESHOLD1: ParamSpec = ParamSpec {
    name: "threshold1",
    label: "Threshold1",
    default: 100.0,
    min: 0.0,
    max: 255.0,
    step: 1.0,
};

pub const THRESHOLD2: ParamSpec = ParamSpec {
    name: "threshold2",
    label: "Threshold2",
    default: 200.0,
    min: 0.0,
    max: 255.0,
    step: 1.0,
};

pub const K: ParamSpec = ParamSpec {
    name: "k",
    label: "k",
    default: 0.2,
    min: -1.0,
    max: 1.0,
    step: 0.1,
};

pub const WINDOW_SIZE: ParamSpec = ParamSpec {
    name: "window_size",
    label: "Window Size",
    default: 15.0,
    min: 3.0,
    max: 201.0,
    step: 2.0,
};

pub const BLUR_KERNEL_SIZE: ParamSpec = ParamSpec {
    name: "kernel_size",
    label: "Kernel Size",
    default: 5.0,
    min: 1.0,
    max: 21.0,
    step: 2.0,
};

pub const MORPH_KERNEL_SIZE: ParamSpec = ParamSpec {
    name: "kernel_size",
    label: "Kernel Size",
    default: 3.0,
    min: 1.0,
    max: 21.0,
    step: 2.0,
};

pub const ITERATIONS: ParamSpec = ParamSpec {
    name: "iterations",
    label: "Iterations",
    default: 1.0,
    min: 1.0,
    max: 10.0,
    step: 1.0,
};

pub const ALPHA: ParamSpec = ParamSpec {
    name: "alpha",
    label: "Alpha",
    default: 0.5,
    min: 0.0,
    max: 1.0,
    step: 0.05,
};

/// Sparse map of explicitly set parameter values for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet(BTreeMap<&'static str, f64>);

impl ParamSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value explicitly set for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Store `value` under the parameter's name (the caller normalizes).
    pub fn set(&mut self, spec: &ParamSpec, value: f64) {
        self.0.insert(spec.name, value);
    }

    /// Forget an explicitly set value, falling back to the default.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.0.remove(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Set values as `(name, value)`, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.0.iter().map(|(&name, &value)| (name, value))
    }
}
