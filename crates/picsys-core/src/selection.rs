//! Form state: which operations are selected, in what order, and the
//! parameter values the user has set for them.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::catalog::Operation;
use crate::error::PicsysError;
use crate::params::{ParamSet, ParamSpec, format_wire_value};

/// Ordered operation list plus per-operation parameter sets.
///
/// Parameter sets only exist for selected operations. Deselecting an
/// operation discards its values; reselecting it starts from defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    operations: Vec<Operation>,
    params: BTreeMap<Operation, ParamSet>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(vec![Operation::Greyscale])
    }
}

impl Selection {
    /// Create a selection from an ordered operation list.
    #[must_use]
    pub fn new(operations: Vec<Operation>) -> Self {
        let mut selection = Self {
            operations: Vec::new(),
            params: BTreeMap::new(),
        };
        selection.set_operations(operations);
        selection
    }

    /// Selected operations in the order they will be applied.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn contains(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    /// Replace the operation list.
    ///
    /// Later duplicates are dropped. Parameter values of operations that
    /// remain selected are kept; all others are discarded.
    pub fn set_operations(&mut self, operations: impl IntoIterator<Item = Operation>) {
        let mut ordered: Vec<Operation> = Vec::new();
        for op in operations {
            if !ordered.contains(&op) {
                ordered.push(op);
            }
        }
        let mut params = std::mem::take(&mut self.params);
        self.params = ordered
            .iter()
            .map(|&op| (op, params.remove(&op).unwrap_or_default()))
            .collect();
        self.operations = ordered;
    }

    /// Append `op` unless it is already selected.
    pub fn add(&mut self, op: Operation) {
        let ops: Vec<Operation> = self.operations.iter().copied().chain([op]).collect();
        self.set_operations(ops);
    }

    /// Deselect `op`, discarding its parameters.
    pub fn remove(&mut self, op: Operation) {
        let ops: Vec<Operation> = self
            .operations
            .iter()
            .copied()
            .filter(|&o| o != op)
            .collect();
        self.set_operations(ops);
    }

    /// Select `op` if absent, deselect it otherwise.
    pub fn toggle(&mut self, op: Operation) {
        if self.contains(op) {
            self.remove(op);
        } else {
            self.add(op);
        }
    }

    /// Set a parameter of a selected operation.
    ///
    /// The value is normalized to the parameter's range and step grid.
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`PicsysError::NotSelected`] if `op` is not selected and
    /// [`PicsysError::UnknownParameter`] if `op` has no parameter `name`.
    pub fn set_param(&mut self, op: Operation, name: &str, value: f64) -> Result<f64, PicsysError> {
        let spec = op.param(name).ok_or_else(|| PicsysError::UnknownParameter {
            operation: op,
            name: name.to_owned(),
        })?;
        let set = self
            .params
            .get_mut(&op)
            .ok_or(PicsysError::NotSelected(op))?;
        let value = spec.normalize(value);
        set.set(spec, value);
        Ok(value)
    }

    /// Drop an explicitly set value so the default applies again.
    pub fn reset_param(&mut self, op: Operation, name: &str) {
        if let Some(set) = self.params.get_mut(&op) {
            set.remove(name);
        }
    }

    /// The explicitly set value, if the user touched this parameter.
    #[must_use]
    pub fn param(&self, op: Operation, name: &str) -> Option<f64> {
        self.params.get(&op).and_then(|set| set.get(name))
    }

    /// The set value, or the schema default when untouched.
    ///
    /// Returns `None` only when `op` has no parameter `name`.
    #[must_use]
    pub fn effective_param(&self, op: Operation, name: &str) -> Option<f64> {
        let spec = op.param(name)?;
        Some(self.param(op, name).unwrap_or(spec.default))
    }

    /// Explicitly set parameters of `op`, in schema order.
    pub fn explicit_params(&self, op: Operation) -> impl Iterator<Item = (&'static ParamSpec, f64)> + '_ {
        op.params()
            .iter()
            .filter_map(move |spec| self.param(op, spec.name).map(|v| (spec, v)))
    }

    /// Whether any selected operation combines two images.
    #[must_use]
    pub fn needs_second_image(&self) -> bool {
        self.operations.iter().any(|op| op.needs_second_image())
    }

    /// The first selected operation that needs a second image.
    #[must_use]
    pub fn first_combination(&self) -> Option<Operation> {
        self.operations
            .iter()
            .copied()
            .find(|op| op.needs_second_image())
    }

    /// One-line description of the selection, e.g.
    /// `greyscale + gamma [gamma (1.5)]`.
    ///
    /// Only explicitly set parameters are listed.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(self.operations.len());
        for &op in &self.operations {
            let mut part = op.name().to_owned();
            let params: Vec<String> = self
                .explicit_params(op)
                .map(|(spec, v)| format!("{} ({})", spec.name, format_wire_value(v)))
                .collect();
            if !params.is_empty() {
                let _ = write!(part, " [{}]", params.join(", "));
            }
            parts.push(part);
        }
        parts.join(" + ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_greyscale() {
        let s = Selection::default();
        assert_eq!(s.operations(), &[Operation::Greyscale]);
        assert_eq!(s.summary(), "greyscale");
    }

    #[test]
    fn duplicates_are_dropped_keeping_first_position() {
        let s = Selection::new(vec![
            Operation::Gamma,
            Operation::Canny,
            Operation::Gamma,
        ]);
        assert_eq!(s.operations(), &[Operation::Gamma, Operation::Canny]);
    }

    #[test]
    fn params_survive_for_operations_still_selected() {
        let mut s = Selection::new(vec![Operation::Gamma, Operation::Binary]);
        s.set_param(Operation::Gamma, "gamma", 2.0).unwrap();
        s.set_param(Operation::Binary, "thresh", 90.0).unwrap();

        s.set_operations([Operation::Binary, Operation::Sobel]);

        assert_eq!(s.param(Operation::Binary, "thresh"), Some(90.0));
        assert_eq!(s.param(Operation::Gamma, "gamma"), None);
    }

    #[test]
    fn reselecting_starts_from_defaults() {
        let mut s = Selection::new(vec![Operation::Gamma]);
        s.set_param(Operation::Gamma, "gamma", 3.0).unwrap();
        s.toggle(Operation::Gamma);
        assert!(!s.contains(Operation::Gamma));
        s.toggle(Operation::Gamma);
        assert_eq!(s.param(Operation::Gamma, "gamma"), None);
        assert_eq!(s.effective_param(Operation::Gamma, "gamma"), Some(1.0));
    }

    #[test]
    fn add_appends_and_ignores_repeats() {
        let mut s = Selection::default();
        s.add(Operation::Canny);
        s.add(Operation::Greyscale);
        assert_eq!(s.operations(), &[Operation::Greyscale, Operation::Canny]);
        s.remove(Operation::Greyscale);
        assert_eq!(s.operations(), &[Operation::Canny]);
    }

    #[test]
    fn set_param_normalizes() {
        let mut s = Selection::new(vec![Operation::Niblack]);
        let stored = s.set_param(Operation::Niblack, "window_size", 20.0).unwrap();
        assert_eq!(stored, 21.0);
        assert_eq!(s.param(Operation::Niblack, "window_size"), Some(21.0));
    }

    #[test]
    fn set_param_rejects_unknown_parameter() {
        let mut s = Selection::new(vec![Operation::Gamma]);
        let err = s.set_param(Operation::Gamma, "thresh", 1.0).unwrap_err();
        assert!(matches!(err, PicsysError::UnknownParameter { .. }));
    }

    #[test]
    fn set_param_rejects_unselected_operation() {
        let mut s = Selection::default();
        let err = s.set_param(Operation::Gamma, "gamma", 1.0).unwrap_err();
        assert!(matches!(err, PicsysError::NotSelected(Operation::Gamma)));
    }

    #[test]
    fn reset_param_restores_default() {
        let mut s = Selection::new(vec![Operation::Sobel]);
        s.set_param(Operation::Sobel, "thresh", 40.0).unwrap();
        s.reset_param(Operation::Sobel, "thresh");
        assert_eq!(s.effective_param(Operation::Sobel, "thresh"), Some(100.0));
    }

    #[test]
    fn effective_param_uses_operation_specific_defaults() {
        let s = Selection::new(vec![Operation::Binary, Operation::Sobel, Operation::Canny]);
        assert_eq!(s.effective_param(Operation::Binary, "thresh"), Some(127.0));
        assert_eq!(s.effective_param(Operation::Sobel, "thresh"), Some(100.0));
        assert_eq!(s.effective_param(Operation::Canny, "threshold2"), Some(200.0));
        assert_eq!(s.effective_param(Operation::Canny, "gamma"), None);
    }

    #[test]
    fn summary_lists_set_params_in_schema_order() {
        let mut s = Selection::new(vec![Operation::Greyscale, Operation::Canny]);
        s.set_param(Operation::Canny, "threshold2", 180.0).unwrap();
        s.set_param(Operation::Canny, "threshold1", 50.0).unwrap();
        assert_eq!(
            s.summary(),
            "greyscale + canny [threshold1 (50), threshold2 (180)]"
        );
    }

    #[test]
    fn second_image_requirement_tracks_combinations() {
        let mut s = Selection::default();
        assert!(!s.needs_second_image());
        s.add(Operation::Blend);
        assert!(s.needs_second_image());
        assert_eq!(s.first_combination(), Some(Operation::Blend));
    }
}
