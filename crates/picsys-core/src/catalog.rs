//! The fixed catalog of operations the processing service understands.
//!
//! Every [`Operation`] maps to the wire name the service expects in the
//! `methods` field, a display label, a [`Category`] used to group the
//! picker, and its parameter schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PicsysError;
use crate::params::{self, ParamSpec};

/// Grouping used by the operation picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Point-wise intensity transforms.
    Intensity,
    /// Contrast and sharpness enhancement.
    Enhancement,
    /// Global and local thresholding.
    Threshold,
    /// Edge detectors.
    Edge,
    /// Morphological operators.
    Morphology,
    /// Operations that combine two images.
    Combination,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 6] = [
        Self::Intensity,
        Self::Enhancement,
        Self::Threshold,
        Self::Edge,
        Self::Morphology,
        Self::Combination,
    ];

    /// Heading shown above the category's operations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intensity => "Intensity",
            Self::Enhancement => "Enhancement",
            Self::Threshold => "Thresholding",
            Self::Edge => "Edge Detection",
            Self::Morphology => "Morphology",
            Self::Combination => "Image Combination",
        }
    }

    /// Operations belonging to this category, in catalog order.
    pub fn operations(self) -> impl Iterator<Item = Operation> {
        Operation::ALL
            .into_iter()
            .filter(move |op| op.category() == self)
    }
}

/// An image-processing operation offered by the service.
///
/// Serializes to its wire name (e.g. `"gaussian_blur"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Convert to a single luminance channel.
    Greyscale,
    /// Logarithmic intensity mapping; brightens shadows.
    Logarithmic,
    /// Exponential intensity mapping; brightens highlights.
    Exponential,
    /// Square-root intensity mapping.
    Sqrt,
    /// Sine intensity mapping.
    Sine,
    /// Cosine intensity mapping.
    Cosine,
    /// Tangent intensity mapping.
    Tangent,
    /// Power-law correction with a tunable gamma.
    Gamma,
    /// Linear stretch of the intensity range to full scale.
    ContrastStretch,
    /// Global histogram equalization.
    HistEq,
    /// Contrast-limited adaptive histogram equalization.
    Clahe,
    /// Gaussian smoothing with a tunable odd kernel size.
    GaussianBlur,
    /// Unsharp-style sharpening.
    Sharpen,
    /// Local mean thresholding.
    AdaptiveThresh,
    /// Fixed-level binary threshold.
    Binary,
    /// Niblack local threshold (`window_size`, `k`).
    Niblack,
    /// Sauvola local threshold (`window_size`, `k`).
    Sauvola,
    /// Canny edge detector with hysteresis thresholds.
    Canny,
    /// Sobel gradient magnitude, thresholded.
    Sobel,
    /// Morphological erosion.
    Erosion,
    /// Morphological dilation.
    Dilation,
    /// Erosion followed by dilation.
    Opening,
    /// Dilation followed by erosion.
    Closing,
    /// Saturating sum of two images.
    Add,
    /// Saturating difference of two images.
    Subtract,
    /// Normalized product of two images.
    Multiply,
    /// Weighted mix of two images (`alpha`).
    Blend,
    /// Log-domain combination of two images.
    LogCombine,
}

impl Operation {
    /// Every operation in catalog order.
    pub const ALL: [Self; 28] = [
        Self::Greyscale,
        Self::Logarithmic,
        Self::Exponential,
        Self::Sqrt,
        Self::Sine,
        Self::Cosine,
        Self::Tangent,
        Self::Gamma,
        Self::ContrastStretch,
        Self::HistEq,
        Self::Clahe,
        Self::GaussianBlur,
        Self::Sharpen,
        Self::AdaptiveThresh,
        Self::Binary,
        Self::Niblack,
        Self::Sauvola,
        Self::Canny,
        Self::Sobel,
        Self::Erosion,
        Self::Dilation,
        Self::Opening,
        Self::Closing,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Blend,
        Self::LogCombine,
    ];

    /// Name sent to the service.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Greyscale => "greyscale",
            Self::Logarithmic => "logarithmic",
            Self::Exponential => "exponential",
            Self::Sqrt => "sqrt",
            Self::Sine => "sine",
            Self::Cosine => "cosine",
            Self::Tangent => "tangent",
            Self::Gamma => "gamma",
            Self::ContrastStretch => "contrast_stretch",
            Self::HistEq => "hist_eq",
            Self::Clahe => "clahe",
            Self::GaussianBlur => "gaussian_blur",
            Self::Sharpen => "sharpen",
            Self::AdaptiveThresh => "adaptive_thresh",
            Self::Binary => "binary",
            Self::Niblack => "niblack",
            Self::Sauvola => "sauvola",
            Self::Canny => "canny",
            Self::Sobel => "sobel",
            Self::Erosion => "erosion",
            Self::Dilation => "dilation",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Blend => "blend",
            Self::LogCombine => "log_combine",
        }
    }

    /// Human-readable label for menus and chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greyscale => "Greyscale",
            Self::Logarithmic => "Logarithmic",
            Self::Exponential => "Exponential",
            Self::Sqrt => "Square Root",
            Self::Sine => "Sine",
            Self::Cosine => "Cosine",
            Self::Tangent => "Tangent",
            Self::Gamma => "Gamma Correction",
            Self::ContrastStretch => "Contrast Stretch",
            Self::HistEq => "Histogram Equalization",
            Self::Clahe => "CLAHE",
            Self::GaussianBlur => "Gaussian Blur",
            Self::Sharpen => "Sharpen",
            Self::AdaptiveThresh => "Adaptive Threshold",
            Self::Binary => "Binary Threshold",
            Self::Niblack => "Niblack",
            Self::Sauvola => "Sauvola",
            Self::Canny => "Canny Edge",
            Self::Sobel => "Sobel Edge",
            Self::Erosion => "Erosion",
            Self::Dilation => "Dilation",
            Self::Opening => "Opening",
            Self::Closing => "Closing",
            Self::Add => "Image Addition",
            Self::Subtract => "Image Subtraction",
            Self::Multiply => "Image Multiplication",
            Self::Blend => "Weighted Blend",
            Self::LogCombine => "Logarithmic Combination",
        }
    }

    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Greyscale
            | Self::Logarithmic
            | Self::Exponential
            | Self::Sqrt
            | Self::Sine
            | Self::Cosine
            | Self::Tangent
            | Self::Gamma => Category::Intensity,
            Self::ContrastStretch
            | Self::HistEq
            | Self::Clahe
            | Self::GaussianBlur
            | Self::Sharpen => Category::Enhancement,
            Self::AdaptiveThresh | Self::Binary | Self::Niblack | Self::Sauvola => {
                Category::Threshold
            }
            Self::Canny | Self::Sobel => Category::Edge,
            Self::Erosion | Self::Dilation | Self::Opening | Self::Closing => Category::Morphology,
            Self::Add | Self::Subtract | Self::Multiply | Self::Blend | Self::LogCombine => {
                Category::Combination
            }
        }
    }

    /// Number of source images the operation consumes.
    #[must_use]
    pub const fn arity(self) -> u8 {
        match self.category() {
            Category::Combination => 2,
            _ => 1,
        }
    }

    /// Whether the request must carry a second image for this operation.
    #[must_use]
    pub const fn needs_second_image(self) -> bool {
        self.arity() > 1
    }

    /// Parameter schema, in the order the sliders are shown.
    #[must_use]
    pub const fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::Gamma => &[params::GAMMA],
            Self::GaussianBlur => &[params::BLUR_KERNEL_SIZE],
            Self::Binary => &[params::BINARY_THRESH],
            Self::Niblack | Self::Sauvola => &[params::K, params::WINDOW_SIZE],
            Self::Canny => &[params::THRESHOLD1, params::THRESHOLD2],
            Self::Sobel => &[params::SOBEL_THRESH],
            Self::Erosion | Self::Dilation => {
                &[params::MORPH_KERNEL_SIZE, params::ITERATIONS]
            }
            Self::Opening | Self::Closing => &[params::MORPH_KERNEL_SIZE],
            Self::Blend => &[params::ALPHA],
            _ => &[],
        }
    }

    /// Look up one parameter of this operation by name.
    #[must_use]
    pub fn param(self, name: &str) -> Option<&'static ParamSpec> {
        self.params().iter().find(|spec| spec.name == name)
    }

    /// Multipart field name carrying `spec` for this operation.
    #[must_use]
    pub fn field_name(self, spec: &ParamSpec) -> String {
        format!("{}_{}", self.name(), spec.name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = PicsysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| PicsysError::UnknownOperation(s.to_owned()))
    }
}

/// Resolve a multipart field name such as `gaussian_blur_kernel_size`
/// back to its operation and parameter.
///
/// Operation names contain underscores themselves, so the split point is
/// found by matching against the catalog rather than by splitting.
#[must_use]
pub fn resolve_wire_key(key: &str) -> Option<(Operation, &'static ParamSpec)> {
    Operation::ALL.into_iter().find_map(|op| {
        let rest = key.strip_prefix(op.name())?.strip_prefix('_')?;
        op.param(rest).map(|spec| (op, spec))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn wire_names_are_unique() {
        let mut seen = HashSet::new();
        for op in Operation::ALL {
            assert!(seen.insert(op.name()), "duplicate wire name {op}");
        }
    }

    #[test]
    fn wire_names_parse_back() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        for op in Operation::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "posterize".parse::<Operation>().unwrap_err();
        assert!(matches!(err, PicsysError::UnknownOperation(ref s) if s == "posterize"));
    }

    #[test]
    fn every_operation_has_exactly_one_category() {
        let total: usize = Category::ALL.iter().map(|c| c.operations().count()).sum();
        assert_eq!(total, Operation::ALL.len());
    }

    #[test]
    fn only_combinations_need_a_second_image() {
        for op in Operation::ALL {
            assert_eq!(
                op.needs_second_image(),
                op.category() == Category::Combination,
                "{op}"
            );
        }
        assert!(Operation::Blend.needs_second_image());
        assert!(!Operation::Gamma.needs_second_image());
    }

    #[test]
    fn parameter_names_are_unique_per_operation() {
        for op in Operation::ALL {
            let mut seen = HashSet::new();
            for spec in op.params() {
                assert!(seen.insert(spec.name), "{op} repeats {}", spec.name);
            }
        }
    }

    #[test]
    fn field_names_resolve_back() {
        for op in Operation::ALL {
            for spec in op.params() {
                let key = op.field_name(spec);
                let (resolved_op, resolved_spec) = resolve_wire_key(&key).unwrap();
                assert_eq!(resolved_op, op);
                assert_eq!(resolved_spec, spec);
            }
        }
    }

    #[test]
    fn field_name_with_underscored_operation() {
        let (op, spec) = resolve_wire_key("gaussian_blur_kernel_size").unwrap();
        assert_eq!(op, Operation::GaussianBlur);
        assert_eq!(spec.default, 5.0);
    }

    #[test]
    fn field_name_for_parameterless_operation_is_unresolved() {
        assert!(resolve_wire_key("greyscale_gamma").is_none());
        assert!(resolve_wire_key("gamma").is_none());
        assert!(resolve_wire_key("").is_none());
    }
}
