//! Dioxus UI components for picsys.
//!
//! Provides the upload zones and previews, the operation picker and
//! parameter sliders, the run button, and the result panel with its
//! histogram chart.

mod histogram_chart;
mod image_preview;
mod operation_picker;
mod parameter_controls;
mod result_panel;
mod run_button;
mod upload;

pub use histogram_chart::HistogramChart;
pub use image_preview::ImagePreview;
pub use operation_picker::OperationPicker;
pub use parameter_controls::ParameterControls;
pub use result_panel::ResultPanel;
pub use run_button::RunButton;
pub use upload::FileUpload;
