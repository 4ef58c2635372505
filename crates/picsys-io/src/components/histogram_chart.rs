//! Inline SVG plot of the RGB histogram.

use std::fmt::Write;

use dioxus::prelude::*;
use picsys_core::histogram::BINS;
use picsys_core::{Channel, Histogram};

/// Height of the plot area in SVG user units.
const PLOT_HEIGHT: f64 = 100.0;

/// Props for the [`HistogramChart`] component.
#[derive(Props, Clone, PartialEq)]
pub struct HistogramChartProps {
    histogram: Histogram,
}

/// One polyline per channel, scaled so the tallest bin touches the top.
///
/// The `viewBox` is `0 0 255 100`: one unit per intensity horizontally.
#[component]
pub fn HistogramChart(props: HistogramChartProps) -> Element {
    let max = props.histogram.max_count();

    rsx! {
        div { class: "stack",
            svg {
                xmlns: "http://www.w3.org/2000/svg",
                view_box: "0 0 255 {PLOT_HEIGHT}",
                class: "histogram",
                "preserveAspectRatio": "none",
                role: "img",
                "aria-label": "RGB histogram",

                for channel in Channel::ALL {
                    polyline {
                        class: "{channel_class(channel)}",
                        points: "{channel_points(props.histogram.channel(channel), max)}",
                        fill: "none",
                        stroke_width: "1",
                        "vector-effect": "non-scaling-stroke",
                    }
                }
            }
            div { class: "histogram-legend",
                for channel in Channel::ALL {
                    span { class: "legend-item {channel_class(channel)}",
                        "{legend_text(&props.histogram, channel)}"
                    }
                }
            }
        }
    }
}

const fn channel_class(channel: Channel) -> &'static str {
    match channel {
        Channel::Red => "hist-red",
        Channel::Green => "hist-green",
        Channel::Blue => "hist-blue",
    }
}

/// Legend entry, e.g. `Red: mean 118.4`.
fn legend_text(histogram: &Histogram, channel: Channel) -> String {
    histogram.mean(channel).map_or_else(
        || format!("{}: -", channel.label()),
        |mean| format!("{}: mean {mean:.1}", channel.label()),
    )
}

/// Build the `points` attribute for one channel.
///
/// `x` is the intensity; `y` runs from `PLOT_HEIGHT` (empty bin) up to 0
/// (a bin equal to `max`). With `max == 0` the line lies on the baseline.
#[allow(clippy::cast_precision_loss)]
fn channel_points(bins: &[u32; BINS], max: u32) -> String {
    let mut points = String::with_capacity(BINS * 8);
    for (x, &count) in bins.iter().enumerate() {
        let y = if max == 0 {
            PLOT_HEIGHT
        } else {
            PLOT_HEIGHT - f64::from(count) / f64::from(max) * PLOT_HEIGHT
        };
        let _ = write!(points, "{x},{y:.2} ");
    }
    points.truncate(points.trim_end().len());
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_cover_every_bin() {
        let bins = [1; BINS];
        let points = channel_points(&bins, 1);
        assert_eq!(points.split(' ').count(), BINS);
        assert!(points.starts_with("0,0.00"));
        assert!(points.ends_with("255,0.00"));
    }

    #[test]
    fn tallest_bin_reaches_the_top() {
        let mut bins = [0; BINS];
        bins[10] = 50;
        bins[20] = 25;
        let points = channel_points(&bins, 50);
        let coords: Vec<&str> = points.split(' ').collect();
        assert_eq!(coords[10], "10,0.00");
        assert_eq!(coords[20], "20,50.00");
        assert_eq!(coords[0], "0,100.00");
    }

    #[test]
    fn empty_histogram_lies_on_baseline() {
        let points = channel_points(&[0; BINS], 0);
        assert!(points.split(' ').all(|p| p.ends_with(",100.00")));
    }

    #[test]
    fn legend_for_empty_histogram_has_no_mean() {
        let h = Histogram::default();
        assert_eq!(legend_text(&h, Channel::Green), "Green: -");
    }
}
