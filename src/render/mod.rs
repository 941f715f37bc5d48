//! Render Module: Charts of Layer Metrics
//!
//! - `figure.rs`: backend-neutral figure description
//! - `charts.rs`: `ChartRenderer`, building figures from metric series
//! - `sink.rs`: the `ChartSink` seam plus headless and recording sinks
//! - `svg.rs`: `plotters` SVG output
//!
//! ```text
//! MetricSeries ──▶ ChartRenderer ──Figure──▶ ChartSink ──▶ (nothing | memory | .svg)
//! ```

mod charts;
mod figure;
mod sink;
mod svg;

pub use charts::{ChartRenderer, DATA_AMOUNTS_LABEL};
pub use figure::{Figure, Panel, Trace};
pub use sink::{ChartSink, HeadlessSink, RecordingSink};
pub use svg::SvgSink;
