//! Chart Renderer: Metric Curves over Data Amounts and Layers
//!
//! Three chart types:
//!
//! - one layer's metric vs. data amount (line with markers)
//! - a grid with one panel per layer, shared x axis and shared y label
//! - a cross-layer snapshot: value at one data amount vs. layer number
//!
//! The renderer keeps no state between calls besides its sink.

use tracing::debug;

use super::{ChartSink, Figure, Panel, Trace};
use crate::error::{Result, TdaError};
use crate::information::{Metric, MetricSeries};

pub const DATA_AMOUNTS_LABEL: &str = "Data amounts";

fn amount_points(series: &MetricSeries<u64>) -> Vec<(f64, f64)> {
    series.iter().map(|(&a, v)| (a as f64, v)).collect()
}

/// Builds metric charts and hands them to a sink
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer<S> {
    sink: S,
}

impl<S: ChartSink> ChartRenderer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, figure: Figure) -> Result<()> {
        debug!(figure = figure.name(), panels = figure.panels.len(), "render");
        self.sink.show(&figure)
    }

    /// Metric values of one layer vs. data amount, titled with the layer name
    pub fn plot_metric_for_layer(
        &mut self,
        series: &MetricSeries<u64>,
        layer_name: &str,
        metric_label: &str,
    ) -> Result<()> {
        if series.is_empty() {
            return Err(TdaError::InvalidChart(format!(
                "no data amounts to plot for layer '{layer_name}'"
            )));
        }

        let panel = Panel::new(layer_name)
            .x_label(DATA_AMOUNTS_LABEL)
            .y_label(metric_label)
            .trace(Trace::new(amount_points(series)).with_markers());
        self.emit(Figure::single(panel))
    }

    /// Mean lifetime of one layer vs. data amount
    pub fn plot_mean_lifetime_for_layer(
        &mut self,
        series: &MetricSeries<u64>,
        layer_name: &str,
    ) -> Result<()> {
        self.plot_metric_for_layer(series, layer_name, Metric::MeanLifetime.label())
    }

    /// One panel per layer ("Layer 1", "Layer 2", ...), stacked with a
    /// shared data-amount axis and a single y label
    pub fn plot_layers_grid(&mut self, layers: &[MetricSeries<u64>], label: &str) -> Result<()> {
        if layers.is_empty() {
            return Err(TdaError::InvalidChart("grid needs at least one layer".into()));
        }
        let n_amounts = layers[0].len();
        for (i, series) in layers.iter().enumerate() {
            if series.is_empty() {
                return Err(TdaError::InvalidChart(format!(
                    "layer {} has no data amounts to plot",
                    i + 1
                )));
            }
            if series.len() != n_amounts {
                return Err(TdaError::InvalidChart(format!(
                    "layer {} has {} data amounts, layer 1 has {n_amounts}",
                    i + 1,
                    series.len()
                )));
            }
        }

        let panels = layers
            .iter()
            .enumerate()
            .map(|(i, series)| {
                Panel::new(format!("Layer {}", i + 1)).trace(Trace::new(amount_points(series)))
            })
            .collect();

        self.emit(Figure {
            title: Some(format!("{label} per layer")),
            panels,
            shared_x_label: Some(DATA_AMOUNTS_LABEL.to_string()),
            shared_y_label: Some(label.to_string()),
        })
    }

    /// Value at the `amount_index`-th data amount of every layer, plotted
    /// against layer number 1..N
    pub fn plot_layer_snapshot(
        &mut self,
        layers: &[MetricSeries<u64>],
        amount_index: usize,
        metric_label: &str,
    ) -> Result<()> {
        let amount = layers
            .first()
            .and_then(|s| s.keys().nth(amount_index).copied())
            .ok_or_else(|| {
                TdaError::InvalidChart(format!("no data amount at index {amount_index}"))
            })?;

        let points = layers
            .iter()
            .enumerate()
            .map(|(i, series)| {
                series
                    .value_at(amount_index)
                    .map(|v| ((i + 1) as f64, v))
                    .ok_or_else(|| {
                        TdaError::InvalidChart(format!(
                            "layer {} has no value at index {amount_index}",
                            i + 1
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let panel = Panel::new(format!("{metric_label} start points per layer, batch={amount}"))
            .x_label("Layer")
            .y_label(metric_label)
            .trace(Trace::new(points).with_markers());
        self.emit(Figure::single(panel))
    }
}
