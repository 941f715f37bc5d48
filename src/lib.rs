//! # TDA Layer Metrics
//!
//! Topological summaries of neural-network hidden layers across training
//! epochs and training-set sizes.
//!
//! ## Framework
//!
//! For every epoch of a training run, persistent homology of each hidden
//! layer's activations is computed elsewhere and stored as barcodes. This
//! crate reads those barcodes and reduces them to scalar metrics that can
//! be compared between layers and between runs trained on different
//! amounts of data.
//!
//! ### Pipeline
//!
//! 1. **Barcode loading**: one JSON file per training-set size, regrouped
//!    into per-layer epoch series
//!
//! 2. **Metrics**: mean lifetime, persistent entropy and normalized
//!    persistent entropy of the final epoch, or of every epoch
//!
//! 3. **Charts**: metric vs. data amount per layer, a grid over all layers,
//!    and a cross-layer snapshot at one data amount
//!
//! A separate JSON log records model evaluation scores (accuracy,
//! precision, recall, F1) next to the topological metrics.

pub mod barcode;
pub mod config;
pub mod error;
pub mod information;
pub mod metrics_log;
pub mod render;

// Re-exports from barcode
pub use barcode::{
    barcode_path,
    load_barcode_data,
    read_barcode_data,
    BarcodeInterval,
    BarcodeLoader,
    BarcodeSet,
    BarcodeSource,
    DataAmountIndex,
    FsSource,
    LayerCollection,
    LayerSeries,
};

// Re-exports from information
pub use information::{
    EntropyMode,
    Metric,
    MetricCalculator,
    MetricSeries,
};

// Re-exports from render
pub use render::{
    ChartRenderer,
    ChartSink,
    Figure,
    HeadlessSink,
    RecordingSink,
    SvgSink,
};

pub use config::AnalysisConfig;
pub use error::{Result, TdaError};
pub use metrics_log::{MetricsLogger, ModelMetricsRecord};
