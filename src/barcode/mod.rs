//! Barcode Module: Precomputed Persistence Data per Layer and Epoch
//!
//! Persistent homology is computed elsewhere, once per epoch and hidden
//! layer of a training run, and stored as JSON. This module turns those
//! documents into typed, layer-indexed structures:
//!
//! - `persistence.rs`: barcode intervals and per-epoch barcode sets
//! - `layers.rs`: layer series, layer collections, data-amount index
//! - `reader.rs`: JSON parsing and multi-run loading
//!
//! ## Data Layout
//!
//! ```text
//! DataAmountIndex ── amount ──▶ LayerCollection ── layer ──▶ LayerSeries
//!                                                              │
//!                                                    epoch ──▶ BarcodeSet ── "H0" ──▶ [(b, d)]
//! ```

mod layers;
mod persistence;
mod reader;

pub use layers::{DataAmountIndex, EpochBarcodes, LayerCollection, LayerSeries};
pub use persistence::{BarcodeInterval, BarcodeSet};
pub use reader::{
    barcode_path, load_barcode_data, parse_barcode_document, read_barcode_data, BarcodeLoader,
    BarcodeSource, FsSource,
};
