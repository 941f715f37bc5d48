//! Layer-indexed Barcode Collections
//!
//! A training run stores one `BarcodeSet` per (epoch, hidden layer). These
//! types regroup them by layer: a `LayerSeries` is the epoch sequence of a
//! single layer, a `LayerCollection` holds every layer of one run, and a
//! `DataAmountIndex` holds one collection per training-set size.

use tracing::warn;

use super::BarcodeSet;
use crate::error::{Result, TdaError};

/// Barcodes of one epoch, tagged with the epoch key they were read under
#[derive(Debug, Clone, PartialEq)]
pub struct EpochBarcodes {
    pub epoch: String,
    pub barcodes: BarcodeSet,
}

/// Epoch-ordered barcodes of one hidden layer
///
/// Epochs in which the layer did not appear are absent, so a series can be
/// shorter than the run it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSeries {
    name: String,
    epochs: Vec<EpochBarcodes>,
}

impl LayerSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            epochs: Vec::new(),
        }
    }

    pub fn push(&mut self, epoch: impl Into<String>, barcodes: BarcodeSet) {
        self.epochs.push(EpochBarcodes {
            epoch: epoch.into(),
            barcodes,
        });
    }

    /// Layer identifier as it appears in the barcode file
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of epochs recorded for this layer
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Barcodes of the final epoch
    pub fn last(&self) -> Option<&BarcodeSet> {
        self.epochs.last().map(|e| &e.barcodes)
    }

    pub fn epochs(&self) -> &[EpochBarcodes] {
        &self.epochs
    }

    /// Barcode sets in epoch order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &BarcodeSet> {
        self.epochs.iter().map(|e| &e.barcodes)
    }

    pub fn epoch_keys(&self) -> impl Iterator<Item = &str> {
        self.epochs.iter().map(|e| e.epoch.as_str())
    }
}

/// Every layer of one run, sorted by layer identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerCollection {
    layers: Vec<LayerSeries>,
    /// Epoch keys of the source document, in document order
    epoch_keys: Vec<String>,
}

impl LayerCollection {
    /// Build from layers and the run's epoch keys. Layers are re-sorted by name.
    pub fn new(mut layers: Vec<LayerSeries>, epoch_keys: Vec<String>) -> Self {
        layers.sort_by(|a, b| a.name.cmp(&b.name));
        Self { layers, epoch_keys }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LayerSeries> {
        self.layers.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&LayerSeries> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerSeries> {
        self.layers.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name())
    }

    /// Number of epochs in the source document
    pub fn n_epochs(&self) -> usize {
        self.epoch_keys.len()
    }

    pub fn epoch_keys(&self) -> &[String] {
        &self.epoch_keys
    }

    /// Does any layer miss an epoch of the run?
    pub fn is_ragged(&self) -> bool {
        self.layers.iter().any(|l| l.len() != self.epoch_keys.len())
    }

    /// Reject collections where some layer is missing from some epoch.
    pub fn ensure_uniform(&self) -> Result<()> {
        match self.layers.iter().find(|l| l.len() != self.epoch_keys.len()) {
            Some(layer) => {
                warn!(
                    layer = layer.name(),
                    epochs = layer.len(),
                    expected = self.epoch_keys.len(),
                    "ragged layer series"
                );
                Err(TdaError::RaggedLayers {
                    layer: layer.name().to_string(),
                })
            }
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a LayerCollection {
    type Item = &'a LayerSeries;
    type IntoIter = std::slice::Iter<'a, LayerSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Layer collections keyed by training-set size, in load order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataAmountIndex {
    entries: Vec<(u64, LayerCollection)>,
}

impl DataAmountIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the collection for `amount`. A new amount goes last.
    pub fn insert(&mut self, amount: u64, collection: LayerCollection) {
        match self.entries.iter_mut().find(|(a, _)| *a == amount) {
            Some(entry) => entry.1 = collection,
            None => self.entries.push((amount, collection)),
        }
    }

    pub fn get(&self, amount: u64) -> Option<&LayerCollection> {
        self.entries
            .iter()
            .find(|(a, _)| *a == amount)
            .map(|(_, c)| c)
    }

    /// Data amounts in load order
    pub fn amounts(&self) -> Vec<u64> {
        self.entries.iter().map(|(a, _)| *a).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &LayerCollection)> {
        self.entries.iter().map(|(a, c)| (*a, c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest layer count over all amounts
    pub fn n_layers(&self) -> usize {
        self.entries.iter().map(|(_, c)| c.len()).min().unwrap_or(0)
    }
}
