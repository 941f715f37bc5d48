//! Layer Metrics: Mean Lifetime and Persistent Entropy
//!
//! Aggregate metrics read the final epoch of a layer series; per-epoch
//! metrics evaluate every epoch of a series and key the values by 1-based
//! epoch position.
//!
//! ## Mean lifetime
//!
//!   ML = Σᵢ (dᵢ - bᵢ) / n_epochs
//!
//! The sum runs over the final epoch's intervals but the denominator is the
//! number of epochs in the series, not the number of intervals.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::entropy::{self, EntropyMode};
use super::MetricSeries;
use crate::barcode::{BarcodeSet, DataAmountIndex, LayerSeries};
use crate::error::{Result, TdaError};

/// Homology dimension analysed unless configured otherwise
pub const DEFAULT_DIMENSION: &str = "H0";

/// The three layer metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    MeanLifetime,
    PersistentEntropy,
    NormalizedEntropy,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::MeanLifetime,
        Metric::PersistentEntropy,
        Metric::NormalizedEntropy,
    ];

    /// Axis label used in charts and reports
    pub fn label(&self) -> &'static str {
        match self {
            Metric::MeanLifetime => "Mean lifetime",
            Metric::PersistentEntropy => "Persistent entropy",
            Metric::NormalizedEntropy => "Normalized persistent entropy",
        }
    }
}

/// Computes barcode metrics for one homology dimension
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCalculator {
    dimension: String,
    mode: EntropyMode,
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION.to_string(),
            mode: EntropyMode::default(),
        }
    }
}

impl MetricCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = dimension.into();
        self
    }

    pub fn with_entropy_mode(mut self, mode: EntropyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn entropy_mode(&self) -> EntropyMode {
        self.mode
    }

    fn lifetimes(&self, set: &BarcodeSet) -> Result<Vec<f64>> {
        set.lifetimes(&self.dimension)
            .ok_or_else(|| TdaError::MissingDimension {
                dimension: self.dimension.clone(),
            })
    }

    fn last_epoch<'a>(&self, layer: &'a LayerSeries) -> Result<&'a BarcodeSet> {
        layer.last().ok_or(TdaError::EmptySeries)
    }

    /// Final-epoch total lifetime divided by the number of epochs
    pub fn mean_lifetime(&self, layer: &LayerSeries) -> Result<f64> {
        let lifetimes = self.lifetimes(self.last_epoch(layer)?)?;
        let total: f64 = lifetimes.iter().sum();
        Ok(total / layer.len() as f64)
    }

    /// Persistent entropy of the final epoch
    pub fn persistent_entropy(&self, layer: &LayerSeries) -> Result<f64> {
        let lifetimes = self.lifetimes(self.last_epoch(layer)?)?;
        entropy::persistent_entropy(&lifetimes, self.mode)
    }

    /// Persistent entropy of the final epoch over log₂(number of intervals)
    pub fn normalized_persistent_entropy(&self, layer: &LayerSeries) -> Result<f64> {
        let lifetimes = self.lifetimes(self.last_epoch(layer)?)?;
        entropy::normalized_persistent_entropy(&lifetimes, self.mode)
    }

    /// Evaluate one aggregate metric for a layer
    pub fn evaluate(&self, metric: Metric, layer: &LayerSeries) -> Result<f64> {
        match metric {
            Metric::MeanLifetime => self.mean_lifetime(layer),
            Metric::PersistentEntropy => self.persistent_entropy(layer),
            Metric::NormalizedEntropy => self.normalized_persistent_entropy(layer),
        }
    }

    /// Total lifetime of every epoch divided by the number of epochs,
    /// keyed 1, 2, 3, ...
    pub fn mean_lifetime_per_epoch<'a, I>(&self, epochs: I) -> Result<MetricSeries<usize>>
    where
        I: IntoIterator<Item = &'a BarcodeSet>,
        I::IntoIter: ExactSizeIterator,
    {
        let epochs = epochs.into_iter();
        let n = epochs.len() as f64;
        let mut series = MetricSeries::with_capacity(epochs.len());

        for (i, set) in epochs.enumerate() {
            let total: f64 = self.lifetimes(set)?.iter().sum();
            let value = total / n;
            trace!(epoch = i + 1, value, "mean lifetime");
            series.push(i + 1, value);
        }

        Ok(series)
    }

    /// Persistent entropy of every epoch, keyed 1, 2, 3, ...
    pub fn persistent_entropy_per_epoch<'a, I>(&self, epochs: I) -> Result<MetricSeries<usize>>
    where
        I: IntoIterator<Item = &'a BarcodeSet>,
    {
        epochs
            .into_iter()
            .enumerate()
            .map(|(i, set)| {
                let value = entropy::persistent_entropy(&self.lifetimes(set)?, self.mode)?;
                trace!(epoch = i + 1, value, "persistent entropy");
                Ok::<_, TdaError>((i + 1, value))
            })
            .collect()
    }

    /// Normalized persistent entropy of every epoch, keyed "1", "2", "3", ...
    pub fn normalized_persistent_entropy_per_epoch<'a, I>(
        &self,
        epochs: I,
    ) -> Result<MetricSeries<String>>
    where
        I: IntoIterator<Item = &'a BarcodeSet>,
    {
        epochs
            .into_iter()
            .enumerate()
            .map(|(i, set)| {
                let value =
                    entropy::normalized_persistent_entropy(&self.lifetimes(set)?, self.mode)?;
                trace!(epoch = i + 1, value, "normalized persistent entropy");
                Ok::<_, TdaError>(((i + 1).to_string(), value))
            })
            .collect()
    }

    /// One layer's metric under every data amount, in load order
    pub fn across_amounts(
        &self,
        index: &DataAmountIndex,
        layer: usize,
        metric: Metric,
    ) -> Result<MetricSeries<u64>> {
        let mut series = MetricSeries::with_capacity(index.len());
        for (amount, collection) in index.iter() {
            let layer_series = collection
                .get(layer)
                .ok_or(TdaError::MissingLayer { index: layer, amount })?;
            series.push(amount, self.evaluate(metric, layer_series)?);
        }
        Ok(series)
    }

    /// `across_amounts` for every layer present under all amounts,
    /// paired with the layer name of the first run
    pub fn per_layer_across_amounts(
        &self,
        index: &DataAmountIndex,
        metric: Metric,
    ) -> Result<Vec<(String, MetricSeries<u64>)>> {
        let Some((_, first)) = index.iter().next() else {
            return Ok(Vec::new());
        };

        (0..index.n_layers())
            .map(|layer| {
                let name = first
                    .get(layer)
                    .map(|l| l.name().to_string())
                    .unwrap_or_default();
                Ok::<_, TdaError>((name, self.across_amounts(index, layer, metric)?))
            })
            .collect()
    }
}
