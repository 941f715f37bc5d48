//! Information Module: Barcode Metrics per Layer, Epoch and Data Amount
//!
//! Implements the scalar summaries compared across hidden layers and
//! training-set sizes.
//!
//! ## Core Concepts
//!
//! ### Mean Lifetime
//!
//! Total bar length of the final epoch, normalized by the number of
//! recorded epochs. Long bars in H0 mean well separated clusters in the
//! layer's activation space.
//!
//! ### Persistent Entropy
//!
//! With lifetimes lᵢ = dᵢ - bᵢ and L = Σⱼ lⱼ, pᵢ = lᵢ / L. The entropy
//! term pᵢ log₂(pᵢ) measures how evenly the total persistence is spread
//! over the bars; see `entropy.rs` for the accumulation rules.
//!
//! ### Normalized Persistent Entropy
//!
//! Entropy divided by log₂(n), which maps the Shannon value into [0, 1].

mod calculator;
mod entropy;
mod series;

pub use calculator::{Metric, MetricCalculator, DEFAULT_DIMENSION};
pub use entropy::{normalized_persistent_entropy, persistent_entropy, EntropyMode};
pub use series::MetricSeries;
