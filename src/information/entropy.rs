//! Persistent Entropy of a Barcode
//!
//! Given lifetimes lᵢ = dᵢ - bᵢ and total L = Σⱼ lⱼ, the probabilities are
//! pᵢ = lᵢ / L. Zero probabilities are skipped.
//!
//! Two accumulation rules are available:
//!
//! - `LastTerm` (default): h is overwritten by each term pᵢ log₂(pᵢ), so
//!   the result is -(last nonzero pᵢ log₂ pᵢ). This is the rule the
//!   published layer-wise curves were produced with.
//! - `Shannon`: H = -Σᵢ pᵢ log₂(pᵢ)
//!
//! The normalized entropy divides either value by log₂(n), n being the
//! number of intervals.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TdaError};

/// How per-interval terms are combined into one entropy value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntropyMode {
    /// Keep only the last nonzero term
    #[default]
    LastTerm,
    /// Full Shannon sum over all nonzero terms
    Shannon,
}

/// Persistent entropy of a list of lifetimes
///
/// Fails when the list is empty or the total lifetime is zero.
pub fn persistent_entropy(lifetimes: &[f64], mode: EntropyMode) -> Result<f64> {
    if lifetimes.is_empty() {
        return Err(TdaError::Arithmetic(
            "persistent entropy of an empty interval list".into(),
        ));
    }

    let total: f64 = lifetimes.iter().sum();
    if total == 0.0 {
        return Err(TdaError::Arithmetic(
            "total lifetime is zero, probabilities undefined".into(),
        ));
    }

    let mut h = 0.0;
    for l in lifetimes {
        let p = l / total;
        if p == 0.0 {
            continue;
        }
        match mode {
            EntropyMode::LastTerm => h = p * p.log2(),
            EntropyMode::Shannon => h += p * p.log2(),
        }
    }

    Ok(-h)
}

/// Persistent entropy divided by log₂(number of intervals)
///
/// A single interval gives log₂(1) = 0 and is an error, not 0 or NaN.
pub fn normalized_persistent_entropy(lifetimes: &[f64], mode: EntropyMode) -> Result<f64> {
    let h = persistent_entropy(lifetimes, mode)?;
    let norm = (lifetimes.len() as f64).log2();
    if norm == 0.0 {
        return Err(TdaError::Arithmetic(
            "normalizing by log2(1) = 0 for a single interval".into(),
        ));
    }
    Ok(h / norm)
}
