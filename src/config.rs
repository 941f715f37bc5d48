//! Analysis configuration
//!
//! One `AnalysisConfig` describes a sweep: which runs to load, which
//! homology dimension to analyse and where outputs go. It can be read from
//! JSON and is overridden field by field from the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::barcode::BarcodeLoader;
use crate::error::{Result, TdaError};
use crate::information::{EntropyMode, MetricCalculator, DEFAULT_DIMENSION};

/// Configuration for one analysis sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run prefix; runs live in `{base_path}_DataAmount{amount}/`
    pub base_path: String,
    /// Training-set sizes, in plotting order
    pub amounts: Vec<u64>,
    /// Homology dimension label
    pub dimension: String,
    pub entropy_mode: EntropyMode,
    /// Reject runs with layers missing from some epoch
    pub strict_layers: bool,
    /// Write SVG charts here when set
    pub plot_dir: Option<PathBuf>,
    pub metrics_log: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            amounts: Vec::new(),
            dimension: DEFAULT_DIMENSION.to_string(),
            entropy_mode: EntropyMode::LastTerm,
            strict_layers: false,
            plot_dir: None,
            metrics_log: PathBuf::from("metrics.json"),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TdaError::from_io(path, e))?;
        serde_json::from_str(&text).map_err(|e| TdaError::parse(path, e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_path.is_empty() {
            return Err(TdaError::Config("base_path is empty".into()));
        }
        if self.amounts.is_empty() {
            return Err(TdaError::Config("no data amounts given".into()));
        }
        if self.dimension.is_empty() {
            return Err(TdaError::Config("homology dimension is empty".into()));
        }
        Ok(())
    }

    pub fn calculator(&self) -> MetricCalculator {
        MetricCalculator::new()
            .with_dimension(self.dimension.clone())
            .with_entropy_mode(self.entropy_mode)
    }

    pub fn loader(&self) -> BarcodeLoader {
        BarcodeLoader::default().strict_layers(self.strict_layers)
    }
}
