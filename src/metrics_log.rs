//! Model Evaluation Log
//!
//! Appends `{model_name: {accuracy, precision, recall, f1_score}}` entries
//! to a JSON file. The file always holds an array:
//!
//! ```text
//! [
//!   {"mlp_3layers": {"accuracy": 0.91, "precision": 0.9, "recall": 0.89, "f1_score": 0.895}},
//!   {"mlp_5layers": {...}}
//! ]
//! ```
//!
//! Older logs that hold a single object (the shape the first write used to
//! produce) are read as-is and rewritten as an array on the next append.
//! Entries are never deduplicated: logging a model twice keeps both.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, TdaError};

/// Evaluation scores of one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetricsRecord {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl ModelMetricsRecord {
    pub fn new(accuracy: f64, precision: f64, recall: f64, f1_score: f64) -> Self {
        Self {
            accuracy,
            precision,
            recall,
            f1_score,
        }
    }
}

/// Appends model scores to a JSON log file
#[derive(Debug, Clone)]
pub struct MetricsLogger {
    path: PathBuf,
}

impl MetricsLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<Value>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TdaError::Io(e)),
        };
        serde_json::from_reader(BufReader::new(file))
            .map(Some)
            .map_err(|e| TdaError::parse(&self.path, e.to_string()))
    }

    /// Top-level value as a list of single-model entries
    fn entries(&self, root: Value) -> Result<Vec<Value>> {
        match root {
            Value::Array(entries) => Ok(entries),
            Value::Object(legacy) => {
                warn!(
                    path = %self.path.display(),
                    "metrics log holds a single object, converting to array"
                );
                Ok(legacy
                    .into_iter()
                    .map(|(model, scores)| single_entry(model, scores))
                    .collect())
            }
            other => Err(TdaError::Schema(format!(
                "{}: top-level value must be an array or object, found {}",
                self.path.display(),
                json_type(&other)
            ))),
        }
    }

    /// Add one entry and rewrite the file.
    ///
    /// The new contents go to a temporary file next to the log, which then
    /// replaces the log, so a failed write leaves the old log untouched.
    pub fn append(&self, model_name: &str, record: &ModelMetricsRecord) -> Result<()> {
        let mut entries = match self.load()? {
            Some(root) => self.entries(root)?,
            None => Vec::new(),
        };

        let scores = serde_json::to_value(record)
            .map_err(|e| TdaError::Schema(e.to_string()))?;
        entries.push(single_entry(model_name.to_string(), scores));

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &Value::Array(entries))
                .map_err(|e| TdaError::Io(e.into()))?;
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| TdaError::Io(e.error))?;

        debug!(model = model_name, path = %self.path.display(), "logged model metrics");
        Ok(())
    }

    /// Every logged (model name, scores) pair, in file order
    pub fn read_all(&self) -> Result<Vec<(String, ModelMetricsRecord)>> {
        let root = self.load()?.ok_or_else(|| TdaError::NotFound {
            path: self.path.clone(),
        })?;

        let mut records = Vec::new();
        for entry in self.entries(root)? {
            let map = match entry {
                Value::Object(map) => map,
                other => {
                    return Err(TdaError::Schema(format!(
                        "{}: log entry must be an object, found {}",
                        self.path.display(),
                        json_type(&other)
                    )))
                }
            };
            for (model, scores) in map {
                let record: ModelMetricsRecord = serde_json::from_value(scores).map_err(|e| {
                    TdaError::Schema(format!("{}: entry '{model}': {e}", self.path.display()))
                })?;
                records.push((model, record));
            }
        }
        Ok(records)
    }
}

fn single_entry(model: String, scores: Value) -> Value {
    let mut map = Map::new();
    map.insert(model, scores);
    Value::Object(map)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
