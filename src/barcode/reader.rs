//! Barcode JSON Reading
//!
//! A barcode file is a JSON object keyed by epoch, each epoch an object
//! keyed by hidden layer, each layer an object keyed by homology dimension:
//!
//! ```text
//! {
//!   "0": { "layer_1": { "H0": [[0.0, 0.4], [0.0, 1.2]] }, ... },
//!   "1": { ... }
//! }
//! ```
//!
//! Epochs are consumed in document order (not key order), so `"10"` may
//! legitimately follow `"9"`. Non-array values under a layer (point counts
//! and similar metadata) are skipped. Each training-set size lives in its own run
//! directory: `{base_path}_DataAmount{amount}/barcodes/barcode_data.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{BarcodeInterval, BarcodeSet, DataAmountIndex, LayerCollection, LayerSeries};
use crate::error::{Result, TdaError};

/// Where barcode documents come from
pub trait BarcodeSource {
    /// Full text of the document at `path`
    fn read_document(&self, path: &Path) -> Result<String>;
}

/// Reads barcode documents from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl BarcodeSource for FsSource {
    fn read_document(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| TdaError::from_io(path, e))
    }
}

/// Path of the barcode file for one training-set size
pub fn barcode_path(base_path: &str, amount: u64) -> PathBuf {
    PathBuf::from(format!(
        "{base_path}_DataAmount{amount}/barcodes/barcode_data.json"
    ))
}

/// Read one barcode file into a layer-sorted collection
pub fn read_barcode_data(path: impl AsRef<Path>) -> Result<LayerCollection> {
    read_with(&FsSource, path.as_ref())
}

/// Read one barcode file per data amount, failing on the first bad file
pub fn load_barcode_data(amounts: &[u64], base_path: &str) -> Result<DataAmountIndex> {
    BarcodeLoader::new(FsSource).load(amounts, base_path)
}

fn read_with<S: BarcodeSource + ?Sized>(source: &S, path: &Path) -> Result<LayerCollection> {
    let text = source.read_document(path)?;
    let collection = parse_barcode_document(&text, path)?;
    debug!(
        path = %path.display(),
        layers = collection.len(),
        epochs = collection.n_epochs(),
        "read barcode data"
    );
    Ok(collection)
}

/// Parse the text of a barcode document. `path` is only used in errors.
pub fn parse_barcode_document(text: &str, path: &Path) -> Result<LayerCollection> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| TdaError::parse(path, e.to_string()))?;
    let epochs = as_object(&root, path, "top level")?;

    let mut layers: BTreeMap<String, LayerSeries> = BTreeMap::new();
    let mut epoch_keys = Vec::with_capacity(epochs.len());

    for (epoch, layer_map) in epochs {
        epoch_keys.push(epoch.clone());
        let layer_map = as_object(layer_map, path, &format!("epoch '{epoch}'"))?;
        for (layer, raw) in layer_map {
            let barcodes = parse_barcode_set(raw, path, epoch, layer)?;
            layers
                .entry(layer.clone())
                .or_insert_with(|| LayerSeries::new(layer.clone()))
                .push(epoch.clone(), barcodes);
        }
    }

    Ok(LayerCollection::new(layers.into_values().collect(), epoch_keys))
}

fn parse_barcode_set(raw: &Value, path: &Path, epoch: &str, layer: &str) -> Result<BarcodeSet> {
    let dims = as_object(raw, path, &format!("epoch '{epoch}' layer '{layer}'"))?;
    let mut set = BarcodeSet::new();

    for (dim, bars) in dims {
        // Non-array entries are per-layer metadata, not barcodes
        let Some(bars) = bars.as_array() else {
            debug!(epoch, layer, key = %dim, "skipping non-barcode entry");
            continue;
        };
        let where_ = || format!("epoch '{epoch}' layer '{layer}' {dim}");
        set.insert_dimension(dim);
        for (i, pair) in bars.iter().enumerate() {
            let interval = parse_pair(pair).ok_or_else(|| {
                TdaError::parse(
                    path,
                    format!("{} bar {i}: expected [birth, death] with death >= birth", where_()),
                )
            })?;
            set.add(dim, interval);
        }
    }

    Ok(set)
}

fn parse_pair(pair: &Value) -> Option<BarcodeInterval> {
    match pair.as_array()?.as_slice() {
        [birth, death] => BarcodeInterval::new(birth.as_f64()?, death.as_f64()?),
        _ => None,
    }
}

fn as_object<'v>(value: &'v Value, path: &Path, what: &str) -> Result<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| TdaError::parse(path, format!("{what}: expected an object")))
}

/// Loads barcode runs for several training-set sizes
#[derive(Debug, Clone, Default)]
pub struct BarcodeLoader<S = FsSource> {
    source: S,
    strict_layers: bool,
}

impl<S: BarcodeSource> BarcodeLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            strict_layers: false,
        }
    }

    /// Reject runs in which a layer is missing from some epoch
    pub fn strict_layers(mut self, strict: bool) -> Self {
        self.strict_layers = strict;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read `{base_path}_DataAmount{amount}/...` for each amount, in order.
    ///
    /// The first missing or malformed file aborts the whole load.
    pub fn load(&self, amounts: &[u64], base_path: &str) -> Result<DataAmountIndex> {
        let mut index = DataAmountIndex::new();

        for &amount in amounts {
            let path = barcode_path(base_path, amount);
            let collection = read_with(&self.source, &path)?;

            if self.strict_layers {
                collection.ensure_uniform()?;
            } else if collection.is_ragged() {
                warn!(amount, path = %path.display(), "some layers are missing epochs");
            }

            index.insert(amount, collection);
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;

    const TWO_EPOCHS: &str =
        r#"{"0": {"L1": {"H0": [[0,1],[0,2]]}}, "1": {"L1": {"H0": [[0,3],[0,1]]}}}"#;

    /// In-memory source that records every path it is asked for
    #[derive(Default)]
    struct MemorySource {
        files: HashMap<PathBuf, String>,
        reads: RefCell<Vec<PathBuf>>,
    }

    impl MemorySource {
        fn with(mut self, path: PathBuf, text: &str) -> Self {
            self.files.insert(path, text.to_string());
            self
        }
    }

    impl BarcodeSource for MemorySource {
        fn read_document(&self, path: &Path) -> Result<String> {
            self.reads.borrow_mut().push(path.to_path_buf());
            self.files.get(path).cloned().ok_or_else(|| TdaError::NotFound {
                path: path.to_path_buf(),
            })
        }
    }

    #[test]
    fn test_read_single_layer_two_epochs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barcode_data.json");
        fs::write(&path, TWO_EPOCHS).unwrap();

        let collection = read_barcode_data(&path).unwrap();
        assert_eq!(collection.len(), 1);
        let layer = collection.get(0).unwrap();
        assert_eq!(layer.name(), "L1");
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.last().unwrap().lifetimes("H0").unwrap(), vec![3.0, 1.0]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_barcode_data(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TdaError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_barcode_document("{\"0\": [", Path::new("x.json")).unwrap_err();
        assert!(matches!(err, TdaError::Parse { .. }));
    }

    #[test]
    fn test_wrong_shapes_are_parse_errors() {
        let bad = [
            r#"[1, 2]"#,
            r#"{"0": [1]}"#,
            r#"{"0": {"L1": {"H0": [[0, 1, 2]]}}}"#,
            r#"{"0": {"L1": {"H0": [["a", 1]]}}}"#,
            r#"{"0": {"L1": {"H0": [[2, 1]]}}}"#,
            r#"{"0": {"L1": {"H0": [[0, 1]], "H1": [[0]]}}}"#,
        ];
        for doc in bad {
            let res = parse_barcode_document(doc, Path::new("x.json"));
            assert!(matches!(res, Err(TdaError::Parse { .. })), "accepted {doc}");
        }
    }

    #[test]
    fn test_metadata_keys_next_to_barcodes_are_skipped() {
        let doc = r#"{"0": {"L1": {"H0": [[0,1],[0,2]], "n_points": 128, "model": {"id": 7}}}}"#;
        let c = parse_barcode_document(doc, Path::new("x.json")).unwrap();
        let set = c.get(0).unwrap().last().unwrap();

        assert_eq!(set.lifetimes("H0").unwrap(), vec![1.0, 2.0]);
        assert!(set.dim("n_points").is_none());
        assert_eq!(set.dimensions().count(), 1);
    }

    #[test]
    fn test_layers_sorted_and_epochs_in_document_order() {
        let doc = r#"{
            "2":  {"b": {"H0": [[0, 2]]}, "a": {"H0": [[0, 20]]}},
            "10": {"b": {"H0": [[0, 10]]}, "a": {"H0": [[0, 100]]}}
        }"#;
        let c = parse_barcode_document(doc, Path::new("x.json")).unwrap();
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(c.epoch_keys(), &["2".to_string(), "10".to_string()]);

        let b = c.by_name("b").unwrap();
        assert_eq!(b.epoch_keys().collect::<Vec<_>>(), vec!["2", "10"]);
        assert_eq!(b.last().unwrap().total_persistence("H0"), 10.0);
    }

    #[test]
    fn test_ragged_layers_preserved() {
        let doc = r#"{"0": {"a": {"H0": [[0, 1]]}, "b": {"H0": [[0, 1]]}},
                      "1": {"a": {"H0": [[0, 2]]}}}"#;
        let c = parse_barcode_document(doc, Path::new("x.json")).unwrap();
        assert!(c.is_ragged());
        assert_eq!(c.by_name("a").unwrap().len(), 2);
        assert_eq!(c.by_name("b").unwrap().len(), 1);
    }

    #[test]
    fn test_loader_reads_paths_in_order() {
        let source = MemorySource::default()
            .with(barcode_path("run", 1000), TWO_EPOCHS)
            .with(barcode_path("run", 2000), TWO_EPOCHS);
        let loader = BarcodeLoader::new(source);

        let index = loader.load(&[1000, 2000], "run").unwrap();
        assert_eq!(index.amounts(), vec![1000, 2000]);
        assert_eq!(
            *loader.source().reads.borrow(),
            vec![
                PathBuf::from("run_DataAmount1000/barcodes/barcode_data.json"),
                PathBuf::from("run_DataAmount2000/barcodes/barcode_data.json"),
            ]
        );
    }

    #[test]
    fn test_loader_fails_whole_load_on_missing_file() {
        let source = MemorySource::default().with(barcode_path("run", 1000), TWO_EPOCHS);
        let loader = BarcodeLoader::new(source);

        let err = loader.load(&[1000, 2000], "run").unwrap_err();
        match err {
            TdaError::NotFound { path } => {
                assert_eq!(path, barcode_path("run", 2000));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(loader.source().reads.borrow().len(), 2);
    }

    #[test]
    fn test_strict_loader_rejects_ragged_run() {
        let doc = r#"{"0": {"a": {"H0": [[0, 1]]}, "b": {"H0": [[0, 1]]}},
                      "1": {"a": {"H0": [[0, 2]]}}}"#;
        let source = MemorySource::default().with(barcode_path("run", 5), doc);

        let lenient = BarcodeLoader::new(source).strict_layers(false);
        assert!(lenient.load(&[5], "run").is_ok());

        let source = MemorySource::default().with(barcode_path("run", 5), doc);
        let strict = BarcodeLoader::new(source).strict_layers(true);
        assert!(matches!(
            strict.load(&[5], "run"),
            Err(TdaError::RaggedLayers { .. })
        ));
    }

    #[test]
    fn test_load_from_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("mnist");
        let base = base.to_str().unwrap();
        for amount in [1000u64, 2000] {
            let path = barcode_path(base, amount);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, TWO_EPOCHS).unwrap();
        }

        let index = load_barcode_data(&[1000, 2000], base).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(2000).unwrap().len(), 1);
    }
}
