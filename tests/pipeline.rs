//! End-to-end: barcode files on disk → metrics → charts → metrics log.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use tda_layer_metrics::{
    barcode_path, load_barcode_data, AnalysisConfig, ChartRenderer, EntropyMode, Metric,
    MetricCalculator, MetricsLogger, ModelMetricsRecord, RecordingSink, TdaError,
};

/// Three epochs, two layers; layer_2's bars grow with the data amount.
fn write_run(base: &str, amount: u64) {
    let scale = amount as f64 / 1000.0;
    let doc = format!(
        r#"{{
            "0": {{"layer_1": {{"H0": [[0, 1], [0, 1]]}}, "layer_2": {{"H0": [[0, 1], [0, 2]]}}}},
            "1": {{"layer_1": {{"H0": [[0, 1], [0, 2]]}}, "layer_2": {{"H0": [[0, 2], [0, 2]]}}}},
            "2": {{"layer_1": {{"H0": [[0, 2], [0, 2]]}}, "layer_2": {{"H0": [[0, {a}], [0, {b}]]}}}}
        }}"#,
        a = scale,
        b = 3.0 * scale,
    );
    let path = barcode_path(base, amount);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, doc).unwrap();
}

fn base_in(dir: &Path) -> String {
    dir.join("mlp").to_str().unwrap().to_string()
}

#[test]
fn pipeline_produces_metrics_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path());
    for amount in [1000, 2000] {
        write_run(&base, amount);
    }

    let index = load_barcode_data(&[1000, 2000], &base).unwrap();
    let calc = MetricCalculator::new();

    let ml = calc.across_amounts(&index, 1, Metric::MeanLifetime).unwrap();
    // (1 + 3) * scale over 3 epochs
    assert_relative_eq!(ml.get(&1000).unwrap(), 4.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(ml.get(&2000).unwrap(), 8.0 / 3.0, epsilon = 1e-12);

    // Bars scale together, so p = [0.25, 0.75] for every amount
    let h = calc.across_amounts(&index, 1, Metric::PersistentEntropy).unwrap();
    let expected = -(0.75f64 * 0.75f64.log2());
    for v in h.values() {
        assert_relative_eq!(v, expected, epsilon = 1e-12);
    }

    let layer = index.get(1000).unwrap().get(0).unwrap();
    let per_epoch = calc.mean_lifetime_per_epoch(layer.iter()).unwrap();
    assert_eq!(per_epoch.values(), vec![2.0 / 3.0, 1.0, 4.0 / 3.0]);

    let mut renderer = ChartRenderer::new(RecordingSink::new());
    for metric in Metric::ALL {
        let layers = calc.per_layer_across_amounts(&index, metric).unwrap();
        for (name, series) in &layers {
            renderer.plot_metric_for_layer(series, name, metric.label()).unwrap();
        }
        let series: Vec<_> = layers.into_iter().map(|(_, s)| s).collect();
        renderer.plot_layers_grid(&series, metric.label()).unwrap();
        renderer.plot_layer_snapshot(&series, 0, metric.label()).unwrap();
    }
    // 3 metrics × (2 single + grid + snapshot)
    assert_eq!(renderer.sink().figures.len(), 12);
}

#[test]
fn second_missing_run_fails_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path());
    write_run(&base, 1000);

    match load_barcode_data(&[1000, 2000], &base) {
        Err(TdaError::NotFound { path }) => assert_eq!(path, barcode_path(&base, 2000)),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn config_drives_loader_and_calculator() {
    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path());
    write_run(&base, 500);

    let cfg = AnalysisConfig {
        base_path: base.clone(),
        amounts: vec![500],
        entropy_mode: EntropyMode::Shannon,
        strict_layers: true,
        ..AnalysisConfig::default()
    };
    cfg.validate().unwrap();

    let index = cfg.loader().load(&cfg.amounts, &cfg.base_path).unwrap();
    let layer = index.get(500).unwrap().get(0).unwrap();
    // layer_1 final epoch: two equal bars, Shannon gives exactly 1 bit
    assert_relative_eq!(cfg.calculator().persistent_entropy(layer).unwrap(), 1.0);
}

#[test]
fn metrics_log_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let logger = MetricsLogger::new(dir.path().join("metrics.json"));
    let a = ModelMetricsRecord::new(0.91, 0.9, 0.89, 0.895);
    let b = ModelMetricsRecord::new(0.85, 0.84, 0.8, 0.82);

    logger.append("A", &a).unwrap();
    logger.append("B", &b).unwrap();

    assert_eq!(
        logger.read_all().unwrap(),
        vec![("A".to_string(), a), ("B".to_string(), b)]
    );
}
