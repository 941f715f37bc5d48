//! Barcode Metrics: Layer-wise Topology across Training-set Sizes
//!
//! Loads the barcode files of a sweep of training runs, prints mean
//! lifetime and persistent entropy per layer and data amount, and
//! optionally writes the comparison charts as SVG.
//!
//! ## Commands
//!
//! - `analyze`: metrics of the final epoch for every layer and data amount
//! - `epochs`: per-epoch series of one run
//! - `log-metrics`: append a model's evaluation scores to the JSON log

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use tda_layer_metrics::{
    barcode_path, read_barcode_data, AnalysisConfig, ChartRenderer, ChartSink, DataAmountIndex,
    EntropyMode, HeadlessSink, LayerCollection, Metric, MetricCalculator, MetricsLogger,
    ModelMetricsRecord, SvgSink,
};

#[derive(Parser, Debug)]
#[command(
    name = "barcode_metrics",
    version,
    about = "Persistence-barcode metrics of hidden layers across epochs and data amounts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Final-epoch metrics for every layer under every data amount
    Analyze(AnalyzeArgs),

    /// Per-epoch metrics of one run
    Epochs(EpochsArgs),

    /// Append model evaluation scores to a JSON log
    LogMetrics(LogMetricsArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    LastTerm,
    Shannon,
}

impl From<ModeArg> for EntropyMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::LastTerm => EntropyMode::LastTerm,
            ModeArg::Shannon => EntropyMode::Shannon,
        }
    }
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// JSON analysis config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run prefix; files are read from {base_path}_DataAmount{amount}/barcodes/
    #[arg(long)]
    base_path: Option<String>,

    /// Comma-separated training-set sizes
    #[arg(long, value_delimiter = ',')]
    amounts: Option<Vec<u64>>,

    /// Homology dimension label
    #[arg(long)]
    dimension: Option<String>,

    #[arg(long, value_enum)]
    entropy_mode: Option<ModeArg>,

    /// Fail when a layer is missing from some epoch
    #[arg(long)]
    strict_layers: bool,

    /// Write SVG charts into this directory
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Print the metric tables as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl AnalyzeArgs {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut cfg = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)
                .with_context(|| format!("cannot load config '{}'", path.display()))?,
            None => AnalysisConfig::default(),
        };
        if let Some(base_path) = self.base_path {
            cfg.base_path = base_path;
        }
        if let Some(amounts) = self.amounts {
            cfg.amounts = amounts;
        }
        if let Some(dimension) = self.dimension {
            cfg.dimension = dimension;
        }
        if let Some(mode) = self.entropy_mode {
            cfg.entropy_mode = mode.into();
        }
        if self.strict_layers {
            cfg.strict_layers = true;
        }
        if self.plot_dir.is_some() {
            cfg.plot_dir = self.plot_dir;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
struct EpochsArgs {
    #[arg(long)]
    base_path: String,

    /// Training-set size of the run
    #[arg(long)]
    amount: u64,

    /// Only the layer with this key, e.g. `layer_2` (all layers when omitted)
    #[arg(long)]
    layer: Option<String>,

    #[arg(long, default_value = "H0")]
    dimension: String,

    #[arg(long, value_enum, default_value = "last-term")]
    entropy_mode: ModeArg,
}

#[derive(Args, Debug)]
struct LogMetricsArgs {
    /// JSON log file; defaults to the config's `metrics_log`
    #[arg(long)]
    file: Option<PathBuf>,

    /// JSON analysis config supplying the log location
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    model: String,

    #[arg(long)]
    accuracy: f64,

    #[arg(long)]
    precision: f64,

    #[arg(long)]
    recall: f64,

    #[arg(long)]
    f1_score: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tda_layer_metrics=info".parse()?)
                .add_directive("barcode_metrics=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Epochs(args) => run_epochs(args),
        Commands::LogMetrics(args) => run_log_metrics(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let as_json = args.json;
    let cfg = args.into_config()?;

    info!(base_path = %cfg.base_path, amounts = ?cfg.amounts, "loading barcode runs");
    let index = cfg
        .loader()
        .load(&cfg.amounts, &cfg.base_path)
        .with_context(|| format!("cannot load barcode runs for '{}'", cfg.base_path))?;
    let calc = cfg.calculator();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&metrics_json(&calc, &index))?);
    } else {
        print_tables(&calc, &index);
    }

    match &cfg.plot_dir {
        Some(dir) => {
            let mut renderer = ChartRenderer::new(SvgSink::new(dir));
            render_all(&mut renderer, &calc, &index)?;
            let sink = renderer.into_sink();
            info!(files = sink.written().len(), dir = %dir.display(), "charts written");
        }
        None => render_all(&mut ChartRenderer::new(HeadlessSink), &calc, &index)?,
    }

    Ok(())
}

fn cell(
    calc: &MetricCalculator,
    metric: Metric,
    layers: &LayerCollection,
    layer: usize,
) -> String {
    match layers.get(layer).map(|l| calc.evaluate(metric, l)) {
        Some(Ok(v)) => format!("{v:>12.6}"),
        Some(Err(e)) => {
            warn!(metric = metric.label(), layer, error = %e, "metric undefined");
            format!("{:>12}", "n/a")
        }
        None => format!("{:>12}", "-"),
    }
}

fn print_tables(calc: &MetricCalculator, index: &DataAmountIndex) {
    println!("═══════════════════════════════════════════════════════════════");
    println!(
        "  Barcode metrics, dimension {}, {:?} entropy",
        calc.dimension(),
        calc.entropy_mode()
    );
    println!("═══════════════════════════════════════════════════════════════");

    let n_layers = index.iter().map(|(_, c)| c.len()).max().unwrap_or(0);

    for metric in Metric::ALL {
        println!("\n{}", metric.label());
        println!("─────────────────────────────────────────────────────────────");

        let mut header = format!("{:>10}", "amount");
        for layer in 1..=n_layers {
            header.push_str(&format!("{:>12}", format!("Layer {layer}")));
        }
        println!("{header}");

        for (amount, layers) in index.iter() {
            let mut row = format!("{amount:>10}");
            for layer in 0..n_layers {
                row.push_str(&cell(calc, metric, layers, layer));
            }
            println!("{row}");
        }
    }
    println!();
}

fn metrics_json(calc: &MetricCalculator, index: &DataAmountIndex) -> Value {
    let mut out = Map::new();
    for metric in Metric::ALL {
        let mut per_amount = Map::new();
        for (amount, layers) in index.iter() {
            let values: Map<String, Value> = layers
                .iter()
                .map(|l| {
                    let v = calc.evaluate(metric, l).map_or(Value::Null, |v| json!(v));
                    (l.name().to_string(), v)
                })
                .collect();
            per_amount.insert(amount.to_string(), Value::Object(values));
        }
        out.insert(metric.label().to_string(), Value::Object(per_amount));
    }
    Value::Object(out)
}

fn render_all<S: ChartSink>(
    renderer: &mut ChartRenderer<S>,
    calc: &MetricCalculator,
    index: &DataAmountIndex,
) -> Result<()> {
    for metric in Metric::ALL {
        let layers = match calc.per_layer_across_amounts(index, metric) {
            Ok(layers) => layers,
            Err(e) => {
                warn!(metric = metric.label(), error = %e, "skipping charts");
                continue;
            }
        };
        if layers.is_empty() {
            continue;
        }

        for (name, series) in &layers {
            renderer.plot_metric_for_layer(series, name, metric.label())?;
        }
        let series: Vec<_> = layers.into_iter().map(|(_, s)| s).collect();
        renderer.plot_layers_grid(&series, metric.label())?;
        renderer.plot_layer_snapshot(&series, 0, metric.label())?;
    }
    Ok(())
}

fn run_epochs(args: EpochsArgs) -> Result<()> {
    let path = barcode_path(&args.base_path, args.amount);
    let layers = read_barcode_data(&path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let calc = MetricCalculator::new()
        .with_dimension(args.dimension)
        .with_entropy_mode(args.entropy_mode.into());

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Per-epoch metrics, data amount {}", args.amount);
    println!("═══════════════════════════════════════════════════════════════");

    for layer in layers.iter() {
        if args.layer.as_deref().is_some_and(|name| name != layer.name()) {
            continue;
        }

        println!("\n{} ({} epochs)", layer.name(), layer.len());
        println!("─────────────────────────────────────────────────────────────");

        let lifetime = calc.mean_lifetime_per_epoch(layer.iter())?;
        let entropy = calc.persistent_entropy_per_epoch(layer.iter());
        let normalized = calc.normalized_persistent_entropy_per_epoch(layer.iter());
        if let Err(e) = &normalized {
            warn!(layer = layer.name(), error = %e, "normalized entropy undefined");
        }

        println!("{:>6} {:>8} {:>14} {:>14} {:>14}", "pos", "epoch", "ML", "H_P", "H_norm");
        for ((pos, ml), epoch) in lifetime.iter().zip(layer.epoch_keys()) {
            let h = entropy.as_ref().ok().and_then(|s| s.get(pos));
            let hn = normalized
                .as_ref()
                .ok()
                .and_then(|s| s.get(&pos.to_string()));
            println!(
                "{:>6} {:>8} {:>14.6} {:>14} {:>14}",
                pos,
                epoch,
                ml,
                h.map_or("n/a".to_string(), |v| format!("{v:.6}")),
                hn.map_or("n/a".to_string(), |v| format!("{v:.6}")),
            );
        }
    }

    Ok(())
}

fn run_log_metrics(args: LogMetricsArgs) -> Result<()> {
    let file = match (args.file, &args.config) {
        (Some(file), _) => file,
        (None, Some(path)) => {
            AnalysisConfig::from_json_file(path)
                .with_context(|| format!("cannot load config '{}'", path.display()))?
                .metrics_log
        }
        (None, None) => AnalysisConfig::default().metrics_log,
    };
    let record = ModelMetricsRecord::new(args.accuracy, args.precision, args.recall, args.f1_score);
    let logger = MetricsLogger::new(&file);
    logger
        .append(&args.model, &record)
        .with_context(|| format!("cannot append to '{}'", file.display()))?;
    println!("Logged metrics for '{}' to {}", args.model, file.display());
    Ok(())
}
