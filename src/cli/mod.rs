//! Command-line interface
//!
//! `curve` computes learning curves from flags, `run` from an experiment file and
//! `info` summarises a data file.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{ExperimentConfig, OutputPaths};
use crate::curve::{baseline_error, LearningCurve, LearningCurveConfig, LearningCurveRunner, TrainSizes, Verdict};
use crate::data::{DataLoader, Dataset};
use crate::plot::PlotConfig;
use crate::training::{Estimator, EstimatorConfig, ErrorMetric};
use crate::utils::ParallelConfig;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-curves")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Learning curves for regression models")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute learning curves for one or more models
    Curve {
        /// Input data file (CSV, TSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Feature columns, comma separated (default: every other column)
        #[arg(short, long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Model: linear, ridge[:alpha], poly:<degree>, tree[:depth], forest[:n_trees]. Repeatable.
        #[arg(short, long = "model", default_value = "linear")]
        models: Vec<String>,

        /// Training sizes as record counts, comma separated
        #[arg(long, value_delimiter = ',', conflicts_with = "fractions")]
        sizes: Option<Vec<usize>>,

        /// Training sizes as fractions of the smallest training pool, comma separated
        #[arg(long, value_delimiter = ',')]
        fractions: Option<Vec<f64>>,

        /// Number of cross-validation folds
        #[arg(short = 'k', long, default_value = "5")]
        folds: usize,

        /// Shuffle records before cutting folds
        #[arg(long)]
        shuffle: bool,

        /// Seed for shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Error metric (mse, rmse, mae)
        #[arg(long, default_value = "mse")]
        metric: String,

        /// Worker threads (1 = sequential)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Write an SVG chart
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Write a CSV table
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write a JSON report
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Run an experiment file
    Run {
        /// Experiment file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Target column, to report its variance
        #[arg(short, long)]
        target: Option<String>,
    },
}

/// Flags of the `curve` command
pub struct CurveArgs {
    pub data: PathBuf,
    pub target: String,
    pub features: Option<Vec<String>>,
    pub models: Vec<String>,
    pub sizes: Option<Vec<usize>>,
    pub fractions: Option<Vec<f64>>,
    pub folds: usize,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub metric: String,
    pub jobs: Option<usize>,
    pub title: Option<String>,
    pub outputs: OutputPaths,
}

impl CurveArgs {
    /// Turn flags into an experiment, parsing model and metric names
    pub fn into_experiment(self) -> anyhow::Result<ExperimentConfig> {
        let estimators = self
            .models
            .iter()
            .map(|m| m.parse::<EstimatorConfig>())
            .collect::<Result<Vec<_>, _>>()?;

        let train_sizes = match (self.sizes, self.fractions) {
            (Some(sizes), _) => TrainSizes::Absolute(sizes),
            (None, Some(fractions)) => TrainSizes::Relative(fractions),
            (None, None) => TrainSizes::default(),
        };

        let mut curve = LearningCurveConfig::new(train_sizes)
            .with_folds(self.folds)
            .with_shuffle(self.shuffle)
            .with_metric(self.metric.parse::<ErrorMetric>()?)
            .with_parallel(ParallelConfig { n_jobs: self.jobs });
        if let Some(seed) = self.seed {
            curve = curve.with_random_state(seed);
        }

        let experiment = ExperimentConfig {
            data: self.data,
            target: self.target,
            features: self.features,
            estimators,
            curve,
            plot: PlotConfig {
                title: self.title,
                ..PlotConfig::default()
            },
            outputs: self.outputs,
            diagnosis: Default::default(),
        };
        experiment.validate()?;
        Ok(experiment)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_curve(args: CurveArgs) -> anyhow::Result<()> {
    let experiment = args.into_experiment()?;
    run_experiment(&experiment)?;
    Ok(())
}

pub fn cmd_run(config_path: &Path) -> anyhow::Result<()> {
    let experiment = ExperimentConfig::from_file(config_path)?;
    run_experiment(&experiment)?;
    Ok(())
}

/// Compute, report and write the curves of an experiment
pub fn run_experiment(experiment: &ExperimentConfig) -> anyhow::Result<Vec<LearningCurve>> {
    let curve_config = &experiment.curve;

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Learning Curves".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Data   ", &experiment.data.display().to_string()));
    line_box(&kv("Target ", &experiment.target));
    line_box(&kv(
        "Folds  ",
        &format!(
            "{} ({})",
            curve_config.n_folds,
            if curve_config.shuffle { "shuffled" } else { "contiguous" }
        ),
    ));
    line_box(&kv("Metric ", &curve_config.metric.to_string()));
    line_box(&kv("Threads", &curve_config.parallel.num_threads().to_string()));
    line_box(&kv("Models ", &experiment.estimators.len().to_string()));
    line_box_empty();
    line_box_bottom();

    section("Data");
    step_run("Loading data");
    let start = Instant::now();
    let dataset = experiment.load_dataset()?;
    step_done(&format!(
        "{} rows × {} features in {:?}",
        dataset.len(),
        dataset.n_features(),
        start.elapsed()
    ));

    section("Curves");
    let runner = LearningCurveRunner::new(curve_config.clone()).with_pinned_shuffle();
    let mut curves = Vec::with_capacity(experiment.estimators.len());
    for estimator in &experiment.estimators {
        step_run(&format!("Fitting {}", estimator.name().cyan()));
        let start = Instant::now();
        let curve = runner.run(estimator, &dataset)?;
        step_done(&format!("{} fits in {:?}", curve.len() * curve.n_folds(), start.elapsed()));
        curves.push(curve);
    }

    let baseline = baseline_error(dataset.targets(), curve_config.metric)?;
    for curve in &curves {
        print_curve(curve, baseline, experiment);
    }

    let sinks = experiment.outputs.sinks();
    if !sinks.is_empty() {
        section("Output");
        for sink in sinks {
            sink.emit(&curves, &experiment.plot)?;
        }
        for path in [&experiment.outputs.svg, &experiment.outputs.csv, &experiment.outputs.json]
            .into_iter()
            .flatten()
        {
            step_ok(&format!("Wrote {}", path.display()));
        }
    }

    println!();
    Ok(curves)
}

fn print_curve(curve: &LearningCurve, baseline: f64, experiment: &ExperimentConfig) {
    section(&curve.estimator);

    println!(
        "  {:>10}  {:>14}  {:>14}  {:>10}",
        muted("Size"),
        muted("Train"),
        muted("Validation"),
        muted("± Val")
    );
    println!("  {}", dim(&"─".repeat(54)));

    let val_std = curve.validation_std();
    for i in 0..curve.len() {
        println!(
            "  {:>10}  {:>14.4}  {:>14.4}  {:>10.4}",
            curve.train_sizes[i],
            curve.train_errors[i],
            curve.validation_errors[i],
            val_std[i]
        );
    }

    if let Some(diagnosis) = curve.diagnose(baseline, &experiment.diagnosis) {
        let verdict = diagnosis.verdict.to_string();
        let verdict = match diagnosis.verdict {
            Verdict::Balanced => ok(&verdict),
            _ => verdict.yellow(),
        };
        println!();
        println!("  {:<12} {:.4}", muted("Baseline"), diagnosis.baseline_error);
        println!("  {:<12} {:.4}", muted("Final gap"), diagnosis.gap);
        println!("  {:<12} {}", muted("Verdict"), verdict);
    }
}

pub fn cmd_info(data_path: &Path, target: Option<&str>) -> anyhow::Result<()> {
    section("Data Info");

    let df = DataLoader::new().load_auto(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!("  {:<12} {:.2} MB", muted("Memory"), df.estimated_size() as f64 / 1024.0 / 1024.0);
    println!();

    println!("  {:<20} {:<12} {:>6} {:>8}", muted("Column"), muted("Type"), muted("Nulls"), muted("Unique"));
    println!("  {}", dim(&"─".repeat(50)));

    for col in df.get_columns() {
        println!(
            "  {:<20} {:<12} {:>6} {:>8}",
            col.name().as_str(),
            format!("{:?}", col.dtype()).truecolor(140, 140, 140),
            col.null_count(),
            col.n_unique().unwrap_or(0)
        );
    }

    if let Some(target) = target {
        let dataset = Dataset::from_dataframe(&df, target, None)?;
        println!();
        println!("  {:<20} {}", muted("Features"), dataset.n_features());
        if let Some(variance) = dataset.target_variance() {
            println!("  {:<20} {:.4}", muted("Target variance"), variance);
        }
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CurveArgs {
        CurveArgs {
            data: PathBuf::from("data.csv"),
            target: "y".to_string(),
            features: None,
            models: vec!["linear".to_string(), "forest:10".to_string()],
            sizes: Some(vec![1, 5, 8]),
            fractions: None,
            folds: 5,
            shuffle: false,
            seed: None,
            metric: "mae".to_string(),
            jobs: Some(1),
            title: None,
            outputs: OutputPaths::default(),
        }
    }

    #[test]
    fn test_args_into_experiment() {
        let experiment = args().into_experiment().unwrap();
        assert_eq!(experiment.estimators.len(), 2);
        assert_eq!(experiment.curve.train_sizes, TrainSizes::Absolute(vec![1, 5, 8]));
        assert_eq!(experiment.curve.metric, ErrorMetric::MeanAbsoluteError);
        assert_eq!(experiment.curve.parallel, ParallelConfig::sequential());
    }

    #[test]
    fn test_bad_model_name() {
        let mut a = args();
        a.models = vec!["svm".to_string()];
        assert!(a.into_experiment().is_err());
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[1mbold\x1b[0m"), "bold");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "kolosal-curves", "curve", "-d", "x.csv", "-t", "y", "-m", "linear", "-m", "tree:3",
            "--sizes", "1,5,8", "-k", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Curve { models, sizes, folds, .. } => {
                assert_eq!(models, vec!["linear", "tree:3"]);
                assert_eq!(sizes, Some(vec![1, 5, 8]));
                assert_eq!(folds, 5);
            }
            _ => panic!("expected curve command"),
        }
    }
}
