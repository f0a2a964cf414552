mod config;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod stats;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::config::{CliParams, ConfigError, build_params, load_params_file, parse_override};
use crate::input::{InputError, InputPaths, load_input};
use crate::model::params::MixBoundary;
use crate::pipeline::ClassifyError;
use crate::pipeline::stage3_groups::classify_spots;
use crate::pipeline::stage4_report::{Stage4Input, write_reports};

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error("failed to write reports: {0}")]
    Report(#[from] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(
    name = "kira-spotenrich",
    version,
    about = "Cell-type enrichment calling for spatial transcriptomics spots"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify every spot of a count table as enriched, Mix or Unknown.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Spot x cell-type count table (TSV, or CSV by extension; .gz accepted).
    #[arg(long)]
    input: PathBuf,
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
    /// Per-spot metadata with a barcode column, used to supply the sample column.
    #[arg(long)]
    meta: Option<PathBuf>,
    /// Compute thresholds independently within each value of this column.
    #[arg(long)]
    sample_column: Option<String>,
    /// Fraction of spots per cell type counted as high [default: 0.05].
    #[arg(long)]
    top_fraction: Option<f64>,
    /// Per-cell-type top fraction, CELLTYPE=VALUE; repeatable.
    #[arg(long = "top-fraction-for", value_parser = parse_override)]
    top_fraction_for: Vec<(String, f64)>,
    /// Minimum leader/runner-up ratio for enrichment [default: 1.1].
    #[arg(long)]
    ratio_threshold: Option<f64>,
    /// Per-cell-type ratio threshold, CELLTYPE=VALUE; repeatable.
    #[arg(long = "ratio-for", value_parser = parse_override)]
    ratio_for: Vec<(String, f64)>,
    /// Ratio bound used by the Mix test.
    #[arg(long, value_enum)]
    mix_boundary: Option<MixBoundaryArg>,
    /// JSON parameter file; command-line values take precedence.
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MixBoundaryArg {
    Default,
    Effective,
}

impl From<MixBoundaryArg> for MixBoundary {
    fn from(value: MixBoundaryArg) -> Self {
        match value {
            MixBoundaryArg::Default => MixBoundary::DefaultRatio,
            MixBoundaryArg::Effective => MixBoundary::EffectiveRatio,
        }
    }
}

impl RunArgs {
    fn cli_params(&self) -> CliParams {
        CliParams {
            top_fraction: self.top_fraction,
            top_fraction_overrides: self.top_fraction_for.clone(),
            ratio_threshold: self.ratio_threshold,
            ratio_overrides: self.ratio_for.clone(),
            sample_column: self.sample_column.clone(),
            mix_boundary: self.mix_boundary.map(MixBoundary::from),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;
    logging::init_logging(args.verbose);

    if let Err(err) = run(&args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), RunError> {
    let file = args.params.as_deref().map(load_params_file).transpose()?;
    let params = build_params(file, &args.cli_params());
    params.validate().map_err(ClassifyError::from)?;

    let paths = InputPaths {
        table: args.input.clone(),
        meta: args.meta.clone(),
    };
    let table = load_input(&paths, params.sample_column.as_deref())?;

    let calls = classify_spots(&table, &params)?;
    match &params.sample_column {
        Some(name) => tracing::info!(
            "classified {} spots across {} groups of '{}'",
            calls.n_spots(),
            calls.scopes.len(),
            name
        ),
        None => tracing::info!("classified {} spots", calls.n_spots()),
    }

    let summary = write_reports(
        &Stage4Input {
            calls: &calls,
            params: &params,
            input_path: args.input.display().to_string(),
        },
        &args.out,
    )?;
    for stat in summary.labels.iter().filter(|s| s.count > 0) {
        tracing::info!("{}: {} spots", stat.label, stat.count);
    }

    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
