// Hash table experiment runner - builds one chained table per size and
// writes a statistics report for each.
//
// Usage:
//   cargo run --bin chainstat -- --records players.csv --queries consultas-fifa.txt \
//       --sizes 1000,2000,4000,8000 --out-dir results

use std::path::PathBuf;
use std::process::ExitCode;

use chainstat::config::ChainstatConfig;
use chainstat::experiment::{Experiment, ExperimentError};
use chainstat::stats::ReportFormat;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chainstat")]
#[command(about = "Chained hash table load and probe-cost experiment", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to $CHAINSTAT_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV file with the records
    #[arg(long, value_name = "FILE")]
    records: Option<PathBuf>,

    /// File with one query key per line
    #[arg(long, value_name = "FILE")]
    queries: Option<PathBuf>,

    /// Comma-separated table sizes
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u64>>,

    /// Directory receiving the reports
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Report layout: reference, text, json or csv
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Omit per-query lines from the reports
    #[arg(long)]
    summary_only: bool,

    /// Write a CSV row per table size to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Run table sizes on worker threads
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<ChainstatConfig, ExperimentError> {
    let mut config = match &args.config {
        Some(path) => ChainstatConfig::load_from_path(path)?,
        None => ChainstatConfig::load_from_env()?,
    };
    if args.config.is_some() {
        config.apply_env_overrides()?;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), ExperimentError> {
    let mut settings = load_config(&args)?.to_settings()?;

    if let Some(records) = args.records {
        settings.records_path = records;
    }
    if let Some(queries) = args.queries {
        settings.queries_path = queries;
    }
    if let Some(sizes) = args.sizes {
        settings.table_sizes = sizes;
    }
    if let Some(dir) = args.out_dir {
        settings.output_dir = dir;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(summary) = args.summary {
        settings.summary_path = Some(summary);
    }
    settings.detailed &= !args.summary_only;
    settings.parallel |= args.parallel;

    let experiment = Experiment::new(settings);
    let reports = experiment.run()?;

    for report in &reports {
        let path = experiment.settings().output_path(report.table_size);
        println!(
            "M={:<8} used={:<8} occupancy={:.2} max_chain={:<4} hits={}/{} avg_probes={:.2} -> {}",
            report.table_size,
            report.table.used_slots,
            report.table.occupancy_rate,
            report.table.max_chain_length,
            report.queries.total_hits,
            report.queries.total_queries,
            report.queries.avg_probes,
            path.display(),
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "experiment failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
