//! Experiment driver.
//!
//! Loads the dataset once, then for each table size builds a fresh table,
//! inserts every record in source order, snapshots table statistics, runs
//! every query in order and writes one report artifact.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::{ConfigError, ExperimentSettings};
use crate::dataset::{self, LoadError};
use crate::index::{ChainedHashTable, SearchOutcome};
use crate::record::Record;
use crate::stats::{QueryStatsCollector, RunReport, StatsReporter, CSV_HEADER};
use crate::status::IndexError;

/// Errors returned by the experiment driver.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// Table construction failed.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// Dataset loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A report artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Rendering a report into memory failed.
    #[error("failed to render report: {0}")]
    Render(#[source] io::Error),
}

/// Result of one run: statistics plus the rendered artifact.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Statistics for this table size.
    pub report: RunReport,
    /// Rendered report, ready to be written.
    pub rendered: String,
}

/// Run the experiment for one table size.
///
/// The table is fully populated before the first query runs.
pub fn run_experiment(
    table_size: u64,
    records: &[Record],
    queries: &[u64],
    reporter: &StatsReporter,
) -> Result<RunOutput, ExperimentError> {
    let mut table = ChainedHashTable::new(table_size)?;
    table.insert_all(records.iter().cloned());
    let table_stats = table.compute_stats();

    let table = &table;
    let mut collector = QueryStatsCollector::new();
    let lookups: Vec<SearchOutcome<'_>> = queries
        .iter()
        .map(|&id| {
            let outcome = table.search(id);
            collector.record(&outcome);
            outcome
        })
        .collect();

    let report = RunReport {
        table_size,
        table: table_stats,
        queries: collector.snapshot(),
    };
    let rendered = reporter
        .render(&report, &lookups)
        .map_err(ExperimentError::Render)?;

    if report.queries.total_queries == 0 {
        tracing::warn!(table_size, "no queries supplied");
    }
    if tracing::enabled!(tracing::Level::INFO) {
        tracing::info!(
            table_size,
            used_slots = report.table.used_slots,
            occupancy = report.table.occupancy_rate,
            max_chain = report.table.max_chain_length,
            hits = report.queries.total_hits,
            queries = report.queries.total_queries,
            avg_probes = report.queries.avg_probes,
            "experiment run complete"
        );
    }

    Ok(RunOutput { report, rendered })
}

/// A configured experiment over several table sizes.
#[derive(Debug, Clone)]
pub struct Experiment {
    settings: ExperimentSettings,
}

impl Experiment {
    /// Create an experiment from resolved settings
    pub fn new(settings: ExperimentSettings) -> Self {
        Self { settings }
    }

    /// Settings in use
    pub fn settings(&self) -> &ExperimentSettings {
        &self.settings
    }

    fn reporter(&self) -> StatsReporter {
        StatsReporter::new(self.settings.format).with_detailed(self.settings.detailed)
    }

    /// Validate settings, load inputs, run every table size, write every
    /// artifact.
    ///
    /// Reports are returned in table-size order.
    pub fn run(&self) -> Result<Vec<RunReport>, ExperimentError> {
        self.settings.validate()?;
        let records =
            dataset::load_records_from_path(&self.settings.records_path, &self.settings.columns)?;
        let queries = dataset::load_queries_from_path(&self.settings.queries_path)?;
        log_duplicates(&records);
        self.run_with(&records, &queries)
    }

    /// Run every table size over in-memory inputs and write the artifacts.
    pub fn run_with(
        &self,
        records: &[Record],
        queries: &[u64],
    ) -> Result<Vec<RunReport>, ExperimentError> {
        self.settings.validate()?;
        let reporter = self.reporter();
        let run_one = |&table_size: &u64| -> Result<RunReport, ExperimentError> {
            let output = run_experiment(table_size, records, queries, &reporter)?;
            let path = self.settings.output_path(table_size);
            write_artifact(&path, output.rendered.as_bytes())?;
            tracing::debug!(table_size, path = %path.display(), "report written");
            Ok(output.report)
        };

        let reports = if self.settings.parallel {
            self.settings
                .table_sizes
                .par_iter()
                .map(run_one)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.settings
                .table_sizes
                .iter()
                .map(run_one)
                .collect::<Result<Vec<_>, _>>()?
        };

        if let Some(path) = &self.settings.summary_path {
            write_summary(path, &reports)?;
        }
        Ok(reports)
    }
}

/// Write a CSV summary with one row per run.
pub fn write_summary(path: &Path, reports: &[RunReport]) -> Result<(), ExperimentError> {
    let wrap = |source: io::Error| ExperimentError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{CSV_HEADER}").map_err(wrap)?;
    for report in reports {
        StatsReporter::write_csv_row(&mut out, report).map_err(wrap)?;
    }
    out.flush().map_err(wrap)
}

fn write_artifact(path: &Path, contents: &[u8]) -> Result<(), ExperimentError> {
    let wrap = |source: io::Error| ExperimentError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, contents).map_err(wrap)
}

fn log_duplicates(records: &[Record]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let mut ids: Vec<u64> = records.iter().map(Record::id).collect();
    ids.sort_unstable();
    let duplicates = ids.windows(2).filter(|w| w[0] == w[1]).count();
    if duplicates > 0 {
        tracing::debug!(duplicates, "duplicate ids kept as separate chain entries");
    }
}
