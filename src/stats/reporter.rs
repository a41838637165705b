//! Statistics reporter
//!
//! Renders one experiment run (table statistics, per-query lines and query
//! statistics) in one of several layouts.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::index::SearchOutcome;
use crate::stats::metrics::{QueryStats, TableStats};

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Two-section layout with the reference field labels
    #[default]
    Reference,
    /// Human-readable text with English labels
    Text,
    /// JSON document
    Json,
    /// One CSV header plus one row per run
    Csv,
}

impl ReportFormat {
    /// Get the format name
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Reference => "reference",
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(ReportFormat::Reference),
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Statistics gathered for one table size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunReport {
    /// Number of buckets
    pub table_size: u64,
    /// Table statistics taken after the load phase
    pub table: TableStats,
    /// Query statistics taken after the query phase
    pub queries: QueryStats,
}

/// Header matching [`StatsReporter::write_csv_row`]
pub const CSV_HEADER: &str = "table_size,used_slots,empty_slots,occupancy_rate,\
min_chain_length,max_chain_length,avg_chain_length,total_records,\
total_queries,total_hits,total_misses,min_probes,max_probes,avg_probes,std_dev_probes";

#[derive(Serialize)]
struct JsonLookup<'a> {
    id: u64,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a str>,
    probes: u64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    run: &'a RunReport,
    lookups: Vec<JsonLookup<'a>>,
}

/// Run report writer
#[derive(Debug, Clone, Copy)]
pub struct StatsReporter {
    /// Output format
    format: ReportFormat,
    /// Whether to include one line per query
    detailed: bool,
}

impl StatsReporter {
    /// Create a new reporter with the given format
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            detailed: true,
        }
    }

    /// Create a reporter with the reference layout
    pub fn reference() -> Self {
        Self::new(ReportFormat::Reference)
    }

    /// Set whether to include per-query lines
    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    /// Configured format
    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Write a complete report for one run
    pub fn write_report<W: Write>(
        &self,
        out: &mut W,
        report: &RunReport,
        lookups: &[SearchOutcome<'_>],
    ) -> io::Result<()> {
        match self.format {
            ReportFormat::Reference => self.write_reference(out, report, lookups),
            ReportFormat::Text => self.write_text(out, report, lookups),
            ReportFormat::Json => self.write_json(out, report, lookups),
            ReportFormat::Csv => {
                writeln!(out, "{CSV_HEADER}")?;
                Self::write_csv_row(out, report)
            }
        }
    }

    /// Render a report into a string
    pub fn render(&self, report: &RunReport, lookups: &[SearchOutcome<'_>]) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_report(&mut buf, report, lookups)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_reference<W: Write>(
        &self,
        out: &mut W,
        report: &RunReport,
        lookups: &[SearchOutcome<'_>],
    ) -> io::Result<()> {
        let t = &report.table;
        writeln!(out, "PARTE1: ESTATISTICAS DA TABELA HASH")?;
        writeln!(out, "NUMERO DE ENTRADAS DA TABELA USADAS: {}", t.used_slots)?;
        writeln!(out, "NUMERO DE ENTRADAS DA TABELA VAZIAS: {}", t.empty_slots)?;
        writeln!(out, "TAXA DE OCUPAÇÃO: {:.2}", t.occupancy_rate)?;
        writeln!(out, "MINIMO TAMANHO DE LISTA: {}", t.min_chain_length)?;
        writeln!(out, "MAXIMO TAMANHO DE LISTA: {}", t.max_chain_length)?;
        writeln!(out, "MEDIO TAMANHO DE LISTA: {:.2}", t.avg_chain_length)?;
        writeln!(out)?;

        if self.detailed {
            for lookup in lookups {
                match lookup.record {
                    Some(record) => writeln!(
                        out,
                        "ID: {}, NAME: {}, POSITION: {}, TESTES:{}",
                        record.id(),
                        record.name(),
                        record.tags(),
                        lookup.probes
                    )?,
                    None => writeln!(out, "ID: {}, MISS, TESTES: {}", lookup.id, lookup.probes)?,
                }
            }
        }

        let q = &report.queries;
        writeln!(out)?;
        writeln!(out, "PARTE2: ESTATISTICAS DAS CONSULTAS")?;
        writeln!(out, "TOTAL DE CONSULTAS REALIZADAS: {}", q.total_queries)?;
        writeln!(out, "TOTAL DE CONSULTAS COM MATCH: {}", q.total_hits)?;
        writeln!(out, "MINIMO NUMERO DE TESTES POR NOME ENCONTRADO: {}", q.min_probes)?;
        writeln!(out, "MAXIMO NUMERO DE TESTES POR NOME ENCONTRADO: {}", q.max_probes)?;
        writeln!(out, "MEDIA NUMERO DE TESTES NOME ENCONTRADO: {:.2}", q.avg_probes)?;
        if let Some(std_dev) = q.std_dev_probes {
            writeln!(out, "DESVIO PADRÃO DO NUMERO DE TESTES NOME ENCONTRADO: {std_dev:.2}")?;
        }
        Ok(())
    }

    fn write_text<W: Write>(
        &self,
        out: &mut W,
        report: &RunReport,
        lookups: &[SearchOutcome<'_>],
    ) -> io::Result<()> {
        let t = &report.table;
        writeln!(out, "=== Table Statistics (M = {}) ===", report.table_size)?;
        writeln!(out, "  Used slots:    {}", t.used_slots)?;
        writeln!(out, "  Empty slots:   {}", t.empty_slots)?;
        writeln!(out, "  Occupancy:     {:.2}", t.occupancy_rate)?;
        writeln!(out, "  Min chain:     {}", t.min_chain_length)?;
        writeln!(out, "  Max chain:     {}", t.max_chain_length)?;
        writeln!(out, "  Avg chain:     {:.2}", t.avg_chain_length)?;
        writeln!(out, "  Records:       {}", t.total_records)?;
        writeln!(out, "  Load factor:   {:.2}", t.load_factor)?;
        writeln!(out)?;

        if self.detailed && !lookups.is_empty() {
            writeln!(out, "Lookups:")?;
            for lookup in lookups {
                match lookup.record {
                    Some(record) => writeln!(
                        out,
                        "  {} {} name={:?} tags={:?} probes={}",
                        lookup.status(),
                        lookup.id,
                        record.name(),
                        record.tags(),
                        lookup.probes
                    )?,
                    None => writeln!(
                        out,
                        "  {} {} probes={}",
                        lookup.status(),
                        lookup.id,
                        lookup.probes
                    )?,
                }
            }
            writeln!(out)?;
        }

        let q = &report.queries;
        writeln!(out, "=== Query Statistics ===")?;
        writeln!(out, "  Queries:       {}", q.total_queries)?;
        writeln!(
            out,
            "  Hits:          {} (rate: {:.2}%)",
            q.total_hits,
            q.hit_rate() * 100.0
        )?;
        writeln!(out, "  Misses:        {}", q.total_misses)?;
        writeln!(out, "  Min probes:    {}", q.min_probes)?;
        writeln!(out, "  Max probes:    {}", q.max_probes)?;
        writeln!(out, "  Avg probes:    {:.2}", q.avg_probes)?;
        if let Some(std_dev) = q.std_dev_probes {
            writeln!(out, "  Std dev:       {std_dev:.2}")?;
        }
        Ok(())
    }

    fn write_json<W: Write>(
        &self,
        out: &mut W,
        report: &RunReport,
        lookups: &[SearchOutcome<'_>],
    ) -> io::Result<()> {
        let lookups = if self.detailed {
            lookups
                .iter()
                .map(|lookup| JsonLookup {
                    id: lookup.id,
                    found: lookup.found(),
                    name: lookup.record.map(|r| r.name()),
                    tags: lookup.record.map(|r| r.tags()),
                    probes: lookup.probes,
                })
                .collect()
        } else {
            Vec::new()
        };
        let doc = JsonReport {
            run: report,
            lookups,
        };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)
    }

    /// Write one CSV row (no header) for `report`
    pub fn write_csv_row<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
        let t = &report.table;
        let q = &report.queries;
        let std_dev = q
            .std_dev_probes
            .map(|v| format!("{v:.4}"))
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{:.4},{},{},{:.4},{},{},{},{},{},{},{:.4},{}",
            report.table_size,
            t.used_slots,
            t.empty_slots,
            t.occupancy_rate,
            t.min_chain_length,
            t.max_chain_length,
            t.avg_chain_length,
            t.total_records,
            q.total_queries,
            q.total_hits,
            q.total_misses,
            q.min_probes,
            q.max_probes,
            q.avg_probes,
            std_dev,
        )
    }
}

impl Default for StatsReporter {
    fn default() -> Self {
        Self::new(ReportFormat::default())
    }
}
