//! Statistics integration tests.
//!
//! Covers query-phase aggregation and report rendering.

use chainstat::stats::{QueryStatsCollector, ReportFormat, RunReport, StatsReporter};
use chainstat::{ChainedHashTable, QueryStats, Record, SearchOutcome};

fn scenario_table() -> ChainedHashTable {
    let mut table = ChainedHashTable::new(10).unwrap();
    for id in [5, 15, 25] {
        table.insert(Record::new(id, format!("p{id}"), "CM"));
    }
    table
}

// ============ QueryStats Tests ============

#[test]
fn test_query_stats_mixed_outcomes() {
    let table = scenario_table();
    let outcomes: Vec<SearchOutcome<'_>> = [15, 99, 25].iter().map(|&id| table.search(id)).collect();

    let stats = QueryStats::from_outcomes(&outcomes);
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.total_hits, 2);
    assert_eq!(stats.total_misses, 1);
    assert_eq!(stats.min_probes, 2);
    assert_eq!(stats.max_probes, 3);
    assert_eq!(stats.avg_probes, 2.5);
    assert_eq!(stats.std_dev_probes, Some(0.5));
    assert_eq!(stats.avg_miss_probes, 1.0);
}

#[test]
fn test_query_stats_no_queries() {
    let outcomes: Vec<SearchOutcome<'_>> = Vec::new();
    let stats = QueryStats::from_outcomes(&outcomes);
    assert_eq!(stats.total_queries, 0);
    assert_eq!(stats.total_hits, 0);
    assert_eq!(stats.min_probes, 0);
    assert_eq!(stats.max_probes, 0);
    assert_eq!(stats.avg_probes, 0.0);
    assert_eq!(stats.avg_probes_all_queries, 0.0);
    assert_eq!(stats.std_dev_probes, None);
}

#[test]
fn test_query_stats_all_misses() {
    let table = scenario_table();
    let outcomes: Vec<_> = [1, 2, 35].iter().map(|&id| table.search(id)).collect();
    let stats = QueryStats::from_outcomes(&outcomes);
    assert_eq!(stats.total_hits, 0);
    assert_eq!(stats.total_misses, 3);
    assert_eq!(stats.min_probes, 0);
    assert_eq!(stats.std_dev_probes, None);
    assert_eq!(stats.avg_miss_probes, 2.0);
}

#[test]
fn test_std_dev_uses_population_formula() {
    let mut collector = QueryStatsCollector::new();
    for probes in [1, 2, 3, 4] {
        collector.record_probes(true, probes);
    }
    let stats = collector.snapshot();
    assert_eq!(stats.avg_probes, 2.5);
    assert!((stats.std_dev_probes.unwrap() - 1.25f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_collector_matches_one_shot() {
    let table = scenario_table();
    let outcomes: Vec<_> = [5, 25, 7, 15, 15].iter().map(|&id| table.search(id)).collect();

    let mut collector = QueryStatsCollector::new();
    for outcome in &outcomes {
        collector.record(outcome);
    }
    assert_eq!(collector.snapshot(), QueryStats::from_outcomes(&outcomes));
}

// ============ Reporter Tests ============

#[test]
fn test_reference_report_end_to_end() {
    let table = scenario_table();
    let outcomes: Vec<_> = [15, 99, 25].iter().map(|&id| table.search(id)).collect();
    let report = RunReport {
        table_size: 10,
        table: table.compute_stats(),
        queries: QueryStats::from_outcomes(&outcomes),
    };

    let text = StatsReporter::reference().render(&report, &outcomes).unwrap();
    let expected = "\
PARTE1: ESTATISTICAS DA TABELA HASH
NUMERO DE ENTRADAS DA TABELA USADAS: 1
NUMERO DE ENTRADAS DA TABELA VAZIAS: 9
TAXA DE OCUPAÇÃO: 0.10
MINIMO TAMANHO DE LISTA: 3
MAXIMO TAMANHO DE LISTA: 3
MEDIO TAMANHO DE LISTA: 3.00

ID: 15, NAME: p15, POSITION: CM, TESTES:2
ID: 99, MISS, TESTES: 1
ID: 25, NAME: p25, POSITION: CM, TESTES:3

PARTE2: ESTATISTICAS DAS CONSULTAS
TOTAL DE CONSULTAS REALIZADAS: 3
TOTAL DE CONSULTAS COM MATCH: 2
MINIMO NUMERO DE TESTES POR NOME ENCONTRADO: 2
MAXIMO NUMERO DE TESTES POR NOME ENCONTRADO: 3
MEDIA NUMERO DE TESTES NOME ENCONTRADO: 2.50
DESVIO PADRÃO DO NUMERO DE TESTES NOME ENCONTRADO: 0.50
";
    assert_eq!(text, expected);
}

#[test]
fn test_summary_only_report_skips_lookups() {
    let table = scenario_table();
    let outcomes: Vec<_> = [15].iter().map(|&id| table.search(id)).collect();
    let report = RunReport {
        table_size: 10,
        table: table.compute_stats(),
        queries: QueryStats::from_outcomes(&outcomes),
    };

    let text = StatsReporter::new(ReportFormat::Text)
        .with_detailed(false)
        .render(&report, &outcomes)
        .unwrap();
    assert!(text.contains("=== Table Statistics (M = 10) ==="));
    assert!(text.contains("Avg probes:    2.00"));
    assert!(!text.contains("Lookups:"));
}
