//! Dataset loading.
//!
//! Records come from a CSV source with a header row; query keys come from a
//! line-oriented source with one integer per line. Malformed input is
//! rejected here so the table only ever sees valid keys.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::record::Record;

/// Errors returned while loading records or queries.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Input file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// I/O error on an already open reader.
    #[error("read error: {0}")]
    Read(#[from] io::Error),
    /// CSV syntax error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A row is missing a required column or has a non-integer id.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the source.
        line: u64,
        /// What was wrong with the row.
        reason: String,
    },
    /// A query line is not a non-negative integer.
    #[error("malformed query at line {line}: {value:?}")]
    MalformedQuery {
        /// 1-based line number in the source.
        line: u64,
        /// Raw line content, trimmed.
        value: String,
    },
}

/// Column names used to build records from a CSV header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordColumns {
    /// Integer key column.
    pub id: String,
    /// Name column.
    pub name: String,
    /// Secondary attribute column.
    pub tags: String,
}

impl Default for RecordColumns {
    fn default() -> Self {
        Self {
            id: "sofifa_id".to_string(),
            name: "name".to_string(),
            tags: "player_positions".to_string(),
        }
    }
}

impl RecordColumns {
    /// Create a column mapping.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: tags.into(),
        }
    }
}

struct ColumnPositions {
    id: usize,
    name: usize,
    tags: usize,
}

fn column_position(headers: &csv::StringRecord, column: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| LoadError::MalformedRecord {
            line: 1,
            reason: format!("missing column {column:?} in header"),
        })
}

/// Load records from CSV data, in source order.
pub fn load_records<R: Read>(reader: R, columns: &RecordColumns) -> Result<Vec<Record>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let positions = ColumnPositions {
        id: column_position(&headers, &columns.id)?,
        name: column_position(&headers, &columns.name)?,
        tags: column_position(&headers, &columns.tags)?,
    };

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        let field = |index: usize, column: &str| {
            row.get(index).ok_or_else(|| LoadError::MalformedRecord {
                line,
                reason: format!("missing field {column:?}"),
            })
        };

        let raw_id = field(positions.id, columns.id.as_str())?.trim();
        let id = raw_id.parse::<u64>().map_err(|_| LoadError::MalformedRecord {
            line,
            reason: format!("id {raw_id:?} is not a non-negative integer"),
        })?;
        let name = field(positions.name, columns.name.as_str())?;
        let tags = field(positions.tags, columns.tags.as_str())?;
        records.push(Record::new(id, name, tags));
    }

    tracing::debug!(records = records.len(), "records loaded");
    Ok(records)
}

/// Load records from a CSV file.
pub fn load_records_from_path(
    path: impl AsRef<Path>,
    columns: &RecordColumns,
) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref();
    let file = open(path)?;
    load_records(BufReader::new(file), columns)
}

/// Load query keys, one per line. Blank lines are skipped.
///
/// Keys are parsed as integers, so `0015` and `15` name the same key and
/// reports print the canonical form.
pub fn load_queries<R: BufRead>(reader: R) -> Result<Vec<u64>, LoadError> {
    let mut queries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        let key = value.parse::<u64>().map_err(|_| LoadError::MalformedQuery {
            line: index as u64 + 1,
            value: value.to_string(),
        })?;
        queries.push(key);
    }

    tracing::debug!(queries = queries.len(), "queries loaded");
    Ok(queries)
}

/// Load query keys from a file.
pub fn load_queries_from_path(path: impl AsRef<Path>) -> Result<Vec<u64>, LoadError> {
    let path = path.as_ref();
    let file = open(path)?;
    load_queries(BufReader::new(file))
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
