//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dataset::RecordColumns;
use crate::stats::ReportFormat;

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_VAR: &str = "CHAINSTAT_CONFIG";

const OVERRIDE_PREFIX: &str = "CHAINSTAT__";

/// Table sizes used when none are configured.
pub const DEFAULT_TABLE_SIZES: [u64; 4] = [1000, 2000, 4000, 8000];

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid value for a key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value string.
        value: String,
    },
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    /// Missing required configuration field.
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainstatConfig {
    /// Experiment inputs, outputs and table sizes.
    pub experiment: Option<ExperimentConfigSpec>,
    /// CSV column names.
    pub columns: Option<ColumnsConfigSpec>,
    /// Report rendering.
    pub report: Option<ReportConfigSpec>,
}

impl ChainstatConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from the `CHAINSTAT_CONFIG` env var (if set),
    /// then apply `CHAINSTAT__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_path = env::var(CONFIG_PATH_VAR).ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(env::vars())
    }

    /// Apply `CHAINSTAT__section__field` style overrides from `vars`.
    ///
    /// Variables without the prefix are ignored.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if !key.starts_with(OVERRIDE_PREFIX) {
                continue;
            }
            let path = key[OVERRIDE_PREFIX.len()..].to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim().to_string();

            match parts.as_slice() {
                ["experiment", "table_sizes"] => {
                    self.experiment_mut().table_sizes = Some(parse_list(&key, &value)?);
                }
                ["experiment", "records_path"] => {
                    self.experiment_mut().records_path = Some(PathBuf::from(value));
                }
                ["experiment", "queries_path"] => {
                    self.experiment_mut().queries_path = Some(PathBuf::from(value));
                }
                ["experiment", "output_dir"] => {
                    self.experiment_mut().output_dir = Some(PathBuf::from(value));
                }
                ["experiment", "output_pattern"] => {
                    self.experiment_mut().output_pattern = Some(value);
                }
                ["experiment", "summary_path"] => {
                    self.experiment_mut().summary_path = Some(PathBuf::from(value));
                }
                ["experiment", "parallel"] => {
                    self.experiment_mut().parallel = Some(parse_value(&key, &value)?);
                }
                ["columns", "id"] => {
                    self.columns_mut().id = Some(value);
                }
                ["columns", "name"] => {
                    self.columns_mut().name = Some(value);
                }
                ["columns", "tags"] => {
                    self.columns_mut().tags = Some(value);
                }
                ["report", "format"] => {
                    self.report_mut().format = Some(parse_value(&key, &value)?);
                }
                ["report", "detailed"] => {
                    self.report_mut().detailed = Some(parse_value(&key, &value)?);
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// Build `ExperimentSettings` using defaults plus overrides.
    pub fn to_settings(&self) -> Result<ExperimentSettings, ConfigError> {
        let mut settings = ExperimentSettings::default();
        if let Some(experiment) = &self.experiment {
            experiment.apply_to(&mut settings);
        }
        if let Some(columns) = &self.columns {
            columns.apply_to(&mut settings.columns);
        }
        if let Some(report) = &self.report {
            report.apply_to(&mut settings);
        }
        settings.validate()?;
        Ok(settings)
    }

    fn experiment_mut(&mut self) -> &mut ExperimentConfigSpec {
        self.experiment.get_or_insert_with(ExperimentConfigSpec::default)
    }

    fn columns_mut(&mut self) -> &mut ColumnsConfigSpec {
        self.columns.get_or_insert_with(ColumnsConfigSpec::default)
    }

    fn report_mut(&mut self) -> &mut ReportConfigSpec {
        self.report.get_or_insert_with(ReportConfigSpec::default)
    }
}

/// Experiment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfigSpec {
    /// Table sizes to run, one experiment each.
    pub table_sizes: Option<Vec<u64>>,
    /// CSV file with the records.
    pub records_path: Option<PathBuf>,
    /// Line-oriented file with query keys.
    pub queries_path: Option<PathBuf>,
    /// Directory receiving one report per table size.
    pub output_dir: Option<PathBuf>,
    /// Report file name; `{M}` is replaced by the table size.
    pub output_pattern: Option<String>,
    /// Optional CSV file summarizing every run.
    pub summary_path: Option<PathBuf>,
    /// Run table sizes on worker threads.
    pub parallel: Option<bool>,
}

impl ExperimentConfigSpec {
    fn apply_to(&self, settings: &mut ExperimentSettings) {
        if let Some(sizes) = &self.table_sizes {
            settings.table_sizes = sizes.clone();
        }
        if let Some(path) = &self.records_path {
            settings.records_path = path.clone();
        }
        if let Some(path) = &self.queries_path {
            settings.queries_path = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(pattern) = &self.output_pattern {
            settings.output_pattern = pattern.clone();
        }
        if let Some(path) = &self.summary_path {
            settings.summary_path = Some(path.clone());
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
    }
}

/// CSV column overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnsConfigSpec {
    /// Integer key column.
    pub id: Option<String>,
    /// Name column.
    pub name: Option<String>,
    /// Secondary attribute column.
    pub tags: Option<String>,
}

impl ColumnsConfigSpec {
    fn apply_to(&self, columns: &mut RecordColumns) {
        if let Some(value) = &self.id {
            columns.id = value.clone();
        }
        if let Some(value) = &self.name {
            columns.name = value.clone();
        }
        if let Some(value) = &self.tags {
            columns.tags = value.clone();
        }
    }
}

/// Report overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfigSpec {
    /// Output layout.
    pub format: Option<ReportFormat>,
    /// Whether to emit one line per query.
    pub detailed: Option<bool>,
}

impl ReportConfigSpec {
    fn apply_to(&self, settings: &mut ExperimentSettings) {
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(detailed) = self.detailed {
            settings.detailed = detailed;
        }
    }
}

/// Placeholder replaced by the table size in `output_pattern`.
pub const SIZE_PLACEHOLDER: &str = "{M}";

/// Fully resolved experiment settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSettings {
    /// Table sizes, in run order.
    pub table_sizes: Vec<u64>,
    /// CSV file with the records.
    pub records_path: PathBuf,
    /// Line-oriented file with query keys.
    pub queries_path: PathBuf,
    /// Directory receiving the reports.
    pub output_dir: PathBuf,
    /// Report file name pattern.
    pub output_pattern: String,
    /// Optional CSV summary across runs.
    pub summary_path: Option<PathBuf>,
    /// CSV column names.
    pub columns: RecordColumns,
    /// Report layout.
    pub format: ReportFormat,
    /// Whether to emit one line per query.
    pub detailed: bool,
    /// Run table sizes on worker threads.
    pub parallel: bool,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            table_sizes: DEFAULT_TABLE_SIZES.to_vec(),
            records_path: PathBuf::from("players.csv"),
            queries_path: PathBuf::from("consultas-fifa.txt"),
            output_dir: PathBuf::from("."),
            output_pattern: format!("experimento{SIZE_PLACEHOLDER}.txt"),
            summary_path: None,
            columns: RecordColumns::default(),
            format: ReportFormat::default(),
            detailed: true,
            parallel: false,
        }
    }
}

impl ExperimentSettings {
    /// Report path for a given table size.
    pub fn output_path(&self, table_size: u64) -> PathBuf {
        let file_name = self
            .output_pattern
            .replace(SIZE_PLACEHOLDER, &table_size.to_string());
        self.output_dir.join(file_name)
    }

    /// Check that every table size and the output pattern are usable.
    ///
    /// Runs before any table is built so a bad size never leaves a partial
    /// set of reports behind.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_sizes.is_empty() {
            return Err(ConfigError::MissingField("experiment.table_sizes".into()));
        }
        if let Some(zero) = self.table_sizes.iter().find(|&&m| m == 0) {
            return Err(ConfigError::InvalidValue {
                key: "experiment.table_sizes".into(),
                value: zero.to_string(),
            });
        }
        if !self.output_pattern.contains(SIZE_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                key: "experiment.output_pattern".into(),
                value: self.output_pattern.clone(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_list<T: std::str::FromStr>(key: &str, value: &str) -> Result<Vec<T>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_value(key, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = ChainstatConfig::default().to_settings().unwrap();
        assert_eq!(settings.table_sizes, vec![1000, 2000, 4000, 8000]);
        assert_eq!(settings.format, ReportFormat::Reference);
        assert_eq!(
            settings.output_path(2000),
            PathBuf::from(".").join("experimento2000.txt")
        );
    }

    #[test]
    fn test_toml_config() {
        let config = ChainstatConfig::from_toml_str(
            r#"
            [experiment]
            table_sizes = [10, 20]
            output_dir = "out"
            output_pattern = "run-{M}.json"
            parallel = true

            [columns]
            id = "key"

            [report]
            format = "json"
            "#,
        )
        .unwrap();
        let settings = config.to_settings().unwrap();
        assert_eq!(settings.table_sizes, vec![10, 20]);
        assert!(settings.parallel);
        assert_eq!(settings.columns.id, "key");
        assert_eq!(settings.columns.name, "name");
        assert_eq!(settings.format, ReportFormat::Json);
        assert_eq!(settings.output_path(10), PathBuf::from("out").join("run-10.json"));
    }

    #[test]
    fn test_toml_rejects_unknown_key() {
        let err = ChainstatConfig::from_toml_str("[experiment]\nsizes = [1]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ChainstatConfig::default();
        config
            .apply_overrides(vars(&[
                ("CHAINSTAT__experiment__table_sizes", "7, 11"),
                ("CHAINSTAT__report__format", "csv"),
                ("CHAINSTAT__columns__tags", "positions"),
                ("PATH", "/usr/bin"),
            ]))
            .unwrap();

        let settings = config.to_settings().unwrap();
        assert_eq!(settings.table_sizes, vec![7, 11]);
        assert_eq!(settings.format, ReportFormat::Csv);
        assert_eq!(settings.columns.tags, "positions");
    }

    #[test]
    fn test_env_override_errors() {
        let mut config = ChainstatConfig::default();
        let err = config
            .apply_overrides(vars(&[("CHAINSTAT__experiment__bogus", "1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));

        let err = config
            .apply_overrides(vars(&[("CHAINSTAT__experiment__table_sizes", "10,-3")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_table_size_rejected() {
        let mut config = ChainstatConfig::default();
        config
            .apply_overrides(vars(&[("CHAINSTAT__experiment__table_sizes", "0")]))
            .unwrap();
        assert!(matches!(
            config.to_settings(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        let mut config = ChainstatConfig::default();
        config
            .apply_overrides(vars(&[("CHAINSTAT__experiment__output_pattern", "out.txt")]))
            .unwrap();
        assert!(config.to_settings().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_among_sizes() {
        let settings = ExperimentSettings {
            table_sizes: vec![1000, 0],
            ..ExperimentSettings::default()
        };
        match settings.validate() {
            Err(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, "experiment.table_sizes");
                assert_eq!(value, "0");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_sizes() {
        let settings = ExperimentSettings {
            table_sizes: Vec::new(),
            ..ExperimentSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }
}
