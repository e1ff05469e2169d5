use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal error returned by ingestion functions.
///
/// Only structural problems end up here. A single malformed date or age is downgraded to an
/// absent field on that record and never surfaces as an error.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The source could not be read as delimited text.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The source has no header row at all.
    #[error("empty source: no header row found")]
    EmptySource,
}

/// Error type returned when loading an [`crate::config::AnalyticsConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for the expected shape.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config parsed but holds an unusable value.
    #[error("invalid config: {message}")]
    Invalid { message: String },
}
