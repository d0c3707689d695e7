use std::path::PathBuf;

/// Failures that abort a split run. Per-row problems (unparseable dates)
/// are not errors; they are logged and the affected rows are excluded.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// The input file does not exist or could not be opened.
    #[error("input file {path} not found or unreadable")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured date column is absent from the CSV header.
    #[error("column `{column}` not present in header of {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Structurally malformed CSV input or a failed output write.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
