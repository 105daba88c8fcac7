use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the catalog tables.
///
/// None of these cross the repository boundary: whole-table errors degrade to
/// an empty table and cell errors degrade to a default value.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("source file not found: {}", path.display())]
    SourceUnavailable { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row} in {}: {source}", path.display())]
    Row {
        path: PathBuf,
        row: u64,
        #[source]
        source: csv::Error,
    },

    #[error("invalid UTF-8 in row {row}, column {column:?}")]
    CellEncoding { row: u64, column: String },

    #[error("unparseable price: {0:?}")]
    PriceParse(String),

    #[error("unparseable screen size: {0:?}")]
    ScreenParse(String),
}
