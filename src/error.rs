use thiserror::Error;

/// Hard failures while loading the input table. Everything past loading is total.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required column is absent from the input table.
    #[error("required column `{0}` is missing from the input table")]
    MissingField(String),

    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Download of a remote table failed.
    #[error("http: {0}")]
    Http(String),
}
