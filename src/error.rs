use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Malformed or out-of-constraint input. The message is surfaced to the
    /// caller verbatim, so it must stand on its own.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}
