use thiserror::Error;

/// Failure while pulling bytes from the underlying source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source reached end-of-stream before the requested count was
    /// satisfied. `missing` is how many of the requested bytes never arrived.
    #[error("source exhausted with {missing} bytes still expected")]
    Truncated { missing: usize },

    /// Any non-EOF I/O failure reported by the source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
