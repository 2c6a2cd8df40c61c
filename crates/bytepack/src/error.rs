use thiserror::Error;

/// Decode failure.
///
/// The first error anywhere in the recursive descent aborts the whole decode;
/// nothing is salvaged or guessed. Every variant carries the stream offset
/// needed to pinpoint where the input went wrong.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source ended before the bytes the grammar called for arrived.
    /// `consumed` is the total number of bytes successfully consumed, so the
    /// caller can decide between "wait for more input" and "corrupt buffer".
    #[error("input truncated after {consumed} bytes ({missing} more expected)")]
    Truncated { consumed: usize, missing: usize },

    /// The marker byte at `offset` is not part of the grammar. No input
    /// beyond the marker byte itself has been consumed.
    #[error("malformed format code {code:#04x} at offset {offset}")]
    MalformedFormatCode { code: u8, offset: usize },

    /// A declared raw length or container count exceeds the configured bound.
    /// Reported before any allocation is attempted.
    #[error("declared length {declared} exceeds limit {limit} at offset {offset}")]
    OversizedLength {
        declared: usize,
        limit: usize,
        offset: usize,
    },

    /// Containers nested deeper than the configured bound.
    #[error("nesting depth exceeds limit {limit}")]
    DepthLimitExceeded { limit: usize },

    /// A sequence or mapping was decoded in map-key position; containers
    /// cannot be canonically hashed.
    #[error("map key at offset {offset} is a container and cannot be hashed")]
    InvalidMapKey { offset: usize },

    /// A non-EOF I/O failure from the byte source.
    #[error("read failed at offset {offset}")]
    Io {
        offset: usize,
        #[source]
        source: std::io::Error,
    },
}
