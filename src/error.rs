use thiserror::Error;

/// Failure of a single sample round-trip. Cloned into UI messages, so every
/// variant carries plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// The platform query itself failed or returned nothing usable.
    #[error("failed to retrieve system info: {0}")]
    Retrieval(String),
    /// The shared source could not be locked (a previous sample panicked).
    #[error("metric source unavailable: {0}")]
    Unavailable(String),
    /// The blocking task running the sample was cancelled or panicked.
    #[error("sampler task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
