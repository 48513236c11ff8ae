use std::time::Duration;

/// Fetch failures that callers branch on. Everything else travels as a
/// plain `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The search request did not finish before its deadline
    #[error("Timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Could not parse org and repo from PR URL: {0}")]
    MalformedUrl(String),
}

impl FetchError {
    /// True when `err` is, or wraps, a search timeout
    pub fn is_timeout(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<FetchError>(), Some(FetchError::Timeout(_)))
    }
}
