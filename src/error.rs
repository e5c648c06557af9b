use std::time::Duration;

/// Failures the crawl treats as structural: the page never reached the
/// state the next step needs.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("timed out after {timeout:?} waiting for {what}")]
    WaitTimeout { what: String, timeout: Duration },

    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("browser: {0}")]
    Browser(String),
}

impl CrawlError {
    pub fn is_timeout(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<CrawlError>(),
                Some(CrawlError::WaitTimeout { .. })
            )
        })
    }
}
