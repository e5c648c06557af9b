use std::time::Duration;

use tokio::time::Instant;

use crate::error::CrawlError;
use crate::session::PageSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Present,
    Clickable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Polls until `selector` satisfies `condition`. Probe errors count as
/// "not yet"; expiry yields [`CrawlError::WaitTimeout`].
pub async fn wait_for(
    session: &mut dyn PageSession,
    selector: &str,
    condition: Condition,
    config: WaitConfig,
) -> anyhow::Result<()> {
    let deadline = Instant::now() + config.timeout;
    loop {
        let probe = match condition {
            Condition::Present => session.is_present(selector).await,
            Condition::Clickable => session.is_clickable(selector).await,
        };
        match probe {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) => tracing::debug!(selector, ?condition, ?err, "wait probe failed"),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(CrawlError::WaitTimeout {
                what: format!("{selector} ({condition:?})"),
                timeout: config.timeout,
            }
            .into());
        }
        let poll = config.poll_interval.max(Duration::from_millis(1));
        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}
