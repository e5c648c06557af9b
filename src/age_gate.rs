use anyhow::Context as _;

use crate::config::Timings;
use crate::session::{PageSession, pause};
use crate::site::{AGE_GATE_CONFIRM_SELECTOR, AGE_GATE_PATH_MARKER, AGE_GATE_TEXT_MARKER};
use crate::wait::{Condition, WaitConfig, wait_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGate {
    Absent,
    Confirmed,
    /// The confirm control could not be used; the caller carries on with
    /// whatever page is showing.
    Unconfirmed,
}

pub fn is_age_gate(url: &str, html: &str) -> bool {
    url.contains(AGE_GATE_PATH_MARKER) || html.contains(AGE_GATE_TEXT_MARKER)
}

/// Dismisses the 18+ interstitial when the current page is one.
///
/// Only reading the page can fail; a confirm control that never becomes
/// clickable is logged and reported as [`AgeGate::Unconfirmed`].
pub async fn bypass_if_present(
    session: &mut dyn PageSession,
    timings: &Timings,
) -> anyhow::Result<AgeGate> {
    let url = session.current_url().await.context("read current url")?;
    let html = session.content().await.context("read page markup")?;
    Ok(bypass_shown_page(session, &url, &html, timings).await)
}

/// Same as [`bypass_if_present`] for a page whose url and markup the
/// caller has already read.
pub async fn bypass_shown_page(
    session: &mut dyn PageSession,
    url: &str,
    html: &str,
    timings: &Timings,
) -> AgeGate {
    if !is_age_gate(url, html) {
        return AgeGate::Absent;
    }

    tracing::debug!(url, "age gate detected");
    match confirm(session, timings).await {
        Ok(()) => {
            pause(timings.age_gate_settle).await;
            AgeGate::Confirmed
        }
        Err(err) => {
            tracing::warn!(url, err = %format!("{err:#}"), "age gate confirmation failed");
            AgeGate::Unconfirmed
        }
    }
}

async fn confirm(session: &mut dyn PageSession, timings: &Timings) -> anyhow::Result<()> {
    wait_for(
        session,
        AGE_GATE_CONFIRM_SELECTOR,
        Condition::Clickable,
        WaitConfig::new(timings.age_gate_timeout, timings.poll_interval),
    )
    .await?;
    session
        .click(AGE_GATE_CONFIRM_SELECTOR)
        .await
        .context("click age gate confirm")
}
