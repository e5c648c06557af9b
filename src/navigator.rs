use anyhow::Context as _;

use crate::config::CrawlSettings;
use crate::dimension::RankingDimension;
use crate::session::{FormSubmission, PageSession, pause};
use crate::site::{
    CATEGORY_FIELD, KIND_FIELD, PERIOD_FIELD, RANK_FORM_ID, RANK_FORM_SELECTOR, rank_more_url,
};
use crate::wait::{Condition, WaitConfig, wait_for};

/// Drives the ranking form until the session shows `dimension`.
///
/// The period switch must follow the board switch: the server keeps the
/// board/category chosen by the first submission and the second form
/// only carries the period.
pub async fn select_dimension(
    session: &mut dyn PageSession,
    dimension: &RankingDimension,
    settings: &CrawlSettings,
) -> anyhow::Result<()> {
    switch_board(session, dimension, settings)
        .await
        .context("switch board and category")?;
    switch_period(session, dimension, settings)
        .await
        .context("switch period")?;
    Ok(())
}

async fn switch_board(
    session: &mut dyn PageSession,
    dimension: &RankingDimension,
    settings: &CrawlSettings,
) -> anyhow::Result<()> {
    let timings = &settings.timings;
    let url = rank_more_url(&settings.origin)?;
    session
        .goto(url.as_str())
        .await
        .with_context(|| format!("navigate to {url}"))?;
    wait_for(
        session,
        RANK_FORM_SELECTOR,
        Condition::Present,
        WaitConfig::new(timings.form_timeout, timings.poll_interval),
    )
    .await?;
    pause(timings.form_settle).await;

    let form = FormSubmission::new(RANK_FORM_ID)
        .field(KIND_FIELD, dimension.kind.id)
        .field(CATEGORY_FIELD, dimension.category.id);
    session.submit_form(&form).await?;
    pause(timings.submit_settle).await;
    tracing::debug!(
        kind = dimension.kind.id,
        category = dimension.category.id,
        "board switched"
    );
    Ok(())
}

async fn switch_period(
    session: &mut dyn PageSession,
    dimension: &RankingDimension,
    settings: &CrawlSettings,
) -> anyhow::Result<()> {
    let form = FormSubmission::new(RANK_FORM_ID).field(PERIOD_FIELD, dimension.period.id);
    session.submit_form(&form).await?;
    pause(settings.timings.submit_settle).await;
    tracing::debug!(period = dimension.period.id, "period switched");
    Ok(())
}
