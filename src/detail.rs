use std::collections::HashMap;

use anyhow::Context as _;
use scraper::{Html, Selector};

use crate::age_gate::{AgeGate, bypass_shown_page};
use crate::config::Timings;
use crate::formats::DetailRecord;
use crate::session::{PageSession, fetch};
use crate::site::DETAIL_TABLE_SELECTOR;

/// Opens a book page, gets past the age gate and reads its attributes.
pub async fn extract_detail(
    session: &mut dyn PageSession,
    url: &str,
    timings: &Timings,
) -> anyhow::Result<DetailRecord> {
    let html = fetch(session, url, timings.detail_settle).await?;
    let shown = session.current_url().await.context("read current url")?;

    let gate = bypass_shown_page(session, &shown, &html, timings).await;
    tracing::debug!(url, ?gate, "detail page ready");
    let html = match gate {
        AgeGate::Absent => html,
        AgeGate::Confirmed | AgeGate::Unconfirmed => session
            .content()
            .await
            .with_context(|| format!("read markup of {url}"))?,
    };
    parse_detail(&html).with_context(|| format!("parse detail page {url}"))
}

pub fn parse_detail(html: &str) -> anyhow::Result<DetailRecord> {
    let attributes = parse_attribute_tables(html)?;
    Ok(DetailRecord::from_lookup(|label| {
        attributes.get(label).map(String::as_str)
    }))
}

/// Label/value pairs from every attribute table; a repeated label keeps
/// the last value.
pub fn parse_attribute_tables(html: &str) -> anyhow::Result<HashMap<String, String>> {
    let document = Html::parse_document(html);
    let table_sel = selector(DETAIL_TABLE_SELECTOR)?;
    let row_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let td_sel = selector("td")?;

    let mut attributes = HashMap::new();
    for table in document.select(&table_sel) {
        for row in table.select(&row_sel) {
            let (Some(th), Some(td)) = (row.select(&th_sel).next(), row.select(&td_sel).next())
            else {
                continue;
            };
            attributes.insert(text_of(th), text_of(td));
        }
    }
    Ok(attributes)
}

pub(crate) fn text_of(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

pub(crate) fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse selector {css}: {err}"))
}
