use anyhow::Context as _;
use scraper::Html;
use url::Url;

use crate::config::CrawlSettings;
use crate::detail::{extract_detail, selector, text_of};
use crate::dimension::RankingDimension;
use crate::error::CrawlError;
use crate::formats::{BookRecord, ListingRow};
use crate::progress::{ProgressSink, row_done};
use crate::session::PageSession;
use crate::site::{
    RANK_ROW_CELLS, RANK_TABLE_READY_SELECTOR, RANK_TABLE_SELECTOR, TITLE_ANCHOR_SELECTOR, book_url,
};
use crate::wait::{Condition, WaitConfig, wait_for};

/// Reads the ranking table the session currently shows, visiting each
/// book's detail page before moving to the next row.
pub async fn extract_listing(
    session: &mut dyn PageSession,
    dimension: &RankingDimension,
    settings: &CrawlSettings,
    progress: &mut dyn ProgressSink,
) -> anyhow::Result<Vec<BookRecord>> {
    let timings = &settings.timings;
    wait_for(
        session,
        RANK_TABLE_READY_SELECTOR,
        Condition::Present,
        WaitConfig::new(timings.table_timeout, timings.poll_interval),
    )
    .await?;

    let html = session.content().await.context("read ranking markup")?;
    let rows = parse_listing(&html, &settings.origin)?;
    tracing::info!(
        sheet = %dimension.sheet_name(),
        rows = rows.len(),
        "ranking table parsed"
    );

    let sheet = dimension.sheet_name();
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let detail = extract_detail(session, &row.url, timings)
            .await
            .with_context(|| format!("book detail for rank {}", row.rank))?;
        let record = BookRecord::new(row, dimension, detail);
        progress.report(&row_done(&record.listing.title, &sheet));
        records.push(record);
    }
    Ok(records)
}

/// Rows of the ranking table in document order. Rows without exactly
/// seven cells (headers, ads) are skipped.
pub fn parse_listing(html: &str, origin: &Url) -> anyhow::Result<Vec<ListingRow>> {
    let document = Html::parse_document(html);
    let table_sel = selector(RANK_TABLE_SELECTOR)?;
    let tbody_sel = selector("tbody")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;
    let anchor_sel = selector(TITLE_ANCHOR_SELECTOR)?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(CrawlError::MissingElement(RANK_TABLE_SELECTOR))?;
    let tbody = table
        .select(&tbody_sel)
        .next()
        .ok_or(CrawlError::MissingElement("table.table-rwd tbody"))?;

    let mut rows = Vec::new();
    for (index, tr) in tbody.select(&row_sel).enumerate() {
        let cells = tr.select(&cell_sel).collect::<Vec<_>>();
        if cells.len() != RANK_ROW_CELLS {
            tracing::debug!(index, cells = cells.len(), "skipping ranking row");
            continue;
        }

        let href = cells[2]
            .select(&anchor_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or(CrawlError::MissingElement(TITLE_ANCHOR_SELECTOR))
            .with_context(|| format!("ranking row {index}"))?;

        rows.push(ListingRow {
            rank: text_of(cells[0]),
            category: text_of(cells[1]),
            title: text_of(cells[2]),
            url: book_url(origin, href).with_context(|| format!("ranking row {index}"))?,
            latest_chapter: text_of(cells[3]),
            author: text_of(cells[4]),
            published: text_of(cells[5]),
            status: text_of(cells[6]),
        });
    }
    Ok(rows)
}
