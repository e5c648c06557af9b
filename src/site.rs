//! Markup and URL markers of the POPO ranking site.
//!
//! These values must match the live site exactly; the crawler has no
//! fallback when the site changes them.

use anyhow::Context as _;
use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://www.popo.tw";

pub const RANK_MORE_PATH: &str = "/rank/more";

pub const RANK_FORM_ID: &str = "rank-form1";
pub const RANK_FORM_SELECTOR: &str = "#rank-form1";
pub const KIND_FIELD: &str = "kind";
pub const CATEGORY_FIELD: &str = "sub";
pub const PERIOD_FIELD: &str = "type";

pub const RANK_TABLE_SELECTOR: &str = "table.table-rwd";
pub const RANK_TABLE_READY_SELECTOR: &str = ".table-rwd";
pub const RANK_ROW_CELLS: usize = 7;
pub const TITLE_ANCHOR_SELECTOR: &str = "a.bname";

pub const DETAIL_TABLE_SELECTOR: &str = "table.book_data";

pub const AGE_GATE_PATH_MARKER: &str = "/limit18";
pub const AGE_GATE_TEXT_MARKER: &str = "我已滿18歲";
pub const AGE_GATE_CONFIRM_SELECTOR: &str = "a.R-yes";

/// Parses `origin`, accepting only http(s) sites.
pub fn parse_origin(origin: &str) -> anyhow::Result<Url> {
    let url = Url::parse(origin).with_context(|| format!("parse origin {origin}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("origin must be http/https: {url}");
    }
    Ok(url)
}

pub fn rank_more_url(origin: &Url) -> anyhow::Result<Url> {
    origin
        .join(RANK_MORE_PATH)
        .with_context(|| format!("join {RANK_MORE_PATH} onto {origin}"))
}

/// Resolves a title anchor `href` the way a browser would, against the
/// site origin.
pub fn book_url(origin: &Url, href: &str) -> anyhow::Result<String> {
    let url = origin
        .join(href.trim())
        .with_context(|| format!("resolve book link {href}"))?;
    Ok(url.into())
}
