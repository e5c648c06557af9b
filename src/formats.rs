use serde::Serialize;

use crate::dimension::RankingDimension;

/// Header row shared by every report writer, in column order.
pub const COLUMNS: [&str; 16] = [
    "排行",
    "類別",
    "書名",
    "書籍連結",
    "最新章回",
    "作者",
    "公開時間",
    "書籍狀態",
    "榜單",
    "分類",
    "週期",
    "免費章回",
    "付費章回",
    "總字數",
    "收藏數",
    "訂購數",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub rank: String,
    pub category: String,
    pub title: String,
    pub url: String,
    pub latest_chapter: String,
    pub author: String,
    pub published: String,
    pub status: String,
}

/// Detail-page attributes. A label missing from the page is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub free_chapters: String,
    pub paid_chapters: String,
    pub word_count: String,
    pub favorites: String,
    pub orders: String,
}

impl DetailRecord {
    pub const LABELS: [&'static str; 5] = ["免費章回", "付費章回", "總字數", "收藏數", "訂購數"];

    pub fn from_lookup<'a>(mut lookup: impl FnMut(&str) -> Option<&'a str>) -> Self {
        let mut field = |label: &str| lookup(label).unwrap_or_default().to_owned();
        Self {
            free_chapters: field(Self::LABELS[0]),
            paid_chapters: field(Self::LABELS[1]),
            word_count: field(Self::LABELS[2]),
            favorites: field(Self::LABELS[3]),
            orders: field(Self::LABELS[4]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    #[serde(flatten)]
    pub listing: ListingRow,
    pub board: String,
    pub board_category: String,
    pub period: String,
    #[serde(flatten)]
    pub detail: DetailRecord,
}

impl BookRecord {
    pub fn new(listing: ListingRow, dimension: &RankingDimension, detail: DetailRecord) -> Self {
        Self {
            listing,
            board: dimension.kind.name.to_owned(),
            board_category: dimension.category.name.to_owned(),
            period: dimension.period.name.to_owned(),
            detail,
        }
    }

    /// Cell values in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 16] {
        [
            self.listing.rank.as_str(),
            self.listing.category.as_str(),
            self.listing.title.as_str(),
            self.listing.url.as_str(),
            self.listing.latest_chapter.as_str(),
            self.listing.author.as_str(),
            self.listing.published.as_str(),
            self.listing.status.as_str(),
            self.board.as_str(),
            self.board_category.as_str(),
            self.period.as_str(),
            self.detail.free_chapters.as_str(),
            self.detail.paid_chapters.as_str(),
            self.detail.word_count.as_str(),
            self.detail.favorites.as_str(),
            self.detail.orders.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionTable {
    pub dimension: RankingDimension,
    pub sheet_name: String,
    pub records: Vec<BookRecord>,
}

impl DimensionTable {
    pub fn new(dimension: RankingDimension, records: Vec<BookRecord>) -> Self {
        Self {
            sheet_name: dimension.sheet_name(),
            dimension,
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionFailure {
    pub sheet_name: String,
    pub message: String,
}

/// Tables keyed by sheet name, in the order the dimensions were crawled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    tables: Vec<DimensionTable>,
    failures: Vec<DimensionFailure>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `table`, replacing an existing table with the same sheet name
    /// in place.
    pub fn insert(&mut self, table: DimensionTable) {
        match self
            .tables
            .iter()
            .position(|existing| existing.sheet_name == table.sheet_name)
        {
            Some(index) => self.tables[index] = table,
            None => self.tables.push(table),
        }
    }

    pub fn record_failure(&mut self, failure: DimensionFailure) {
        self.failures.push(failure);
    }

    pub fn get(&self, sheet_name: &str) -> Option<&DimensionTable> {
        self.tables.iter().find(|t| t.sheet_name == sheet_name)
    }

    pub fn tables(&self) -> &[DimensionTable] {
        &self.tables
    }

    pub fn failures(&self) -> &[DimensionFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.tables.iter().map(|t| t.records.len()).sum()
    }
}
