use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::dimension::RankingDimension;

pub const DEFAULT_PREFIX: &str = "popo_排行榜";

/// Bounded waits and fixed pauses used while driving the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub form_timeout: Duration,
    pub form_settle: Duration,
    pub submit_settle: Duration,
    pub table_timeout: Duration,
    pub detail_settle: Duration,
    pub age_gate_timeout: Duration,
    pub age_gate_settle: Duration,
    pub poll_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            form_timeout: Duration::from_secs(20),
            form_settle: Duration::from_secs(1),
            submit_settle: Duration::from_secs(2),
            table_timeout: Duration::from_secs(10),
            detail_settle: Duration::from_secs(2),
            age_gate_timeout: Duration::from_secs(5),
            age_gate_settle: Duration::from_secs(2),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl Timings {
    /// No pauses; bounded waits keep their defaults.
    pub fn without_pauses() -> Self {
        Self {
            form_settle: Duration::ZERO,
            submit_settle: Duration::ZERO,
            detail_settle: Duration::ZERO,
            age_gate_settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failing dimension aborts the run.
    #[default]
    Abort,
    /// A failing dimension is logged, recorded on the report and skipped.
    Isolate,
}

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Ranking and book links are resolved against this.
    pub origin: Url,
    pub timings: Timings,
    pub failure_policy: FailurePolicy,
    pub dimensions: Vec<RankingDimension>,
}

impl CrawlSettings {
    /// Every dimension with default timings, aborting on the first failure.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            timings: Timings::default(),
            failure_policy: FailurePolicy::Abort,
            dimensions: RankingDimension::all(),
        }
    }

    /// Restricts the crawl to the named sheets, keeping enumeration order.
    pub fn select_sheets(&mut self, names: &[String]) -> anyhow::Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        for name in names {
            if !RankingDimension::all()
                .iter()
                .any(|d| d.sheet_name() == *name || d.display_name() == *name)
            {
                anyhow::bail!("unknown ranking sheet: {name}");
            }
        }
        self.dimensions = RankingDimension::all()
            .into_iter()
            .filter(|d| {
                names
                    .iter()
                    .any(|n| *n == d.sheet_name() || *n == d.display_name())
            })
            .collect();
        Ok(())
    }
}

/// How to obtain a browser session.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Chromium binary; chromiumoxide's own lookup when unset.
    pub chrome_executable: Option<PathBuf>,
    /// DevTools HTTP endpoint of an already running browser. Takes
    /// precedence over launching one.
    pub devtools_url: Option<String>,
    pub headless: bool,
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            devtools_url: None,
            headless: true,
            extra_args: Vec::new(),
        }
    }
}
