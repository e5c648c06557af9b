use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::browser::ChromiumLauncher;
use crate::cli::{CrawlArgs, ReportFormat};
use crate::config::{BrowserSettings, CrawlSettings, FailurePolicy};
use crate::dimension::RankingDimension;
use crate::export::{JsonlWriter, ReportWriter, XlsxWriter, report_file_name};
use crate::formats::{BookRecord, CrawlReport, DimensionFailure, DimensionTable};
use crate::listing::extract_listing;
use crate::navigator::select_dimension;
use crate::progress::{ProgressSink, StdoutProgress, dimension_started, run_saved};
use crate::session::{PageSession, SessionLauncher};
use crate::site::parse_origin;

pub async fn run(args: CrawlArgs) -> anyhow::Result<()> {
    let origin = parse_origin(&args.origin).context("parse --origin")?;

    let mut settings = CrawlSettings::new(origin);
    if args.keep_going {
        settings.failure_policy = FailurePolicy::Isolate;
    }
    settings.select_sheets(&args.only).context("parse --only")?;

    let browser = BrowserSettings {
        chrome_executable: args.chrome.clone(),
        devtools_url: args.devtools.clone(),
        headless: !args.headful,
        extra_args: args.chrome_args.clone(),
    };
    let writer: Box<dyn ReportWriter> = match args.format {
        ReportFormat::Xlsx => Box::new(XlsxWriter),
        ReportFormat::Jsonl => Box::new(JsonlWriter),
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir: {}", args.out_dir.display()))?;

    let launcher = Arc::new(ChromiumLauncher::new(browser));
    let mut crawler = Crawler::new(launcher, settings, StdoutProgress);
    let path = crawler
        .run_to_file(writer.as_ref(), &args.out_dir, &args.prefix)
        .await?;
    tracing::debug!(path = %path.display(), "crawl finished");
    Ok(())
}

/// Walks every configured ranking dimension, one fresh browser session
/// per dimension, strictly in order.
pub struct Crawler<P> {
    launcher: Arc<dyn SessionLauncher>,
    settings: CrawlSettings,
    progress: P,
}

impl<P: ProgressSink> Crawler<P> {
    pub fn new(launcher: Arc<dyn SessionLauncher>, settings: CrawlSettings, progress: P) -> Self {
        Self {
            launcher,
            settings,
            progress,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<CrawlReport> {
        let mut report = CrawlReport::new();
        let dimensions = self.settings.dimensions.clone();

        for dimension in &dimensions {
            let sheet = dimension.sheet_name();
            self.progress.report(&dimension_started(&sheet));
            tracing::info!(%sheet, "crawling dimension");

            match self.crawl_dimension(dimension).await {
                Ok(table) => {
                    tracing::info!(
                        sheet = %table.sheet_name,
                        records = table.records.len(),
                        "dimension done"
                    );
                    report.insert(table);
                }
                Err(err) => match self.settings.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(err.context(format!("crawl {sheet}")));
                    }
                    FailurePolicy::Isolate => {
                        let message = format!("{err:#}");
                        tracing::warn!(%sheet, %message, "dimension failed; skipping");
                        report.record_failure(DimensionFailure {
                            sheet_name: sheet,
                            message,
                        });
                    }
                },
            }
        }

        Ok(report)
    }

    /// Runs the crawl, writes the report into `out_dir` and returns the
    /// written file's path. Nothing is written when the crawl fails.
    pub async fn run_to_file(
        &mut self,
        writer: &dyn ReportWriter,
        out_dir: &Path,
        prefix: &str,
    ) -> anyhow::Result<PathBuf> {
        let report = self.run().await?;

        let today = chrono::Local::now().date_naive();
        let file_name = report_file_name(prefix, today, writer.extension());
        let path = out_dir.join(&file_name);
        writer
            .write(&report, &path)
            .with_context(|| format!("write report: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            sheets = report.len(),
            records = report.record_count(),
            failures = report.failures().len(),
            "report written"
        );
        self.progress.report(&run_saved(&file_name));
        Ok(path)
    }

    async fn crawl_dimension(
        &mut self,
        dimension: &RankingDimension,
    ) -> anyhow::Result<DimensionTable> {
        let mut session = self.launcher.launch().await.context("launch session")?;

        let result = crawl_in_session(
            session.as_mut(),
            dimension,
            &self.settings,
            &mut self.progress,
        )
        .await;

        if let Err(err) = session.close().await {
            tracing::warn!(sheet = %dimension.sheet_name(), err = %format!("{err:#}"), "session close failed");
        }

        let records = result?;
        Ok(DimensionTable::new(*dimension, records))
    }
}

async fn crawl_in_session(
    session: &mut dyn PageSession,
    dimension: &RankingDimension,
    settings: &CrawlSettings,
    progress: &mut dyn ProgressSink,
) -> anyhow::Result<Vec<BookRecord>> {
    select_dimension(session, dimension, settings)
        .await
        .context("select ranking")?;
    extract_listing(session, dimension, settings, progress)
        .await
        .context("extract ranking")
}
