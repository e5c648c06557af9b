use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_PREFIX;
use crate::site::DEFAULT_ORIGIN;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl every ranking and write the report.
    Crawl(CrawlArgs),
    /// List the ranking sheets in crawl order.
    Dimensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Xlsx,
    Jsonl,
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Directory the report is written into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Report file name prefix (`<prefix>_<date>.<ext>`).
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    #[arg(long, value_enum, default_value_t = ReportFormat::Xlsx)]
    pub format: ReportFormat,

    /// Site origin the ranking and book paths are resolved against.
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Chromium/Chrome binary to launch.
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// DevTools endpoint of a running browser (e.g. http://127.0.0.1:9222).
    #[arg(long)]
    pub devtools: Option<String>,

    /// Show the browser window.
    #[arg(long)]
    pub headful: bool,

    /// Extra browser command-line argument (repeatable).
    #[arg(long = "chrome-arg", allow_hyphen_values = true)]
    pub chrome_args: Vec<String>,

    /// Skip rankings that fail instead of aborting the run.
    #[arg(long)]
    pub keep_going: bool,

    /// Only crawl the named sheet (repeatable).
    #[arg(long = "only")]
    pub only: Vec<String>,
}
