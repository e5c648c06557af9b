use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    rankbook::logging::init().context("init logging")?;

    let cli = rankbook::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        rankbook::cli::Command::Crawl(args) => {
            rankbook::crawl::run(args).await.context("crawl")?;
        }
        rankbook::cli::Command::Dimensions => {
            for dimension in rankbook::dimension::RankingDimension::all() {
                println!("{}", dimension.sheet_name());
            }
        }
    }

    Ok(())
}
