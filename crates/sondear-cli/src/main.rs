//! Sondear CLI: probe an HTML page and extract a best-effort FSM.
//!
//! ## Usage
//!
//! ```bash
//! sondear demos/bst-visualizer.html
//! sondear page.html --output fsm.json --headed -v
//! ```

use clap::error::ErrorKind;
use clap::Parser;
use sondear::{Browser, BrowserConfig, ExploreOptions, Explorer, FsmResult, SettleOptions};
use sondear_cli::{target_url, Cli, CliResult, Reporter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    let reporter = Reporter::new(console::colors_enabled(), cli.quiet);

    let url = target_url(&cli.target)?;
    reporter.stage(&format!("Loading {url}"));

    let mut config = BrowserConfig::default().with_headless(!cli.headed);
    if let Some(ref path) = cli.chromium_path {
        config = config.with_chromium_path(path);
    }
    if cli.no_sandbox {
        config = config.with_no_sandbox();
    }

    let browser = Browser::launch(config).await?;

    // Close the browser no matter how exploration went
    let explored = explore(&browser, &url, &cli, &reporter).await;
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "browser close failed");
    }
    let fsm = explored?;

    std::fs::write(&cli.output, fsm.to_pretty_json()?)?;
    reporter.stage(&format!("Wrote {}", cli.output.display()));
    reporter.summary(&fsm);

    Ok(())
}

async fn explore(
    browser: &Browser,
    url: &str,
    cli: &Cli,
    reporter: &Reporter,
) -> CliResult<FsmResult> {
    let mut page = browser.new_page().await?;
    page.goto(url).await?;

    reporter.stage("Probing interactive elements");
    let explorer = Explorer::with_options(
        ExploreOptions::new()
            .with_fill_value(&cli.fill_value)
            .with_settle(SettleOptions::new().with_timeout(cli.settle_timeout_ms)),
    );
    Ok(explorer.run(&page).await)
}
