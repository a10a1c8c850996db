use std::{
    net::TcpListener,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use scout::{
    configuration::get_configuration,
    services::{run_scrape_job, ScrapeRequest},
    startup::run,
    telemetry::{init_logging, ErrorLog},
};

#[derive(Parser)]
#[command(name = "scout", about = "Scrape company information from websites")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape a list of websites and write CSV and JSON output.
    Run {
        /// Websites to scrape, scheme optional.
        #[arg(long, num_args = 1.., required_unless_present = "query")]
        urls: Vec<String>,
        /// Search query input (not supported).
        #[arg(long, conflicts_with = "urls")]
        query: Option<String>,
        /// Render pages in a headless browser.
        #[arg(long)]
        dynamic: bool,
        /// Follow "next" links from each seed URL.
        #[arg(long)]
        paginate: bool,
        /// Delay range in seconds between successful requests.
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
        delay: Option<Vec<f64>>,
        /// File with one proxy per line.
        #[arg(long)]
        proxies: Option<PathBuf>,
        /// Extraction config (yaml or json).
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output_csv: Option<String>,
        #[arg(long)]
        output_json: Option<String>,
    },
    /// Start the web dashboard.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut configuration = get_configuration().context("Failed to read configuration.")?;

    let error_log = ErrorLog::open(Path::new(&configuration.scraper.error_log))
        .with_context(|| format!("Failed to open {}", configuration.scraper.error_log))?;
    init_logging(error_log);

    match Cli::parse().command {
        Command::Run {
            urls,
            query,
            dynamic,
            paginate,
            delay,
            proxies,
            config,
            output_csv,
            output_json,
        } => {
            if let Some(query) = query {
                log::warn!(
                    "Search-query input is not supported, ignoring query: {}",
                    query
                );
                return Ok(());
            }

            if let Some(path) = output_csv {
                configuration.scraper.output_csv = path;
            }
            if let Some(path) = output_json {
                configuration.scraper.output_json = path;
            }

            let delay = match delay.as_deref() {
                Some([min, max]) => (*min, *max),
                _ => (
                    configuration.scraper.delay_min_secs,
                    configuration.scraper.delay_max_secs,
                ),
            };
            let request = ScrapeRequest {
                urls,
                dynamic,
                paginate,
                delay,
                proxies_file: proxies,
                config_file: config,
            };

            let report = run_scrape_job(&configuration, &request).await?;
            log::info!("{}", report.outcome);
            println!(
                "Extraction complete. {} records saved to {} and {}",
                report.records,
                report.output_csv.display(),
                report.output_json.display()
            );
        }
        Command::Serve => {
            let address = format!(
                "{}:{}",
                configuration.application.host, configuration.application.port
            );
            let listener = TcpListener::bind(&address)?;
            log::info!("Dashboard listening on http://{}", address);

            run(listener, configuration)?.await?;
        }
    }

    Ok(())
}
