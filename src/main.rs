use anyhow::Result;
use clap::{Parser, Subcommand};
use propnote::config::load_config;
use propnote::harness::{HarnessOptions, run_harness};
use propnote::pipeline::{ScrapeOptions, scrape_listing};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "propnote", about = "Property listing scraper and vault note generator")]
struct Cli {
    #[arg(long, default_value = "configs/propnote.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Scrape {
        #[arg(long)]
        url: String,
        #[arg(long)]
        page_file: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    Validate,
    Harness {
        #[arg(long)]
        url: String,
        #[arg(long)]
        page_file: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            url,
            page_file,
            dry_run,
        } => {
            let report = scrape_listing(&ScrapeOptions {
                config_path: cli.config,
                url,
                page_file,
                dry_run,
            })?;

            info!(
                listing_id = ?report.listing_id,
                title = %report.title,
                price = report.price,
                path = %report.note_path.display(),
                written = report.written,
                "scrape complete"
            );

            if dry_run {
                println!("{}", report.note);
            }
        }
        Commands::Validate => {
            let config = load_config(&cli.config)?;
            println!(
                "OK: {} ({} transfer duty brackets)",
                cli.config.display(),
                config.assumptions.transfer_duty_brackets.len()
            );
        }
        Commands::Harness { url, page_file } => {
            let report = run_harness(&HarnessOptions {
                config_path: cli.config,
                url,
                page_file,
            })?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
