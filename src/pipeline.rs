use crate::config::load_config;
use crate::fetch::fetch_listing_page;
use crate::finance;
use crate::model::{PropertyRecord, ScrapeReport};
use crate::note;
use crate::parser::parse_listing_page;
use crate::store::write_note;
use crate::vault;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub config_path: PathBuf,
    pub url: String,
    pub page_file: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn scrape_listing(options: &ScrapeOptions) -> Result<ScrapeReport> {
    let config = load_config(&options.config_path)?;

    let page = fetch_listing_page(&config.fetch, &options.url, options.page_file.as_deref())
        .with_context(|| format!("fetch failed for {}", options.url))?;

    let raw = parse_listing_page(&page)
        .with_context(|| format!("extraction failed for {}", options.url))?;
    let record = PropertyRecord::from_raw(raw)
        .with_context(|| format!("record validation failed for {}", options.url))?;

    info!(
        listing_id = ?record.listing_id,
        price = record.price,
        suburb = %record.suburb,
        city = %record.city,
        province = %record.province,
        "listing extracted"
    );

    let summary =
        finance::compute(&record, &config.assumptions).context("financial computation failed")?;
    let (directory, file_name) = vault::resolve(&record, &config.vault.root);
    let rendered = note::render(&record, &summary, &config.assumptions, Utc::now());

    let note_path = directory.join(&file_name);
    let written = if options.dry_run {
        info!(path = %note_path.display(), "dry run enabled; note not written");
        false
    } else {
        write_note(&directory, &file_name, &rendered)?;
        info!(path = %note_path.display(), "note written");
        true
    };

    Ok(ScrapeReport {
        listing_id: record.listing_id,
        title: record.title.clone(),
        price: record.price,
        transfer_duty: summary.transfer_duty,
        total_monthly_cost: summary.total_monthly_cost,
        note_path,
        written,
        note: rendered,
    })
}
