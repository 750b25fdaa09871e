use crate::config::load_config;
use crate::pipeline::{ScrapeOptions, scrape_listing};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub config_path: PathBuf,
    pub url: String,
    pub page_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarnessReport {
    pub first_path: PathBuf,
    pub second_path: PathBuf,
    pub idempotent: bool,
    pub note_files: usize,
    pub price: i64,
    pub transfer_duty: f64,
}

pub fn run_harness(options: &HarnessOptions) -> Result<HarnessReport> {
    let config = load_config(&options.config_path)?;
    if config.vault.root.exists() {
        std::fs::remove_dir_all(&config.vault.root)?;
    }

    let scrape = ScrapeOptions {
        config_path: options.config_path.clone(),
        url: options.url.clone(),
        page_file: Some(options.page_file.clone()),
        dry_run: false,
    };

    let first = scrape_listing(&scrape)?;
    let second = scrape_listing(&scrape)?;

    let mut note_files = 0usize;
    for entry in WalkDir::new(&config.vault.root) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("md")
        {
            note_files += 1;
        }
    }

    Ok(HarnessReport {
        idempotent: first.note_path == second.note_path && note_files == 1,
        first_path: first.note_path,
        second_path: second.note_path,
        note_files,
        price: first.price,
        transfer_duty: first.transfer_duty,
    })
}
