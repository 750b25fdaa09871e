use crate::config::FetchConfig;
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub source_url: String,
    pub body: Vec<u8>,
}

pub fn fetch_listing_page(
    config: &FetchConfig,
    url: &str,
    page_file: Option<&Path>,
) -> Result<FetchedPage> {
    if let Some(path) = page_file {
        let body = std::fs::read(path)
            .with_context(|| format!("failed to read page file {}", path.display()))?;
        info!(url, file = %path.display(), bytes = body.len(), "loaded listing page from file");
        return Ok(FetchedPage {
            source_url: url.to_string(),
            body,
        });
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).context("invalid user agent")?,
    );

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()
        .context("failed to build reqwest client")?;

    let body = fetch_with_retries(&client, url, config.retry_attempts, config.retry_backoff_ms)?;
    info!(url, bytes = body.len(), "fetched listing page");

    Ok(FetchedPage {
        source_url: url.to_string(),
        body,
    })
}

fn fetch_with_retries(
    client: &Client,
    url: &str,
    retry_attempts: u8,
    retry_backoff_ms: u64,
) -> Result<Vec<u8>> {
    let attempts = retry_attempts.max(1);

    for attempt in 1..=attempts {
        match client.get(url).send() {
            Ok(resp) => {
                if !resp.status().is_success() {
                    let status = resp.status();
                    if attempt == attempts {
                        bail!("request to {url} failed with status {status}");
                    }
                    warn!(%url, %status, attempt, "request failed; retrying");
                } else {
                    return Ok(resp.bytes()?.to_vec());
                }
            }
            Err(err) => {
                if attempt == attempts {
                    return Err(err).with_context(|| format!("request to {url} failed"));
                }
                warn!(%url, attempt, error = %err, "request errored; retrying");
            }
        }

        std::thread::sleep(Duration::from_millis(retry_backoff_ms));
    }

    bail!("request to {url} failed after retries")
}
