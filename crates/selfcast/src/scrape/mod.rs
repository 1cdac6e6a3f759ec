//! Broadcaster schedule scraping.
//!
//! Descriptions for already-uploaded episodes come from the broadcaster's
//! public schedule, either a per-program HTML page or a JSON feed. Both
//! scrapers emit [`ScrapedEntry`] records keyed by calendar date; the
//! entries live for one reconciliation run and are then discarded.

pub mod feed;
pub mod html;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// One scraped broadcast: the date it aired and its free-text description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedEntry {
    pub date: NaiveDate,
    pub description: String,
}

/// Where a program's descriptions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSource {
    /// Per-program HTML page listing recent on-air sections.
    ProgramPage { url: String },
    /// JSON schedule feed queried with a date-range window.
    ScheduleFeed { url: String },
}

/// Fetch and parse the entries behind a metadata source.
pub async fn fetch_entries(
    client: &reqwest::Client,
    source: &MetadataSource,
) -> Result<Vec<ScrapedEntry>> {
    match source {
        MetadataSource::ProgramPage { url } => {
            let body = fetch_text(client, url, "text/html").await?;
            html::scrape_program_page(&body)
                .with_context(|| format!("failed to scrape program page {url}"))
        }
        MetadataSource::ScheduleFeed { url } => {
            let url = feed::windowed_url(url, chrono::Local::now().date_naive());
            let body = fetch_text(client, &url, "application/json").await?;
            feed::parse_schedule_feed(&body)
                .with_context(|| format!("failed to parse schedule feed {url}"))
        }
    }
}

async fn fetch_text(client: &reqwest::Client, url: &str, accept: &str) -> Result<String> {
    let response = client
        .get(url)
        .header("Accept", accept)
        .send()
        .await
        .with_context(|| format!("failed to fetch {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("schedule source {} returned status {}", url, response.status());
    }

    response
        .text()
        .await
        .with_context(|| format!("failed to read body of {url}"))
}
