//! Program-page HTML scraping.
//!
//! The broadcaster publishes one page per program with an on-air section
//! per recent broadcast: a `<time datetime>` element for the date and a
//! summary paragraph for the description.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use scraper::{Html, Selector};

use super::ScrapedEntry;

/// Extract (date, description) pairs from a program page.
///
/// Missing expected markup is an error: a silently empty result would make
/// every reconciliation a no-op and hide a page-layout change.
pub fn scrape_program_page(html: &str) -> Result<Vec<ScrapedEntry>> {
    let document = Html::parse_document(html);
    let section_sel = selector("section.section_onair")?;
    let date_sel = selector(".date time")?;
    let summary_sel = selector(".summary_text p")?;

    let mut entries = Vec::new();
    for section in document.select(&section_sel) {
        let time = section
            .select(&date_sel)
            .next()
            .context("on-air section has no date element")?;
        let datetime = time
            .value()
            .attr("datetime")
            .context("date element has no datetime attribute")?;
        let date = parse_datetime_attr(datetime)
            .with_context(|| format!("cannot parse broadcast date {datetime:?}"))?;

        // A summary may span several paragraphs; take them all, in order.
        let paragraphs: Vec<String> = section
            .select(&summary_sel)
            .map(|p| p.inner_html())
            .collect();
        if paragraphs.is_empty() {
            anyhow::bail!("on-air section has no summary paragraph");
        }
        let description = replace_breaks(&paragraphs.concat());

        entries.push(ScrapedEntry { date, description });
    }
    Ok(entries)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css}: {e}"))
}

fn parse_datetime_attr(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Literal line-break markup becomes newlines; other markup is kept as-is.
fn replace_breaks(html: &str) -> String {
    html.replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
}
