//! JSON schedule-feed scraping.
//!
//! Newer broadcaster APIs expose the schedule as JSON: a `list` object
//! keyed by service, each holding `{start_time, free}` records. The free
//! text arrives with full-width ASCII and stray leading spaces, so it is
//! NFKC-folded and trimmed before use.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use super::ScrapedEntry;

/// Days of history requested from the feed, counting back from today.
const WINDOW_DAYS: u64 = 7;

#[derive(Debug, Deserialize)]
struct FeedResponse {
    list: BTreeMap<String, Vec<FeedRecord>>,
}

#[derive(Debug, Deserialize)]
struct FeedRecord {
    start_time: DateTime<FixedOffset>,
    #[serde(default)]
    free: Option<String>,
}

/// Append the date-range query window to a feed URL.
pub fn windowed_url(base: &str, today: NaiveDate) -> String {
    let from = today - Days::new(WINDOW_DAYS);
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}from={from}&to={today}")
}

/// Parse the feed body into dated entries. Records without usable free
/// text are skipped; the match key is the start time's own-offset date.
pub fn parse_schedule_feed(json: &str) -> Result<Vec<ScrapedEntry>> {
    let response: FeedResponse =
        serde_json::from_str(json).context("malformed schedule feed body")?;

    let mut entries = Vec::new();
    for records in response.list.values() {
        for record in records {
            let Some(free) = &record.free else { continue };
            let description = normalize_free_text(free);
            if description.is_empty() {
                continue;
            }
            entries.push(ScrapedEntry {
                date: record.start_time.date_naive(),
                description,
            });
        }
    }
    Ok(entries)
}

/// NFKC folds full-width ASCII (and the ideographic space) to half-width;
/// leading whitespace is then stripped.
fn normalize_free_text(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    folded.trim_start().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windowed_url_spans_a_week() {
        let today = NaiveDate::from_ymd_opt(2015, 3, 10).unwrap();
        let url = windowed_url("https://api.example.com/list/r3/458.json", today);
        assert_eq!(
            url,
            "https://api.example.com/list/r3/458.json?from=2015-03-03&to=2015-03-10"
        );
    }

    #[test]
    fn windowed_url_appends_to_existing_query() {
        let today = NaiveDate::from_ymd_opt(2015, 3, 10).unwrap();
        let url = windowed_url("https://api.example.com/list.json?key=abc", today);
        assert!(url.starts_with("https://api.example.com/list.json?key=abc&from="));
    }

    #[test]
    fn parses_records_across_services() {
        let body = r#"{
            "list": {
                "r3": [
                    {"start_time": "2015-03-10T14:00:00+09:00", "free": "シューベルト特集"},
                    {"start_time": "2015-03-11T14:00:00+09:00", "free": "バッハ特集"}
                ]
            }
        }"#;
        let entries = parse_schedule_feed(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2015, 3, 10).unwrap()
        );
        assert_eq!(entries[0].description, "シューベルト特集");
    }

    #[test]
    fn start_time_date_uses_its_own_offset() {
        // 2015-03-10 00:30 +09:00 is still 2015-03-09 in UTC; the key must
        // be the local date 2015-03-10.
        let body = r#"{
            "list": {"r3": [{"start_time": "2015-03-10T00:30:00+09:00", "free": "x"}]}
        }"#;
        let entries = parse_schedule_feed(body).unwrap();
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2015, 3, 10).unwrap()
        );
    }

    #[test]
    fn free_text_is_width_folded_and_trimmed() {
        let body = "{\"list\": {\"r3\": [{\"start_time\": \"2015-03-10T14:00:00+09:00\", \"free\": \"\u{3000} ＢＥＳＴ　ｏｆ ＣＬＡＳＳＩＣ\"}]}}";
        let entries = parse_schedule_feed(body).unwrap();
        assert_eq!(entries[0].description, "BEST of CLASSIC");
    }

    #[test]
    fn records_without_free_text_are_skipped() {
        let body = r#"{
            "list": {"r3": [
                {"start_time": "2015-03-10T14:00:00+09:00"},
                {"start_time": "2015-03-11T14:00:00+09:00", "free": "　"},
                {"start_time": "2015-03-12T14:00:00+09:00", "free": "keep"}
            ]}
        }"#;
        let entries = parse_schedule_feed(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "keep");
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_schedule_feed("not json").is_err());
        assert!(parse_schedule_feed("{}").is_err());
    }
}
