//! Recording filename parsing.
//!
//! Capture tools encode the broadcast time (and sometimes the channel) in
//! the filename. Two variants are recognized:
//!
//! - `YYYYMMDDHHMMSS-FM.mp3`: compact timestamp with a fixed station
//!   suffix; the channel comes from elsewhere (`--channel` or schedule).
//! - `YYMMDD_HHMM_<channel>.mp3`: short timestamp with a trailing channel
//!   token.
//!
//! Timestamps are literal wall-clock numbers; no timezone conversion.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Broadcast metadata recovered from a recording's filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecording {
    pub timestamp: NaiveDateTime,
    /// Channel token from the filename, NFC-normalized. `None` when the
    /// variant carries no token.
    pub channel: Option<String>,
}

/// Parse a recording filename. `None` means not recognized; the caller
/// falls back to an unstructured upload, this is not an error.
pub fn parse(filename: &str) -> Option<ParsedRecording> {
    parse_compact(filename).or_else(|| parse_underscored(filename))
}

/// `20150310142500-FM.mp3` (seconds are ignored).
fn parse_compact(filename: &str) -> Option<ParsedRecording> {
    let re = Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})\d{2}-FM\.(?i:mp3)$").ok()?;
    let caps = re.captures(filename)?;

    let timestamp = wall_clock(
        caps[1].parse().ok()?,
        &caps[2],
        &caps[3],
        &caps[4],
        &caps[5],
    )?;
    Some(ParsedRecording {
        timestamp,
        channel: None,
    })
}

/// `150310_1425_NHK-FM.MP3` with a 2-digit year and trailing channel token.
fn parse_underscored(filename: &str) -> Option<ParsedRecording> {
    let re = Regex::new(r"^(\d{2})(\d{2})(\d{2})_(\d{2})(\d{2})_(.+)\.(?i:mp3)$").ok()?;
    let caps = re.captures(filename)?;

    let year = 2000 + caps[1].parse::<i32>().ok()?;
    let timestamp = wall_clock(year, &caps[2], &caps[3], &caps[4], &caps[5])?;

    // Filesystem name mangling (HFS in particular) can hand us decomposed
    // Japanese characters; without NFC the schedule lookup silently misses.
    let channel: String = caps[6].nfc().collect();

    Some(ParsedRecording {
        timestamp,
        channel: Some(channel),
    })
}

fn wall_clock(year: i32, month: &str, day: &str, hour: &str, minute: &str) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)?
        .and_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
