//! Channel and program schedule registry.
//!
//! Schedules are data, not code: the default table ships as an embedded
//! `schedule.toml` and can be swapped with `--schedule <file>` without
//! touching any logic.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scrape::MetadataSource;

const DEFAULT_SCHEDULE: &str = include_str!("../schedule.toml");

/// Weekday number, 0 = Sunday .. 6 = Saturday.
pub type Weekday = u8;

/// Registry of channels keyed by name.
#[derive(Debug, Clone, Deserialize)]
pub struct Schedule {
    #[serde(rename = "channel", default)]
    pub channels: Vec<Channel>,
}

/// A broadcast source with its backend channel id and weekly program slots.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub name: String,
    pub id: u64,
    #[serde(rename = "program", default)]
    pub programs: Vec<ScheduleEntry>,
}

/// One recurring program slot.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleEntry {
    pub name: String,
    /// Broadcast start as a zero-padded "HHMM" wall-clock string.
    pub at: String,
    pub weekdays: BTreeSet<Weekday>,
    /// HTML program page carrying per-broadcast descriptions.
    #[serde(default)]
    pub page_url: Option<String>,
    /// JSON schedule feed, queried with a date window.
    #[serde(default)]
    pub feed_url: Option<String>,
}

impl Schedule {
    /// Parse the embedded default table.
    pub fn load_default() -> Result<Self> {
        Self::from_toml_str(DEFAULT_SCHEDULE).context("embedded schedule.toml is invalid")
    }

    /// Parse a schedule file supplied on the command line.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schedule file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse schedule file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let schedule: Self = toml::from_str(content)?;
        Ok(schedule)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }
}

impl Channel {
    /// First program listed for the given "HHMM" slot and weekday.
    /// List order is the tie-break: the first match wins.
    pub fn program_at(&self, at: &str, weekday: Weekday) -> Option<&ScheduleEntry> {
        self.programs
            .iter()
            .find(|p| p.at == at && p.weekdays.contains(&weekday))
    }
}

impl ScheduleEntry {
    /// Where this program's descriptions come from, if anywhere.
    /// A page URL takes precedence when both are given.
    pub fn metadata_source(&self) -> Option<MetadataSource> {
        if let Some(url) = &self.page_url {
            Some(MetadataSource::ProgramPage { url: url.clone() })
        } else {
            self.feed_url
                .as_ref()
                .map(|url| MetadataSource::ScheduleFeed { url: url.clone() })
        }
    }
}
