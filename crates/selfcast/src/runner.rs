//! Scan-and-upload orchestration.
//!
//! One invocation expands the given paths into files, uploads each one
//! strictly sequentially, then optionally refreshes episode descriptions.
//! A failed upload aborts the invocation; files already uploaded stay
//! uploaded (no rollback, no retry).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use tracing::info;

use crate::backend::{BackendClient, NewItem};
use crate::filename;
use crate::reconcile::reconcile;
use crate::schedule::Schedule;
use crate::scrape;
use crate::title;

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub delete: bool,
    pub update_metadata: bool,
    /// Channel used when a filename carries no channel token.
    pub channel_override: Option<String>,
}

pub struct Runner {
    client: BackendClient,
    schedule: Schedule,
    options: Options,
}

impl Runner {
    pub fn new(client: BackendClient, schedule: Schedule, options: Options) -> Self {
        Self {
            client,
            schedule,
            options,
        }
    }

    /// One full invocation: upload everything under `paths`, then refresh
    /// descriptions when requested.
    pub async fn process(&self, paths: &[PathBuf]) -> Result<()> {
        self.scan(paths).await?;
        if self.options.update_metadata {
            self.update_metadata().await?;
        }
        Ok(())
    }

    /// Upload every file under `paths`, in enumeration order.
    pub async fn scan(&self, paths: &[PathBuf]) -> Result<()> {
        for file in collect_files(paths)? {
            self.upload(&file).await?;
        }
        Ok(())
    }

    async fn upload(&self, file: &Path) -> Result<()> {
        let basename = file
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("file name is not valid UTF-8: {}", file.display()))?;

        let (channel_name, title, published_at) = match filename::parse(basename) {
            Some(parsed) => {
                // --channel overrides the token auto-detected from the name.
                let channel = self
                    .options
                    .channel_override
                    .clone()
                    .or_else(|| parsed.channel.clone())
                    .or_else(|| self.first_channel())
                    .context("filename carries no channel token and no --channel was given")?;
                let title = title::synthesize(&channel, parsed.timestamp, &self.schedule);
                (channel, title, local_datetime(parsed.timestamp)?)
            }
            // Not recognized: unstructured upload under the raw filename.
            None => {
                let channel = self
                    .options
                    .channel_override
                    .clone()
                    .or_else(|| self.first_channel())
                    .context("--channel is required for files without a recognizable name")?;
                (channel, basename.to_string(), Local::now())
            }
        };

        let channel_id = self
            .schedule
            .channel(&channel_name)
            .with_context(|| format!("channel {channel_name:?} is not in the schedule"))?
            .id;

        info!("uploading {}", file.display());
        info!("title: {title}");
        info!("published at: {}", published_at.to_rfc3339());

        let item = NewItem {
            content_filename: basename.to_string(),
            title,
            published_at,
        };
        let (location, target) = self.client.create_item(channel_id, &item).await?;
        if let Some(location) = location {
            info!("metadata created at {location}");
        }

        match self.client.upload(&target, file).await? {
            Some(location) => info!("uploaded to {location}"),
            None => info!("upload complete"),
        }

        if self.options.delete {
            tokio::fs::remove_file(file)
                .await
                .with_context(|| format!("failed to delete {}", file.display()))?;
            info!("deleted {}", file.display());
        }
        Ok(())
    }

    /// Refresh descriptions for every program that names a metadata source.
    pub async fn update_metadata(&self) -> Result<()> {
        for channel in &self.schedule.channels {
            for program in &channel.programs {
                let Some(source) = program.metadata_source() else {
                    continue;
                };
                info!("checking metadata for {} {}", channel.name, program.name);

                let scraped = scrape::fetch_entries(self.client.http(), &source).await?;
                let remote = self.client.list_items(channel.id, &program.name).await?;

                for command in reconcile(&remote, &scraped) {
                    info!("updating description of item {}", command.item_id);
                    self.client.update_description(&command).await?;
                }
            }
        }
        Ok(())
    }

    fn first_channel(&self) -> Option<String> {
        self.schedule.channels.first().map(|c| c.name.clone())
    }
}

/// Attach the local UTC offset to a wall-clock time. Nonexistent local
/// times (DST gaps) are an error; ambiguous ones take the earlier offset.
fn local_datetime(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("wall-clock time {naive} does not exist locally"))
}

/// Expand files and directories into a flat, deterministically ordered
/// file list. Directories are walked recursively with sorted entries.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to enumerate {}", dir.display()))?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
