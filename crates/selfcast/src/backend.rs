//! Podcast backend REST client.
//!
//! Three endpoints: create an item (which hands back a presigned upload
//! target), list a channel's items by title, and update an item's
//! description. Authentication is a static token carried in the request
//! body or query string.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::reconcile::UpdateCommand;

/// An episode record owned by the backend; read here, never created by
/// hand.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteItem {
    pub id: u64,
    pub channel_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub published_at: DateTime<FixedOffset>,
}

impl RemoteItem {
    /// Calendar date of the publish time, in its own UTC offset. This is
    /// the reconciliation match key.
    pub fn published_date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// Metadata for an episode about to be created.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub content_filename: String,
    pub title: String,
    pub published_at: DateTime<Local>,
}

/// Presigned upload destination issued by the backend. The API changed
/// shape over time; both forms are supported and dispatched explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// POST a multipart form carrying the presigned fields plus the file.
    FormPost {
        url: String,
        fields: BTreeMap<String, String>,
    },
    /// PUT the raw file body.
    DirectPut { url: String },
}

#[derive(Debug, Deserialize)]
struct CreateItemResponse {
    #[serde(default)]
    presigned_post: Option<PresignedPost>,
    #[serde(default)]
    presigned_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PresignedPost {
    url: String,
    fields: BTreeMap<String, String>,
}

fn resolve_upload_target(response: CreateItemResponse) -> Result<UploadTarget> {
    match (response.presigned_post, response.presigned_url) {
        (Some(post), _) => Ok(UploadTarget::FormPost {
            url: post.url,
            fields: post.fields,
        }),
        (None, Some(url)) => Ok(UploadTarget::DirectPut { url }),
        (None, None) => anyhow::bail!("item creation response carries no upload target"),
    }
}

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Shared HTTP client, reused by the schedule scrapers.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn items_url(&self, channel_id: u64) -> String {
        format!("{}/channels/{}/items.json", self.base_url, channel_id)
    }

    /// Create the episode record. Returns the `Location` of the new item
    /// (when the backend sends one) and the resolved upload target.
    pub async fn create_item(
        &self,
        channel_id: u64,
        item: &NewItem,
    ) -> Result<(Option<String>, UploadTarget)> {
        let body = json!({
            "item": {
                "content_filename": item.content_filename,
                "title": item.title,
                "published_at": item.published_at.to_rfc3339(),
            },
            "auth_token": self.auth_token,
        });

        let response = self
            .http
            .post(self.items_url(channel_id))
            .json(&body)
            .send()
            .await
            .context("failed to create item on backend")?;

        if !response.status().is_success() {
            anyhow::bail!("item creation returned status {}", response.status());
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let created: CreateItemResponse = response
            .json()
            .await
            .context("failed to parse item creation response")?;

        Ok((location, resolve_upload_target(created)?))
    }

    /// Push the file body to a presigned target. Returns the storage
    /// `Location` when the target reports one.
    pub async fn upload(&self, target: &UploadTarget, file: &Path) -> Result<Option<String>> {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        let filename = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let response = match target {
            UploadTarget::FormPost { url, fields } => {
                let mut form = reqwest::multipart::Form::new();
                for (key, value) in fields {
                    form = form.text(key.clone(), value.clone());
                }
                form = form.part(
                    "file",
                    reqwest::multipart::Part::bytes(bytes).file_name(filename),
                );
                self.http
                    .post(url)
                    .multipart(form)
                    .send()
                    .await
                    .context("presigned form post failed")?
            }
            UploadTarget::DirectPut { url } => self
                .http
                .put(url)
                .body(bytes)
                .send()
                .await
                .context("presigned put failed")?,
        };

        if !response.status().is_success() {
            anyhow::bail!("file upload returned status {}", response.status());
        }

        Ok(response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string))
    }

    /// List a channel's items filtered by exact title.
    pub async fn list_items(&self, channel_id: u64, title: &str) -> Result<Vec<RemoteItem>> {
        let response = self
            .http
            .get(self.items_url(channel_id))
            .query(&[("title", title), ("auth_token", self.auth_token.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .context("failed to list items")?;

        if !response.status().is_success() {
            anyhow::bail!("item listing returned status {}", response.status());
        }

        response.json().await.context("failed to parse item listing")
    }

    /// Apply one reconciliation command.
    pub async fn update_description(&self, command: &UpdateCommand) -> Result<()> {
        let url = format!(
            "{}/channels/{}/items/{}.json",
            self.base_url, command.channel_id, command.item_id
        );
        let body = json!({
            "item": {"description": command.new_description},
            "auth_token": self.auth_token,
        });

        let response = self
            .http
            .put(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to update item {}", command.item_id))?;

        if !response.status().is_success() {
            anyhow::bail!("item update returned status {}", response.status());
        }
        Ok(())
    }
}
