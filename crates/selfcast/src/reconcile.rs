//! Description reconciliation.
//!
//! Pure decision logic: compare remote items against freshly scraped
//! schedule entries and produce the update commands the backend client
//! should issue. Re-running with unchanged inputs, or after the commands
//! have been applied, produces nothing.

use crate::backend::RemoteItem;
use crate::scrape::ScrapedEntry;

/// One description update the caller should apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommand {
    pub item_id: u64,
    pub channel_id: u64,
    pub new_description: String,
}

/// Match each remote item against the first scraped entry sharing its
/// publish date (in the item's own UTC offset). A command is emitted only
/// when a match exists and its description differs; a missing remote
/// description always counts as differing.
pub fn reconcile(remote: &[RemoteItem], scraped: &[ScrapedEntry]) -> Vec<UpdateCommand> {
    remote
        .iter()
        .filter_map(|item| {
            let date = item.published_date();
            let entry = scraped.iter().find(|s| s.date == date)?;
            if item.description.as_deref() == Some(entry.description.as_str()) {
                return None;
            }
            Some(UpdateCommand {
                item_id: item.id,
                channel_id: item.channel_id,
                new_description: entry.description.clone(),
            })
        })
        .collect()
}
