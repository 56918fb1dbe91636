// Post archive backed by Google Sheets
//
// Two tabs are used: "Rules" (platform name, formatting rules) and "Posts"
// (platform, topic, posted-at). Reads go through the values API; appends go
// through values:append with RAW input.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ArchivedPost, BasePostArchive};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const RULES_RANGE: &str = "Rules!A:B";
const POSTS_RANGE: &str = "Posts!A:C";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}

/// Google Sheets implementation of the post archive
#[derive(Clone)]
pub struct SheetsArchive {
    api_key: String,
    spreadsheet_id: String,
    client: reqwest::Client,
}

impl SheetsArchive {
    pub fn new(api_key: String, spreadsheet_id: String) -> Self {
        Self {
            api_key,
            spreadsheet_id,
            client: reqwest::Client::new(),
        }
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/{}/values/{}?key={}",
            SHEETS_BASE, self.spreadsheet_id, range, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach Sheets API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sheets API error {}: {}", status, body);
        }

        let range: ValueRange = response
            .json()
            .await
            .context("Failed to parse Sheets response")?;
        Ok(range.values)
    }
}

/// Parse archive rows (platform, topic, posted-at) into summaries, newest
/// first. Rows with a missing or unparseable timestamp are skipped.
fn parse_summary_rows(values: Vec<Vec<String>>) -> Vec<ArchivedPost> {
    let mut posts: Vec<ArchivedPost> = values
        .into_iter()
        .filter_map(|row| {
            let platform = row.first()?.clone();
            let topic = row.get(1)?.clone();
            let posted_at = DateTime::parse_from_rfc3339(row.get(2)?)
                .ok()?
                .with_timezone(&Utc);
            Some(ArchivedPost {
                platform,
                topic,
                posted_at,
            })
        })
        .collect();
    posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    posts
}

#[async_trait]
impl BasePostArchive for SheetsArchive {
    async fn formatting_rules(&self) -> Result<HashMap<String, String>> {
        let rows = self.read_range(RULES_RANGE).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let platform = row.first()?.clone();
                let rules = row.get(1)?.clone();
                Some((platform, rules))
            })
            .collect())
    }

    async fn is_duplicate_topic(&self, topic: &str) -> Result<bool> {
        let needle = topic.to_lowercase();
        let rows = self.read_range(POSTS_RANGE).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get(1))
            .any(|t| t.to_lowercase() == needle))
    }

    async fn append_summary(
        &self,
        platform: &str,
        topic: &str,
        posted_at: DateTime<Utc>,
    ) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=RAW&key={}",
            SHEETS_BASE, self.spreadsheet_id, POSTS_RANGE, self.api_key
        );
        let body = AppendBody {
            values: vec![vec![
                platform.to_string(),
                topic.to_string(),
                posted_at.to_rfc3339(),
            ]],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Sheets API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sheets append error {}: {}", status, body);
        }

        tracing::debug!(platform, topic, "Appended post summary to archive");
        Ok(())
    }

    async fn recent_summaries(&self, limit: usize, offset: usize) -> Result<Vec<ArchivedPost>> {
        let rows = self.read_range(POSTS_RANGE).await?;
        Ok(parse_summary_rows(rows)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }
}

/// No-op archive used when the Sheets integration is not configured.
///
/// Reads return empty results and appends succeed silently, so the workflow
/// behaves as if there were no archive history.
pub struct NullArchive;

#[async_trait]
impl BasePostArchive for NullArchive {
    async fn formatting_rules(&self) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn is_duplicate_topic(&self, _topic: &str) -> Result<bool> {
        Ok(false)
    }

    async fn append_summary(&self, _platform: &str, _topic: &str, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }

    async fn recent_summaries(&self, _limit: usize, _offset: usize) -> Result<Vec<ArchivedPost>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(platform: &str, topic: &str, at: &str) -> Vec<String> {
        vec![platform.to_string(), topic.to_string(), at.to_string()]
    }

    #[test]
    fn summary_rows_sorted_newest_first() {
        let rows = vec![
            row("Facebook", "Oil changes", "2026-08-01T09:00:00+00:00"),
            row("X", "Winter tires", "2026-08-15T09:00:00+00:00"),
            row("Instagram", "Brake pads", "2026-08-10T09:00:00+00:00"),
        ];

        let parsed = parse_summary_rows(rows);

        let topics: Vec<&str> = parsed.iter().map(|p| p.topic.as_str()).collect();
        assert_eq!(topics, vec!["Winter tires", "Brake pads", "Oil changes"]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows = vec![
            row("Facebook", "Oil changes", "not-a-date"),
            vec!["X".to_string()],
            row("Instagram", "Brake pads", "2026-08-10T09:00:00+00:00"),
        ];

        let parsed = parse_summary_rows(rows);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].topic, "Brake pads");
    }

    #[tokio::test]
    async fn null_archive_reads_empty_and_appends_ok() {
        let archive = NullArchive;

        assert!(archive.formatting_rules().await.unwrap().is_empty());
        assert!(!archive.is_duplicate_topic("anything").await.unwrap());
        assert!(archive
            .append_summary("X", "Brakes", Utc::now())
            .await
            .is_ok());
        assert!(archive.recent_summaries(10, 0).await.unwrap().is_empty());
    }
}
