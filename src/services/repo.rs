// SPDX-License-Identifier: MIT

//! PDS repository client for fetching record collections.
//!
//! Wraps `com.atproto.repo.listRecords`: a single-page fetch plus a
//! fetch-all helper that follows cursors until the collection is
//! exhausted, counting the requests used.

use crate::error::AppError;
use crate::models::{ListRecordsResponse, RecordSet};

/// Records fetched per page (the XRPC maximum).
const PAGE_LIMIT: u32 = 100;

/// Collection NSIDs fetched by the aggregator.
pub mod collections {
    pub const PROFILE: &str = "app.bsky.actor.profile";
    pub const LIKE: &str = "app.bsky.feed.like";
    pub const POST: &str = "app.bsky.feed.post";
    pub const REPOST: &str = "app.bsky.feed.repost";
    pub const FOLLOW: &str = "app.bsky.graph.follow";
}

/// Client for one identity's repository on its hosting PDS.
#[derive(Clone)]
pub struct RepoClient {
    http: reqwest::Client,
    pds_url: String,
    did: String,
}

impl RepoClient {
    pub fn new(http: reqwest::Client, pds_url: String, did: String) -> Self {
        Self { http, pds_url, did }
    }

    /// Fetch one page of a collection.
    pub async fn list_records(
        &self,
        collection: &str,
        cursor: Option<&str>,
    ) -> Result<ListRecordsResponse, AppError> {
        let url = format!("{}/xrpc/com.atproto.repo.listRecords", self.pds_url);

        let mut query: Vec<(&str, String)> = vec![
            ("repo", self.did.clone()),
            ("collection", collection.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("listRecords({}) failed: {}", collection, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Fetch(format!(
                "listRecords({}) HTTP {}: {}",
                collection, status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::Fetch(format!("listRecords({}) JSON parse error: {}", collection, e))
        })
    }

    /// Fetch every page of a collection, concatenated in API return
    /// order (newest-first). `nb_request` reports the pages fetched.
    pub async fn list_records_all(&self, collection: &str) -> Result<RecordSet, AppError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut nb_request: u32 = 0;

        loop {
            let page = self.list_records(collection, cursor.as_deref()).await?;
            nb_request += 1;
            records.extend(page.records);

            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(
            collection,
            records = records.len(),
            nb_request,
            "Collection fetched"
        );

        Ok(RecordSet {
            records,
            nb_request,
        })
    }
}
