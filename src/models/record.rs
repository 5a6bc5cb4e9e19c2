// SPDX-License-Identifier: MIT

//! Wire types for AT Protocol repository records
//! (`com.atproto.repo.listRecords`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record from a repository collection.
///
/// The payload is collection-specific; the analytics layer only ever
/// looks at `value.createdAt` and, for profiles, the display fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Record {
    pub uri: String,
    pub cid: String,
    pub value: RecordValue,
}

impl Record {
    /// Creation timestamp parsed as UTC.
    ///
    /// Malformed or missing timestamps yield `None`; callers exclude
    /// such records from their buckets instead of failing.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.value.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Record payload. Unknown fields are ignored so any collection
/// deserializes into the same shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecordValue {
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    // Profile-only fields (app.bsky.actor.profile)
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<BlobRef>,
}

/// Blob reference as stored in profile records.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobRef {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub blob_ref: Option<BlobLink>,
}

impl BlobRef {
    /// The CID link of the blob, if present.
    pub fn link(&self) -> Option<&str> {
        self.blob_ref.as_ref().map(|l| l.link.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobLink {
    #[serde(rename = "$link")]
    pub link: String,
}

/// One wire page from `com.atproto.repo.listRecords`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRecordsResponse {
    pub records: Vec<Record>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A fully fetched collection: all records (API return order,
/// newest-first) plus the number of page requests used to get them.
/// `nb_request` is telemetry only, never part of a computation.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub nb_request: u32,
}
