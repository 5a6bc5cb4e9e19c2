//! Derived analytics types served to the frontend.
//!
//! These are computed fresh per request from fetched record sets and
//! never persisted. Serialization is camelCase to match the page data
//! contract.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Avatar CDN URL template; `{did}` and the blob CID fill the slots.
pub const AVATAR_CDN_URL: &str = "https://cdn.bsky.app/img/avatar/plain";

/// Placeholder shown when a profile has no avatar.
pub const AVATAR_PLACEHOLDER_URL: &str =
    "https://img.daisyui.com/images/stock/photo-1534528741775-53994a69daeb.webp";

/// Record counts for the previous and current calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCounts {
    pub yesterday: u32,
    pub today: u32,
}

/// One non-empty (weekday, hour) bucket of a punch-card histogram.
///
/// Only buckets with activity are emitted, so `count >= 1` always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PunchCardEntry {
    /// Weekday name, Sun-first ("Sun".."Sat")
    pub weekday: &'static str,
    /// Hour of day, 0-23
    pub hour: u32,
    pub count: u32,
}

/// Punch-card data for one record kind (like/post/repost).
#[derive(Debug, Clone, Serialize)]
pub struct PunchCardGroup {
    pub kind: &'static str,
    pub data: Vec<PunchCardEntry>,
}

/// Cumulative follower count as of an instant.
///
/// Sequences of these are ordered oldest-to-newest; the last point is
/// always "now" with the current total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowPeriodPoint {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

/// The assembled per-identity analytics view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorStats {
    pub did: String,
    pub display_name: String,
    pub handle: String,
    pub avatar: String,
    pub description: String,
    pub likes: ActivityCounts,
    pub posts: ActivityCounts,
    pub reposts: ActivityCounts,
    pub follows_periods: Vec<FollowPeriodPoint>,
    pub follows_total: u64,
    pub punch_card: Vec<PunchCardGroup>,
    pub total_likes: u64,
    pub total_posts: u64,
    pub total_reposts: u64,
}

/// Build the CDN avatar URL for a profile blob CID.
pub fn avatar_url(did: &str, blob_cid: &str) -> String {
    format!("{AVATAR_CDN_URL}/{did}/{blob_cid}@jpeg")
}
