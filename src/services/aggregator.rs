// SPDX-License-Identifier: MIT

//! Aggregation orchestrator: handle -> DID -> PDS -> analytics.
//!
//! All five collection fetches run in parallel with fail-fast join
//! semantics; any failure aborts the whole aggregation (the route
//! layer turns that into a fallback redirect). No retries, no partial
//! results.

use chrono::Utc;

use crate::error::AppError;
use crate::models::stats::{avatar_url, AVATAR_PLACEHOLDER_URL};
use crate::models::{ActorStats, PunchCardGroup};
use crate::services::analytics::{build_follow_timeline, build_punch_card, count_activity};
use crate::services::identity::IdentityResolver;
use crate::services::repo::{collections, RepoClient};

/// Computes the per-identity analytics view.
#[derive(Clone)]
pub struct StatsAggregator {
    http: reqwest::Client,
    resolver: IdentityResolver,
}

impl StatsAggregator {
    pub fn new(http: reqwest::Client, appview_url: String, plc_directory_url: String) -> Self {
        let resolver = IdentityResolver::new(http.clone(), appview_url, plc_directory_url);
        Self { http, resolver }
    }

    /// Resolve `handle` and assemble its activity analytics.
    pub async fn aggregate(&self, handle: &str) -> Result<ActorStats, AppError> {
        let did = self
            .resolver
            .resolve_handle(handle)
            .await?
            .ok_or_else(|| AppError::Resolution(format!("unresolvable handle: {}", handle)))?;

        let document = self
            .resolver
            .resolve_did_document(&did)
            .await?
            .ok_or_else(|| AppError::Resolution(format!("no DID document for {}", did)))?;

        let pds = document
            .pds_endpoint()
            .ok_or_else(|| AppError::Resolution(format!("no PDS endpoint for {}", did)))?
            .to_string();

        tracing::debug!(%handle, %did, %pds, "Identity resolved");

        let repo = RepoClient::new(self.http.clone(), pds, did.clone());

        // Fan-out: profile needs one page, the rest are fetched fully.
        // try_join! fails fast if any fetch errors.
        let (profile, likes, posts, reposts, follows) = tokio::try_join!(
            repo.list_records(collections::PROFILE, None),
            repo.list_records_all(collections::LIKE),
            repo.list_records_all(collections::POST),
            repo.list_records_all(collections::REPOST),
            repo.list_records_all(collections::FOLLOW),
        )?;

        let total_requests =
            likes.nb_request + posts.nb_request + reposts.nb_request + follows.nb_request + 1;
        tracing::info!(%handle, total_requests, "Records fetched");

        let now = Utc::now();

        let follows_periods = build_follow_timeline(&follows.records, now);
        let follows_total = follows.records.len() as u64;

        let punch_card = vec![
            PunchCardGroup {
                kind: "like",
                data: build_punch_card(&likes.records),
            },
            PunchCardGroup {
                kind: "post",
                data: build_punch_card(&posts.records),
            },
            PunchCardGroup {
                kind: "repost",
                data: build_punch_card(&reposts.records),
            },
        ];

        // Profile fallbacks: handle for missing/empty display name,
        // stock image for a missing avatar.
        let profile_value = profile.records.first().map(|r| &r.value);

        let display_name = profile_value
            .and_then(|v| v.display_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| handle.to_string());

        let avatar = profile_value
            .and_then(|v| v.avatar.as_ref())
            .and_then(|blob| blob.link())
            .map(|cid| avatar_url(&did, cid))
            .unwrap_or_else(|| AVATAR_PLACEHOLDER_URL.to_string());

        let description = profile_value
            .and_then(|v| v.description.clone())
            .unwrap_or_default();

        Ok(ActorStats {
            did,
            display_name,
            handle: handle.to_string(),
            avatar,
            description,
            likes: count_activity(&likes.records, now),
            posts: count_activity(&posts.records, now),
            reposts: count_activity(&reposts.records, now),
            follows_periods,
            follows_total,
            punch_card,
            total_likes: likes.records.len() as u64,
            total_posts: posts.records.len() as u64,
            total_reposts: reposts.records.len() as u64,
        })
    }
}
