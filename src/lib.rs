// SPDX-License-Identifier: MIT

//! Skystats: public-activity analytics for AT Protocol identities
//!
//! This crate provides the backend API that resolves a Bluesky handle,
//! pages through the identity's repository records and derives activity
//! analytics (24h counters, follow timeline, punch-cards).

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::StatsAggregator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub aggregator: StatsAggregator,
}
