// SPDX-License-Identifier: MIT

use skystats::config::{Config, ProxyRule};
use skystats::routes::create_router;
use skystats::services::StatsAggregator;
use skystats::AppState;
use std::sync::Arc;

/// Build a test app whose resolver endpoints point at stub servers.
#[allow(dead_code)]
pub fn create_test_app(appview_url: &str, plc_directory_url: &str) -> axum::Router {
    create_test_app_with_rules(appview_url, plc_directory_url, Vec::new())
}

/// Build a test app with reverse-proxy rules installed.
#[allow(dead_code)]
pub fn create_test_app_with_rules(
    appview_url: &str,
    plc_directory_url: &str,
    proxy_rules: Vec<ProxyRule>,
) -> axum::Router {
    let mut config = Config::test_default();
    config.appview_url = appview_url.to_string();
    config.plc_directory_url = plc_directory_url.to_string();
    config.proxy_rules = proxy_rules;

    let http = reqwest::Client::new();
    let aggregator = StatsAggregator::new(
        http.clone(),
        config.appview_url.clone(),
        config.plc_directory_url.clone(),
    );

    let state = Arc::new(AppState {
        config,
        http,
        aggregator,
    });

    create_router(state)
}
