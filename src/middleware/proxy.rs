// SPDX-License-Identifier: MIT

//! Path-prefix reverse proxy with origin validation.
//!
//! Requests whose path matches a configured rule prefix never reach the
//! router: the prefix is stripped, the rest of the path and the query
//! string are appended to the rule's target, and the request is
//! forwarded with its method, headers and body. Responses are relayed
//! back as-is.
//!
//! Requests that don't carry an `Origin` matching the request host are
//! rejected with 403 so the proxy can't be abused from elsewhere.

use crate::error::AppError;
use crate::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Upper bound on a buffered proxied request body (2 MiB).
const MAX_PROXY_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Router-wide layer: intercept configured prefixes, forward everything
/// else to the router.
pub async fn proxy_pass(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    let matching: Vec<_> = state
        .config
        .proxy_rules
        .iter()
        .filter(|rule| path.starts_with(&rule.from))
        .collect();

    let Some(rule) = matching.first().copied() else {
        return next.run(req).await;
    };
    if matching.len() > 1 {
        tracing::debug!(%path, "Multiple proxy rules match, using the first");
    }

    // Reject requests that don't come from the webapp itself.
    if !same_origin(req.headers()) {
        return (StatusCode::FORBIDDEN, "Request Forbidden.").into_response();
    }

    let stripped = &path[rule.from.len()..];
    let query = req
        .uri()
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();
    let target = format!("{}{}{}", rule.to, stripped, query);

    let (parts, body) = req.into_parts();

    let body_bytes = match axum::body::to_bytes(body, MAX_PROXY_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to buffer proxied request body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    // The client derives Host from the target URL.
    let mut headers = parts.headers;
    headers.remove(header::HOST);

    let upstream = state
        .http
        .request(parts.method, &target)
        .headers(headers)
        .body(body_bytes.to_vec())
        .send()
        .await;

    match upstream {
        Ok(resp) => {
            let status = resp.status();
            let headers = resp.headers().clone();
            match resp.bytes().await {
                Ok(bytes) => {
                    let mut response = Response::new(Body::from(bytes));
                    *response.status_mut() = status;
                    *response.headers_mut() = headers;
                    // The body is re-framed, so drop the upstream framing.
                    response.headers_mut().remove(header::TRANSFER_ENCODING);
                    response
                }
                Err(err) => AppError::Proxy(format!("{}: {}", target, err)).into_response(),
            }
        }
        Err(err) => AppError::Proxy(format!("{}: {}", target, err)).into_response(),
    }
}

/// True when the `Origin` header's authority matches the request host.
fn same_origin(headers: &HeaderMap) -> bool {
    let Some(origin) = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    origin_authority(origin) == Some(host)
}

/// Extract the authority (`host[:port]`) from an origin value.
fn origin_authority(origin: &str) -> Option<&str> {
    origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
}
