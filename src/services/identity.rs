// SPDX-License-Identifier: MIT

//! AT Protocol identity resolution.
//!
//! Handles:
//! - Handle -> DID resolution via the AppView XRPC endpoint
//! - DID -> DID document resolution (did:plc via the PLC directory,
//!   did:web via the well-known document)
//! - PDS endpoint extraction from the DID document

use crate::error::AppError;
use serde::Deserialize;

/// Service id suffix that marks the PDS entry in a DID document.
const PDS_SERVICE_ID: &str = "#atproto_pds";
/// Service type of a PDS entry.
const PDS_SERVICE_TYPE: &str = "AtprotoPersonalDataServer";

/// Identity resolver backed by public AT Protocol infrastructure.
#[derive(Clone)]
pub struct IdentityResolver {
    http: reqwest::Client,
    appview_url: String,
    plc_directory_url: String,
}

impl IdentityResolver {
    pub fn new(http: reqwest::Client, appview_url: String, plc_directory_url: String) -> Self {
        Self {
            http,
            appview_url,
            plc_directory_url,
        }
    }

    /// Resolve a handle to a DID.
    ///
    /// Returns `Ok(None)` when the handle is unknown (the upstream
    /// answers 400 for unresolvable handles); transport errors are
    /// fetch failures.
    pub async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, AppError> {
        let url = format!(
            "{}/xrpc/com.atproto.identity.resolveHandle",
            self.appview_url
        );

        let response = self
            .http
            .get(&url)
            .query(&[("handle", handle)])
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("resolveHandle request failed: {}", e)))?;

        if response.status().is_client_error() {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Fetch(format!(
                "resolveHandle HTTP {}: {}",
                status, body
            )));
        }

        let resolved: ResolvedHandle = response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("resolveHandle JSON parse error: {}", e)))?;

        Ok(Some(resolved.did))
    }

    /// Resolve a DID to its DID document.
    ///
    /// Returns `Ok(None)` for unknown DIDs (404) and unsupported DID
    /// methods.
    pub async fn resolve_did_document(&self, did: &str) -> Result<Option<DidDocument>, AppError> {
        let url = if did.starts_with("did:plc:") {
            format!("{}/{}", self.plc_directory_url, did)
        } else if let Some(domain) = did.strip_prefix("did:web:") {
            format!("https://{}/.well-known/did.json", domain)
        } else {
            tracing::warn!(%did, "Unsupported DID method");
            return Ok(None);
        };

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("DID document request failed: {}", e)))?;

        if response.status().is_client_error() {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Fetch(format!("DID document HTTP {}", status)));
        }

        let document: DidDocument = response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("DID document JSON parse error: {}", e)))?;

        Ok(Some(document))
    }
}

#[derive(Debug, Deserialize)]
struct ResolvedHandle {
    did: String,
}

/// The subset of a DID document needed to locate the hosting PDS.
#[derive(Debug, Clone, Deserialize)]
pub struct DidDocument {
    pub id: String,
    #[serde(default)]
    pub service: Vec<DidService>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DidService {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

impl DidDocument {
    /// URL of the PDS hosting this identity's records, if declared.
    pub fn pds_endpoint(&self) -> Option<&str> {
        self.service
            .iter()
            .find(|s| s.id.ends_with(PDS_SERVICE_ID) || s.service_type == PDS_SERVICE_TYPE)
            .map(|s| s.service_endpoint.as_str())
    }
}
