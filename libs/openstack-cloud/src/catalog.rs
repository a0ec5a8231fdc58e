// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Keystone token bodies and service catalog lookup

use chrono::{DateTime, Utc};
use serde::Deserialize;
use strum::{Display, EnumString};
use url::Url;

use crate::error::CloudError;

/// Endpoint interface to select from the catalog
///
/// Accepts both the v3 names (`public`) and the v2-era spellings
/// (`publicURL`) that still show up in `OS_INTERFACE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Interface {
    #[default]
    #[strum(to_string = "public", serialize = "publicURL")]
    Public,
    #[strum(to_string = "internal", serialize = "internalURL")]
    Internal,
    #[strum(to_string = "admin", serialize = "adminURL")]
    Admin,
}

/// Body of a successful `POST /v3/auth/tokens`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: Token,
}

#[derive(Debug, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
    #[serde(default)]
    pub project: Option<TokenProject>,
    /// Unset for tokens that never expire
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TokenProject {
    pub id: String,
    pub name: String,
}

/// One service in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    pub interface: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    pub url: String,
}

impl CatalogEndpoint {
    fn in_region(&self, region: &str) -> bool {
        self.region_id.as_deref() == Some(region) || self.region.as_deref() == Some(region)
    }
}

/// Find the base URL for `service_type`, without a trailing slash.
pub fn select_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    interface: Interface,
    region: Option<&str>,
) -> Result<String, CloudError> {
    let wanted = interface.to_string();

    let endpoint = catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .filter(|endpoint| endpoint.interface == wanted)
        .find(|endpoint| region.is_none_or(|r| endpoint.in_region(r)))
        .ok_or_else(|| CloudError::EndpointNotFound {
            service_type: service_type.to_string(),
            interface: wanted.clone(),
        })?;

    Url::parse(&endpoint.url).map_err(|e| CloudError::InvalidUrl {
        url: endpoint.url.clone(),
        reason: e.to_string(),
    })?;

    Ok(endpoint.url.trim_end_matches('/').to_string())
}
