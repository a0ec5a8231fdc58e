// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Server projections and server request types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response body of `GET /servers` and `POST /createserver`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServerList {
    pub servers: Vec<ServerSummary>,
}

/// Flattened view of a compute instance
///
/// Note the historical naming: `Server Hostname` carries the server *name*
/// and `Name` carries the guest hostname reported by the hypervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServerSummary {
    #[serde(rename = "Server Hostname")]
    pub server_hostname: String,
    #[serde(rename = "Server ID")]
    pub server_id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Flavor")]
    pub flavor: ServerFlavor,
    /// Addresses keyed by network name
    #[serde(rename = "Network")]
    pub network: BTreeMap<String, Vec<ServerAddress>>,
}

/// Flavor details embedded in a server record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServerFlavor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,
    /// Memory in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<u64>,
    /// Root disk in GiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<u64>,
}

/// One address of a server on a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerAddress {
    pub addr: String,
    /// IP version (4 or 6)
    pub version: u8,
    /// `fixed` or `floating`
    #[serde(
        rename = "OS-EXT-IPS:type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_type: Option<String>,
    #[serde(
        rename = "OS-EXT-IPS-MAC:mac_addr",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mac_addr: Option<String>,
}

/// Request body of `POST /createserver`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CreateServerRequest {
    pub name: String,
    pub image_id: String,
    pub flavor_id: String,
    /// The server gets a single port on this network
    pub network_id: String,
}

/// Path parameter for server actions
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ServerPath {
    /// Server UUID
    pub server_id: String,
}

/// Response body of `PUT /startserver/{server_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerStarted {
    #[serde(rename = "Server Started")]
    pub server_id: String,
}

/// Response body of `PUT /stopserver/{server_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerStopped {
    #[serde(rename = "Server Stopped")]
    pub server_id: String,
}

/// Response body of `DELETE /deleteserver/{server_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerDeleted {
    #[serde(rename = "Server Deleted")]
    pub server_id: String,
}
