// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Network projections

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response body of `GET /networks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NetworkList {
    pub networks: Vec<NetworkSummary>,
}

/// Flattened view of a Neutron network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NetworkSummary {
    #[serde(rename = "Network Name")]
    pub network_name: String,
    #[serde(rename = "Network ID")]
    pub network_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "MTU")]
    pub mtu: Option<u32>,
}
