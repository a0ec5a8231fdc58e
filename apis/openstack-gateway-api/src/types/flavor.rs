// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Flavor projections

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response body of `GET /flavors`
///
/// The top-level key is spelled `Flavours`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlavorList {
    #[serde(rename = "Flavours")]
    pub flavours: Vec<FlavorSummary>,
}

/// Flattened view of a compute flavor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlavorSummary {
    #[serde(rename = "Flavor Name")]
    pub flavor_name: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Vcpus")]
    pub vcpus: u32,
    /// Memory in MiB
    #[serde(rename = "RAM")]
    pub ram: u64,
    /// Root disk size rendered with its unit, e.g. `"20 GB"`
    #[serde(rename = "Disk Size")]
    pub disk_size: String,
}
