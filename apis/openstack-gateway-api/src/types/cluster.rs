// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Cluster discovery summary

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response body of `GET /discovercluster`
///
/// Always holds exactly four sections, in the order servers, networks,
/// images, flavors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClusterInventory {
    #[serde(rename = "Openstack Cluster")]
    pub cluster: Vec<ClusterSection>,
}

/// Names and count for one resource category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ClusterSection {
    Servers {
        #[serde(rename = "Servers")]
        names: Vec<String>,
        #[serde(rename = "Number of Servers")]
        count: usize,
    },
    Networks {
        #[serde(rename = "Networks")]
        names: Vec<String>,
        #[serde(rename = "Number of Networks")]
        count: usize,
    },
    Images {
        #[serde(rename = "Images")]
        names: Vec<Option<String>>,
        #[serde(rename = "Number of Images")]
        count: usize,
    },
    Flavors {
        #[serde(rename = "Flavors")]
        names: Vec<String>,
        #[serde(rename = "Number of Flavors")]
        count: usize,
    },
}
