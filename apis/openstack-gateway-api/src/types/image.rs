// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Image projections

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response body of `GET /images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageList {
    #[serde(rename = "Images")]
    pub images: Vec<ImageSummary>,
}

/// Flattened view of a Glance image
///
/// Glance allows unnamed images and leaves format and size unset until the
/// image data has been uploaded, hence the optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageSummary {
    #[serde(rename = "Image Name")]
    pub image_name: Option<String>,
    #[serde(rename = "Image ID")]
    pub image_id: String,
    #[serde(rename = "Disk Format")]
    pub disk_format: Option<String>,
    /// Size in bytes
    #[serde(rename = "Size")]
    pub size: Option<u64>,
}
