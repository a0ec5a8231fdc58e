// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Session types: gateway status and cloud authentication

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response body of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionStatus {
    #[serde(rename = "Status")]
    pub status: String,
}

/// Cloud credentials posted to `/auth`
///
/// Field names follow the keystone password-auth vocabulary used by
/// OpenStack tooling (`OS_AUTH_URL`, `OS_PROJECT_NAME`, ...).
#[derive(Clone, Serialize, Deserialize, JsonSchema)]
pub struct AuthRequest {
    /// Keystone endpoint, with or without the `/v3` suffix
    pub auth_url: String,
    /// Project to scope the token to
    pub project_name: String,
    pub username: String,
    pub password: String,
    /// Domain ID of the user (usually `default`)
    pub user_domain_id: String,
    /// Domain ID of the project (usually `default`)
    pub project_domain_id: String,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("auth_url", &self.auth_url)
            .field("project_name", &self.project_name)
            .field("username", &self.username)
            .field("password", &"****")
            .field("user_domain_id", &self.user_domain_id)
            .field("project_domain_id", &self.project_domain_id)
            .finish()
    }
}

/// Response body of a successful `POST /auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthStatus {
    #[serde(rename = "Status")]
    pub status: String,
    /// Name of the project the session is scoped to
    #[serde(rename = "Project")]
    pub project: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_request_debug_hides_password() {
        let request = AuthRequest {
            auth_url: "http://keystone:5000/v3".to_string(),
            project_name: "demo".to_string(),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            user_domain_id: "default".to_string(),
            project_domain_id: "default".to_string(),
        };

        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("admin"));
    }

    #[test]
    fn connection_status_uses_capitalised_key() {
        let status = ConnectionStatus {
            status: crate::STATUS_CONNECTED.to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json, serde_json::json!({"Status": "CONNECTED"}));
    }
}
