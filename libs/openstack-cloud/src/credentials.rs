// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Keystone v3 password credentials

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::fmt;
use url::Url;

use crate::error::CloudError;

/// Everything needed to obtain a project-scoped Keystone token
#[derive(Clone)]
pub struct Credentials {
    pub auth_url: String,
    pub project_name: String,
    pub username: String,
    pub password: SecretString,
    pub user_domain_id: String,
    pub project_domain_id: String,
}

impl Credentials {
    pub fn new(
        auth_url: impl Into<String>,
        project_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        user_domain_id: impl Into<String>,
        project_domain_id: impl Into<String>,
    ) -> Self {
        Self {
            auth_url: auth_url.into(),
            project_name: project_name.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            user_domain_id: user_domain_id.into(),
            project_domain_id: project_domain_id.into(),
        }
    }

    /// URL of the token endpoint.
    ///
    /// `OS_AUTH_URL` is commonly given both with and without the `/v3`
    /// suffix; both forms resolve to `.../v3/auth/tokens`.
    pub fn token_url(&self) -> Result<Url, CloudError> {
        let trimmed = self.auth_url.trim_end_matches('/');
        let base = if trimmed.ends_with("/v3") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/v3")
        };

        Url::parse(&format!("{base}/auth/tokens")).map_err(|e| CloudError::InvalidUrl {
            url: self.auth_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Body of `POST /v3/auth/tokens` for password auth scoped to a project
    pub fn token_request(&self) -> Value {
        json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": self.username,
                            "domain": { "id": self.user_domain_id },
                            "password": self.password.expose_secret(),
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": self.project_name,
                        "domain": { "id": self.project_domain_id },
                    }
                }
            }
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_url", &self.auth_url)
            .field("project_name", &self.project_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("user_domain_id", &self.user_domain_id)
            .field("project_domain_id", &self.project_domain_id)
            .finish()
    }
}
