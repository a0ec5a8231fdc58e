// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for openstack-cloud

use serde_json::Value;
use thiserror::Error;

/// Errors returned by cloud operations
#[derive(Error, Debug)]
pub enum CloudError {
    /// Keystone rejected the credentials, or a token was refused
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Keystone answered without an `X-Subject-Token` header
    #[error("Identity service returned no token")]
    MissingToken,

    /// The service catalog has no usable endpoint
    #[error("No {interface} endpoint for service type '{service_type}' in catalog")]
    EndpointNotFound {
        service_type: String,
        interface: String,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success response
    #[error("Cloud API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Server {server_id} did not become ACTIVE within {timeout_secs}s")]
    Timeout { server_id: String, timeout_secs: u64 },

    #[error("Server {server_id} entered status {status}")]
    ServerFailed { server_id: String, status: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CloudError {
    /// Classify a non-success response by status code
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = fault_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            }
        });

        match status {
            400 => CloudError::BadRequest(message),
            401 => CloudError::AuthenticationFailed(message),
            404 => CloudError::NotFound(message),
            409 => CloudError::Conflict(message),
            _ => CloudError::Api { status, message },
        }
    }
}

/// Extract the human-readable message from an OpenStack fault body.
///
/// Services wrap faults in a single-key object naming the fault kind, e.g.
/// `{"itemNotFound": {"message": "...", "code": 404}}` from Nova,
/// `{"error": {"message": "..."}}` from Keystone and
/// `{"NeutronError": {"message": "..."}}` from Neutron.
pub fn fault_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    if let Some(message) = object.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    object
        .values()
        .filter_map(|inner| inner.get("message"))
        .find_map(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nova_fault_message_is_extracted() {
        let body = r#"{"itemNotFound": {"message": "Instance abc could not be found.", "code": 404}}"#;
        assert_eq!(
            fault_message(body).as_deref(),
            Some("Instance abc could not be found.")
        );
    }

    #[test]
    fn keystone_and_neutron_faults_are_extracted() {
        let keystone = r#"{"error": {"message": "The request you have made requires authentication.", "code": 401, "title": "Unauthorized"}}"#;
        let neutron = r#"{"NeutronError": {"type": "NetworkNotFound", "message": "Network x could not be found.", "detail": ""}}"#;

        assert_eq!(
            fault_message(keystone).as_deref(),
            Some("The request you have made requires authentication.")
        );
        assert_eq!(
            fault_message(neutron).as_deref(),
            Some("Network x could not be found.")
        );
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            CloudError::from_status(400, ""),
            CloudError::BadRequest(_)
        ));
        assert!(matches!(
            CloudError::from_status(401, ""),
            CloudError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            CloudError::from_status(404, ""),
            CloudError::NotFound(_)
        ));
        assert!(matches!(
            CloudError::from_status(409, ""),
            CloudError::Conflict(_)
        ));
        match CloudError::from_status(503, "upstream down") {
            CloudError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn empty_body_falls_back_to_status_text() {
        match CloudError::from_status(500, "  ") {
            CloudError::Api { message, .. } => assert_eq!(message, "HTTP 500"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
