// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Gateway error type and its HTTP mapping

use dropshot::{ClientErrorStatusCode, HttpError};
use openstack_cloud::CloudError;
use thiserror::Error;

/// Errors surfaced by request handlers
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A cloud-backed route was called before `/auth` succeeded
    #[error("No cloud session; call /auth first")]
    Unauthenticated,

    /// The cloud returned an empty list for the requested resource kind
    #[error("No {0} found")]
    NotFound(&'static str),

    /// The post-creation lookup did not find the new server
    #[error("Resource Not created")]
    NotCreated,

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

impl From<GatewayError> for HttpError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        match err {
            GatewayError::Unauthenticated => HttpError::for_client_error(
                Some("Unauthenticated".to_string()),
                ClientErrorStatusCode::UNAUTHORIZED,
                message,
            ),
            GatewayError::NotFound(_) => {
                HttpError::for_client_error(None, ClientErrorStatusCode::NOT_FOUND, message)
            }
            GatewayError::NotCreated => {
                HttpError::for_client_error(None, ClientErrorStatusCode::UNAUTHORIZED, message)
            }
            GatewayError::Cloud(cloud) => cloud_error(cloud, message),
        }
    }
}

fn cloud_error(err: CloudError, message: String) -> HttpError {
    match err {
        CloudError::AuthenticationFailed(_) => HttpError::for_client_error(
            Some("AuthenticationFailed".to_string()),
            ClientErrorStatusCode::UNAUTHORIZED,
            message,
        ),
        CloudError::NotFound(_) => {
            HttpError::for_client_error(None, ClientErrorStatusCode::NOT_FOUND, message)
        }
        CloudError::BadRequest(_) => HttpError::for_bad_request(None, message),
        CloudError::Conflict(_) => {
            HttpError::for_client_error(None, ClientErrorStatusCode::CONFLICT, message)
        }
        CloudError::Timeout { .. } => {
            HttpError::for_unavail(Some("ServerActiveTimeout".to_string()), message)
        }
        other => {
            tracing::error!(error = %other, "cloud request failed");
            HttpError::for_internal_error(message)
        }
    }
}
