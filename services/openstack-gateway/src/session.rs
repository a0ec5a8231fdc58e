// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! The process-wide cloud session

use std::sync::Arc;

use openstack_cloud::{CloudConnection, CloudConnector, Credentials};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::GatewayError;

/// Holds the single authenticated connection shared by all handlers.
///
/// Authentication runs outside the lock; only the handle swap is done under
/// the write lock. Concurrent `/auth` calls therefore resolve to whichever
/// finished last, and readers always see either the old or the new handle.
pub struct Session {
    connector: Arc<dyn CloudConnector>,
    current: RwLock<Option<Arc<dyn CloudConnection>>>,
}

impl Session {
    pub fn new(connector: Arc<dyn CloudConnector>) -> Self {
        Self {
            connector,
            current: RwLock::new(None),
        }
    }

    /// Authenticate and replace the stored connection.
    ///
    /// On failure the previous connection, if any, stays in place.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn CloudConnection>, GatewayError> {
        let connection = match self.connector.authenticate(credentials).await {
            Ok(connection) => connection,
            Err(e) => {
                warn!(
                    project = %credentials.project_name,
                    user = %credentials.username,
                    error = %e,
                    "cloud authentication failed"
                );
                return Err(e.into());
            }
        };

        let previous = self.current.write().await.replace(Arc::clone(&connection));

        info!(
            project = %connection.project_name(),
            replaced = previous.is_some(),
            "cloud session established"
        );
        Ok(connection)
    }

    /// The most recently stored connection
    pub async fn current_connection(&self) -> Result<Arc<dyn CloudConnection>, GatewayError> {
        self.current
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(GatewayError::Unauthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}
