// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! API context for the OpenStack gateway

use std::sync::Arc;
use std::time::Duration;

use openstack_cloud::{CloudConnector, CreateServer, Credentials};
use openstack_gateway_api::{
    AuthRequest, AuthStatus, ClusterInventory, CreateServerRequest, FlavorList, ImageList,
    NetworkList, STATUS_AUTHENTICATED, ServerDeleted, ServerList, ServerStarted, ServerStopped,
};
use tracing::info;

use crate::error::GatewayError;
use crate::projection;
use crate::session::Session;

/// Default bound on waiting for a new server to become ACTIVE
pub const DEFAULT_ACTIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// API context shared across all request handlers
pub struct ApiContext {
    session: Session,
    active_timeout: Duration,
}

impl ApiContext {
    pub fn new(connector: Arc<dyn CloudConnector>, active_timeout: Duration) -> Self {
        Self {
            session: Session::new(connector),
            active_timeout,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn authenticate(&self, request: AuthRequest) -> Result<AuthStatus, GatewayError> {
        let credentials = Credentials::new(
            request.auth_url,
            request.project_name,
            request.username,
            request.password,
            request.user_domain_id,
            request.project_domain_id,
        );

        let connection = self.session.authenticate(&credentials).await?;

        Ok(AuthStatus {
            status: STATUS_AUTHENTICATED.to_string(),
            project: connection.project_name().to_string(),
        })
    }

    /// Names and counts of every resource kind. Never reports "not found".
    pub async fn discover_cluster(&self) -> Result<ClusterInventory, GatewayError> {
        let cloud = self.session.current_connection().await?;

        let (servers, networks, images, flavors) = tokio::try_join!(
            cloud.list_servers(),
            cloud.list_networks(),
            cloud.list_images(),
            cloud.list_flavors(),
        )?;

        Ok(ClusterInventory {
            cluster: projection::cluster_sections(&servers, &networks, &images, &flavors),
        })
    }

    pub async fn list_servers(&self) -> Result<ServerList, GatewayError> {
        let cloud = self.session.current_connection().await?;
        let servers = cloud.list_servers().await?;
        if servers.is_empty() {
            return Err(GatewayError::NotFound("servers"));
        }

        Ok(ServerList {
            servers: servers.iter().map(projection::server_summary).collect(),
        })
    }

    pub async fn list_networks(&self) -> Result<NetworkList, GatewayError> {
        let cloud = self.session.current_connection().await?;
        let networks = cloud.list_networks().await?;
        if networks.is_empty() {
            return Err(GatewayError::NotFound("networks"));
        }

        Ok(NetworkList {
            networks: networks.iter().map(projection::network_summary).collect(),
        })
    }

    pub async fn list_flavors(&self) -> Result<FlavorList, GatewayError> {
        let cloud = self.session.current_connection().await?;
        let flavors = cloud.list_flavors().await?;
        if flavors.is_empty() {
            return Err(GatewayError::NotFound("flavors"));
        }

        Ok(FlavorList {
            flavours: flavors.iter().map(projection::flavor_summary).collect(),
        })
    }

    pub async fn list_images(&self) -> Result<ImageList, GatewayError> {
        let cloud = self.session.current_connection().await?;
        let images = cloud.list_images().await?;
        if images.is_empty() {
            return Err(GatewayError::NotFound("images"));
        }

        Ok(ImageList {
            images: images.iter().map(projection::image_summary).collect(),
        })
    }

    /// Boot a server, wait for ACTIVE, then look it up by name.
    ///
    /// A server that times out is left in place.
    pub async fn create_server(
        &self,
        request: CreateServerRequest,
    ) -> Result<ServerList, GatewayError> {
        let cloud = self.session.current_connection().await?;

        let created = cloud
            .create_server(&CreateServer {
                name: request.name.clone(),
                image_id: request.image_id,
                flavor_id: request.flavor_id,
                network_id: request.network_id,
            })
            .await?;

        cloud.wait_for_active(&created, self.active_timeout).await?;

        let servers = cloud.list_servers().await?;
        let found = servers
            .iter()
            .find(|s| s.id == created.id && s.name == request.name)
            .or_else(|| servers.iter().find(|s| s.name == request.name))
            .ok_or(GatewayError::NotCreated)?;

        info!(server_id = %found.id, name = %found.name, "server created");
        Ok(ServerList {
            servers: vec![projection::server_summary(found)],
        })
    }

    pub async fn start_server(&self, server_id: String) -> Result<ServerStarted, GatewayError> {
        let cloud = self.session.current_connection().await?;
        cloud.start_server(&server_id).await?;
        info!(server_id = %server_id, "start requested");
        Ok(ServerStarted { server_id })
    }

    pub async fn stop_server(&self, server_id: String) -> Result<ServerStopped, GatewayError> {
        let cloud = self.session.current_connection().await?;
        cloud.stop_server(&server_id).await?;
        info!(server_id = %server_id, "stop requested");
        Ok(ServerStopped { server_id })
    }

    pub async fn delete_server(&self, server_id: String) -> Result<ServerDeleted, GatewayError> {
        let cloud = self.session.current_connection().await?;
        cloud.delete_server(&server_id, true).await?;
        info!(server_id = %server_id, "forced delete requested");
        Ok(ServerDeleted { server_id })
    }
}
