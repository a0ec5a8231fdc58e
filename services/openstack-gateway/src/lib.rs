// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenStack Gateway Library
//!
//! A small REST service holding one authenticated OpenStack session and
//! exposing listing, discovery and server lifecycle operations over it.
//!
//! # Modules
//!
//! - [`config`] - Command-line and environment configuration
//! - [`context`] - API context for request handlers
//! - [`error`] - Gateway errors and their HTTP status mapping
//! - [`projection`] - Cloud objects to JSON projections
//! - [`session`] - The shared, replaceable cloud session

pub mod config;
pub mod context;
pub mod error;
pub mod projection;
pub mod session;

use dropshot::{
    ApiDescription, HttpError, HttpResponseAccepted, HttpResponseOk, Path, RequestContext,
    TypedBody,
};
use openstack_gateway_api::{
    AuthRequest, AuthStatus, ClusterInventory, ConnectionStatus, CreateServerRequest, FlavorList,
    ImageList, NetworkList, OpenstackGatewayApi, STATUS_CONNECTED, ServerDeleted, ServerList,
    ServerPath, ServerStarted, ServerStopped,
};

use crate::context::ApiContext;

/// OpenStack gateway API implementation
///
/// All state lives in [`ApiContext`].
pub enum OpenstackGatewayImpl {}

impl OpenstackGatewayApi for OpenstackGatewayImpl {
    type Context = ApiContext;

    async fn get_status(
        _rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ConnectionStatus>, HttpError> {
        Ok(HttpResponseOk(ConnectionStatus {
            status: STATUS_CONNECTED.to_string(),
        }))
    }

    async fn authenticate(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<AuthRequest>,
    ) -> Result<HttpResponseOk<AuthStatus>, HttpError> {
        let request = body.into_inner();
        tracing::info!(
            project = %request.project_name,
            user = %request.username,
            auth_url = %request.auth_url,
            "authentication requested"
        );

        let status = rqctx.context().authenticate(request).await?;
        Ok(HttpResponseOk(status))
    }

    async fn discover_cluster(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ClusterInventory>, HttpError> {
        Ok(HttpResponseOk(rqctx.context().discover_cluster().await?))
    }

    async fn list_servers(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ServerList>, HttpError> {
        Ok(HttpResponseOk(rqctx.context().list_servers().await?))
    }

    async fn list_networks(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<NetworkList>, HttpError> {
        Ok(HttpResponseOk(rqctx.context().list_networks().await?))
    }

    async fn list_flavors(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<FlavorList>, HttpError> {
        Ok(HttpResponseOk(rqctx.context().list_flavors().await?))
    }

    async fn list_images(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ImageList>, HttpError> {
        Ok(HttpResponseOk(rqctx.context().list_images().await?))
    }

    async fn create_server(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<CreateServerRequest>,
    ) -> Result<HttpResponseOk<ServerList>, HttpError> {
        let request = body.into_inner();
        tracing::info!(
            name = %request.name,
            image_id = %request.image_id,
            flavor_id = %request.flavor_id,
            network_id = %request.network_id,
            "server creation requested"
        );

        Ok(HttpResponseOk(rqctx.context().create_server(request).await?))
    }

    async fn start_server(
        rqctx: RequestContext<Self::Context>,
        path: Path<ServerPath>,
    ) -> Result<HttpResponseAccepted<ServerStarted>, HttpError> {
        let server_id = path.into_inner().server_id;
        Ok(HttpResponseAccepted(
            rqctx.context().start_server(server_id).await?,
        ))
    }

    async fn stop_server(
        rqctx: RequestContext<Self::Context>,
        path: Path<ServerPath>,
    ) -> Result<HttpResponseAccepted<ServerStopped>, HttpError> {
        let server_id = path.into_inner().server_id;
        Ok(HttpResponseAccepted(
            rqctx.context().stop_server(server_id).await?,
        ))
    }

    async fn delete_server(
        rqctx: RequestContext<Self::Context>,
        path: Path<ServerPath>,
    ) -> Result<HttpResponseAccepted<ServerDeleted>, HttpError> {
        let server_id = path.into_inner().server_id;
        Ok(HttpResponseAccepted(
            rqctx.context().delete_server(server_id).await?,
        ))
    }
}

/// Build the Dropshot API description for the gateway
pub fn api_description() -> Result<ApiDescription<ApiContext>, String> {
    openstack_gateway_api::openstack_gateway_api_mod::api_description::<OpenstackGatewayImpl>()
        .map_err(|e| e.to_string())
}
