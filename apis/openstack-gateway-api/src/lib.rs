// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenStack gateway API trait definition
//!
//! A small REST facade over an OpenStack cloud. A client authenticates once
//! with `POST /auth`; every later request is served from that single
//! process-wide session.
//!
//! ## Endpoints
//!
//! - `GET /` - Gateway liveness marker
//! - `POST /auth` - Establish (or replace) the cloud session
//! - `GET /discovercluster` - Names and counts of every resource kind
//! - `GET /servers`, `GET /networks`, `GET /flavors`, `GET /images` - Listings
//! - `POST /createserver` - Boot an instance and wait for it to go ACTIVE
//! - `PUT /startserver/{server_id}`, `PUT /stopserver/{server_id}` - Power actions
//! - `DELETE /deleteserver/{server_id}` - Forced delete
//!
//! The JSON field names (`"Server ID"`, `"Flavours"`, ...) are part of the
//! wire contract and are kept exactly as existing consumers expect them.

use dropshot::{
    HttpError, HttpResponseAccepted, HttpResponseOk, Path, RequestContext, TypedBody,
};

pub mod types;
pub use types::*;

/// Value of the `Status` field returned by `GET /`
pub const STATUS_CONNECTED: &str = "CONNECTED";

/// Value of the `Status` field returned by a successful `POST /auth`
pub const STATUS_AUTHENTICATED: &str = "AUTHENTICATED";

/// OpenStack gateway API
///
/// Every endpoint other than `GET /` and `POST /auth` requires an established
/// session and fails with 401 (`Unauthenticated`) otherwise.
#[dropshot::api_description]
pub trait OpenstackGatewayApi {
    /// Context type for request handlers
    type Context: Send + Sync + 'static;

    /// Gateway status
    ///
    /// Always reports `CONNECTED`; it does not touch the cloud.
    #[endpoint {
        method = GET,
        path = "/",
        tags = ["system"],
    }]
    async fn get_status(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ConnectionStatus>, HttpError>;

    /// Authenticate against the cloud
    ///
    /// Replaces the shared session on success. A rejected login returns 401
    /// (`AuthenticationFailed`) and leaves any previous session in place.
    #[endpoint {
        method = POST,
        path = "/auth",
        tags = ["session"],
    }]
    async fn authenticate(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<AuthRequest>,
    ) -> Result<HttpResponseOk<AuthStatus>, HttpError>;

    /// Summarise the cluster
    ///
    /// Lists the names of all servers, networks, images and flavors together
    /// with a count per category.
    #[endpoint {
        method = GET,
        path = "/discovercluster",
        tags = ["discovery"],
    }]
    async fn discover_cluster(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ClusterInventory>, HttpError>;

    /// List servers
    ///
    /// Returns 404 when the project has no servers.
    #[endpoint {
        method = GET,
        path = "/servers",
        tags = ["servers"],
    }]
    async fn list_servers(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ServerList>, HttpError>;

    /// List networks
    ///
    /// Returns 404 when no networks are visible.
    #[endpoint {
        method = GET,
        path = "/networks",
        tags = ["networks"],
    }]
    async fn list_networks(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<NetworkList>, HttpError>;

    /// List flavors
    ///
    /// Returns 404 when no flavors are visible.
    #[endpoint {
        method = GET,
        path = "/flavors",
        tags = ["flavors"],
    }]
    async fn list_flavors(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<FlavorList>, HttpError>;

    /// List images
    ///
    /// Returns 404 when no images are visible.
    #[endpoint {
        method = GET,
        path = "/images",
        tags = ["images"],
    }]
    async fn list_images(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ImageList>, HttpError>;

    /// Create a server
    ///
    /// Boots an instance, blocks until the cloud reports it ACTIVE and then
    /// looks it up by name. Returns 401 with `Resource Not created` when the
    /// lookup finds nothing, and 503 (`ServerActiveTimeout`) when the instance
    /// does not become ACTIVE in time.
    #[endpoint {
        method = POST,
        path = "/createserver",
        tags = ["servers"],
    }]
    async fn create_server(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<CreateServerRequest>,
    ) -> Result<HttpResponseOk<ServerList>, HttpError>;

    /// Start a server
    ///
    /// Fire-and-forget: the start command is accepted, the final power state
    /// is not awaited.
    #[endpoint {
        method = PUT,
        path = "/startserver/{server_id}",
        tags = ["servers"],
    }]
    async fn start_server(
        rqctx: RequestContext<Self::Context>,
        path: Path<ServerPath>,
    ) -> Result<HttpResponseAccepted<ServerStarted>, HttpError>;

    /// Stop a server
    #[endpoint {
        method = PUT,
        path = "/stopserver/{server_id}",
        tags = ["servers"],
    }]
    async fn stop_server(
        rqctx: RequestContext<Self::Context>,
        path: Path<ServerPath>,
    ) -> Result<HttpResponseAccepted<ServerStopped>, HttpError>;

    /// Force-delete a server
    #[endpoint {
        method = DELETE,
        path = "/deleteserver/{server_id}",
        tags = ["servers"],
    }]
    async fn delete_server(
        rqctx: RequestContext<Self::Context>,
        path: Path<ServerPath>,
    ) -> Result<HttpResponseAccepted<ServerDeleted>, HttpError>;
}
