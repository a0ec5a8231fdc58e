// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenStack cloud adapter
//!
//! The gateway talks to an OpenStack deployment through two small traits:
//!
//! - [`CloudConnector`] turns [`Credentials`] into an authenticated,
//!   project-scoped [`CloudConnection`] (a Keystone token plus its catalog).
//! - [`CloudConnection`] offers the handful of compute, network and image
//!   operations the gateway exposes.
//!
//! [`OpenStackCloud`] is the reqwest-backed implementation speaking Keystone
//! v3, Nova, Neutron and Glance. Tests substitute in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod openstack;
pub mod types;

pub use catalog::Interface;
pub use credentials::Credentials;
pub use error::CloudError;
pub use openstack::{CloudOptions, OpenStackCloud, install_crypto_provider};
pub use types::*;

/// Produces authenticated connections
#[async_trait]
pub trait CloudConnector: Send + Sync {
    /// Authenticate and scope a connection to `credentials.project_name`
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn CloudConnection>, CloudError>;
}

/// An authenticated, project-scoped handle to the cloud
#[async_trait]
pub trait CloudConnection: Send + Sync {
    /// Name of the project this connection is scoped to
    fn project_name(&self) -> &str;

    async fn list_servers(&self) -> Result<Vec<Server>, CloudError>;

    async fn list_networks(&self) -> Result<Vec<Network>, CloudError>;

    async fn list_images(&self) -> Result<Vec<Image>, CloudError>;

    async fn list_flavors(&self) -> Result<Vec<Flavor>, CloudError>;

    /// Submit a boot request. Returns as soon as the cloud accepted it.
    async fn create_server(&self, request: &CreateServer) -> Result<ServerRef, CloudError>;

    /// Block until the server reports `ACTIVE`, fails, or `timeout` elapses
    async fn wait_for_active(
        &self,
        server: &ServerRef,
        timeout: Duration,
    ) -> Result<Server, CloudError>;

    async fn start_server(&self, server_id: &str) -> Result<(), CloudError>;

    async fn stop_server(&self, server_id: &str) -> Result<(), CloudError>;

    /// Delete a server. `force` skips the soft-delete grace period.
    async fn delete_server(&self, server_id: &str, force: bool) -> Result<(), CloudError>;
}
