// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenStack Gateway Service
//!
//! Serves the gateway API over HTTP. Clients establish the cloud session
//! with `POST /auth`; alternatively the `OS_*` credential variables create
//! one at startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dropshot::{ConfigLogging, HttpServerStarter};
use tracing::info;

use openstack_cloud::{OpenStackCloud, install_crypto_provider};
use openstack_gateway::config::GatewayConfig;
use openstack_gateway::context::ApiContext;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::parse();

    install_crypto_provider();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "openstack_gateway=info,openstack_cloud=info,dropshot=info".to_string()
            }),
        ))
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting openstack-gateway"
    );

    let cloud = OpenStackCloud::new(
        config
            .cloud_options()
            .context("Invalid cloud configuration")?,
    )
    .context("Failed to create cloud client")?;

    let api_context = ApiContext::new(Arc::new(cloud), config.active_timeout());

    if let Some(credentials) = config
        .bootstrap_credentials()
        .context("Invalid startup credentials")?
    {
        let connection = api_context
            .session()
            .authenticate(&credentials)
            .await
            .context("Startup authentication failed")?;
        info!(project = %connection.project_name(), "startup session established");
    }

    if !api_context.session().is_authenticated().await {
        info!("no startup credentials, waiting for POST /auth");
    }

    let api = openstack_gateway::api_description()
        .map_err(|e| anyhow::anyhow!("Failed to create API description: {}", e))?;

    let config_logging = ConfigLogging::StderrTerminal {
        level: config.log_level.into(),
    };
    let log = config_logging
        .to_logger("openstack-gateway")
        .map_err(|error| anyhow::anyhow!("failed to create logger: {}", error))?;

    let server = HttpServerStarter::new(&config.dropshot_config(), api, api_context, &log)
        .map_err(|error| anyhow::anyhow!("failed to create server: {}", error))?
        .start();

    info!("OpenStack gateway running on http://{}", config.bind_address);

    server
        .await
        .map_err(|error| anyhow::anyhow!("server failed: {}", error))
}
