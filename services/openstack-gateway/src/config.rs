// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Gateway configuration
//!
//! Every setting is a command-line flag with an environment fallback. The
//! `OS_*` variables match the ones exported by an OpenStack RC file.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dropshot::{ConfigDropshot, ConfigLoggingLevel, HandlerTaskMode};
use openstack_cloud::{CloudOptions, Credentials, Interface};
use thiserror::Error;

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

/// Default maximum request body size (bytes)
pub const DEFAULT_BODY_MAX_BYTES: usize = 1024 * 1024;

/// Dropshot request log verbosity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Critical,
}

impl From<LogLevel> for ConfigLoggingLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => ConfigLoggingLevel::Trace,
            LogLevel::Debug => ConfigLoggingLevel::Debug,
            LogLevel::Info => ConfigLoggingLevel::Info,
            LogLevel::Warn => ConfigLoggingLevel::Warn,
            LogLevel::Error => ConfigLoggingLevel::Error,
            LogLevel::Critical => ConfigLoggingLevel::Critical,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Incomplete startup credentials: {0} not set")]
    IncompleteCredentials(String),

    #[error("Invalid interface '{0}' (expected public, internal or admin)")]
    InvalidInterface(String),
}

#[derive(Parser, Clone, Debug)]
#[command(
    name = "openstack-gateway",
    version,
    about = "REST gateway over an OpenStack cloud"
)]
pub struct GatewayConfig {
    /// Server bind address
    #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: SocketAddr,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "REQUEST_BODY_MAX_BYTES", default_value_t = DEFAULT_BODY_MAX_BYTES)]
    pub request_body_max_bytes: usize,

    /// Per-request timeout for calls to the cloud, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// How long /createserver waits for the new server to become ACTIVE
    #[arg(long, env = "SERVER_ACTIVE_TIMEOUT_SECS", default_value_t = 30)]
    pub active_timeout_secs: u64,

    /// Interval between status polls while waiting for a server
    #[arg(long, env = "SERVER_POLL_INTERVAL_SECS", default_value_t = 2)]
    pub poll_interval_secs: u64,

    /// Service catalog interface (public, internal, admin)
    #[arg(long, env = "OS_INTERFACE", default_value = "public")]
    pub interface: String,

    /// Restrict endpoint selection to a region
    #[arg(long, env = "OS_REGION_NAME")]
    pub region_name: Option<String>,

    /// Dropshot request log level
    #[arg(long, env = "DROPSHOT_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Keystone URL for a session established at startup
    #[arg(long, env = "OS_AUTH_URL")]
    pub os_auth_url: Option<String>,

    #[arg(long, env = "OS_PROJECT_NAME")]
    pub os_project_name: Option<String>,

    #[arg(long, env = "OS_USERNAME")]
    pub os_username: Option<String>,

    #[arg(long, env = "OS_PASSWORD", hide_env_values = true)]
    pub os_password: Option<String>,

    #[arg(long, env = "OS_USER_DOMAIN_ID", default_value = "default")]
    pub os_user_domain_id: String,

    #[arg(long, env = "OS_PROJECT_DOMAIN_ID", default_value = "default")]
    pub os_project_domain_id: String,
}

impl GatewayConfig {
    pub fn active_timeout(&self) -> Duration {
        Duration::from_secs(self.active_timeout_secs)
    }

    pub fn cloud_options(&self) -> Result<CloudOptions, ConfigError> {
        let interface = self
            .interface
            .parse::<Interface>()
            .map_err(|_| ConfigError::InvalidInterface(self.interface.clone()))?;

        Ok(CloudOptions {
            interface,
            region_name: self.region_name.clone(),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        })
    }

    pub fn dropshot_config(&self) -> ConfigDropshot {
        ConfigDropshot {
            bind_address: self.bind_address,
            default_request_body_max_bytes: self.request_body_max_bytes,
            default_handler_task_mode: HandlerTaskMode::Detached,
            ..Default::default()
        }
    }

    /// Credentials for a startup session.
    ///
    /// `None` when none of the `OS_*` credential variables are set; an error
    /// when only some of them are.
    pub fn bootstrap_credentials(&self) -> Result<Option<Credentials>, ConfigError> {
        match (
            &self.os_auth_url,
            &self.os_project_name,
            &self.os_username,
            &self.os_password,
        ) {
            (None, None, None, None) => Ok(None),
            (Some(auth_url), Some(project), Some(username), Some(password)) => {
                Ok(Some(Credentials::new(
                    auth_url.clone(),
                    project.clone(),
                    username.clone(),
                    password.clone(),
                    self.os_user_domain_id.clone(),
                    self.os_project_domain_id.clone(),
                )))
            }
            _ => {
                let fields = [
                    ("OS_AUTH_URL", &self.os_auth_url),
                    ("OS_PROJECT_NAME", &self.os_project_name),
                    ("OS_USERNAME", &self.os_username),
                    ("OS_PASSWORD", &self.os_password),
                ];
                let missing = fields
                    .iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ConfigError::IncompleteCredentials(missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GatewayConfig {
        let mut argv = vec!["openstack-gateway"];
        argv.extend_from_slice(args);
        GatewayConfig::try_parse_from(argv).unwrap()
    }

    // Flags are passed explicitly so values from the test environment do
    // not matter.
    fn base() -> Vec<&'static str> {
        vec![
            "--bind-address",
            "127.0.0.1:5000",
            "--interface",
            "internalURL",
            "--region-name",
            "RegionOne",
            "--http-timeout-secs",
            "10",
            "--poll-interval-secs",
            "1",
        ]
    }

    #[test]
    fn cloud_options_follow_flags() {
        let config = parse(&base());
        let options = config.cloud_options().unwrap();
        assert_eq!(options.interface, Interface::Internal);
        assert_eq!(options.region_name.as_deref(), Some("RegionOne"));
        assert_eq!(options.http_timeout, Duration::from_secs(10));
        assert_eq!(options.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn unknown_interface_is_rejected() {
        let mut args = base();
        args[3] = "private";
        let config = parse(&args);
        assert_eq!(
            config.cloud_options().unwrap_err(),
            ConfigError::InvalidInterface("private".to_string())
        );
    }

    #[test]
    fn dropshot_config_uses_bind_address() {
        let mut args = base();
        args.extend(["--request-body-max-bytes", "4096"]);
        let config = parse(&args).dropshot_config();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:5000");
        assert_eq!(config.default_request_body_max_bytes, 4096);
    }

    #[test]
    fn log_level_maps_to_dropshot() {
        let mut args = base();
        args.extend(["--log-level", "warn"]);
        let config = parse(&args);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(matches!(
            ConfigLoggingLevel::from(config.log_level),
            ConfigLoggingLevel::Warn
        ));
    }

    #[test]
    fn complete_bootstrap_credentials() {
        let mut args = base();
        args.extend([
            "--os-auth-url",
            "http://keystone:5000/v3",
            "--os-project-name",
            "demo",
            "--os-username",
            "admin",
            "--os-password",
            "secret",
            "--os-user-domain-id",
            "default",
            "--os-project-domain-id",
            "default",
        ]);
        let credentials = parse(&args).bootstrap_credentials().unwrap().unwrap();
        assert_eq!(credentials.project_name, "demo");
        assert_eq!(credentials.user_domain_id, "default");
    }

    #[test]
    fn partial_bootstrap_credentials_are_an_error() {
        let mut config = parse(&base());
        config.os_auth_url = Some("http://keystone:5000/v3".to_string());
        config.os_project_name = Some("demo".to_string());
        config.os_username = Some("admin".to_string());
        config.os_password = None;

        assert_eq!(
            config.bootstrap_credentials().unwrap_err(),
            ConfigError::IncompleteCredentials("OS_PASSWORD".to_string())
        );
    }

    #[test]
    fn no_bootstrap_credentials() {
        let mut config = parse(&base());
        config.os_auth_url = None;
        config.os_project_name = None;
        config.os_username = None;
        config.os_password = None;

        assert!(config.bootstrap_credentials().unwrap().is_none());
    }
}
