// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! reqwest-backed OpenStack implementation

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogEntry, Interface, TokenResponse, select_endpoint};
use crate::credentials::Credentials;
use crate::error::CloudError;
use crate::types::{CreateServer, Flavor, Image, Network, Server, ServerRef};
use crate::{CloudConnection, CloudConnector};

/// Compute microversion requested on every Nova call.
///
/// 2.47 is the first version that embeds flavor details in server records.
pub const COMPUTE_MICROVERSION: &str = "2.47";

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Tokens this close to `expires_at` are re-issued before use
const TOKEN_RENEWAL_MARGIN_SECS: i64 = 60;

/// Install the process-wide rustls crypto provider (ring).
///
/// reqwest is built without a bundled provider, so one must be installed
/// before the first client is constructed. Repeated calls are harmless.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Tunables for [`OpenStackCloud`]
#[derive(Debug, Clone)]
pub struct CloudOptions {
    /// Catalog interface used for every service
    pub interface: Interface,
    /// Restrict endpoint selection to this region
    pub region_name: Option<String>,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Delay between status polls while waiting for a server
    pub poll_interval: Duration,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            interface: Interface::default(),
            region_name: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

/// Connector speaking Keystone v3
#[derive(Clone)]
pub struct OpenStackCloud {
    http: Client,
    options: CloudOptions,
}

impl OpenStackCloud {
    pub fn new(options: CloudOptions) -> Result<Self, CloudError> {
        install_crypto_provider();

        let http = Client::builder()
            .timeout(options.http_timeout)
            .user_agent(concat!("openstack-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, options })
    }
}

#[async_trait]
impl CloudConnector for OpenStackCloud {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn CloudConnection>, CloudError> {
        let (token, project) = issue_token(&self.http, credentials).await?;
        let project_name = project.unwrap_or_else(|| credentials.project_name.clone());

        info!(
            project = %project_name,
            services = token.catalog.len(),
            "keystone token issued"
        );

        Ok(Arc::new(OpenStackConnection {
            http: self.http.clone(),
            credentials: credentials.clone(),
            token: RwLock::new(Arc::new(token)),
            project_name,
            options: self.options.clone(),
        }))
    }
}

/// A Keystone token plus the catalog it was issued with
struct IssuedToken {
    value: SecretString,
    expires_at: Option<DateTime<Utc>>,
    catalog: Vec<CatalogEntry>,
}

impl IssuedToken {
    fn near_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| at - now <= TimeDelta::seconds(TOKEN_RENEWAL_MARGIN_SECS))
    }
}

/// `POST /v3/auth/tokens`; returns the token and the scoped project name.
async fn issue_token(
    http: &Client,
    credentials: &Credentials,
) -> Result<(IssuedToken, Option<String>), CloudError> {
    let url = credentials.token_url()?;
    debug!(%url, user = %credentials.username, "requesting keystone token");

    let response = http
        .post(url)
        .json(&credentials.token_request())
        .send()
        .await?;
    let response = check_status(response).await?;

    let value = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| SecretString::from(value.to_string()))
        .ok_or(CloudError::MissingToken)?;

    let body: TokenResponse = response.json().await?;
    let token = IssuedToken {
        value,
        expires_at: body.token.expires_at,
        catalog: body.token.catalog,
    };
    Ok((token, body.token.project.map(|project| project.name)))
}

/// An authenticated connection.
///
/// Keeps the credentials so the token can be re-issued when it nears
/// expiry or is rejected by a service.
struct OpenStackConnection {
    http: Client,
    credentials: Credentials,
    token: RwLock<Arc<IssuedToken>>,
    project_name: String,
    options: CloudOptions,
}

#[derive(Deserialize)]
struct Link {
    href: String,
    rel: String,
}

fn next_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|link| link.rel == "next")
        .map(|link| link.href.clone())
}

#[derive(Deserialize)]
struct ServersPage {
    servers: Vec<Server>,
    #[serde(default)]
    servers_links: Vec<Link>,
}

#[derive(Deserialize)]
struct ServerBody<T> {
    server: T,
}

#[derive(Deserialize)]
struct FlavorsPage {
    flavors: Vec<Flavor>,
    #[serde(default)]
    flavors_links: Vec<Link>,
}

#[derive(Deserialize)]
struct NetworksPage {
    networks: Vec<Network>,
    #[serde(default)]
    networks_links: Vec<Link>,
}

#[derive(Deserialize)]
struct ImagesPage {
    images: Vec<Image>,
    #[serde(default)]
    next: Option<String>,
}

impl OpenStackConnection {
    /// The current token, re-issued first when it is about to expire
    async fn current_token(&self) -> Result<Arc<IssuedToken>, CloudError> {
        let token = Arc::clone(&*self.token.read().await);
        if token.near_expiry(Utc::now()) {
            debug!(project = %self.project_name, "keystone token near expiry");
            return self.reissue_token(&token).await;
        }
        Ok(token)
    }

    /// Replace `stale` with a fresh token. Callers racing on the same stale
    /// token share a single Keystone round-trip.
    async fn reissue_token(
        &self,
        stale: &Arc<IssuedToken>,
    ) -> Result<Arc<IssuedToken>, CloudError> {
        let mut current = self.token.write().await;
        if !Arc::ptr_eq(&*current, stale) {
            return Ok(Arc::clone(&*current));
        }

        let (token, _) = issue_token(&self.http, &self.credentials).await?;
        let token = Arc::new(token);
        *current = Arc::clone(&token);

        info!(project = %self.project_name, "keystone token re-issued");
        Ok(token)
    }

    async fn endpoint(&self, service_type: &str) -> Result<String, CloudError> {
        let token = self.current_token().await?;
        select_endpoint(
            &token.catalog,
            service_type,
            self.options.interface,
            self.options.region_name.as_deref(),
        )
    }

    /// Base URL of a versioned service, appending `version` unless the
    /// catalog entry already carries it.
    async fn versioned_endpoint(
        &self,
        service_type: &str,
        version: &str,
    ) -> Result<String, CloudError> {
        let base = self.endpoint(service_type).await?;
        if base.ends_with(version) {
            Ok(base)
        } else {
            Ok(format!("{base}{version}"))
        }
    }

    fn compute_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("X-OpenStack-Nova-API-Version", COMPUTE_MICROVERSION)
            .header(
                "OpenStack-API-Version",
                format!("compute {COMPUTE_MICROVERSION}"),
            )
    }

    /// Send a request with the current token.
    ///
    /// A 401 re-issues the token and retries once; a second 401 is returned
    /// as `AuthenticationFailed`.
    async fn execute<F>(&self, build: F) -> Result<Response, CloudError>
    where
        F: Fn() -> RequestBuilder + Send,
    {
        let token = self.current_token().await?;
        let response = build()
            .header(AUTH_TOKEN_HEADER, token.value.expose_secret())
            .send()
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        warn!(project = %self.project_name, "token rejected, re-authenticating");
        let token = self.reissue_token(&token).await?;
        let response = build()
            .header(AUTH_TOKEN_HEADER, token.value.expose_secret())
            .send()
            .await?;
        check_status(response).await
    }

    async fn execute_json<T, F>(&self, build: F) -> Result<T, CloudError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder + Send,
    {
        Ok(self.execute(build).await?.json().await?)
    }

    async fn compute_path(&self, path: &str) -> Result<String, CloudError> {
        Ok(format!("{}{}", self.endpoint("compute").await?, path))
    }

    async fn server_action(&self, server_id: &str, action: Value) -> Result<(), CloudError> {
        let url = self
            .compute_path(&format!(
                "/servers/{}/action",
                urlencoding::encode(server_id)
            ))
            .await?;
        self.execute(|| self.compute_request(Method::POST, &url).json(&action))
            .await?;
        Ok(())
    }

    async fn get_server(&self, server_id: &str) -> Result<Server, CloudError> {
        let url = self
            .compute_path(&format!("/servers/{}", urlencoding::encode(server_id)))
            .await?;
        let body: ServerBody<Server> = self
            .execute_json(|| self.compute_request(Method::GET, &url))
            .await?;
        Ok(body.server)
    }

    async fn poll_until_active(&self, server_id: &str) -> Result<Server, CloudError> {
        loop {
            let server = self.get_server(server_id).await?;
            match server.status.as_str() {
                "ACTIVE" => return Ok(server),
                "ERROR" => {
                    return Err(CloudError::ServerFailed {
                        server_id: server_id.to_string(),
                        status: server.status,
                    });
                }
                status => {
                    debug!(server_id, status, "waiting for server to become ACTIVE");
                    tokio::time::sleep(self.options.poll_interval).await;
                }
            }
        }
    }

    /// Fetch every page of a listing.
    ///
    /// `split` pulls the items and the next-page link out of a page. Relative
    /// links are resolved against `root`.
    async fn collect_pages<T, P, F>(
        &self,
        first: String,
        root: &str,
        compute: bool,
        split: F,
    ) -> Result<Vec<T>, CloudError>
    where
        T: Send,
        P: DeserializeOwned + Send,
        F: Fn(P) -> (Vec<T>, Option<String>) + Send,
    {
        let mut url = first;
        let mut items = Vec::new();
        loop {
            let page: P = self
                .execute_json(|| {
                    if compute {
                        self.compute_request(Method::GET, &url)
                    } else {
                        self.http.get(&url)
                    }
                })
                .await?;
            let (batch, next) = split(page);
            let fetched = batch.len();
            items.extend(batch);

            let next = match next {
                Some(next) if fetched > 0 => {
                    if next.starts_with("http://") || next.starts_with("https://") {
                        next
                    } else {
                        format!("{root}{next}")
                    }
                }
                _ => break,
            };
            if next == url {
                break;
            }
            url = next;
        }

        Ok(items)
    }
}

#[async_trait]
impl CloudConnection for OpenStackConnection {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    async fn list_servers(&self) -> Result<Vec<Server>, CloudError> {
        let base = self.endpoint("compute").await?;
        self.collect_pages(
            format!("{base}/servers/detail"),
            &base,
            true,
            |page: ServersPage| (page.servers, next_link(&page.servers_links)),
        )
        .await
    }

    async fn list_networks(&self) -> Result<Vec<Network>, CloudError> {
        let base = self.versioned_endpoint("network", "/v2.0").await?;
        self.collect_pages(
            format!("{base}/networks"),
            &base,
            false,
            |page: NetworksPage| (page.networks, next_link(&page.networks_links)),
        )
        .await
    }

    async fn list_images(&self) -> Result<Vec<Image>, CloudError> {
        let base = self.endpoint("image").await?;
        let root = base.strip_suffix("/v2").unwrap_or(&base).to_string();
        self.collect_pages(
            format!("{root}/v2/images"),
            &root,
            false,
            |page: ImagesPage| (page.images, page.next),
        )
        .await
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, CloudError> {
        let base = self.endpoint("compute").await?;
        self.collect_pages(
            format!("{base}/flavors/detail"),
            &base,
            true,
            |page: FlavorsPage| (page.flavors, next_link(&page.flavors_links)),
        )
        .await
    }

    async fn create_server(&self, request: &CreateServer) -> Result<ServerRef, CloudError> {
        let body = json!({
            "server": {
                "name": request.name,
                "imageRef": request.image_id,
                "flavorRef": request.flavor_id,
                "networks": [{ "uuid": request.network_id }],
            }
        });

        let url = self.compute_path("/servers").await?;
        let created: ServerBody<ServerRef> = self
            .execute_json(|| self.compute_request(Method::POST, &url).json(&body))
            .await?;

        info!(
            server_id = %created.server.id,
            name = %request.name,
            "server boot accepted"
        );
        Ok(created.server)
    }

    async fn wait_for_active(
        &self,
        server: &ServerRef,
        timeout: Duration,
    ) -> Result<Server, CloudError> {
        match tokio::time::timeout(timeout, self.poll_until_active(&server.id)).await {
            Ok(result) => result,
            Err(_) => Err(CloudError::Timeout {
                server_id: server.id.clone(),
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    async fn start_server(&self, server_id: &str) -> Result<(), CloudError> {
        self.server_action(server_id, json!({ "os-start": null })).await
    }

    async fn stop_server(&self, server_id: &str) -> Result<(), CloudError> {
        self.server_action(server_id, json!({ "os-stop": null })).await
    }

    async fn delete_server(&self, server_id: &str, force: bool) -> Result<(), CloudError> {
        if force {
            return self
                .server_action(server_id, json!({ "forceDelete": null }))
                .await;
        }

        let url = self
            .compute_path(&format!("/servers/{}", urlencoding::encode(server_id)))
            .await?;
        self.execute(|| self.compute_request(Method::DELETE, &url))
            .await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, CloudError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CloudError::from_status(status.as_u16(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: Option<DateTime<Utc>>) -> IssuedToken {
        IssuedToken {
            value: SecretString::from("t".to_string()),
            expires_at,
            catalog: vec![],
        }
    }

    #[test]
    fn token_without_expiry_is_never_renewed() {
        assert!(!token(None).near_expiry(Utc::now()));
    }

    #[test]
    fn token_renewed_inside_margin() {
        let now = Utc::now();
        assert!(token(Some(now + TimeDelta::seconds(30))).near_expiry(now));
        assert!(token(Some(now - TimeDelta::seconds(5))).near_expiry(now));
        assert!(!token(Some(now + TimeDelta::hours(1))).near_expiry(now));
    }

    #[test]
    fn next_link_picks_rel_next() {
        let links = vec![
            Link {
                href: "http://nova/v2.1/servers/detail?marker=a".to_string(),
                rel: "previous".to_string(),
            },
            Link {
                href: "http://nova/v2.1/servers/detail?marker=b".to_string(),
                rel: "next".to_string(),
            },
        ];
        assert_eq!(
            next_link(&links).as_deref(),
            Some("http://nova/v2.1/servers/detail?marker=b")
        );
        assert!(next_link(&[]).is_none());
    }
}
