// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Tests for the reqwest-backed adapter against mock Keystone, Nova,
//! Neutron and Glance endpoints.

use std::sync::Arc;
use std::time::Duration;

use openstack_cloud::{
    CloudConnection, CloudConnector, CloudError, CloudOptions, CreateServer, Credentials,
    OpenStackCloud, ServerRef,
};
use serde_json::{Map, Value, json};
use wiremock::matchers::{
    body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "gAAAAABtest-token";

fn token_body(base: &str) -> Value {
    json!({
        "token": {
            "methods": ["password"],
            "project": {"id": "a1b2c3", "name": "demo", "domain": {"id": "default"}},
            "catalog": [
                {"type": "compute", "name": "nova", "endpoints": [
                    {"interface": "public", "region_id": "RegionOne", "region": "RegionOne",
                     "url": format!("{base}/compute/v2.1")}
                ]},
                {"type": "network", "name": "neutron", "endpoints": [
                    {"interface": "public", "region_id": "RegionOne", "region": "RegionOne",
                     "url": format!("{base}/network")}
                ]},
                {"type": "image", "name": "glance", "endpoints": [
                    {"interface": "public", "region_id": "RegionOne", "region": "RegionOne",
                     "url": format!("{base}/image")}
                ]}
            ]
        }
    })
}

fn credentials(server: &MockServer) -> Credentials {
    Credentials::new(
        format!("{}/v3", server.uri()),
        "demo",
        "admin",
        "secret",
        "default",
        "default",
    )
}

fn cloud() -> OpenStackCloud {
    OpenStackCloud::new(CloudOptions {
        poll_interval: Duration::from_millis(20),
        ..Default::default()
    })
    .expect("failed to build cloud client")
}

async fn mount_keystone(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri())),
        )
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> Arc<dyn CloudConnection> {
    mount_keystone(server).await;
    cloud()
        .authenticate(&credentials(server))
        .await
        .expect("authentication failed")
}

fn server_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "OS-EXT-SRV-ATTR:hostname": name,
        "flavor": {"original_name": "m1.small", "vcpus": 1, "ram": 2048, "disk": 20, "ephemeral": 0},
        "addresses": {"private": [{"addr": "10.0.0.7", "version": 4, "OS-EXT-IPS:type": "fixed"}]}
    })
}

#[tokio::test]
async fn authenticate_sends_project_scoped_password_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .and(body_partial_json(json!({
            "auth": {
                "identity": {"methods": ["password"],
                             "password": {"user": {"name": "admin", "password": "secret",
                                                   "domain": {"id": "default"}}}},
                "scope": {"project": {"name": "demo", "domain": {"id": "default"}}}
            }
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;

    // auth_url without the /v3 suffix
    let creds = Credentials::new(server.uri(), "demo", "admin", "secret", "default", "default");
    let connection = cloud().authenticate(&creds).await.unwrap();

    assert_eq!(connection.project_name(), "demo");
}

#[tokio::test]
async fn rejected_credentials_are_authentication_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "title": "Unauthorized",
                      "message": "The request you have made requires authentication."}
        })))
        .mount(&server)
        .await;

    let err = cloud().authenticate(&credentials(&server)).await.err().unwrap();
    match err {
        CloudError::AuthenticationFailed(message) => {
            assert_eq!(message, "The request you have made requires authentication.")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn token_header_is_required() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_body(&server.uri())))
        .mount(&server)
        .await;

    let err = cloud().authenticate(&credentials(&server)).await.err().unwrap();
    assert!(matches!(err, CloudError::MissingToken));
}

#[tokio::test]
async fn list_servers_uses_token_and_microversion() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(header("X-Auth-Token", TOKEN))
        .and(header("X-OpenStack-Nova-API-Version", "2.47"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [server_json("s-1", "web-1", "ACTIVE"), server_json("s-2", "db-1", "SHUTOFF")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let servers = connection.list_servers().await.unwrap();
    let names: Vec<_> = servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["web-1", "db-1"]);
    assert_eq!(servers[0].flavor.original_name.as_deref(), Some("m1.small"));
}

#[tokio::test]
async fn list_networks_and_flavors() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/network/v2.0/networks"))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "n-1", "name": "private", "status": "ACTIVE", "mtu": 1450}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/flavors/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{"id": "1", "name": "m1.tiny", "vcpus": 1, "ram": 512, "disk": 1,
                         "OS-FLV-EXT-DATA:ephemeral": 0}]
        })))
        .mount(&server)
        .await;

    let networks = connection.list_networks().await.unwrap();
    assert_eq!(networks.len(), 1);
    assert_eq!(networks[0].mtu, Some(1450));

    let flavors = connection.list_flavors().await.unwrap();
    assert_eq!(flavors[0].name, "m1.tiny");
    assert_eq!(flavors[0].ram, 512);
}

#[tokio::test]
async fn list_images_follows_next_links() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/image/v2/images"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [
                {"id": "img-1", "name": "cirros", "disk_format": "qcow2", "size": 16338944, "status": "active"},
                {"id": "img-2", "name": null, "status": "queued"}
            ],
            "next": "/v2/images?marker=img-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/image/v2/images"))
        .and(query_param("marker", "img-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [{"id": "img-3", "name": "ubuntu", "disk_format": "raw", "size": 2361393152u64}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let images = connection.list_images().await.unwrap();
    let ids: Vec<_> = images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["img-1", "img-2", "img-3"]);
    assert!(images[1].name.is_none());
    assert!(images[1].size.is_none());
}

#[tokio::test]
async fn create_server_then_wait_until_active() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("POST"))
        .and(path("/compute/v2.1/servers"))
        .and(body_json(json!({
            "server": {"name": "web-9", "imageRef": "img-1", "flavorRef": "2",
                       "networks": [{"uuid": "n-1"}]}
        })))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"server": {"id": "new-1", "adminPass": "x", "links": []}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/new-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"server": server_json("new-1", "web-9", "BUILD")})),
        )
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/new-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"server": server_json("new-1", "web-9", "ACTIVE")})),
        )
        .mount(&server)
        .await;

    let created = connection
        .create_server(&CreateServer {
            name: "web-9".to_string(),
            image_id: "img-1".to_string(),
            flavor_id: "2".to_string(),
            network_id: "n-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "new-1");

    let active = connection
        .wait_for_active(&created, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(active.status, "ACTIVE");
}

#[tokio::test]
async fn wait_fails_when_server_errors() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/bad-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"server": server_json("bad-1", "bad", "ERROR")})),
        )
        .mount(&server)
        .await;

    let err = connection
        .wait_for_active(&ServerRef { id: "bad-1".to_string() }, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CloudError::ServerFailed { ref server_id, ref status } if server_id == "bad-1" && status == "ERROR"
    ));
}

#[tokio::test]
async fn wait_times_out_while_building() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/slow-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"server": server_json("slow-1", "slow", "BUILD")})),
        )
        .mount(&server)
        .await;

    let err = connection
        .wait_for_active(&ServerRef { id: "slow-1".to_string() }, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CloudError::Timeout { ref server_id, timeout_secs: 1 } if server_id == "slow-1"
    ));
}

#[tokio::test]
async fn power_actions_post_action_bodies() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    for action in ["os-start", "os-stop", "forceDelete"] {
        Mock::given(method("POST"))
            .and(path("/compute/v2.1/servers/s-1/action"))
            .and(body_json(Value::Object(Map::from_iter([(
                action.to_string(),
                Value::Null,
            )]))))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
    }

    connection.start_server("s-1").await.unwrap();
    connection.stop_server("s-1").await.unwrap();
    connection.delete_server("s-1", true).await.unwrap();
}

#[tokio::test]
async fn plain_delete_uses_http_delete() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/compute/v2.1/servers/s-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    connection.delete_server("s-1", false).await.unwrap();
}

#[tokio::test]
async fn nova_faults_are_classified() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("POST"))
        .and(path("/compute/v2.1/servers/missing/action"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"code": 404, "message": "Instance missing could not be found."}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/compute/v2.1/servers/busy/action"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "conflictingRequest": {"code": 409,
                "message": "Cannot 'start' instance busy while it is in vm_state active"}
        })))
        .mount(&server)
        .await;

    match connection.start_server("missing").await.unwrap_err() {
        CloudError::NotFound(message) => {
            assert_eq!(message, "Instance missing could not be found.")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(
        connection.start_server("busy").await.unwrap_err(),
        CloudError::Conflict(_)
    ));
}

#[tokio::test]
async fn list_servers_follows_pagination_links() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [server_json("s-1", "web-1", "ACTIVE")],
            "servers_links": [{
                "href": format!("{}/compute/v2.1/servers/detail?marker=s-1", server.uri()),
                "rel": "next"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(query_param("marker", "s-1"))
        .and(header("X-OpenStack-Nova-API-Version", "2.47"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [server_json("s-2", "web-2", "SHUTOFF")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let servers = connection.list_servers().await.unwrap();
    let ids: Vec<_> = servers.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s-1", "s-2"]);
}

#[tokio::test]
async fn list_flavors_and_networks_follow_pagination_links() {
    let server = MockServer::start().await;
    let connection = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/flavors/detail"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{"id": "1", "name": "m1.tiny", "vcpus": 1, "ram": 512, "disk": 1}],
            "flavors_links": [{
                "href": format!("{}/compute/v2.1/flavors/detail?marker=1", server.uri()),
                "rel": "next"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/flavors/detail"))
        .and(query_param("marker", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{"id": "2", "name": "m1.small", "vcpus": 1, "ram": 2048, "disk": 20}],
            "flavors_links": [{"href": format!("{}/compute/v2.1/flavors/detail?marker=1", server.uri()), "rel": "previous"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/network/v2.0/networks"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "net-1", "name": "private", "status": "ACTIVE"}],
            "networks_links": [{
                "href": format!("{}/network/v2.0/networks?marker=net-1", server.uri()),
                "rel": "next"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network/v2.0/networks"))
        .and(query_param("marker", "net-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [],
            "networks_links": [{
                "href": format!("{}/network/v2.0/networks?marker=net-1", server.uri()),
                "rel": "next"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flavors = connection.list_flavors().await.unwrap();
    let names: Vec<_> = flavors.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["m1.tiny", "m1.small"]);

    // An empty page ends the listing even when it still links onward
    let networks = connection.list_networks().await.unwrap();
    assert_eq!(networks.len(), 1);
}

async fn mount_keystone_once(server: &MockServer, token: &str, expires_at: &str) {
    let mut body = token_body(&server.uri());
    body["token"]["expires_at"] = json!(expires_at);

    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", token)
                .set_body_json(body),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn rejected_token_is_reissued_and_request_retried() {
    let server = MockServer::start().await;
    mount_keystone_once(&server, TOKEN, "2099-01-01T00:00:00.000000Z").await;
    mount_keystone_once(&server, "renewed-token", "2099-01-01T00:00:00.000000Z").await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "title": "Unauthorized",
                      "message": "The request you have made requires authentication."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(header("X-Auth-Token", "renewed-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [server_json("s-1", "web-1", "ACTIVE")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let connection = cloud().authenticate(&credentials(&server)).await.unwrap();

    let servers = connection.list_servers().await.unwrap();
    assert_eq!(servers.len(), 1);

    // The renewed token sticks for later requests
    connection.list_servers().await.unwrap();
}

#[tokio::test]
async fn token_near_expiry_is_renewed_before_use() {
    let server = MockServer::start().await;
    mount_keystone_once(&server, TOKEN, "2020-01-01T00:00:00.000000Z").await;
    mount_keystone_once(&server, "renewed-token", "2099-01-01T00:00:00.000000Z").await;

    Mock::given(method("GET"))
        .and(path("/network/v2.0/networks"))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network/v2.0/networks"))
        .and(header("X-Auth-Token", "renewed-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "net-1", "name": "private", "status": "ACTIVE"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connection = cloud().authenticate(&credentials(&server)).await.unwrap();
    let networks = connection.list_networks().await.unwrap();
    assert_eq!(networks[0].id, "net-1");
}

#[tokio::test]
async fn persistent_unauthorized_is_retried_only_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri())),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image/v2/images"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "title": "Unauthorized",
                      "message": "The request you have made requires authentication."}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let connection = cloud().authenticate(&credentials(&server)).await.unwrap();
    let err = connection.list_images().await.unwrap_err();
    assert!(
        matches!(err, CloudError::AuthenticationFailed(_)),
        "unexpected error: {err:?}"
    );
}
