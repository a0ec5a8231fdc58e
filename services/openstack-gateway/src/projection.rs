// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Mapping from cloud domain objects to the gateway's JSON projections
//!
//! Every listing keeps the cloud's order.

use openstack_cloud::{Flavor, Image, Network, Server};
use openstack_gateway_api::{
    ClusterSection, FlavorSummary, ImageSummary, NetworkSummary, ServerAddress, ServerFlavor,
    ServerSummary,
};

pub fn server_summary(server: &Server) -> ServerSummary {
    let network = server
        .addresses
        .iter()
        .map(|(name, addresses)| {
            let addresses = addresses
                .iter()
                .map(|a| ServerAddress {
                    addr: a.addr.clone(),
                    version: a.version,
                    ip_type: a.ip_type.clone(),
                    mac_addr: a.mac_addr.clone(),
                })
                .collect();
            (name.clone(), addresses)
        })
        .collect();

    ServerSummary {
        server_hostname: server.name.clone(),
        server_id: server.id.clone(),
        name: server.hostname.clone(),
        status: server.status.clone(),
        flavor: ServerFlavor {
            id: server.flavor.id.clone(),
            original_name: server.flavor.original_name.clone(),
            vcpus: server.flavor.vcpus,
            ram: server.flavor.ram,
            disk: server.flavor.disk,
            ephemeral: server.flavor.ephemeral,
        },
        network,
    }
}

pub fn network_summary(network: &Network) -> NetworkSummary {
    NetworkSummary {
        network_name: network.name.clone(),
        network_id: network.id.clone(),
        status: network.status.clone(),
        mtu: network.mtu,
    }
}

pub fn flavor_summary(flavor: &Flavor) -> FlavorSummary {
    FlavorSummary {
        flavor_name: flavor.name.clone(),
        id: flavor.id.clone(),
        vcpus: flavor.vcpus,
        ram: flavor.ram,
        disk_size: format!("{} GB", flavor.disk),
    }
}

pub fn image_summary(image: &Image) -> ImageSummary {
    ImageSummary {
        image_name: image.name.clone(),
        image_id: image.id.clone(),
        disk_format: image.disk_format.clone(),
        size: image.size,
    }
}

/// The four `/discovercluster` sections: servers, networks, images, flavors
pub fn cluster_sections(
    servers: &[Server],
    networks: &[Network],
    images: &[Image],
    flavors: &[Flavor],
) -> Vec<ClusterSection> {
    vec![
        ClusterSection::Servers {
            names: servers.iter().map(|s| s.name.clone()).collect(),
            count: servers.len(),
        },
        ClusterSection::Networks {
            names: networks.iter().map(|n| n.name.clone()).collect(),
            count: networks.len(),
        },
        ClusterSection::Images {
            names: images.iter().map(|i| i.name.clone()).collect(),
            count: images.len(),
        },
        ClusterSection::Flavors {
            names: flavors.iter().map(|f| f.name.clone()).collect(),
            count: flavors.len(),
        },
    ]
}
