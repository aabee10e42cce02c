use std::net::IpAddr;

use ipnetwork::{IpNetwork, IpNetworkError};
use tracing::debug;

use crate::config::{Config, Topology};
use crate::encoding::hex_to_base62;
use crate::error::{Error, Result};
use crate::model::RouteSpec;
use crate::types::{
    Address, DelegateConf, GalacticConf, Ipam, NetConfList, PluginConf, Route, Termination, MTU,
};

/// Addresses and routes of an attachment sorted into what the plugin needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Address strings exactly as given
    pub addresses: Vec<Address>,
    /// Attached networks followed by routes whose next hop is a local address
    pub terminations: Vec<Termination>,
    /// Routes through an external gateway
    pub routes: Vec<Route>,
}

/// Sort an attachment's addresses and static routes.
///
/// Every address yields a termination for its network. A route whose next hop
/// equals one of the addresses is a termination too; any other route with a
/// next hop goes through a gateway. Routes without a next hop are dropped.
/// Input order is kept within each list. The first unparsable CIDR or IP
/// aborts the whole classification.
pub fn classify(addresses: &[String], routes: &[RouteSpec]) -> Result<Classification> {
    let mut classification = Classification {
        addresses: Vec::with_capacity(addresses.len()),
        terminations: Vec::with_capacity(addresses.len() + routes.len()),
        routes: Vec::new(),
    };
    let mut local_ips = Vec::with_capacity(addresses.len());

    for address in addresses {
        let net = parse_cidr(address)?;
        local_ips.push(net.ip().to_canonical());
        classification.addresses.push(Address {
            address: address.clone(),
        });
        classification.terminations.push(Termination {
            network: network_of(&net),
            via: None,
        });
    }

    for route in routes {
        let destination = network_of(&parse_cidr(&route.destination)?);
        if route.via.is_empty() {
            debug!(destination = %destination, "route has no next hop, skipping");
            continue;
        }

        let via = route
            .via
            .parse::<IpAddr>()
            .map_err(|e| Error::invalid_ip(&route.via, e))?
            .to_canonical();

        if local_ips.contains(&via) {
            classification.terminations.push(Termination {
                network: destination,
                via: Some(via.to_string()),
            });
        } else {
            classification.routes.push(Route {
                dst: destination,
                gw: via.to_string(),
            });
        }
    }

    Ok(classification)
}

/// Name of the pod-side device created for an attachment.
///
/// Both base-62 identifiers are zero-padded to their maximum length (9 and 3
/// digits) so the name is always 14 characters.
pub fn device_name(vpc: &str, vpc_attachment: &str) -> String {
    format!("G{vpc:0>9}{vpc_attachment:0>3}G")
}

/// Builds CNI configuration lists for VPC attachments
pub struct NetworkConfigBuilder<'a> {
    config: &'a Config,
}

impl<'a> NetworkConfigBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the descriptor for one attachment.
    ///
    /// `vpc_id` and `attachment_id` are committed hex identifiers. The result
    /// depends only on the arguments and the configured topology.
    pub fn build(
        &self,
        vpc_id: &str,
        attachment_id: &str,
        addresses: &[String],
        routes: &[RouteSpec],
    ) -> Result<NetConfList> {
        let Classification {
            addresses,
            terminations,
            routes,
        } = classify(addresses, routes)?;

        let vpc = hex_to_base62(vpc_id)?;
        let vpc_attachment = hex_to_base62(attachment_id)?;

        debug!(
            vpc = %vpc,
            vpc_attachment = %vpc_attachment,
            terminations = terminations.len(),
            routes = routes.len(),
            topology = ?self.config.topology,
            "building network configuration"
        );

        let ipam = Ipam::new_static(addresses, routes);
        let mut conf = NetConfList::new(&self.config.cni_version);

        match self.config.topology {
            Topology::Fused => {
                conf.add_plugin(PluginConf::Galactic(GalacticConf {
                    plugin_type: self.config.plugin_type.clone(),
                    vpc,
                    vpc_attachment,
                    mtu: MTU,
                    terminations,
                    ipam: Some(ipam),
                }));
            }
            Topology::Chained => {
                let device = device_name(&vpc, &vpc_attachment);
                conf.add_plugin(PluginConf::Galactic(GalacticConf {
                    plugin_type: self.config.plugin_type.clone(),
                    vpc,
                    vpc_attachment,
                    mtu: MTU,
                    terminations,
                    ipam: None,
                }));
                conf.add_plugin(PluginConf::Delegate(DelegateConf {
                    plugin_type: self.config.delegate_plugin_type.clone(),
                    device,
                    ipam,
                }));
            }
        }

        Ok(conf)
    }
}

/// Parse CIDR notation, insisting on an explicit prefix length
fn parse_cidr(input: &str) -> Result<IpNetwork> {
    if !input.contains('/') {
        return Err(Error::invalid_cidr(
            input,
            IpNetworkError::InvalidCidrFormat(format!("missing prefix length in {input}")),
        ));
    }
    input
        .parse::<IpNetwork>()
        .map_err(|e| Error::invalid_cidr(input, e))
}

/// Network portion of `net` with host bits cleared, e.g. 10.1.1.0/24
fn network_of(net: &IpNetwork) -> String {
    format!("{}/{}", net.network(), net.prefix())
}
