use serde::{Deserialize, Serialize};

/// CNI specification version written into every descriptor
pub const CNI_VERSION: &str = "0.4.0";

/// MTU of the VPC interface
pub const MTU: u32 = 1300;

/// IPAM type for statically assigned addresses and routes
pub const STATIC_IPAM: &str = "static";

/// Network configuration list handed to the CNI runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetConfList {
    /// CNI specification version
    #[serde(rename = "cniVersion")]
    pub cni_version: String,
    /// Plugin chain, executed in order
    pub plugins: Vec<PluginConf>,
}

/// One block of the plugin chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginConf {
    Galactic(GalacticConf),
    Delegate(DelegateConf),
}

/// Identity block for the VPC plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalacticConf {
    #[serde(rename = "type")]
    pub plugin_type: String,
    /// Base-62 VPC identifier
    pub vpc: String,
    /// Base-62 VPC attachment identifier
    #[serde(rename = "vpcattachment")]
    pub vpc_attachment: String,
    pub mtu: u32,
    /// Networks reachable without leaving the local link
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terminations: Vec<Termination>,
    /// Present when addressing is not delegated to a second block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipam: Option<Ipam>,
}

/// Second block of a chained topology, configuring addresses on the
/// device the identity block created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateConf {
    #[serde(rename = "type")]
    pub plugin_type: String,
    pub device: String,
    pub ipam: Ipam,
}

/// Locally reachable network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    pub network: String,
    /// Local next hop, one of the attachment's own addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

/// IP address management block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipam {
    #[serde(rename = "type")]
    pub ipam_type: String,
    pub addresses: Vec<Address>,
    pub routes: Vec<Route>,
}

/// Interface address with prefix length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
}

/// Network reachable through an external gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination CIDR
    pub dst: String,
    /// Gateway for this route
    pub gw: String,
}

impl NetConfList {
    /// Create an empty configuration list
    pub fn new(cni_version: &str) -> Self {
        Self {
            cni_version: cni_version.to_string(),
            plugins: Vec::new(),
        }
    }

    /// Append a block to the plugin chain
    pub fn add_plugin(&mut self, plugin: PluginConf) {
        self.plugins.push(plugin);
    }

    /// The identity block, if the chain has one
    pub fn galactic(&self) -> Option<&GalacticConf> {
        self.plugins.iter().find_map(|plugin| match plugin {
            PluginConf::Galactic(conf) => Some(conf),
            PluginConf::Delegate(_) => None,
        })
    }

    /// The IPAM block, wherever the topology put it
    pub fn ipam(&self) -> Option<&Ipam> {
        self.plugins.iter().find_map(|plugin| match plugin {
            PluginConf::Galactic(conf) => conf.ipam.as_ref(),
            PluginConf::Delegate(conf) => Some(&conf.ipam),
        })
    }

    /// Compact JSON, as stored in a network attachment definition
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Ipam {
    /// Static IPAM block for the given addresses and routes
    pub fn new_static(addresses: Vec<Address>, routes: Vec<Route>) -> Self {
        Self {
            ipam_type: STATIC_IPAM.to_string(),
            addresses,
            routes,
        }
    }
}
