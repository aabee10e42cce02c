//! Views of the VPC and VPCAttachment objects as the resource store returns
//! them. Only the fields this crate reads or writes are modelled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pod annotation naming the VPCAttachment a pod joins
pub const VPC_ATTACHMENT_ANNOTATION: &str = "k8s.v1alpha.galactic.datumapis.com/vpc-attachment";

/// Pod annotation read by multus to attach additional networks
pub const MULTUS_NETWORKS_ANNOTATION: &str = "k8s.v1.cni.cncf.io/networks";

/// Default name of the attachment interface inside the pod
pub const DEFAULT_INTERFACE_NAME: &str = "galactic0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A virtual network spanning clusters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub metadata: ObjectMeta,
    pub spec: VpcSpec,
    #[serde(default)]
    pub status: VpcStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcSpec {
    /// IPv4 or IPv6 networks in CIDR notation
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcStatus {
    #[serde(default)]
    pub ready: bool,
    /// 12-digit hex identifier, empty until assigned
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
}

/// Attachment of pods to a VPC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcAttachment {
    pub metadata: ObjectMeta,
    pub spec: VpcAttachmentSpec,
    #[serde(default)]
    pub status: VpcAttachmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcAttachmentSpec {
    pub vpc: ObjectReference,
    pub interface: AttachmentInterface,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInterface {
    #[serde(default = "default_interface_name")]
    pub name: String,
    /// IPv4 or IPv6 addresses in CIDR notation
    pub addresses: Vec<String>,
}

impl Default for AttachmentInterface {
    fn default() -> Self {
        Self {
            name: default_interface_name(),
            addresses: Vec::new(),
        }
    }
}

fn default_interface_name() -> String {
    DEFAULT_INTERFACE_NAME.to_string()
}

/// Static route of an attachment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Destination network in CIDR notation
    pub destination: String,
    /// Next hop; empty when the route has none
    #[serde(default)]
    pub via: String,
}

impl RouteSpec {
    pub fn new(destination: &str, via: &str) -> Self {
        Self {
            destination: destination.to_string(),
            via: via.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcAttachmentStatus {
    #[serde(default)]
    pub ready: bool,
    /// 4-digit hex identifier, empty until assigned
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
}

impl Vpc {
    /// `namespace/name`, for logs and errors
    pub fn key(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }
}

impl VpcAttachment {
    /// `namespace/name`, for logs and errors
    pub fn key(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }

    /// Whether this attachment's parent reference points at `vpc`
    pub fn belongs_to(&self, vpc: &Vpc) -> bool {
        self.spec.vpc.name == vpc.metadata.name && self.spec.vpc.namespace == vpc.metadata.namespace
    }
}
