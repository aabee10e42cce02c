//! Steps a controller runs around the allocator and the builder.
//!
//! Nothing here talks to the resource store. Callers list peers, hand the
//! snapshot in, and commit the mutated object with a version-checked update;
//! on conflict they fetch again and call back in.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identifier::Allocator;
use crate::model::{Vpc, VpcAttachment, MULTUS_NETWORKS_ANNOTATION, VPC_ATTACHMENT_ANNOTATION};
use crate::plugin::NetworkConfigBuilder;

/// Network attachment definition rendered for a VPCAttachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    pub name: String,
    pub namespace: String,
    /// CNI configuration list as JSON
    pub config: String,
}

/// Identifiers already taken by VPCs
pub fn vpc_identifiers(vpcs: &[Vpc]) -> HashSet<String> {
    vpcs.iter()
        .map(|vpc| &vpc.status.identifier)
        .filter(|id| !id.is_empty())
        .cloned()
        .collect()
}

/// Identifiers already taken by attachments of `vpc`.
///
/// Attachment identifiers only need to be unique within their VPC.
pub fn attachment_identifiers(vpc: &Vpc, attachments: &[VpcAttachment]) -> HashSet<String> {
    attachments
        .iter()
        .filter(|attachment| attachment.belongs_to(vpc))
        .map(|attachment| &attachment.status.identifier)
        .filter(|id| !id.is_empty())
        .cloned()
        .collect()
}

/// Give `vpc` an identifier unless it already has one.
///
/// Returns whether the object changed and needs a status update.
pub fn assign_vpc_identifier<R: Rng>(
    vpc: &mut Vpc,
    peers: &[Vpc],
    allocator: &mut Allocator<R>,
) -> Result<bool> {
    if !vpc.status.identifier.is_empty() {
        return Ok(false);
    }

    let identifier = allocator.for_vpc(&vpc_identifiers(peers))?;
    info!(vpc = %vpc.key(), identifier = %identifier, "assigned VPC identifier");
    vpc.status.identifier = identifier;
    vpc.status.ready = true;
    Ok(true)
}

/// Give `attachment` an identifier unless it already has one
pub fn assign_attachment_identifier<R: Rng>(
    attachment: &mut VpcAttachment,
    vpc: &Vpc,
    peers: &[VpcAttachment],
    allocator: &mut Allocator<R>,
) -> Result<bool> {
    if !attachment.status.identifier.is_empty() {
        return Ok(false);
    }

    let identifier = allocator.for_vpc_attachment(&attachment_identifiers(vpc, peers))?;
    info!(
        vpc_attachment = %attachment.key(),
        vpc = %vpc.key(),
        identifier = %identifier,
        "assigned VPC attachment identifier"
    );
    attachment.status.identifier = identifier;
    attachment.status.ready = true;
    Ok(true)
}

/// Render the network attachment definition for `attachment`
pub fn network_attachment(
    vpc: &Vpc,
    attachment: &VpcAttachment,
    config: &Config,
) -> Result<NetworkAttachment> {
    if vpc.status.identifier.is_empty() {
        return Err(Error::MissingIdentifier {
            kind: "VPC",
            name: vpc.key(),
        });
    }
    if attachment.status.identifier.is_empty() {
        return Err(Error::MissingIdentifier {
            kind: "VPCAttachment",
            name: attachment.key(),
        });
    }

    let conf = NetworkConfigBuilder::new(config).build(
        &vpc.status.identifier,
        &attachment.status.identifier,
        &attachment.spec.interface.addresses,
        &attachment.spec.routes,
    )?;

    Ok(NetworkAttachment {
        name: attachment.metadata.name.clone(),
        namespace: attachment.metadata.namespace.clone(),
        config: conf.to_json()?,
    })
}

/// Multus networks value for a pod, if it asks for a VPC attachment.
///
/// `lookup` resolves an attachment by name in the pod's namespace. A pod that
/// names an unknown attachment gets nothing.
pub fn default_pod_networks<F>(annotations: &BTreeMap<String, String>, lookup: F) -> Option<String>
where
    F: FnOnce(&str) -> Option<VpcAttachment>,
{
    let name = annotations.get(VPC_ATTACHMENT_ANNOTATION)?;
    let Some(attachment) = lookup(name) else {
        debug!(vpc_attachment = %name, "pod references unknown VPC attachment");
        return None;
    };
    Some(format!(
        "{}@{}",
        attachment.metadata.name, attachment.spec.interface.name
    ))
}

/// Set the multus networks annotation on a pod. Returns whether it changed.
pub fn apply_pod_networks<F>(annotations: &mut BTreeMap<String, String>, lookup: F) -> bool
where
    F: FnOnce(&str) -> Option<VpcAttachment>,
{
    match default_pod_networks(annotations, lookup) {
        Some(networks) => {
            annotations.insert(MULTUS_NETWORKS_ANNOTATION.to_string(), networks);
            true
        }
        None => false,
    }
}
