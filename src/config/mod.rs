use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::CNI_VERSION;

/// Shape of the plugin chain written into each descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// One block carrying identity, terminations and IPAM
    Fused,
    /// Identity block followed by a delegate block that owns IPAM
    Chained,
}

/// Deployment configuration for descriptor generation.
///
/// There is no default topology; deployments must pick one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// CNI specification version
    #[serde(default = "default_cni_version")]
    pub cni_version: String,
    /// Type of the identity plugin
    #[serde(default = "default_plugin_type")]
    pub plugin_type: String,
    /// Plugin chain shape
    pub topology: Topology,
    /// Type of the IPAM delegate plugin, used by the chained topology
    #[serde(default = "default_delegate_plugin_type")]
    pub delegate_plugin_type: String,
}

fn default_cni_version() -> String {
    CNI_VERSION.to_string()
}

fn default_plugin_type() -> String {
    "galactic".to_string()
}

fn default_delegate_plugin_type() -> String {
    "host-device".to_string()
}

impl Config {
    /// Configuration with the standard plugin names for `topology`
    pub fn new(topology: Topology) -> Self {
        Self {
            cni_version: default_cni_version(),
            plugin_type: default_plugin_type(),
            topology,
            delegate_plugin_type: default_delegate_plugin_type(),
        }
    }

    /// Parse Config from bytes
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let config: Config =
            serde_json::from_slice(bytes).context("Failed to parse netconf configuration")?;

        if config.cni_version.is_empty() {
            anyhow::bail!("cniVersion must not be empty");
        }
        if config.plugin_type.is_empty() {
            anyhow::bail!("pluginType must not be empty");
        }
        if config.topology == Topology::Chained && config.delegate_plugin_type.is_empty() {
            anyhow::bail!("delegatePluginType is required for the chained topology");
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
        Self::parse(&bytes).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
        Ok(())
    }
}
