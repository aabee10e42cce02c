//! Error types for identifier allocation and network configuration

use std::net::AddrParseError;

use ipnetwork::IpNetworkError;
use thiserror::Error;

/// Errors raised by the allocator, the encoder and the config builder
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An address or route destination is not valid CIDR notation
    #[error("invalid CIDR {input:?}: {source}")]
    InvalidCidr {
        input: String,
        #[source]
        source: IpNetworkError,
    },

    /// A route next hop is not a valid IP literal
    #[error("failed to parse route via {input:?}: {source}")]
    InvalidIp {
        input: String,
        #[source]
        source: AddrParseError,
    },

    /// No unused identifier was drawn within the attempt ceiling
    #[error("could not find an unused identifier after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// An identifier could not be converted between bases
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A value or string is not a valid identifier for its keyspace
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The keyspace has no assignable values
    #[error("keyspace maximum {0:#x} leaves no assignable identifiers")]
    InvalidKeyspace(u64),

    /// A network attachment was requested before identifiers were committed
    #[error("{kind} {name} has no identifier assigned yet")]
    MissingIdentifier { kind: &'static str, name: String },

    /// Descriptor serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_cidr(input: &str, source: IpNetworkError) -> Self {
        Self::InvalidCidr {
            input: input.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_ip(input: &str, source: AddrParseError) -> Self {
        Self::InvalidIp {
            input: input.to_string(),
            source,
        }
    }

    /// Create an encoding error with the given message
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create an invalid identifier error with the given message
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    /// True for malformed address or route input.
    ///
    /// These are never retried; the owner of the input object has to fix it.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::InvalidCidr { .. } | Self::InvalidIp { .. })
    }

    /// True for failures that may succeed on a later attempt with a fresh
    /// snapshot of existing identifiers.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Result alias for this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
