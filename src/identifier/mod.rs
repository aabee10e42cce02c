//! Collision-avoiding identifier allocation
//!
//! Identifiers are drawn uniformly from a bounded keyspace and rendered as
//! fixed-width lowercase hex. The allocator only sees the snapshot of used
//! identifiers it is handed; two callers working from overlapping snapshots
//! can pick the same value, so whoever commits the identifier must do so with
//! a version-checked write and call [`Allocator::allocate`] again with a fresh
//! snapshot on conflict.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Upper bound of the 48-bit VPC keyspace
pub const MAX_VPC: u64 = 0xFFFF_FFFF_FFFF;

/// Upper bound of the 16-bit VPC attachment keyspace
pub const MAX_VPC_ATTACHMENT: u64 = 0xFFFF;

/// Number of candidates drawn before giving up
pub const MAX_ATTEMPTS: u32 = 100;

/// A bounded identifier space `[0, max]`.
///
/// `0` means "unset" and `max` means "invalid", so only `[1, max - 1]` is ever
/// handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyspace {
    max: u64,
}

impl Keyspace {
    /// Keyspace for VPC identifiers (12 hex digits)
    pub const VPC: Keyspace = Keyspace { max: MAX_VPC };

    /// Keyspace for VPC attachment identifiers (4 hex digits)
    pub const VPC_ATTACHMENT: Keyspace = Keyspace {
        max: MAX_VPC_ATTACHMENT,
    };

    /// Create a keyspace bounded by `max`
    pub fn new(max: u64) -> Result<Self> {
        if max < 2 {
            return Err(Error::InvalidKeyspace(max));
        }
        Ok(Self { max })
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Number of hex digits in a rendered identifier
    pub fn width(&self) -> usize {
        let bits = u64::BITS - self.max.leading_zeros();
        bits.div_ceil(4).max(1) as usize
    }

    /// Render `value` as a fixed-width identifier.
    ///
    /// Fails for the reserved values `0` and `max` and for anything above `max`.
    pub fn render(&self, value: u64) -> Result<String> {
        if value == 0 || value == self.max {
            return Err(Error::invalid_identifier(format!(
                "{value} is a special value that cannot be used"
            )));
        }
        if value > self.max {
            return Err(Error::invalid_identifier(format!(
                "{value} exceeds maximum value {}",
                self.max
            )));
        }
        Ok(format!("{:0width$x}", value, width = self.width()))
    }

    /// Parse a rendered identifier back into its value
    pub fn parse(&self, identifier: &str) -> Result<u64> {
        let well_formed = identifier.len() == self.width()
            && identifier
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(Error::invalid_identifier(format!(
                "{identifier:?} is not a {}-digit lowercase hex identifier",
                self.width()
            )));
        }
        let value = u64::from_str_radix(identifier, 16)
            .map_err(|e| Error::invalid_identifier(format!("{identifier:?}: {e}")))?;
        // Reject sentinels and out of range values with the same messages as render
        self.render(value)?;
        Ok(value)
    }
}

/// Draws unused identifiers from an owned random generator.
///
/// The generator is never shared between allocators. Seed it with
/// [`Allocator::from_seed`] for reproducible sequences.
#[derive(Debug, Clone)]
pub struct Allocator<R = StdRng> {
    rng: R,
}

impl Allocator<StdRng> {
    /// Allocator seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Allocator with a deterministic sequence
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Allocator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Pick an identifier in `keyspace` that is not in `existing`.
    ///
    /// Candidates come from `gen_range`, which rejects out-of-zone samples
    /// instead of reducing modulo the range, so every value in
    /// `[1, max - 1]` is equally likely. Returns [`Error::Exhausted`] after
    /// [`MAX_ATTEMPTS`] collisions.
    pub fn allocate(&mut self, existing: &HashSet<String>, keyspace: Keyspace) -> Result<String> {
        for attempt in 1..=MAX_ATTEMPTS {
            let value = self.rng.gen_range(1..keyspace.max());
            let candidate = keyspace.render(value)?;
            if !existing.contains(&candidate) {
                debug!(identifier = %candidate, attempt, "allocated identifier");
                return Ok(candidate);
            }
            debug!(identifier = %candidate, attempt, "identifier in use, drawing again");
        }

        warn!(
            max = keyspace.max(),
            existing = existing.len(),
            attempts = MAX_ATTEMPTS,
            "no unused identifier found"
        );
        Err(Error::Exhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Allocate a 48-bit VPC identifier
    pub fn for_vpc(&mut self, existing: &HashSet<String>) -> Result<String> {
        self.allocate(existing, Keyspace::VPC)
    }

    /// Allocate a 16-bit VPC attachment identifier
    pub fn for_vpc_attachment(&mut self, existing: &HashSet<String>) -> Result<String> {
        self.allocate(existing, Keyspace::VPC_ATTACHMENT)
    }
}
