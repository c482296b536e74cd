//! Decision types shared by the gatekeeper, the cache, and the audit sink.

use std::fmt;
use std::time::Duration;

/// The binary gate decision. This is the only part of a decision the door
/// hardware ever sees; provenance and latency are for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Granted,
    Denied,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// An authoritative reply from the remote authorization service.
    Remote,
    /// The local decision cache, consulted because the remote service could
    /// not be reached in time. Covers the fail-closed cache-miss denial too.
    Cache,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Cache => "cache",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one `authenticate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub provenance: Provenance,
    /// Wall-clock time spent on the call, including any fallback lookup.
    pub latency: Duration,
}

impl Decision {
    pub fn permits_entry(&self) -> bool {
        self.outcome == Outcome::Granted
    }
}
