//! The authorization client seam.
//!
//! The gatekeeper talks to the authorization service through [`AuthzClient`]
//! so that deployments can swap the HTTP client for the offline-capable
//! local evaluator, and tests can swap in scripted doubles.

pub mod http;
pub mod local;

pub use http::HttpAuthzClient;
pub use local::LocalAuthzClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::credential::Credential;

/// Tagged decode of one service reply.
///
/// A grant must be the service's explicit grant marker; every other
/// well-formed reply is a denial. `Malformed` keeps undecodable replies
/// distinguishable in audit logs, but the gatekeeper folds it into a denial
/// (fail-closed) rather than into the fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDecision {
    Granted,
    Denied,
    Malformed,
}

/// Failure to obtain any reply at all. Both variants send the gatekeeper to
/// the cache fallback; they are distinguished only for observability.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote decision timed out after {}ms", elapsed.as_millis())]
    Timeout { elapsed: std::time::Duration },
}

/// A source of authoritative authorization decisions.
#[async_trait]
pub trait AuthzClient: Send + Sync {
    /// Ask the service to decide for one credential. Implementations do not
    /// enforce a deadline; the gatekeeper owns the timeout.
    async fn decide(&self, credential: &Credential) -> Result<RemoteDecision, RemoteError>;

    /// Short client name for logs.
    fn name(&self) -> &'static str;
}
