//! The gate endpoint orchestrator.
//!
//! One `authenticate` call:
//! 1. Ask the authorization service, under the configured deadline.
//! 2. On a reply: an exact grant grants, everything else denies; either way
//!    the outcome is recorded in the decision cache.
//! 3. On transport failure or timeout: fall back to the cache; a fresh
//!    cached outcome is returned as-is, a miss denies (fail-closed).
//!
//! `authenticate` is infallible by construction: every failure mode resolves
//! to a granted/denied decision.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::audit::{AuditRecord, AuditSink, TracingAuditSink};
use crate::cache::DecisionCache;
use crate::config::GateConfig;
use crate::credential::Credential;
use crate::decision::{Decision, Outcome, Provenance};
use crate::remote::{AuthzClient, RemoteDecision, RemoteError};

pub struct Gatekeeper {
    client: Arc<dyn AuthzClient>,
    cache: Arc<DecisionCache>,
    audit: Arc<dyn AuditSink>,
    config: GateConfig,
}

impl Gatekeeper {
    /// The cache is injected, not owned globally, so multiple independent
    /// gate instances can coexist and tests can inspect it.
    pub fn new(client: Arc<dyn AuthzClient>, cache: Arc<DecisionCache>, config: GateConfig) -> Self {
        Self {
            client,
            cache,
            audit: Arc::new(TracingAuditSink),
            config,
        }
    }

    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// Decide whether the gate opens for this credential.
    pub async fn authenticate(&self, credential: &Credential) -> Decision {
        let started = Instant::now();
        let deadline = self.config.request_timeout();

        let (outcome, provenance) =
            match tokio::time::timeout(deadline, self.client.decide(credential)).await {
                Ok(Ok(RemoteDecision::Granted)) => {
                    self.cache.record(credential, Outcome::Granted);
                    (Outcome::Granted, Provenance::Remote)
                }
                Ok(Ok(reply @ (RemoteDecision::Denied | RemoteDecision::Malformed))) => {
                    // Denial is always derivable locally; only the exact
                    // grant signal grants. Malformed replies deny too, and
                    // the denial is cached like any authoritative one.
                    if reply == RemoteDecision::Malformed {
                        debug!(client = self.client.name(), "malformed reply treated as denial");
                    }
                    self.cache.record(credential, Outcome::Denied);
                    (Outcome::Denied, Provenance::Remote)
                }
                Ok(Err(err)) => {
                    warn!(
                        client = self.client.name(),
                        error = %err,
                        "authorization service unreachable, consulting cache"
                    );
                    self.fallback(credential)
                }
                Err(_elapsed) => {
                    // The in-flight call is dropped here; a late reply can
                    // no longer be applied.
                    let err = RemoteError::Timeout { elapsed: deadline };
                    warn!(
                        client = self.client.name(),
                        error = %err,
                        "authorization service timed out, consulting cache"
                    );
                    self.fallback(credential)
                }
            };

        let decision = Decision {
            outcome,
            provenance,
            latency: started.elapsed(),
        };
        self.audit.emit(&AuditRecord {
            credential: credential.clone(),
            outcome,
            provenance,
            latency: decision.latency,
            at: Utc::now(),
        });
        decision
    }

    /// Best-known cached outcome, or a fail-closed denial.
    fn fallback(&self, credential: &Credential) -> (Outcome, Provenance) {
        match self.cache.lookup(credential) {
            Some(outcome) => (outcome, Provenance::Cache),
            None => (Outcome::Denied, Provenance::Cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct ScriptedClient {
        reply: RemoteDecision,
    }

    #[async_trait]
    impl AuthzClient for ScriptedClient {
        async fn decide(&self, _c: &Credential) -> Result<RemoteDecision, RemoteError> {
            Ok(self.reply)
        }
        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    struct UnreachableClient;

    #[async_trait]
    impl AuthzClient for UnreachableClient {
        async fn decide(&self, _c: &Credential) -> Result<RemoteDecision, RemoteError> {
            Err(RemoteError::Transport("connection refused".to_string()))
        }
        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    struct SlowGrantingClient {
        delay: Duration,
    }

    #[async_trait]
    impl AuthzClient for SlowGrantingClient {
        async fn decide(&self, _c: &Credential) -> Result<RemoteDecision, RemoteError> {
            tokio::time::sleep(self.delay).await;
            Ok(RemoteDecision::Granted)
        }
        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn cred() -> Credential {
        Credential::parse("04 a3 f0 11").unwrap()
    }

    fn gatekeeper(client: Arc<dyn AuthzClient>) -> (Gatekeeper, Arc<DecisionCache>) {
        let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 64));
        let gk = Gatekeeper::new(client, cache.clone(), GateConfig::default());
        (gk, cache)
    }

    #[tokio::test]
    async fn remote_grant_is_returned_and_cached() {
        let (gk, cache) = gatekeeper(Arc::new(ScriptedClient {
            reply: RemoteDecision::Granted,
        }));
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Granted);
        assert_eq!(d.provenance, Provenance::Remote);
        assert_eq!(cache.lookup(&cred()), Some(Outcome::Granted));
    }

    #[tokio::test]
    async fn explicit_denial_is_returned_and_cached() {
        let (gk, cache) = gatekeeper(Arc::new(ScriptedClient {
            reply: RemoteDecision::Denied,
        }));
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Denied);
        assert_eq!(d.provenance, Provenance::Remote);
        assert_eq!(cache.lookup(&cred()), Some(Outcome::Denied));
    }

    #[tokio::test]
    async fn malformed_reply_denies_and_is_cached_as_denial() {
        let (gk, cache) = gatekeeper(Arc::new(ScriptedClient {
            reply: RemoteDecision::Malformed,
        }));
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Denied);
        assert_eq!(d.provenance, Provenance::Remote);
        assert_eq!(cache.lookup(&cred()), Some(Outcome::Denied));
    }

    #[tokio::test]
    async fn outage_with_warm_cache_returns_cached_grant() {
        let (gk, cache) = gatekeeper(Arc::new(UnreachableClient));
        cache.record(&cred(), Outcome::Granted);
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Granted);
        assert_eq!(d.provenance, Provenance::Cache);
    }

    #[tokio::test]
    async fn outage_with_cold_cache_fails_closed() {
        let (gk, _cache) = gatekeeper(Arc::new(UnreachableClient));
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Denied);
        assert_eq!(d.provenance, Provenance::Cache);
    }

    #[tokio::test]
    async fn outage_with_stale_cache_fails_closed() {
        let client = Arc::new(UnreachableClient);
        let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 64));
        // Recorded two hours ago, max age one hour.
        cache.record_at(
            &cred(),
            Outcome::Granted,
            Utc::now() - chrono::Duration::hours(2),
        );
        let gk = Gatekeeper::new(client, cache, GateConfig::default());
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Denied);
        assert_eq!(d.provenance, Provenance::Cache);
    }

    #[tokio::test]
    async fn repeated_calls_during_outage_are_idempotent() {
        let (gk, cache) = gatekeeper(Arc::new(UnreachableClient));
        cache.record(&cred(), Outcome::Granted);
        let first = gk.authenticate(&cred()).await;
        let second = gk.authenticate(&cred()).await;
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.provenance, second.provenance);
    }

    #[tokio::test]
    async fn timeout_falls_back_and_discards_the_late_reply() {
        let client = Arc::new(SlowGrantingClient {
            delay: Duration::from_secs(30),
        });
        let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 64));
        let config = GateConfig {
            request_timeout_secs: 1,
            ..GateConfig::default()
        };
        let gk = Gatekeeper::new(client, cache.clone(), config);

        // Paused time auto-advances to the earliest timer: the 1s deadline
        // fires long before the 30s reply would arrive.
        tokio::time::pause();
        let d = gk.authenticate(&cred()).await;
        assert_eq!(d.outcome, Outcome::Denied);
        assert_eq!(d.provenance, Provenance::Cache);
        // The abandoned grant was never applied.
        assert_eq!(cache.lookup(&cred()), None);
    }

    #[tokio::test]
    async fn every_decision_reaches_the_audit_sink() {
        use crate::audit::MemoryAuditSink;
        let sink = Arc::new(MemoryAuditSink::new());
        let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 64));
        let gk = Gatekeeper::new(
            Arc::new(ScriptedClient {
                reply: RemoteDecision::Granted,
            }),
            cache,
            GateConfig::default(),
        )
        .with_audit(sink.clone());

        gk.authenticate(&cred()).await;
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].credential, cred());
        assert_eq!(records[0].outcome, Outcome::Granted);
        assert_eq!(records[0].provenance, Provenance::Remote);
    }
}
