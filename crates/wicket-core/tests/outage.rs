//! End-to-end behavior of a gate endpoint across an authorization-service
//! outage, and under concurrent reader scans.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wicket_core::{
    AuthzClient, Credential, DecisionCache, GateConfig, Gatekeeper, Outcome, Provenance,
    RemoteDecision, RemoteError,
};

/// Grants while `up`, fails with a transport error while down.
struct FlakyService {
    up: AtomicBool,
}

impl FlakyService {
    fn new(up: bool) -> Self {
        Self {
            up: AtomicBool::new(up),
        }
    }

    fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthzClient for FlakyService {
    async fn decide(&self, _c: &Credential) -> Result<RemoteDecision, RemoteError> {
        if self.up.load(Ordering::SeqCst) {
            Ok(RemoteDecision::Granted)
        } else {
            Err(RemoteError::Transport("connection refused".to_string()))
        }
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

fn cred(id: &str) -> Credential {
    Credential::parse(id).unwrap()
}

#[tokio::test]
async fn cold_start_outage_denies_until_first_remote_contact() {
    let service = Arc::new(FlakyService::new(false));
    let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 64));
    let gk = Gatekeeper::new(service.clone(), cache, GateConfig::default());
    let card = cred("04 a3 f0 11");

    // Endpoint unreachable at startup, cache empty: every scan denies.
    for _ in 0..3 {
        let d = gk.authenticate(&card).await;
        assert_eq!(d.outcome, Outcome::Denied);
        assert_eq!(d.provenance, Provenance::Cache);
    }

    // First successful remote contact populates the cache.
    service.set_up(true);
    let d = gk.authenticate(&card).await;
    assert_eq!(d.outcome, Outcome::Granted);
    assert_eq!(d.provenance, Provenance::Remote);

    // The next outage is survived from the cache.
    service.set_up(false);
    let d = gk.authenticate(&card).await;
    assert_eq!(d.outcome, Outcome::Granted);
    assert_eq!(d.provenance, Provenance::Cache);
}

#[tokio::test]
async fn concurrent_scans_complete_without_lost_cache_writes() {
    let service = Arc::new(FlakyService::new(true));
    let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 128));
    let gk = Arc::new(Gatekeeper::new(
        service.clone(),
        cache.clone(),
        GateConfig::default(),
    ));

    let mut tasks = Vec::new();
    for i in 0..32u32 {
        let gk = gk.clone();
        tasks.push(tokio::spawn(async move {
            let card = cred(&format!("card-{i}"));
            gk.authenticate(&card).await
        }));
    }
    for task in tasks {
        let d = task.await.unwrap();
        assert_eq!(d.outcome, Outcome::Granted);
        assert_eq!(d.provenance, Provenance::Remote);
    }

    // Every distinct credential was remembered.
    assert_eq!(cache.len(), 32);
    service.set_up(false);
    for i in 0..32u32 {
        let d = gk.authenticate(&cred(&format!("card-{i}"))).await;
        assert_eq!(d.outcome, Outcome::Granted);
        assert_eq!(d.provenance, Provenance::Cache);
    }
}

#[tokio::test]
async fn cache_never_exceeds_capacity_under_load() {
    let service = Arc::new(FlakyService::new(true));
    let cache = Arc::new(DecisionCache::new(Duration::from_secs(3600), 8));
    let gk = Gatekeeper::new(service, cache.clone(), GateConfig::default());

    for i in 0..40u32 {
        gk.authenticate(&cred(&format!("card-{i}"))).await;
    }
    assert!(cache.len() <= 8);
}
