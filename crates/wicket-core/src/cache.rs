//! Local memory of recent authorization outcomes.
//!
//! The cache exists for availability during network partitions, not for
//! speed: it trades a bounded staleness window for a door that keeps working
//! while the authorization service is down. It is never consulted while the
//! remote service is answering, and it is only ever written from
//! authoritative remote decisions, so stale values cannot re-seed the cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::credential::Credential;
use crate::decision::Outcome;

/// One remembered decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CachedDecision {
    outcome: Outcome,
    recorded_at: DateTime<Utc>,
}

/// Bounded, time-limited map of credential to last known outcome.
///
/// `record` and `lookup` are safe from concurrent tasks; racing writes to
/// one credential resolve last-writer-wins.
#[derive(Debug)]
pub struct DecisionCache {
    entries: Mutex<HashMap<Credential, CachedDecision>>,
    max_age: chrono::Duration,
    capacity: usize,
}

impl DecisionCache {
    /// `max_age` is how long a cached grant or deny remains trustworthy
    /// while offline; `capacity` bounds how many distinct credentials are
    /// remembered.
    pub fn new(max_age: Duration, capacity: usize) -> Self {
        let max_age =
            chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::MAX);
        Self {
            entries: Mutex::new(HashMap::new()),
            max_age,
            capacity,
        }
    }

    /// Remember an authoritative outcome, overwriting any prior entry.
    ///
    /// Only call this with decisions that came from the remote service.
    pub fn record(&self, credential: &Credential, outcome: Outcome) {
        self.record_at(credential, outcome, Utc::now());
    }

    /// Like [`record`](Self::record) with an explicit timestamp. Use in
    /// tests to avoid clock-dependent assertions.
    pub fn record_at(&self, credential: &Credential, outcome: Outcome, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().expect("decision cache mutex poisoned");
        entries.insert(
            credential.clone(),
            CachedDecision {
                outcome,
                recorded_at: now,
            },
        );
        if entries.len() > self.capacity {
            Self::sweep(&mut entries, self.max_age, self.capacity, now);
        }
    }

    /// Best-known outcome for the credential, or `None` when nothing fresh
    /// is remembered. Absence means "no opinion", not denial.
    pub fn lookup(&self, credential: &Credential) -> Option<Outcome> {
        self.lookup_at(credential, Utc::now())
    }

    /// Like [`lookup`](Self::lookup) with an explicit `now`.
    pub fn lookup_at(&self, credential: &Credential, now: DateTime<Utc>) -> Option<Outcome> {
        let entries = self.entries.lock().expect("decision cache mutex poisoned");
        let entry = entries.get(credential)?;
        if now.signed_duration_since(entry.recorded_at) <= self.max_age {
            Some(entry.outcome)
        } else {
            None
        }
    }

    /// Number of physically held entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("decision cache mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reclaim space: drop expired entries first, then the least recently
    /// recorded, until at most `capacity` remain.
    fn sweep(
        entries: &mut HashMap<Credential, CachedDecision>,
        max_age: chrono::Duration,
        capacity: usize,
        now: DateTime<Utc>,
    ) {
        entries.retain(|_, e| now.signed_duration_since(e.recorded_at) <= max_age);
        while entries.len() > capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.recorded_at)
                .map(|(c, _)| c.clone());
            match oldest {
                Some(c) => {
                    entries.remove(&c);
                }
                None => break,
            }
        }
    }
}
