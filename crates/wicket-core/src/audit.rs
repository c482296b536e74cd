//! Audit trail for gate decisions.
//!
//! Emission is fire-and-forget: a sink that fails or blocks must never
//! change the outcome returned to the door.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::credential::Credential;
use crate::decision::{Outcome, Provenance};

/// One completed `authenticate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub credential: Credential,
    pub outcome: Outcome,
    pub provenance: Provenance,
    pub latency: Duration,
    pub at: DateTime<Utc>,
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, record: &AuditRecord);
}

/// Default sink: one `tracing` event per decision.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, record: &AuditRecord) {
        tracing::info!(
            target: "wicket::audit",
            credential = %record.credential,
            outcome = record.outcome.as_str(),
            provenance = record.provenance.as_str(),
            latency_ms = record.latency.as_millis() as u64,
            "gate decision"
        );
    }
}

/// Collects records in memory, for tests.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .expect("audit sink mutex poisoned")
            .clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn emit(&self, record: &AuditRecord) {
        self.records
            .lock()
            .expect("audit sink mutex poisoned")
            .push(record.clone());
    }
}
