//! Wicket: an offline-tolerant physical-access authorization engine.
//!
//! A gate endpoint (an RFID-controlled door lock) asks the [`Gatekeeper`]
//! whether a presented credential may pass. The gatekeeper is remote-first:
//! it asks the authorization service, and only when that service cannot be
//! reached in time does it fall back to a bounded local cache of recent
//! decisions. Everything unresolvable denies — the engine is fail-closed.
//!
//! The schedule side ([`schedule`], [`directory`]) is what the authorization
//! service itself evaluates: weekly recurring access windows grouped into
//! named access groups, linked to credentials.

pub mod audit;
pub mod cache;
pub mod config;
pub mod credential;
pub mod decision;
pub mod directory;
pub mod gatekeeper;
pub mod remote;
pub mod schedule;

pub use audit::{AuditRecord, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use cache::DecisionCache;
pub use config::{ConfigError, GateConfig};
pub use credential::{Credential, CredentialError};
pub use decision::{Decision, Outcome, Provenance};
pub use directory::{Directory, Member, Membership};
pub use gatekeeper::Gatekeeper;
pub use remote::{AuthzClient, HttpAuthzClient, LocalAuthzClient, RemoteDecision, RemoteError};
pub use schedule::{AccessGroup, AccessWindow, InMemoryScheduleStore, ScheduleStore, StoreError};
