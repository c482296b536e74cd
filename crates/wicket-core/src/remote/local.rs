//! Offline-capable authorization service.
//!
//! Runs the window matcher directly against a schedule store instead of
//! calling out over the network. Deployments that hold a local copy of the
//! schedule data can wire this in as the gatekeeper's client; it also serves
//! as the reference for what the remote service computes.

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveTime};

use super::{AuthzClient, RemoteDecision, RemoteError};
use crate::credential::Credential;
use crate::schedule::{self, ScheduleStore, StoreError};

pub struct LocalAuthzClient<S> {
    store: S,
}

impl<S: ScheduleStore> LocalAuthzClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Evaluate the schedule at an explicit date and time. A store outage is
    /// an inability to decide, never a denial.
    pub fn evaluate_at(
        &self,
        credential: &Credential,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<RemoteDecision, RemoteError> {
        match schedule::matches(&self.store, credential, date, time) {
            Ok(true) => Ok(RemoteDecision::Granted),
            Ok(false) => Ok(RemoteDecision::Denied),
            Err(StoreError::Unavailable(reason)) => Err(RemoteError::Transport(reason)),
        }
    }
}

#[async_trait]
impl<S: ScheduleStore> AuthzClient for LocalAuthzClient<S> {
    async fn decide(&self, credential: &Credential) -> Result<RemoteDecision, RemoteError> {
        // The door lives in local time; schedules are written for it.
        let now = Local::now().naive_local();
        self.evaluate_at(credential, now.date(), now.time())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{AccessGroup, AccessWindow, InMemoryScheduleStore};
    use chrono::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // A Tuesday.
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 7).unwrap()
    }

    #[test]
    fn grants_inside_window_and_denies_outside() {
        let c = Credential::parse("04 a3").unwrap();
        let mut store = InMemoryScheduleStore::new();
        store.link(
            c.clone(),
            AccessGroup::new("daytime")
                .with_window(AccessWindow::new(Weekday::Tue, t(9, 0), t(17, 0)).unwrap()),
        );
        let svc = LocalAuthzClient::new(store);

        assert_eq!(
            svc.evaluate_at(&c, tuesday(), t(10, 0)).unwrap(),
            RemoteDecision::Granted
        );
        assert_eq!(
            svc.evaluate_at(&c, tuesday(), t(18, 0)).unwrap(),
            RemoteDecision::Denied
        );
    }

    #[test]
    fn store_outage_is_not_a_denial() {
        struct DownStore;
        impl ScheduleStore for DownStore {
            fn groups_for(
                &self,
                _c: &Credential,
            ) -> Result<Vec<AccessGroup>, crate::schedule::StoreError> {
                Err(crate::schedule::StoreError::Unavailable(
                    "backing database offline".to_string(),
                ))
            }
        }
        let svc = LocalAuthzClient::new(DownStore);
        let c = Credential::parse("04 a3").unwrap();
        let err = svc.evaluate_at(&c, tuesday(), t(10, 0)).unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
