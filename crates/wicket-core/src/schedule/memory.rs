//! In-memory schedule store, for seeded deployments and tests.

use std::collections::HashMap;

use super::{AccessGroup, ScheduleStore, StoreError};
use crate::credential::Credential;

/// Schedule store backed by a plain map. Never reports
/// [`StoreError::Unavailable`].
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    groups: HashMap<Credential, Vec<AccessGroup>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a credential to a group. A credential may be linked to any
    /// number of groups.
    pub fn link(&mut self, credential: Credential, group: AccessGroup) {
        self.groups.entry(credential).or_default().push(group);
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn groups_for(&self, credential: &Credential) -> Result<Vec<AccessGroup>, StoreError> {
        Ok(self.groups.get(credential).cloned().unwrap_or_default())
    }
}
