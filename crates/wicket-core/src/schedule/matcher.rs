//! Window matching.
//!
//! Pure query against a [`ScheduleStore`]: no side effects, default-deny.

use chrono::{Datelike, NaiveDate, NaiveTime};

use super::{ScheduleStore, StoreError};
use crate::credential::Credential;

/// Whether the credential is permitted access at the given date and time.
///
/// The date contributes only its weekday; the schedule itself is a recurring
/// week. Returns `false` when the credential belongs to no group or no
/// window covers the moment. A store failure propagates so the caller can
/// distinguish "denied" from "cannot decide".
pub fn matches(
    store: &dyn ScheduleStore,
    credential: &Credential,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<bool, StoreError> {
    let weekday = date.weekday();
    for group in store.groups_for(credential)? {
        if group.windows.iter().any(|w| w.covers(weekday, time)) {
            return Ok(true);
        }
    }
    Ok(false)
}
