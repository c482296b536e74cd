//! Weekly access schedules.
//!
//! Schedules are recurring: a window names a weekday and a time range, never
//! an absolute date. A credential is permitted at a moment iff any window of
//! any group containing that credential covers that moment.

pub mod matcher;
pub mod memory;

pub use matcher::matches;
pub use memory::InMemoryScheduleStore;

use chrono::{NaiveTime, Weekday};
use thiserror::Error;

use crate::credential::Credential;

/// Errors from schedule construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("window on {weekday} ends ({end}) before it starts ({start})")]
    InvertedWindow {
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },
}

/// Errors from schedule store queries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached. Callers must treat this as "cannot
    /// decide", never as a denial.
    #[error("schedule store unavailable: {0}")]
    Unavailable(String),
}

/// A recurring weekly time window.
///
/// Both bounds are inclusive: a window ending exactly at 17:00 still grants
/// access at 17:00:00. Windows never span midnight; a range like
/// 22:00..02:00 is rejected at construction rather than silently reordered,
/// because the intent of overnight windows is undefined here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessWindow {
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
}

impl AccessWindow {
    pub fn new(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self, ScheduleError> {
        if start > end {
            return Err(ScheduleError::InvertedWindow {
                weekday,
                start,
                end,
            });
        }
        Ok(Self {
            weekday,
            start,
            end,
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether this window covers the given weekday and time-of-day.
    pub fn covers(&self, weekday: Weekday, time: NaiveTime) -> bool {
        self.weekday == weekday && self.start <= time && time <= self.end
    }
}

/// A named set of windows, linked to zero or more credentials by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGroup {
    pub name: String,
    pub windows: Vec<AccessWindow>,
}

impl AccessGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            windows: Vec::new(),
        }
    }

    pub fn with_window(mut self, window: AccessWindow) -> Self {
        self.windows.push(window);
        self
    }
}

/// Read-only view of the schedule data.
///
/// The engine only queries; issuing cards and editing windows happen
/// elsewhere.
pub trait ScheduleStore: Send + Sync {
    /// Every group containing the credential. An unknown credential yields
    /// an empty list, not an error.
    fn groups_for(&self, credential: &Credential) -> Result<Vec<AccessGroup>, StoreError>;
}
