//! Gate configuration file: gate settings plus an optional schedule seed.
//!
//! The schedule section exists for local-mode gates and for
//! `check-schedule`; a remote-only gate needs nothing but the `gate` table.
//!
//! ```yaml
//! gate:
//!   authorization_endpoint: "http://10.0.0.5:8000/"
//!   request_timeout_secs: 2
//! schedule:
//!   groups:
//!     - name: weekday-daytime
//!       windows:
//!         - { day: tue, start: "09:00", end: "17:00" }
//!   cards:
//!     - id: "04 a3 f0 11"
//!       groups: [weekday-daytime]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context};
use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use wicket_core::{AccessGroup, AccessWindow, Credential, GateConfig, InMemoryScheduleStore};

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GateFile {
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub schedule: ScheduleSpec,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSpec {
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub cards: Vec<CardSpec>,
}

#[derive(Debug, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
}

#[derive(Debug, Deserialize)]
pub struct WindowSpec {
    pub day: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct CardSpec {
    pub id: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

pub fn load(path: &Path) -> anyhow::Result<GateFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let file: GateFile = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    file.gate.validate()?;
    Ok(file)
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .with_context(|| format!("invalid time '{raw}', expected HH:MM or HH:MM:SS"))
}

/// Build the in-memory schedule store from the seed section.
pub fn build_store(spec: &ScheduleSpec) -> anyhow::Result<InMemoryScheduleStore> {
    let mut groups: HashMap<String, AccessGroup> = HashMap::new();
    for group_spec in &spec.groups {
        let mut group = AccessGroup::new(group_spec.name.clone());
        for w in &group_spec.windows {
            let day = Weekday::from_str(&w.day)
                .map_err(|_| anyhow::anyhow!("unknown weekday '{}'", w.day))?;
            let window = AccessWindow::new(day, parse_time(&w.start)?, parse_time(&w.end)?)?;
            group.windows.push(window);
        }
        groups.insert(group_spec.name.clone(), group);
    }

    let mut store = InMemoryScheduleStore::new();
    for card in &spec.cards {
        let credential = Credential::parse(&card.id)?;
        for name in &card.groups {
            let Some(group) = groups.get(name) else {
                bail!("card '{}' references unknown group '{}'", card.id, name);
            };
            store.link(credential.clone(), group.clone());
        }
    }
    Ok(store)
}
