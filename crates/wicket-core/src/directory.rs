//! In-memory member directory.
//!
//! Holds the record-keeping side of the system: members, their membership
//! date ranges, the cards issued to them, and the access groups their cards
//! belong to. The engine only ever reads it through the [`ScheduleStore`]
//! seam; administration stays a handful of plain mutators.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use thiserror::Error;

use crate::credential::Credential;
use crate::schedule::{AccessGroup, ScheduleStore, StoreError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("unknown member number {0}")]
    UnknownMember(u32),

    #[error("unknown access group '{0}'")]
    UnknownGroup(String),
}

/// A member of the organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub number: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl Member {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One membership contract. A member may carry a history of expired ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub start_date: NaiveDate,
    pub expire_date: NaiveDate,
}

impl Membership {
    /// Active on `date` iff the start date has been reached and the expiry
    /// date has not: active on the start date, expired on the expiry date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.expire_date
    }
}

/// The directory: members, memberships, issued cards, groups, and links.
#[derive(Debug, Default)]
pub struct Directory {
    members: HashMap<u32, Member>,
    memberships: HashMap<u32, Vec<Membership>>,
    cards: HashMap<Credential, u32>,
    groups: HashMap<String, AccessGroup>,
    links: HashMap<String, HashSet<Credential>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.insert(member.number, member);
    }

    pub fn member(&self, number: u32) -> Option<&Member> {
        self.members.get(&number)
    }

    pub fn add_membership(
        &mut self,
        member_number: u32,
        membership: Membership,
    ) -> Result<(), DirectoryError> {
        if !self.members.contains_key(&member_number) {
            return Err(DirectoryError::UnknownMember(member_number));
        }
        self.memberships
            .entry(member_number)
            .or_default()
            .push(membership);
        Ok(())
    }

    /// Whether the member holds at least one membership active on `date`.
    pub fn has_active_membership_on(&self, member_number: u32, date: NaiveDate) -> bool {
        self.memberships
            .get(&member_number)
            .map(|ships| ships.iter().any(|m| m.is_active_on(date)))
            .unwrap_or(false)
    }

    /// Issue a card to a member. Re-issuing an id moves it to the new owner.
    pub fn issue_card(
        &mut self,
        member_number: u32,
        credential: Credential,
    ) -> Result<(), DirectoryError> {
        if !self.members.contains_key(&member_number) {
            return Err(DirectoryError::UnknownMember(member_number));
        }
        self.cards.insert(credential, member_number);
        Ok(())
    }

    pub fn card_owner(&self, credential: &Credential) -> Option<&Member> {
        self.cards
            .get(credential)
            .and_then(|number| self.members.get(number))
    }

    pub fn add_group(&mut self, group: AccessGroup) {
        self.links.entry(group.name.clone()).or_default();
        self.groups.insert(group.name.clone(), group);
    }

    /// Link an issued card into a group.
    pub fn link(
        &mut self,
        group_name: &str,
        credential: &Credential,
    ) -> Result<(), DirectoryError> {
        if !self.groups.contains_key(group_name) {
            return Err(DirectoryError::UnknownGroup(group_name.to_string()));
        }
        self.links
            .entry(group_name.to_string())
            .or_default()
            .insert(credential.clone());
        Ok(())
    }
}

impl ScheduleStore for Directory {
    fn groups_for(&self, credential: &Credential) -> Result<Vec<AccessGroup>, StoreError> {
        let mut out = Vec::new();
        for (name, members) in &self.links {
            if members.contains(credential) {
                if let Some(group) = self.groups.get(name) {
                    out.push(group.clone());
                }
            }
        }
        Ok(out)
    }
}
