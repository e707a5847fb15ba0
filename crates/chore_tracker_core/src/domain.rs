//! crates/chore_tracker_core/src/domain.rs
//!
//! Defines the core data structures for the household tracker.
//! The serde shapes match the persisted collection layout, so these structs
//! double as the stored records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::HouseholdError;

//=========================================================================================
// Identifiers
//=========================================================================================

/// Opaque member identifier, assigned from the creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Chore identifier: creation timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoreId(pub i64);

impl fmt::Display for ChoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=========================================================================================
// Members
//=========================================================================================

/// A family member who can be assigned chores and earn points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub avatar: String,
}

//=========================================================================================
// Chores
//=========================================================================================

/// Urgency of a chore, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, HouseholdError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(HouseholdError::PriorityOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Points awarded for completing a chore of this priority (15 to 35).
    pub fn points(self) -> u32 {
        10 + u32::from(self.0) * 5
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Not Urgent",
            2 => "Low",
            3 => "Medium",
            4 => "High",
            _ => "Immediate",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for Priority {
    type Error = HouseholdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        i64::from(value.0)
    }
}

/// How often a chore is expected to happen. Display only, never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

/// Cadence at which a completed chore becomes pending again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Repeat {
    pub fn is_recurring(self) -> bool {
        self != Repeat::None
    }
}

/// A household task record with assignment, schedule and completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: ChoreId,
    pub text: String,
    /// Weak reference to the assignee. Cleared when the member is removed.
    #[serde(rename = "member")]
    pub member_id: Option<MemberId>,
    #[serde(default)]
    pub frequency: Frequency,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub status_note: String,
    #[serde(default)]
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completion_dates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: String,
}

impl Chore {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }

    pub fn is_assigned_to(&self, member_id: &MemberId) -> bool {
        self.member_id.as_ref() == Some(member_id)
    }
}

/// Unvalidated input for creating a chore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChore {
    pub text: String,
    #[serde(default)]
    pub member_id: Option<MemberId>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub repeat: Option<Repeat>,
    #[serde(default)]
    pub status_note: Option<String>,
}

//=========================================================================================
// Points and Rewards
//=========================================================================================

/// Per-member point balances. Balances never go negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsLedger(BTreeMap<MemberId, u32>);

impl PointsLedger {
    pub fn balance(&self, member_id: &MemberId) -> u32 {
        self.0.get(member_id).copied().unwrap_or(0)
    }

    pub fn award(&mut self, member_id: &MemberId, points: u32) -> u32 {
        let entry = self.0.entry(member_id.clone()).or_insert(0);
        *entry = entry.saturating_add(points);
        *entry
    }

    /// Removes points, flooring the balance at zero.
    pub fn deduct(&mut self, member_id: &MemberId, points: u32) -> u32 {
        let entry = self.0.entry(member_id.clone()).or_insert(0);
        *entry = entry.saturating_sub(points);
        *entry
    }

    /// Spends points only when the balance covers them.
    pub fn debit(&mut self, member_id: &MemberId, cost: u32) -> Result<u32, HouseholdError> {
        let have = self.balance(member_id);
        if have < cost {
            return Err(HouseholdError::InsufficientPoints { have, need: cost });
        }
        self.0.insert(member_id.clone(), have - cost);
        Ok(have - cost)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &u32)> {
        self.0.iter()
    }
}

/// A redeemable entry in the reward catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub emoji: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
}

/// An immutable record of a reward exchanged for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub reward_id: String,
    pub member_id: MemberId,
    pub date: DateTime<Utc>,
    pub name: String,
    pub emoji: String,
}

//=========================================================================================
// Notifications
//=========================================================================================

/// A message handed to the host notification system. `tag` de-duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub tag: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    #[default]
    Default,
}
