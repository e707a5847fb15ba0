//! crates/chore_tracker_core/src/error.rs
//!
//! Failures of household operations. Every variant aborts the operation
//! before anything is written.

use crate::domain::{ChoreId, MemberId};
use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    #[error("Please enter a member name")]
    EmptyName,
    #[error("Member '{0}' already exists")]
    DuplicateMember(String),
    #[error("Please enter a chore name")]
    EmptyChoreText,
    #[error("Please assign a family member")]
    NoMemberSelected,
    #[error("Please select a due date")]
    MissingDueDate,
    #[error("Priority must be between 1 and 5, got {0}")]
    PriorityOutOfRange(i64),
    #[error("Not enough points: have {have}, need {need}")]
    InsufficientPoints { have: u32, need: u32 },
    #[error("Member {0} not found")]
    UnknownMember(MemberId),
    #[error("Chore {0} not found")]
    UnknownChore(ChoreId),
    #[error("Reward '{0}' not found")]
    UnknownReward(String),
    #[error("Invalid reward: {0}")]
    InvalidReward(String),
    #[error("{0} has no pending chores")]
    NoPendingChores(String),
    #[error("Invalid calendar month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error(transparent)]
    Port(#[from] PortError),
}

impl HouseholdError {
    /// True for failures caused by caller input rather than the storage backend.
    pub fn is_validation(&self) -> bool {
        !matches!(self, HouseholdError::Port(_))
    }
}

pub type HouseholdResult<T> = Result<T, HouseholdError>;
