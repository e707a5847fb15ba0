//! crates/chore_tracker_core/src/commands.rs
//!
//! Enumerated household actions and the single dispatch entry point. Every
//! command that changes state answers with a freshly recomputed dashboard.

use serde::{Deserialize, Serialize};

use crate::chores::ToggleOutcome;
use crate::domain::{Chore, ChoreId, Member, MemberId, NewChore, Redemption, Reward};
use crate::error::HouseholdResult;
use crate::household::{Dashboard, Household};
use crate::nudge::NudgeOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddMember { name: String },
    RemoveMember { member_id: MemberId },
    AddChore { chore: NewChore },
    ToggleChore { chore_id: ChoreId },
    DeleteChore { chore_id: ChoreId },
    ClearCompleted,
    ResetRecurring,
    AddReward { reward: Reward },
    RedeemReward {
        reward_id: String,
        #[serde(default)]
        member_id: Option<MemberId>,
    },
    Nudge { member_id: MemberId },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddMember { .. } => "add_member",
            Command::RemoveMember { .. } => "remove_member",
            Command::AddChore { .. } => "add_chore",
            Command::ToggleChore { .. } => "toggle_chore",
            Command::DeleteChore { .. } => "delete_chore",
            Command::ClearCompleted => "clear_completed",
            Command::ResetRecurring => "reset_recurring",
            Command::AddReward { .. } => "add_reward",
            Command::RedeemReward { .. } => "redeem_reward",
            Command::Nudge { .. } => "nudge",
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    MemberAdded { member: Member },
    MemberRemoved { unassigned: usize },
    ChoreAdded { chore: Chore },
    ChoreToggled {
        completed: bool,
        points: u32,
        balance: Option<u32>,
    },
    ChoreDeleted { chore: Chore },
    CompletedCleared { removed: usize },
    RecurringReset { chore_ids: Vec<ChoreId> },
    RewardAdded { reward: Reward },
    RewardRedeemed { redemption: Redemption },
    Nudged { outcome: NudgeOutcome },
}

impl From<ToggleOutcome> for CommandResult {
    fn from(outcome: ToggleOutcome) -> Self {
        CommandResult::ChoreToggled {
            completed: outcome.completed,
            points: outcome.points,
            balance: outcome.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub result: CommandResult,
    /// Present whenever the command may have changed household state.
    pub dashboard: Option<Dashboard>,
}

impl Household {
    /// Runs one command and recomputes every dependent view.
    pub async fn dispatch(&self, command: Command) -> HouseholdResult<CommandOutcome> {
        let name = command.name();
        tracing::debug!(command = name, "Dispatching command");

        let result = match command {
            Command::AddMember { name } => CommandResult::MemberAdded {
                member: self.add_member(&name).await?,
            },
            Command::RemoveMember { member_id } => CommandResult::MemberRemoved {
                unassigned: self.remove_member(&member_id).await?,
            },
            Command::AddChore { chore } => CommandResult::ChoreAdded {
                chore: self.create_chore(chore).await?,
            },
            Command::ToggleChore { chore_id } => self.toggle_chore(chore_id).await?.into(),
            Command::DeleteChore { chore_id } => CommandResult::ChoreDeleted {
                chore: self.delete_chore(chore_id).await?,
            },
            Command::ClearCompleted => CommandResult::CompletedCleared {
                removed: self.clear_completed().await?,
            },
            Command::ResetRecurring => CommandResult::RecurringReset {
                chore_ids: self.reset_recurring().await?,
            },
            Command::AddReward { reward } => CommandResult::RewardAdded {
                reward: self.add_reward(reward).await?,
            },
            Command::RedeemReward { reward_id, member_id } => CommandResult::RewardRedeemed {
                redemption: self.redeem(&reward_id, member_id.as_ref()).await?,
            },
            Command::Nudge { member_id } => CommandResult::Nudged {
                outcome: self.nudge(&member_id).await?,
            },
        };

        let dashboard = match result {
            CommandResult::Nudged { .. } | CommandResult::RewardAdded { .. } => None,
            _ => Some(self.dashboard().await?),
        };
        Ok(CommandOutcome { result, dashboard })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_decode_from_tagged_json() {
        let cmd: Command = serde_json::from_str(r#"{"type":"toggle_chore","chore_id":1714550400000}"#).unwrap();
        assert_eq!(cmd, Command::ToggleChore { chore_id: ChoreId(1714550400000) });

        let cmd: Command = serde_json::from_str(r#"{"type":"redeem_reward","reward_id":"movie"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::RedeemReward {
                reward_id: "movie".to_string(),
                member_id: None
            }
        );

        let cmd: Command = serde_json::from_str(
            r#"{"type":"add_chore","chore":{"text":"Dishes","memberId":"1","priority":5,"dueDate":"2024-05-01"}}"#,
        )
        .unwrap();
        let Command::AddChore { chore } = cmd else {
            panic!("expected add_chore");
        };
        assert_eq!(chore.priority, Some(5));
        assert_eq!(chore.member_id, Some(MemberId::from("1")));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_str::<Command>(r#"{"type":"launch_rocket"}"#).is_err());
    }
}
