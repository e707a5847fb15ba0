//! services/api/src/web/protocol.rs
//!
//! Request payloads accepted by the REST API. They are deliberately loose and
//! are turned into core inputs, which do the actual validation.

use chore_tracker_core::{Frequency, MemberId, NewChore, Repeat, Reward};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Members
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateMemberRequest {
    pub name: String,
}

//=========================================================================================
// Chores
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateChoreRequest {
    pub text: String,
    pub member_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "weekly")]
    pub frequency: Option<Frequency>,
    /// 1 (not urgent) to 5 (immediate). Defaults to 3.
    pub priority: Option<i64>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "none")]
    pub repeat: Option<Repeat>,
    pub status_note: Option<String>,
}

impl From<CreateChoreRequest> for NewChore {
    fn from(req: CreateChoreRequest) -> Self {
        NewChore {
            text: req.text,
            // An empty selection means nobody was picked.
            member_id: req
                .member_id
                .filter(|id| !id.trim().is_empty())
                .map(MemberId),
            frequency: req.frequency.unwrap_or_default(),
            priority: req.priority,
            due_date: req.due_date,
            repeat: req.repeat,
            status_note: req.status_note,
        }
    }
}

//=========================================================================================
// Rewards
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateRewardRequest {
    pub id: String,
    pub emoji: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
}

impl From<CreateRewardRequest> for Reward {
    fn from(req: CreateRewardRequest) -> Self {
        Reward {
            id: req.id,
            emoji: req.emoji,
            name: req.name,
            description: req.description,
            cost: req.cost,
        }
    }
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct RedeemRequest {
    pub member_id: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RewardsQuery {
    /// Member whose balance decides which rewards are unlocked.
    pub member_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_member_selection_becomes_none() {
        let req: CreateChoreRequest = serde_json::from_str(
            r#"{"text":"Dishes","member_id":"  ","due_date":"2024-05-01","repeat":"weekly"}"#,
        )
        .unwrap();
        let chore = NewChore::from(req);
        assert_eq!(chore.member_id, None);
        assert_eq!(chore.frequency, Frequency::Weekly);
        assert_eq!(chore.repeat, Some(Repeat::Weekly));
        assert_eq!(chore.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
