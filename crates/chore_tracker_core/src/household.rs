//! crates/chore_tracker_core/src/household.rs
//!
//! The household service: an explicit store object through which every
//! operation reads whole collections, mutates them in memory and writes them
//! back. Nothing is written when an operation fails validation.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::calendar::{self, MonthGrid};
use crate::chores::{self, ToggleOutcome};
use crate::domain::{Chore, ChoreId, Member, MemberId, NewChore, PointsLedger, Redemption, Reward};
use crate::error::{HouseholdError, HouseholdResult};
use crate::members;
use crate::nudge::{self, NudgeOutcome};
use crate::ports::{Clock, KeyValueStore, NotificationService};
use crate::rewards::{self, RewardOffer};
use crate::store::HouseholdStore;
use crate::summary::{self, LeaderboardEntry, Summary};

/// A chore prepared for display, with its assignee resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreView {
    #[serde(flatten)]
    pub chore: Chore,
    pub member_name: String,
    pub member_avatar: String,
    pub overdue: bool,
    pub priority_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    pub member: Member,
    pub points: u32,
}

/// Every view that depends on household state, recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub members: Vec<MemberBalance>,
    pub chores: Vec<ChoreView>,
    pub summary: Summary,
    pub leaderboard: Vec<LeaderboardEntry>,
}

pub struct Household {
    store: HouseholdStore,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationService>,
    offset: FixedOffset,
}

/// Picks a timestamp-based id, bumped past `max_taken` so ids stay unique.
fn timestamp_id(now: DateTime<Utc>, max_taken: Option<i64>) -> i64 {
    let candidate = now.timestamp_millis();
    match max_taken {
        Some(max) if max >= candidate => max + 1,
        _ => candidate,
    }
}

impl Household {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationService>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            store: HouseholdStore::new(kv),
            clock,
            notifier,
            offset,
        }
    }

    /// The household's calendar date right now.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.offset).date_naive()
    }

    //=====================================================================================
    // Members
    //=====================================================================================

    pub async fn members(&self) -> HouseholdResult<Vec<Member>> {
        Ok(self.store.members.load().await?)
    }

    pub async fn add_member(&self, name: &str) -> HouseholdResult<Member> {
        let mut members = self.store.members.load().await?;
        let max_taken = members.iter().filter_map(|m| m.id.0.parse::<i64>().ok()).max();
        let id = MemberId(timestamp_id(self.clock.now(), max_taken).to_string());

        let member = members::add_member(&mut members, id, name).inspect_err(|e| {
            warn!(error = %e, "Rejected new member");
        })?;
        self.store.members.save(&members).await?;
        info!(member_id = %member.id, name = %member.name, "Member added");
        Ok(member)
    }

    /// Removes a member and unassigns their chores. Points and redemption
    /// history are left untouched.
    pub async fn remove_member(&self, id: &MemberId) -> HouseholdResult<usize> {
        let mut members = self.store.members.load().await?;
        let mut chores = self.store.chores.load().await?;

        let unassigned = members::remove_member(&mut members, &mut chores, id)?;
        self.store.members.save(&members).await?;
        self.store.chores.save(&chores).await?;
        info!(member_id = %id, unassigned, "Member removed");
        Ok(unassigned)
    }

    async fn require_member(&self, id: &MemberId) -> HouseholdResult<Member> {
        let members = self.store.members.load().await?;
        members::find_member(&members, id)
            .cloned()
            .ok_or_else(|| HouseholdError::UnknownMember(id.clone()))
    }

    //=====================================================================================
    // Chores
    //=====================================================================================

    pub async fn chores(&self) -> HouseholdResult<Vec<Chore>> {
        Ok(self.store.chores.load().await?)
    }

    pub async fn create_chore(&self, input: NewChore) -> HouseholdResult<Chore> {
        let members = self.store.members.load().await?;
        let mut chores = self.store.chores.load().await?;
        let now = self.clock.now();
        let id = ChoreId(timestamp_id(now, chores.iter().map(|c| c.id.0).max()));

        let chore = chores::create_chore(input, id, now.to_rfc3339(), |member_id| {
            members::find_member(&members, member_id).is_some()
        })
        .inspect_err(|e| warn!(error = %e, "Rejected new chore"))?;

        chores.push(chore.clone());
        self.store.chores.save(&chores).await?;
        info!(chore_id = %chore.id, priority = chore.priority.value(), "Chore created");
        Ok(chore)
    }

    /// Flips a chore's completion and moves its points in the same step.
    pub async fn toggle_chore(&self, id: ChoreId) -> HouseholdResult<ToggleOutcome> {
        let mut chores = self.store.chores.load().await?;
        let mut ledger = self.store.points.load().await?;

        let outcome = chores::toggle_completion(&mut chores, &mut ledger, id, self.clock.now())?;
        self.store.chores.save(&chores).await?;
        if outcome.member_id.is_some() {
            self.store.points.save(&ledger).await?;
        }
        info!(
            chore_id = %id,
            completed = outcome.completed,
            points = outcome.points,
            balance = ?outcome.balance,
            "Chore toggled"
        );
        Ok(outcome)
    }

    pub async fn delete_chore(&self, id: ChoreId) -> HouseholdResult<Chore> {
        let mut chores = self.store.chores.load().await?;
        let removed = chores::delete_chore(&mut chores, id)?;
        self.store.chores.save(&chores).await?;
        info!(chore_id = %id, "Chore deleted");
        Ok(removed)
    }

    pub async fn clear_completed(&self) -> HouseholdResult<usize> {
        let mut chores = self.store.chores.load().await?;
        let removed = chores::clear_completed(&mut chores);
        if removed > 0 {
            self.store.chores.save(&chores).await?;
        }
        info!(removed, "Cleared completed chores");
        Ok(removed)
    }

    /// Run once at load: makes recurring chores pending again when due.
    pub async fn reset_recurring(&self) -> HouseholdResult<Vec<ChoreId>> {
        let mut chores = self.store.chores.load().await?;
        let reset = chores::reset_recurring(&mut chores, self.clock.now(), self.offset);
        if !reset.is_empty() {
            self.store.chores.save(&chores).await?;
        }
        info!(count = reset.len(), "Recurring chores reset");
        Ok(reset)
    }

    /// All chores in display order with member names resolved.
    pub async fn chores_for_display(&self) -> HouseholdResult<Vec<ChoreView>> {
        let members = self.store.members.load().await?;
        let chores = self.store.chores.load().await?;
        Ok(self.chore_views(chores, &members))
    }

    fn chore_views(&self, mut chores: Vec<Chore>, members: &[Member]) -> Vec<ChoreView> {
        let today = self.today();
        chores::sort_for_display(&mut chores);
        chores
            .into_iter()
            .map(|chore| ChoreView {
                member_name: members::member_name(members, chore.member_id.as_ref()).to_string(),
                member_avatar: members::member_avatar(members, chore.member_id.as_ref()).to_string(),
                overdue: chore.is_overdue(today),
                priority_label: chore.priority.label(),
                chore,
            })
            .collect()
    }

    //=====================================================================================
    // Rewards
    //=====================================================================================

    pub async fn balance(&self, member_id: &MemberId) -> HouseholdResult<u32> {
        Ok(self.store.points.load().await?.balance(member_id))
    }

    pub async fn catalog(&self) -> HouseholdResult<Vec<Reward>> {
        Ok(self.store.rewards.load().await?)
    }

    pub async fn add_reward(&self, reward: Reward) -> HouseholdResult<Reward> {
        let mut catalog = self.store.rewards.load().await?;
        rewards::add_reward(&mut catalog, reward.clone())?;
        self.store.rewards.save(&catalog).await?;
        info!(reward_id = %reward.id, cost = reward.cost, "Reward added to catalog");
        Ok(reward)
    }

    /// The catalog with affordability for `member_id`. Without a member every
    /// reward is priced against a zero balance.
    pub async fn offers(&self, member_id: Option<&MemberId>) -> HouseholdResult<Vec<RewardOffer>> {
        let catalog = self.store.rewards.load().await?;
        let balance = match member_id {
            Some(id) => self.balance(id).await?,
            None => 0,
        };
        Ok(rewards::offers(&catalog, balance))
    }

    pub async fn redeem(
        &self,
        reward_id: &str,
        member_id: Option<&MemberId>,
    ) -> HouseholdResult<Redemption> {
        if let Some(id) = member_id {
            self.require_member(id).await?;
        }
        let catalog = self.store.rewards.load().await?;
        let mut ledger = self.store.points.load().await?;
        let mut history = self.store.redemptions.load().await?;

        let redemption = rewards::redeem(
            &catalog,
            &mut ledger,
            &mut history,
            reward_id,
            member_id,
            self.clock.now(),
        )
        .inspect_err(|e| warn!(reward_id, error = %e, "Redemption rejected"))?;

        self.store.points.save(&ledger).await?;
        self.store.redemptions.save(&history).await?;
        info!(
            reward_id,
            member_id = %redemption.member_id,
            balance = ledger.balance(&redemption.member_id),
            "Reward redeemed"
        );
        Ok(redemption)
    }

    pub async fn redemptions_for(&self, member_id: &MemberId) -> HouseholdResult<Vec<Redemption>> {
        let history = self.store.redemptions.load().await?;
        Ok(rewards::redemptions_for(&history, member_id)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn points(&self) -> HouseholdResult<PointsLedger> {
        Ok(self.store.points.load().await?)
    }

    //=====================================================================================
    // Views
    //=====================================================================================

    pub async fn summary(&self) -> HouseholdResult<Summary> {
        Ok(summary::summary(&self.store.chores.load().await?))
    }

    pub async fn leaderboard(&self) -> HouseholdResult<Vec<LeaderboardEntry>> {
        let members = self.store.members.load().await?;
        let chores = self.store.chores.load().await?;
        Ok(summary::leaderboard(&chores, &members))
    }

    pub async fn month_grid(&self, year: i32, month: u32) -> HouseholdResult<MonthGrid> {
        let chores = self.store.chores.load().await?;
        calendar::month_grid(year, month, &chores, self.today())
    }

    pub async fn day_tasks(&self, date: NaiveDate) -> HouseholdResult<Vec<ChoreView>> {
        let members = self.store.members.load().await?;
        let chores = self.store.chores.load().await?;
        let due = calendar::day_tasks(&chores, date).into_iter().cloned().collect();
        Ok(self.chore_views(due, &members))
    }

    pub async fn dashboard(&self) -> HouseholdResult<Dashboard> {
        let members = self.store.members.load().await?;
        let chores = self.store.chores.load().await?;
        let ledger = self.store.points.load().await?;

        Ok(Dashboard {
            today: self.today(),
            members: members
                .iter()
                .map(|m| MemberBalance {
                    member: m.clone(),
                    points: ledger.balance(&m.id),
                })
                .collect(),
            summary: summary::summary(&chores),
            leaderboard: summary::leaderboard(&chores, &members),
            chores: self.chore_views(chores, &members),
        })
    }

    //=====================================================================================
    // Notifications
    //=====================================================================================

    pub async fn nudge(&self, member_id: &MemberId) -> HouseholdResult<NudgeOutcome> {
        let member = self.require_member(member_id).await?;
        let chores = self.store.chores.load().await?;
        let pending = chores::pending_for(&chores, member_id).len();
        if pending == 0 {
            return Err(HouseholdError::NoPendingChores(member.name));
        }
        Ok(nudge::deliver(self.notifier.as_ref(), &member, pending).await?)
    }
}
